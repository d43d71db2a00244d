use serde::{Deserialize, Serialize};

/// Parameters for the grid scan and mask construction stage.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct ScanParams {
    /// Number of scan cells along the vertical axis (cell size = height / grid_n).
    pub grid_n: usize,
    /// Hue dispersion below which a cell votes for the white mask.
    pub sigma_w: f32,
    /// Hue dispersion below which a cell votes for the chromatic mask.
    pub sigma_c: f32,
    /// Half-width of the hue band built around a chromatic cell's mean hue.
    pub delta_c: f32,
    /// Black-level cutoff: pixels with every RGB channel at or below this are
    /// treated as gaps between facelets and suppressed from both masks.
    pub rgb_l: f32,
    /// Box window used to consolidate the cumulative masks.
    pub consolidate_kernel: usize,
    /// Minimal local mask density (0..=255) that survives consolidation.
    pub consolidate_cutoff: u8,
    /// Maximal variance of a quadrilateral's four edge lengths for it to
    /// count as a facelet square.
    pub varmax_edges: f32,
}

impl Default for ScanParams {
    fn default() -> Self {
        Self {
            grid_n: 25,
            sigma_w: 10.0,
            sigma_c: 3.0,
            delta_c: 10.0,
            rgb_l: 60.0,
            consolidate_kernel: 20,
            consolidate_cutoff: 240,
            varmax_edges: 20.0,
        }
    }
}

/// Parameters for candidate merging and grid geometry.
///
/// The radial ratios encode the expected corner/edge distance ratio of a 3x3
/// grid seen from its center (sqrt(2) ~ 1.41 for an undistorted face) with
/// slack for perspective.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct GeometryParams {
    /// Candidates closer than `width / merge_divisor` collapse into one.
    pub merge_divisor: f32,
    /// Upper bound of the edge-facelet band, as a multiple of the shortest
    /// candidate-to-medoid distance.
    pub edge_ratio: f32,
    /// Upper bound of the corner-facelet band, same scale.
    pub corner_ratio: f32,
}

impl Default for GeometryParams {
    fn default() -> Self {
        Self {
            merge_divisor: 12.0,
            edge_ratio: 1.3,
            corner_ratio: 1.7,
        }
    }
}

/// Color classification thresholds on the OpenCV-style HSV scale
/// (hue in 0..180, saturation and value in 0..255).
///
/// The hue boundaries partition the hue circle into half-open bands
/// `[orange_l, orange_h)`, `[orange_h, yellow_h)`, ... with red as the
/// wraparound catch-all; `sat_w`/`val_w` short-circuit the hue test for
/// white, where hue carries no information.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct ColorThresholds {
    /// Saturation below which a probe is considered achromatic.
    pub sat_w: f32,
    /// Value above which an achromatic probe classifies as white.
    pub val_w: f32,
    /// Lower hue bound of the orange band.
    pub orange_l: f32,
    /// Orange / yellow boundary.
    pub orange_h: f32,
    /// Yellow / green boundary.
    pub yellow_h: f32,
    /// Green / blue boundary.
    pub green_h: f32,
    /// Blue / red boundary.
    pub blue_h: f32,
    /// Half-width in pixels of the square probe window sampled around a
    /// resolved facelet position.
    pub probe_half: usize,
}

impl Default for ColorThresholds {
    fn default() -> Self {
        Self {
            sat_w: 60.0,
            val_w: 130.0,
            orange_l: 4.0,
            orange_h: 20.0,
            yellow_h: 40.0,
            green_h: 90.0,
            blue_h: 140.0,
            probe_half: 10,
        }
    }
}

/// Parameters for the whole face detection pipeline.
///
/// Owned by the [`crate::FaceDetector`] and read-only for the duration of a
/// frame. The numeric values are empirical calibration constants tied to the
/// physical facelet layout and camera optics; retune them through this
/// struct rather than in code.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct FaceDetectorParams {
    #[serde(default)]
    pub scan: ScanParams,
    #[serde(default)]
    pub geometry: GeometryParams,
    #[serde(default)]
    pub colors: ColorThresholds,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_round_trip_through_json() {
        let params = FaceDetectorParams::default();
        let json = serde_json::to_string(&params).expect("serialize");
        let back: FaceDetectorParams = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back.scan.grid_n, params.scan.grid_n);
        assert_eq!(back.colors.yellow_h, params.colors.yellow_h);
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let back: FaceDetectorParams = serde_json::from_str("{}").expect("deserialize");
        assert_eq!(back.geometry.merge_divisor, 12.0);
        assert_eq!(back.scan.consolidate_cutoff, 240);
    }
}

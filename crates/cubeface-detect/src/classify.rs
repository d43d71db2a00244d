use cubeface_core::FrameView;
use nalgebra::Point2;

use crate::params::ColorThresholds;
use crate::types::FaceColor;

/// Classify a mean HSV probe into one of the six facelet colors.
///
/// The rules are an ordered first-match list, not a partition: white is
/// decided on saturation and value alone (hue carries no information for
/// achromatic probes), and red is the catch-all for hues outside the named
/// bands, which is what closes the hue circle at its 0/180 seam.
pub fn classify_hsv(h: f32, s: f32, v: f32, t: &ColorThresholds) -> FaceColor {
    if s < t.sat_w && v > t.val_w {
        FaceColor::White
    } else if t.orange_l <= h && h < t.orange_h {
        FaceColor::Orange
    } else if t.orange_h <= h && h < t.yellow_h {
        FaceColor::Yellow
    } else if t.yellow_h <= h && h < t.green_h {
        FaceColor::Green
    } else if t.green_h <= h && h < t.blue_h {
        FaceColor::Blue
    } else {
        FaceColor::Red
    }
}

/// Classify the color under a resolved facelet position by sampling the
/// probe window around it.
pub fn classify_at(frame: &FrameView<'_>, p: Point2<f32>, t: &ColorThresholds) -> FaceColor {
    let (h, s, v) = frame.mean_hsv_window(p, t.probe_half);
    classify_hsv(h, s, v, t)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t() -> ColorThresholds {
        ColorThresholds::default()
    }

    #[test]
    fn low_saturation_high_value_is_white_regardless_of_hue() {
        let t = t();
        let c = classify_hsv(90.0, t.sat_w - 1.0, t.val_w + 1.0, &t);
        assert_eq!(c, FaceColor::White);
    }

    #[test]
    fn band_boundaries_are_half_open() {
        let t = t();
        // exactly on yellow_h falls into the green band
        assert_eq!(classify_hsv(t.yellow_h, 200.0, 200.0, &t), FaceColor::Green);
        // exactly on orange_h falls into the yellow band
        assert_eq!(classify_hsv(t.orange_h, 200.0, 200.0, &t), FaceColor::Yellow);
        // exactly on orange_l is already orange
        assert_eq!(classify_hsv(t.orange_l, 200.0, 200.0, &t), FaceColor::Orange);
    }

    #[test]
    fn hues_outside_the_named_bands_are_red() {
        let t = t();
        // below the orange band (the low end of the red wraparound)
        assert_eq!(classify_hsv(1.0, 200.0, 200.0, &t), FaceColor::Red);
        // above the blue band (the high end)
        assert_eq!(classify_hsv(175.0, 200.0, 200.0, &t), FaceColor::Red);
    }

    #[test]
    fn saturated_probe_ignores_the_white_rule() {
        let t = t();
        let c = classify_hsv(60.0, t.sat_w + 40.0, t.val_w + 40.0, &t);
        assert_eq!(c, FaceColor::Green);
    }
}

use cubeface_core::FrameView;
use log::{debug, info};

use crate::classify::classify_at;
use crate::contour::square_centers;
use crate::dedup::merge_close_points;
use crate::error::FaceDetectError;
use crate::params::FaceDetectorParams;
use crate::resolve::{assemble_grid, medoid, mirror_missing, radial_buckets};
use crate::scan::scan_patches;
use crate::types::FaceDetection;

/// Single-frame cube face detector.
///
/// Holds nothing but its immutable parameters; every call to
/// [`FaceDetector::detect`] is independent and all intermediate state is
/// frame-local.
pub struct FaceDetector {
    params: FaceDetectorParams,
}

impl FaceDetector {
    pub fn new(params: FaceDetectorParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &FaceDetectorParams {
        &self.params
    }

    /// Run the full pipeline on one frame.
    ///
    /// Errors are per-frame conditions (nothing resembling a face in view);
    /// the caller simply feeds the next frame.
    pub fn detect(&self, frame: &FrameView<'_>) -> Result<FaceDetection, FaceDetectError> {
        let scan = &self.params.scan;
        let masks = scan_patches(frame, &self.params);

        let cell = if scan.grid_n > 0 {
            frame.height / scan.grid_n
        } else {
            0
        };
        let approx_tol = cell as f32 / 2.0;

        let mut candidates = square_centers(&masks.chromatic, approx_tol, scan.varmax_edges);
        candidates.extend(square_centers(&masks.white, approx_tol, scan.varmax_edges));
        debug!("{} square candidates before merging", candidates.len());

        let delta = frame.width as f32 / self.params.geometry.merge_divisor;
        let candidates = merge_close_points(&candidates, delta);

        let med = medoid(&candidates).ok_or(FaceDetectError::NoCandidates)?;

        let mut buckets = radial_buckets(
            &candidates,
            med,
            self.params.geometry.edge_ratio,
            self.params.geometry.corner_ratio,
        );
        debug!(
            "{} candidates around medoid: {} edges, {} corners direct",
            candidates.len(),
            buckets.edges.len(),
            buckets.corners.len()
        );

        let mirrored = mirror_missing(&buckets, med, delta);
        buckets.edges.extend(mirrored.edges);
        buckets.corners.extend(mirrored.corners);

        let centers = assemble_grid(&buckets, med)?;
        let colors = centers.map(|row| row.map(|p| classify_at(frame, p, &self.params.colors)));

        info!(
            "face resolved: {}",
            colors
                .iter()
                .flatten()
                .map(|c| c.name())
                .collect::<Vec<_>>()
                .join(" ")
        );

        Ok(FaceDetection {
            centers,
            colors,
            medoid: med,
            candidates,
        })
    }
}

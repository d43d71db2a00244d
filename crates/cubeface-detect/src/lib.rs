//! Single-frame cube face detection.
//!
//! Given one captured frame, the pipeline locates the 3x3 arrangement of
//! colored facelets on the face presented to the camera and classifies each
//! into one of the six cube colors:
//!
//! 1. scan the frame on a regular grid and turn low hue-dispersion cells
//!    into cumulative chromatic/white masks ([`scan_patches`]);
//! 2. extract near-square mask contours and emit their centroids as facelet
//!    candidates ([`square_centers`]);
//! 3. merge near-duplicate candidates ([`merge_close_points`]);
//! 4. resolve the nine grid positions around the candidate medoid, mirroring
//!    occluded facelets through the center ([`radial_buckets`],
//!    [`mirror_missing`], [`assemble_grid`]);
//! 5. classify the color under each resolved position ([`classify_at`]).
//!
//! Everything is frame-local: the only state a [`FaceDetector`] carries is
//! its immutable [`FaceDetectorParams`].

mod classify;
mod contour;
mod dedup;
mod detector;
mod error;
mod params;
mod resolve;
mod scan;
mod types;

pub use classify::{classify_at, classify_hsv};
pub use contour::square_centers;
pub use dedup::merge_close_points;
pub use detector::FaceDetector;
pub use error::FaceDetectError;
pub use params::{ColorThresholds, FaceDetectorParams, GeometryParams, ScanParams};
pub use resolve::{assemble_grid, medoid, mirror_missing, radial_buckets};
pub use scan::{scan_patches, ScanMasks};
pub use types::{FaceColor, FaceDetection, RoleBuckets};

//! High-level facade crate for the `cubeface-*` workspace.
//!
//! This crate provides:
//! - stable, convenient re-exports of the detection pipeline
//! - (feature-gated) end-to-end helpers that take an `image::RgbImage`,
//!   pre-blur it, build the HSV frame context and run the face detector
//! - the capture/display boundary traits the surrounding application
//!   implements (`detect::FrameSource`, `detect::FrameSink`)
//!
//! ## Quickstart
//!
//! ```no_run
//! use cubeface::detect;
//! use cubeface::FaceDetectorParams;
//! use image::ImageReader;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let img = ImageReader::open("face.png")?.decode()?.to_rgb8();
//! let result = detect::detect_face(&img, FaceDetectorParams::default())?;
//! println!("{}", result.labels_row_major().map(|c| c.name()).join(" "));
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `cubeface::core`: frame context, masks, HSV conversion, logging.
//! - `cubeface::face`: the per-frame detection pipeline and its parameters.
//! - `cubeface::detect` (feature `image`): end-to-end helpers from
//!   `image::RgbImage` plus the frame source/sink boundary traits.

pub use cubeface_core as core;
pub use cubeface_detect as face;

pub use cubeface_detect::{
    FaceColor, FaceDetectError, FaceDetection, FaceDetector, FaceDetectorParams,
};

#[cfg(feature = "image")]
pub mod detect;

//! Core frame and mask types for cube face detection.
//!
//! This crate is intentionally small and purely pixel-level. It does *not*
//! depend on any concrete detector or image I/O crate: callers hand it packed
//! RGB bytes and get back the HSV planes and binary masks the detectors work
//! on.

mod blur;
mod frame;
mod logger;
mod mask;

pub use blur::box_blur_rgb8;
pub use frame::{hsv_from_rgb, FrameView, HsvFrame, RgbFrameView};
pub use mask::Mask;

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::init_with_level;

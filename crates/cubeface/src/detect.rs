use cubeface_core::{box_blur_rgb8, FrameView, HsvFrame, RgbFrameView};
use cubeface_detect::{FaceDetectError, FaceDetection, FaceDetector, FaceDetectorParams};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Kernel of the denoising blur applied to a captured frame before HSV
/// conversion.
const PRE_BLUR_KERNEL: usize = 5;

/// Errors produced by the high-level facade helpers.
#[derive(thiserror::Error, Debug)]
pub enum DetectError {
    #[error("invalid RGB frame buffer length (expected {expected} bytes, got {got})")]
    InvalidFrameBuffer { expected: usize, got: usize },

    #[error("invalid frame dimensions (width={width}, height={height})")]
    InvalidFrameDimensions { width: u32, height: u32 },

    #[error("no frame available from the capture device")]
    DeviceUnavailable,

    #[error(transparent)]
    Face(#[from] FaceDetectError),
}

/// Boundary interface for frame acquisition.
///
/// Implementations wrap whatever capture backend the application uses. A
/// device failure is reported as [`DetectError::DeviceUnavailable`] and is
/// fatal to the capture session; per-frame detection failures are not.
pub trait FrameSource {
    /// Fetch the next frame from the device.
    fn next_frame(&mut self) -> Result<image::RgbImage, DetectError>;
}

/// Boundary interface for an optional, purely informational display sink.
///
/// Receives the frame together with the classified facelet labels at their
/// image positions. Correctness of the pipeline never depends on a sink
/// being attached.
pub trait FrameSink {
    fn show(
        &mut self,
        frame: &image::RgbImage,
        labels: &[(nalgebra::Point2<f32>, cubeface_detect::FaceColor)],
    );
}

/// Run the face detector end-to-end on a captured RGB frame.
///
/// The frame is box-blurred to knock off sensor noise, converted to HSV and
/// handed to the pipeline. A detection failure is a per-frame condition; the
/// caller is expected to try again with the next frame.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip(img, params), fields(width = img.width(), height = img.height()))
)]
pub fn detect_face(
    img: &image::RgbImage,
    params: FaceDetectorParams,
) -> Result<FaceDetection, DetectError> {
    let (w, h) = (img.width() as usize, img.height() as usize);
    let blurred = box_blur_rgb8(w, h, img.as_raw(), PRE_BLUR_KERNEL);
    let view = RgbFrameView::new(w, h, &blurred);
    let hsv = HsvFrame::from_rgb(&view);
    let frame = FrameView::new(view, &hsv);

    let detector = FaceDetector::new(params);
    Ok(detector.detect(&frame)?)
}

/// Convenience overload using default parameters.
pub fn detect_face_default(img: &image::RgbImage) -> Result<FaceDetection, DetectError> {
    detect_face(img, FaceDetectorParams::default())
}

/// Grab one frame from a source and run the detector on it.
///
/// This is the single-shot building block of a capture loop: the loop
/// itself, preview rendering and exit handling stay with the caller.
pub fn grab_face(
    source: &mut dyn FrameSource,
    params: FaceDetectorParams,
) -> Result<FaceDetection, DetectError> {
    let frame = source.next_frame()?;
    detect_face(&frame, params)
}

/// Build an `image::RgbImage` from a raw packed-RGB buffer.
pub fn rgb_image_from_slice(
    width: u32,
    height: u32,
    pixels: &[u8],
) -> Result<image::RgbImage, DetectError> {
    let w = usize::try_from(width).ok();
    let h = usize::try_from(height).ok();
    let Some((w, h)) = w.zip(h) else {
        return Err(DetectError::InvalidFrameDimensions { width, height });
    };
    let Some(expected) = w.checked_mul(h).and_then(|n| n.checked_mul(3)) else {
        return Err(DetectError::InvalidFrameDimensions { width, height });
    };
    if pixels.len() != expected {
        return Err(DetectError::InvalidFrameBuffer {
            expected,
            got: pixels.len(),
        });
    }
    image::RgbImage::from_raw(width, height, pixels.to_vec())
        .ok_or(DetectError::InvalidFrameDimensions { width, height })
}

/// Run the detector on a raw packed-RGB buffer.
pub fn detect_face_from_rgb8(
    width: u32,
    height: u32,
    pixels: &[u8],
    params: FaceDetectorParams,
) -> Result<FaceDetection, DetectError> {
    let img = rgb_image_from_slice(width, height, pixels)?;
    detect_face(&img, params)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_image_from_slice_checks_the_buffer_length() {
        let pixels = vec![0u8; 4 * 4 * 3];
        assert!(rgb_image_from_slice(4, 4, &pixels).is_ok());

        match rgb_image_from_slice(4, 5, &pixels) {
            Err(DetectError::InvalidFrameBuffer { expected, got }) => {
                assert_eq!(expected, 60);
                assert_eq!(got, 48);
            }
            other => panic!("expected InvalidFrameBuffer, got {other:?}"),
        }
    }

    #[test]
    fn dark_frame_fails_with_a_face_error() {
        let img = image::RgbImage::from_pixel(64, 64, image::Rgb([15, 15, 15]));
        match detect_face_default(&img) {
            Err(DetectError::Face(FaceDetectError::NoCandidates)) => {}
            other => panic!("expected NoCandidates, got {other:?}"),
        }
    }

    #[test]
    fn grab_face_propagates_device_failure() {
        struct DeadCamera;
        impl FrameSource for DeadCamera {
            fn next_frame(&mut self) -> Result<image::RgbImage, DetectError> {
                Err(DetectError::DeviceUnavailable)
            }
        }

        let mut source = DeadCamera;
        match grab_face(&mut source, FaceDetectorParams::default()) {
            Err(DetectError::DeviceUnavailable) => {}
            other => panic!("expected DeviceUnavailable, got {other:?}"),
        }
    }
}

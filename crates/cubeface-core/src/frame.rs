use nalgebra::Point2;

/// Borrowed packed-RGB frame, 8 bits per channel.
#[derive(Clone, Copy, Debug)]
pub struct RgbFrameView<'a> {
    pub width: usize,
    pub height: usize,
    pub data: &'a [u8], // row-major RGB triples, len = w*h*3
}

impl<'a> RgbFrameView<'a> {
    pub fn new(width: usize, height: usize, data: &'a [u8]) -> Self {
        debug_assert_eq!(data.len(), width * height * 3);
        Self {
            width,
            height,
            data,
        }
    }
}

/// Convert one RGB pixel to `(h, s, v)`.
///
/// Hue follows the OpenCV convention: degrees halved to fit `[0, 180)`, with
/// `h = 0` for achromatic pixels. Saturation and value stay on the 0..255
/// scale.
pub fn hsv_from_rgb(r: u8, g: u8, b: u8) -> (f32, f32, f32) {
    let (r, g, b) = (r as f32, g as f32, b as f32);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let v = max;
    let s = if max > 0.0 { delta / max * 255.0 } else { 0.0 };

    if delta <= 0.0 {
        return (0.0, s, v);
    }

    let mut h = if max == r {
        60.0 * (g - b) / delta
    } else if max == g {
        120.0 + 60.0 * (b - r) / delta
    } else {
        240.0 + 60.0 * (r - g) / delta
    };
    if h < 0.0 {
        h += 360.0;
    }

    (h * 0.5, s, v)
}

/// Owned HSV planes for one frame.
///
/// All planes are row-major with `len = width * height`.
#[derive(Clone, Debug)]
pub struct HsvFrame {
    pub width: usize,
    pub height: usize,
    pub h: Vec<f32>,
    pub s: Vec<f32>,
    pub v: Vec<f32>,
}

impl HsvFrame {
    /// Build the HSV planes from a packed RGB frame.
    pub fn from_rgb(rgb: &RgbFrameView<'_>) -> Self {
        let n = rgb.width * rgb.height;
        let mut h = Vec::with_capacity(n);
        let mut s = Vec::with_capacity(n);
        let mut v = Vec::with_capacity(n);
        for px in rgb.data.chunks_exact(3) {
            let (ph, ps, pv) = hsv_from_rgb(px[0], px[1], px[2]);
            h.push(ph);
            s.push(ps);
            v.push(pv);
        }
        Self {
            width: rgb.width,
            height: rgb.height,
            h,
            s,
            v,
        }
    }
}

/// Read-only per-frame context passed through the detection pipeline.
///
/// Bundles the frame dimensions with the raw RGB bytes and the derived HSV
/// planes so every stage works from the same data and nothing outlives the
/// frame.
#[derive(Clone, Copy, Debug)]
pub struct FrameView<'a> {
    pub width: usize,
    pub height: usize,
    pub rgb: &'a [u8],
    pub h: &'a [f32],
    pub s: &'a [f32],
    pub v: &'a [f32],
}

impl<'a> FrameView<'a> {
    pub fn new(rgb: RgbFrameView<'a>, hsv: &'a HsvFrame) -> Self {
        debug_assert_eq!(rgb.width, hsv.width);
        debug_assert_eq!(rgb.height, hsv.height);
        Self {
            width: hsv.width,
            height: hsv.height,
            rgb: rgb.data,
            h: &hsv.h,
            s: &hsv.s,
            v: &hsv.v,
        }
    }

    #[inline]
    pub fn rgb_at(&self, x: usize, y: usize) -> [u8; 3] {
        let i = (y * self.width + x) * 3;
        [self.rgb[i], self.rgb[i + 1], self.rgb[i + 2]]
    }

    /// Mean `(h, s, v)` over the square probe window of the given half-width
    /// centered on `center`, clamped to the frame.
    ///
    /// The mean is the plain arithmetic mean over the pixels actually
    /// sampled; classification thresholds are calibrated against this
    /// normalization. Returns `(0, 0, 0)` when the window is empty.
    pub fn mean_hsv_window(&self, center: Point2<f32>, half: usize) -> (f32, f32, f32) {
        let cx = center.x.round() as i64;
        let cy = center.y.round() as i64;
        let half = half as i64;

        let x0 = (cx - half).clamp(0, self.width as i64) as usize;
        let x1 = (cx + half).clamp(0, self.width as i64) as usize;
        let y0 = (cy - half).clamp(0, self.height as i64) as usize;
        let y1 = (cy + half).clamp(0, self.height as i64) as usize;
        if x0 >= x1 || y0 >= y1 {
            return (0.0, 0.0, 0.0);
        }

        let mut sum = [0.0f64; 3];
        for y in y0..y1 {
            let row = y * self.width;
            for x in x0..x1 {
                let i = row + x;
                sum[0] += self.h[i] as f64;
                sum[1] += self.s[i] as f64;
                sum[2] += self.v[i] as f64;
            }
        }
        let n = ((x1 - x0) * (y1 - y0)) as f64;
        (
            (sum[0] / n) as f32,
            (sum[1] / n) as f32,
            (sum[2] / n) as f32,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn hsv_of_gray_has_zero_hue_and_saturation() {
        let (h, s, v) = hsv_from_rgb(128, 128, 128);
        assert_relative_eq!(h, 0.0);
        assert_relative_eq!(s, 0.0);
        assert_relative_eq!(v, 128.0);
    }

    #[test]
    fn hsv_of_primaries_matches_opencv_scale() {
        let (h, _, v) = hsv_from_rgb(255, 0, 0);
        assert_relative_eq!(h, 0.0);
        assert_relative_eq!(v, 255.0);

        let (h, s, _) = hsv_from_rgb(0, 255, 0);
        assert_relative_eq!(h, 60.0);
        assert_relative_eq!(s, 255.0);

        let (h, _, _) = hsv_from_rgb(0, 0, 255);
        assert_relative_eq!(h, 120.0);
    }

    #[test]
    fn hue_wraps_into_low_half_for_magenta_reds() {
        // r > b > g sits just below 360 degrees before halving
        let (h, _, _) = hsv_from_rgb(255, 0, 64);
        assert!(h > 170.0 && h < 180.0, "h = {h}");
    }

    #[test]
    fn mean_window_is_exact_on_flat_frames() {
        let rgb: Vec<u8> = std::iter::repeat([10u8, 200, 30])
            .take(16)
            .flatten()
            .collect();
        let view = RgbFrameView::new(4, 4, &rgb);
        let hsv = HsvFrame::from_rgb(&view);
        let frame = FrameView::new(view, &hsv);

        let (h, s, v) = frame.mean_hsv_window(Point2::new(2.0, 2.0), 10);
        let (eh, es, ev) = hsv_from_rgb(10, 200, 30);
        assert_relative_eq!(h, eh, epsilon = 1e-4);
        assert_relative_eq!(s, es, epsilon = 1e-3);
        assert_relative_eq!(v, ev, epsilon = 1e-4);
    }

    #[test]
    fn mean_window_outside_frame_is_zero() {
        let rgb = vec![255u8; 4 * 4 * 3];
        let view = RgbFrameView::new(4, 4, &rgb);
        let hsv = HsvFrame::from_rgb(&view);
        let frame = FrameView::new(view, &hsv);

        let (h, s, v) = frame.mean_hsv_window(Point2::new(-50.0, -50.0), 10);
        assert_eq!((h, s, v), (0.0, 0.0, 0.0));
    }
}

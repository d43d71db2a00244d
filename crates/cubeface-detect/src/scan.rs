use cubeface_core::{FrameView, Mask};
use log::debug;

use crate::params::FaceDetectorParams;

/// Cumulative patch masks produced by the grid scan.
#[derive(Clone, Debug)]
pub struct ScanMasks {
    /// Pixels voted into a single-hue band by at least one scan cell.
    pub chromatic: Mask,
    /// Pixels voted saturation-low / value-high by at least one scan cell.
    pub white: Mask,
}

/// Scan the frame on a regular cell grid and build the chromatic and white
/// patch masks.
///
/// Each interior cell computes the dispersion of its hue values. Low
/// dispersion means the cell sits inside a patch of one color (or inside an
/// achromatic patch, where hue is flat as well), so the cell votes: it marks
/// the matching pixels of its expanded 3x3-cell neighborhood in the
/// cumulative masks. High-dispersion cells straddle patch boundaries and
/// vote for neither mask.
///
/// Both gates may fire for the same cell; the per-pixel ranges decide what
/// actually gets marked, so a saturated cell passing the white gate marks
/// nothing there.
pub fn scan_patches(frame: &FrameView<'_>, params: &FaceDetectorParams) -> ScanMasks {
    let scan = &params.scan;
    let (w, h) = (frame.width, frame.height);

    let mut chromatic = Mask::zeros(w, h);
    let mut white = Mask::zeros(w, h);

    let cell = if scan.grid_n > 0 { h / scan.grid_n } else { 0 };
    if cell == 0 {
        return ScanMasks { chromatic, white };
    }

    let ymax = h - cell;
    let xmax = w.saturating_sub(cell);

    let mut y = cell;
    while y < ymax {
        let mut x = cell;
        while x < xmax {
            let (mean_h, mean_h_sq) = hue_cell_stats(frame, x, y, cell);
            let sigma = (mean_h_sq - mean_h * mean_h).max(0.0).sqrt();

            // expanded 3x3-cell neighborhood, clamped to the frame
            let rect = (
                x - cell,
                y - cell,
                (x + 2 * cell).min(w),
                (y + 2 * cell).min(h),
            );

            if sigma < scan.sigma_w {
                mark_white(frame, &mut white, rect, params.colors.sat_w, params.colors.val_w);
            }
            if sigma < scan.sigma_c {
                mark_hue_band(frame, &mut chromatic, rect, mean_h, scan.delta_c);
            }
            x += cell;
        }
        y += cell;
    }

    // Dark gaps between facelets must not glue neighboring patches together.
    let black = black_mask(frame, scan.rgb_l);
    chromatic.suppress(&black);
    white.suppress(&black);

    let chromatic = chromatic.consolidate(scan.consolidate_kernel, scan.consolidate_cutoff);
    let white = white.consolidate(scan.consolidate_kernel, scan.consolidate_cutoff);
    debug!(
        "scan: {} chromatic px, {} white px after consolidation",
        chromatic.count(),
        white.count()
    );

    ScanMasks { chromatic, white }
}

/// Mean and mean-of-squares of the hue plane over one scan cell.
fn hue_cell_stats(frame: &FrameView<'_>, x: usize, y: usize, cell: usize) -> (f32, f32) {
    let mut sum = 0.0f64;
    let mut sum_sq = 0.0f64;
    for yy in y..y + cell {
        let row = yy * frame.width;
        for xx in x..x + cell {
            let h = frame.h[row + xx] as f64;
            sum += h;
            sum_sq += h * h;
        }
    }
    let n = (cell * cell) as f64;
    ((sum / n) as f32, (sum_sq / n) as f32)
}

fn mark_white(
    frame: &FrameView<'_>,
    mask: &mut Mask,
    (x0, y0, x1, y1): (usize, usize, usize, usize),
    sat_w: f32,
    val_w: f32,
) {
    for y in y0..y1 {
        let row = y * frame.width;
        for x in x0..x1 {
            let i = row + x;
            if frame.s[i] <= sat_w && frame.v[i] >= val_w {
                mask.set(x, y);
            }
        }
    }
}

/// Mark pixels whose hue falls within `mean_h +- delta`, wrapping the band
/// around the 0/180 hue boundary when it overflows either end.
fn mark_hue_band(
    frame: &FrameView<'_>,
    mask: &mut Mask,
    (x0, y0, x1, y1): (usize, usize, usize, usize),
    mean_h: f32,
    delta: f32,
) {
    let lo = mean_h - delta;
    let hi = mean_h + delta;
    for y in y0..y1 {
        let row = y * frame.width;
        for x in x0..x1 {
            let h = frame.h[row + x];
            let in_band = if hi >= 180.0 {
                h <= hi - 180.0 || h >= lo
            } else if lo < 0.0 {
                h >= lo + 180.0 || h <= hi
            } else {
                h >= lo && h <= hi
            };
            if in_band {
                mask.set(x, y);
            }
        }
    }
}

/// Pixels with every RGB channel at or below the black-level cutoff.
fn black_mask(frame: &FrameView<'_>, rgb_l: f32) -> Mask {
    let mut mask = Mask::zeros(frame.width, frame.height);
    for y in 0..frame.height {
        for x in 0..frame.width {
            let [r, g, b] = frame.rgb_at(x, y);
            if r as f32 <= rgb_l && g as f32 <= rgb_l && b as f32 <= rgb_l {
                mask.set(x, y);
            }
        }
    }
    mask
}

#[cfg(test)]
mod tests {
    use super::*;
    use cubeface_core::{HsvFrame, RgbFrameView};

    const DARK: [u8; 3] = [20, 20, 20];

    fn frame_with_square(
        size: usize,
        x0: usize,
        y0: usize,
        side: usize,
        color: [u8; 3],
    ) -> Vec<u8> {
        let mut rgb = Vec::with_capacity(size * size * 3);
        for y in 0..size {
            for x in 0..size {
                let inside = x >= x0 && x < x0 + side && y >= y0 && y < y0 + side;
                rgb.extend_from_slice(if inside { &color } else { &DARK });
            }
        }
        rgb
    }

    fn run_scan(rgb: &[u8], size: usize) -> ScanMasks {
        let view = RgbFrameView::new(size, size, rgb);
        let hsv = HsvFrame::from_rgb(&view);
        let frame = FrameView::new(view, &hsv);
        scan_patches(&frame, &FaceDetectorParams::default())
    }

    #[test]
    fn flat_green_square_lands_in_chromatic_mask() {
        let rgb = frame_with_square(200, 60, 60, 80, [40, 200, 60]);
        let masks = run_scan(&rgb, 200);

        assert!(masks.chromatic.get(100, 100));
        assert_eq!(masks.white.count(), 0);
        // dark background stays suppressed
        assert!(!masks.chromatic.get(10, 10));
    }

    #[test]
    fn flat_white_square_lands_in_white_mask() {
        let rgb = frame_with_square(200, 60, 60, 80, [220, 220, 220]);
        let masks = run_scan(&rgb, 200);

        assert!(masks.white.get(100, 100));
        assert!(!masks.white.get(10, 10));
    }

    #[test]
    fn hue_band_wraps_for_reds_near_the_boundary() {
        // rgb (255, 0, 10) has hue ~178.8, so the band around it overflows 180
        let rgb = frame_with_square(200, 60, 60, 80, [255, 0, 10]);
        let masks = run_scan(&rgb, 200);

        assert!(masks.chromatic.get(100, 100));
    }

    #[test]
    fn empty_frame_produces_empty_masks() {
        let rgb = frame_with_square(200, 0, 0, 0, DARK);
        let masks = run_scan(&rgb, 200);

        assert_eq!(masks.chromatic.count(), 0);
        assert_eq!(masks.white.count(), 0);
    }
}

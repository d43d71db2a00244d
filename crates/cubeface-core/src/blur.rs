/// Box-blur a packed RGB frame with a `kernel x kernel` window.
///
/// Windows are clamped at the frame border and each output pixel is the
/// rounded mean over the clamped window, per channel. Used to knock sensor
/// noise off a captured frame before HSV conversion.
pub fn box_blur_rgb8(width: usize, height: usize, data: &[u8], kernel: usize) -> Vec<u8> {
    debug_assert_eq!(data.len(), width * height * 3);
    if kernel <= 1 || width == 0 || height == 0 {
        return data.to_vec();
    }

    // per-channel summed-area tables, (w+1) x (h+1)
    let stride = width + 1;
    let mut sat = vec![[0u64; 3]; stride * (height + 1)];
    for y in 0..height {
        let mut row_sum = [0u64; 3];
        for x in 0..width {
            let i = (y * width + x) * 3;
            for c in 0..3 {
                row_sum[c] += data[i + c] as u64;
                sat[(y + 1) * stride + (x + 1)][c] = sat[y * stride + (x + 1)][c] + row_sum[c];
            }
        }
    }

    let lo = kernel / 2;
    let hi = kernel - lo;
    let mut out = vec![0u8; data.len()];
    for y in 0..height {
        let y0 = y.saturating_sub(lo);
        let y1 = (y + hi).min(height);
        for x in 0..width {
            let x0 = x.saturating_sub(lo);
            let x1 = (x + hi).min(width);
            let area = ((x1 - x0) * (y1 - y0)) as u64;

            let i = (y * width + x) * 3;
            for c in 0..3 {
                let sum = sat[y1 * stride + x1][c] + sat[y0 * stride + x0][c]
                    - sat[y0 * stride + x1][c]
                    - sat[y1 * stride + x0][c];
                out[i + c] = ((sum + area / 2) / area) as u8;
            }
        }
    }
    out
}

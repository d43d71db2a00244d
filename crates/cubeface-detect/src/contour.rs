use cubeface_core::Mask;
use nalgebra::Point2;

/// Clockwise Moore neighborhood in image coordinates (y grows downward),
/// starting west.
const NBRS: [(i32, i32); 8] = [
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
];

fn nbr_index(d: (i32, i32)) -> usize {
    NBRS.iter().position(|&n| n == d).unwrap_or(0)
}

/// Extract candidate facelet centers from a consolidated patch mask.
///
/// Each 8-connected component's external boundary is traced, approximated to
/// a polygon with the given tolerance, and kept only if it is a
/// quadrilateral whose four edge lengths have variance at most
/// `varmax_edges`. The centroid of the four vertices is the candidate.
pub fn square_centers(mask: &Mask, approx_tol: f32, varmax_edges: f32) -> Vec<Point2<f32>> {
    let mut out = Vec::new();
    for contour in external_contours(mask) {
        let pts: Vec<Point2<f32>> = contour
            .iter()
            .map(|&(x, y)| Point2::new(x as f32, y as f32))
            .collect();
        let poly = approx_polygon_closed(&pts, approx_tol);
        if poly.len() != 4 {
            continue;
        }

        let mut lengths = [0.0f32; 4];
        for i in 0..4 {
            lengths[i] = (poly[(i + 1) % 4] - poly[i]).norm();
        }
        let mean = lengths.iter().sum::<f32>() / 4.0;
        let mean_sq = lengths.iter().map(|l| l * l).sum::<f32>() / 4.0;
        if mean_sq - mean * mean > varmax_edges {
            continue;
        }

        let centroid = Point2::from(
            (poly[0].coords + poly[1].coords + poly[2].coords + poly[3].coords) / 4.0,
        );
        out.push(centroid);
    }
    out
}

/// External boundary of every 8-connected component, in tracing order.
fn external_contours(mask: &Mask) -> Vec<Vec<(i32, i32)>> {
    let (w, h) = (mask.width, mask.height);
    let mut seen = vec![false; w * h];
    let mut out = Vec::new();

    for y in 0..h {
        for x in 0..w {
            let i = y * w + x;
            if mask.data[i] == 0 || seen[i] {
                continue;
            }

            // flood-fill the component so it is visited once
            seen[i] = true;
            let mut stack = vec![(x, y)];
            while let Some((cx, cy)) = stack.pop() {
                for &(dx, dy) in &NBRS {
                    let (nx, ny) = (cx as i32 + dx, cy as i32 + dy);
                    if nx < 0 || ny < 0 || nx >= w as i32 || ny >= h as i32 {
                        continue;
                    }
                    let ni = ny as usize * w + nx as usize;
                    if mask.data[ni] != 0 && !seen[ni] {
                        seen[ni] = true;
                        stack.push((nx as usize, ny as usize));
                    }
                }
            }

            // (x, y) is the component's first pixel in row-major order, so
            // its west neighbor is background and valid as initial backtrack
            out.push(moore_trace(mask, (x as i32, y as i32)));
        }
    }
    out
}

/// Trace one external boundary clockwise from its topmost-leftmost pixel.
fn moore_trace(mask: &Mask, start: (i32, i32)) -> Vec<(i32, i32)> {
    let is_set = |x: i32, y: i32| {
        x >= 0
            && y >= 0
            && x < mask.width as i32
            && y < mask.height as i32
            && mask.data[y as usize * mask.width + x as usize] != 0
    };

    let mut contour = vec![start];
    let mut c = start;
    let mut b_idx = 0; // backtrack direction, starts west
    let cap = 4 * mask.width * mask.height;

    for _ in 0..cap {
        let mut found = None;
        for k in 1..=8 {
            let idx = (b_idx + k) % 8;
            let (dx, dy) = NBRS[idx];
            if is_set(c.0 + dx, c.1 + dy) {
                found = Some((idx, (c.0 + dx, c.1 + dy)));
                break;
            }
        }
        let Some((idx, next)) = found else {
            break; // isolated pixel
        };
        if next == start {
            break;
        }

        // new backtrack: the background neighbor scanned just before `next`,
        // re-expressed relative to `next`
        let (bdx, bdy) = NBRS[(idx + 7) % 8];
        let back = (c.0 + bdx, c.1 + bdy);
        c = next;
        b_idx = nbr_index((back.0 - c.0, back.1 - c.1));
        contour.push(c);
    }

    contour
}

/// Approximate a closed contour with the Douglas-Peucker algorithm.
///
/// The contour is split at the vertex farthest from its first point and both
/// open halves are simplified, which keeps the result independent of where
/// the trace happened to start.
fn approx_polygon_closed(pts: &[Point2<f32>], tol: f32) -> Vec<Point2<f32>> {
    if pts.len() < 3 {
        return pts.to_vec();
    }

    let mut split = 0;
    let mut dmax = 0.0f32;
    for (i, p) in pts.iter().enumerate() {
        let d = (p - pts[0]).norm();
        if d > dmax {
            dmax = d;
            split = i;
        }
    }
    if split == 0 {
        return vec![pts[0]];
    }

    let mut out = Vec::new();
    simplify(&pts[..=split], tol, &mut out);
    let mut tail: Vec<Point2<f32>> = pts[split..].to_vec();
    tail.push(pts[0]);
    simplify(&tail, tol, &mut out);
    out
}

/// Append the simplified polyline to `out`, including the first vertex and
/// excluding the last.
fn simplify(pts: &[Point2<f32>], tol: f32, out: &mut Vec<Point2<f32>>) {
    if pts.len() <= 2 {
        out.push(pts[0]);
        return;
    }

    let (first, last) = (pts[0], pts[pts.len() - 1]);
    let mut split = 0;
    let mut dmax = 0.0f32;
    for (i, p) in pts.iter().enumerate().take(pts.len() - 1).skip(1) {
        let d = point_segment_distance(*p, first, last);
        if d > dmax {
            dmax = d;
            split = i;
        }
    }

    if dmax > tol {
        simplify(&pts[..=split], tol, out);
        simplify(&pts[split..], tol, out);
    } else {
        out.push(first);
    }
}

fn point_segment_distance(p: Point2<f32>, a: Point2<f32>, b: Point2<f32>) -> f32 {
    let ab = b - a;
    let len_sq = ab.norm_squared();
    if len_sq <= f32::EPSILON {
        return (p - a).norm();
    }
    let t = ((p - a).dot(&ab) / len_sq).clamp(0.0, 1.0);
    (p - (a + ab * t)).norm()
}

use log::debug;
use nalgebra::Point2;

use crate::error::FaceDetectError;
use crate::types::RoleBuckets;

/// The candidate minimizing the summed distance to all other candidates.
///
/// For a well-detected face this is the center facelet. `None` when the
/// candidate set is empty.
pub fn medoid(points: &[Point2<f32>]) -> Option<Point2<f32>> {
    let mut best: Option<(f32, Point2<f32>)> = None;
    for p in points {
        let sum: f32 = points.iter().map(|q| (p - q).norm()).sum();
        if best.is_none_or(|(s, _)| sum < s) {
            best = Some((sum, *p));
        }
    }
    best.map(|(_, p)| p)
}

/// Partition candidates into edge and corner facelets by their radial
/// distance from the medoid.
///
/// `dmin` is the smallest candidate-to-medoid distance above one pixel
/// (which excludes the medoid itself); candidates within `dmin * edge_ratio`
/// are edge facelets, candidates between that and `dmin * corner_ratio` are
/// corner facelets. Anything farther is a false positive outside the face.
pub fn radial_buckets(
    points: &[Point2<f32>],
    med: Point2<f32>,
    edge_ratio: f32,
    corner_ratio: f32,
) -> RoleBuckets {
    let mut buckets = RoleBuckets::default();

    let mut dmin = f32::INFINITY;
    for p in points {
        let d = (p - med).norm();
        if d > 1.0 && d < dmin {
            dmin = d;
        }
    }
    if !dmin.is_finite() {
        return buckets;
    }

    for &p in points {
        let d = (p - med).norm();
        if dmin - 1.0 < d && d < dmin * edge_ratio {
            buckets.edges.push(p);
        } else if dmin * edge_ratio < d && d < dmin * corner_ratio {
            buckets.corners.push(p);
        }
    }
    buckets
}

/// Reflect every detected facelet through the medoid to recover positions
/// whose direct detection failed (glare, occlusion).
///
/// A reflection landing within `delta` of a directly detected facelet of the
/// same category is a rediscovery, not a gap-fill, and is dropped.
pub fn mirror_missing(buckets: &RoleBuckets, med: Point2<f32>, delta: f32) -> RoleBuckets {
    let reflect = |p: Point2<f32>| Point2::from(2.0 * med.coords - p.coords);
    let keep = |mirrored: Point2<f32>, direct: &[Point2<f32>]| {
        direct.iter().all(|q| (mirrored - q).norm() >= delta)
    };

    let mut out = RoleBuckets::default();
    for &p in &buckets.edges {
        let m = reflect(p);
        if keep(m, &buckets.edges) {
            out.edges.push(m);
        }
    }
    for &p in &buckets.corners {
        let m = reflect(p);
        if keep(m, &buckets.corners) {
            out.corners.push(m);
        }
    }
    out
}

/// Assign exactly four corner and four edge facelets to their grid cells.
///
/// Corners claim quadrants by the signs of their offsets from the medoid;
/// edges claim the top/left/right/bottom slots by extremal coordinate. Every
/// slot must be claimed by exactly one point, otherwise the assignment is
/// ambiguous and the frame is rejected rather than silently degraded.
pub fn assemble_grid(
    buckets: &RoleBuckets,
    med: Point2<f32>,
) -> Result<[[Point2<f32>; 3]; 3], FaceDetectError> {
    if buckets.corners.len() != 4 || buckets.edges.len() != 4 {
        return Err(FaceDetectError::Unresolved {
            corners: buckets.corners.len(),
            edges: buckets.edges.len(),
        });
    }

    let mut grid = [[med; 3]; 3];

    // corners: quadrant by offset sign; a point exactly on a medoid axis has
    // no quadrant
    let mut claimed = [[false; 3]; 3];
    for &p in &buckets.corners {
        let col = if p.x < med.x {
            0
        } else if p.x > med.x {
            2
        } else {
            return Err(FaceDetectError::AmbiguousAssignment);
        };
        let row = if p.y < med.y {
            0
        } else if p.y > med.y {
            2
        } else {
            return Err(FaceDetectError::AmbiguousAssignment);
        };
        if claimed[row][col] {
            return Err(FaceDetectError::AmbiguousAssignment);
        }
        claimed[row][col] = true;
        grid[row][col] = p;
    }

    // edges: extremal selection among the four candidates
    let ed = &buckets.edges;
    let top = extremal(ed, |a, b| a.y < b.y);
    let left = extremal(ed, |a, b| a.x < b.x);
    let right = extremal(ed, |a, b| a.x > b.x);
    let bottom = extremal(ed, |a, b| a.y > b.y);

    let mut picked = [top, left, right, bottom];
    picked.sort_unstable();
    if picked.windows(2).any(|w| w[0] == w[1]) {
        return Err(FaceDetectError::AmbiguousAssignment);
    }

    // each winner must also sit on its side of the medoid
    if ed[top].y >= med.y || ed[bottom].y <= med.y || ed[left].x >= med.x || ed[right].x <= med.x {
        return Err(FaceDetectError::AmbiguousAssignment);
    }

    grid[0][1] = ed[top];
    grid[1][0] = ed[left];
    grid[1][2] = ed[right];
    grid[2][1] = ed[bottom];
    grid[1][1] = med;

    debug!("grid assembled around medoid ({:.1}, {:.1})", med.x, med.y);
    Ok(grid)
}

fn extremal(points: &[Point2<f32>], better: impl Fn(Point2<f32>, Point2<f32>) -> bool) -> usize {
    let mut best = 0;
    for (i, &p) in points.iter().enumerate().skip(1) {
        if better(p, points[best]) {
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn grid_points(spacing: f32) -> Vec<Point2<f32>> {
        let mut pts = Vec::new();
        for row in 0..3 {
            for col in 0..3 {
                pts.push(Point2::new(
                    100.0 + col as f32 * spacing,
                    100.0 + row as f32 * spacing,
                ));
            }
        }
        pts
    }

    #[test]
    fn medoid_of_symmetric_grid_is_the_center() {
        let pts = grid_points(50.0);
        let m = medoid(&pts).expect("medoid");
        assert_relative_eq!(m.x, 150.0);
        assert_relative_eq!(m.y, 150.0);
    }

    #[test]
    fn medoid_of_empty_set_is_none() {
        assert!(medoid(&[]).is_none());
    }

    #[test]
    fn radial_bands_classify_by_distance_ratio() {
        let med = Point2::new(0.0, 0.0);
        let d = 100.0;
        let pts = vec![
            med,                          // the medoid itself, excluded by the 1px floor
            Point2::new(d, 0.0),          // defines dmin, edge band
            Point2::new(0.0, 1.2 * d),    // still edge
            Point2::new(1.6 * d, 0.0),    // corner band
            Point2::new(2.0 * d, 0.0),    // outside both bands
        ];
        let buckets = radial_buckets(&pts, med, 1.3, 1.7);
        assert_eq!(buckets.edges.len(), 2);
        assert_eq!(buckets.corners.len(), 1);
        assert_relative_eq!(buckets.corners[0].x, 1.6 * d);
    }

    #[test]
    fn bucket_of_empty_set_is_empty() {
        let buckets = radial_buckets(&[], Point2::new(0.0, 0.0), 1.3, 1.7);
        assert!(buckets.edges.is_empty());
        assert!(buckets.corners.is_empty());
    }

    #[test]
    fn reflection_through_medoid_round_trips() {
        let med: Point2<f32> = Point2::new(37.0, 91.0);
        let p = Point2::new(12.5, 140.25);
        let reflect = |p: Point2<f32>| Point2::from(2.0 * med.coords - p.coords);
        assert_eq!(reflect(reflect(p)), p);
    }

    #[test]
    fn mirror_fills_only_genuine_gaps() {
        let med = Point2::new(100.0, 100.0);
        // three edge facelets detected, the top one (100, 50) missing
        let buckets = RoleBuckets {
            edges: vec![
                Point2::new(100.0, 150.0),
                Point2::new(50.0, 100.0),
                Point2::new(150.0, 100.0),
            ],
            corners: Vec::new(),
        };
        let mirrored = mirror_missing(&buckets, med, 20.0);
        // left/right reflections rediscover each other, bottom fills the top
        assert_eq!(mirrored.edges.len(), 1);
        assert_relative_eq!(mirrored.edges[0].x, 100.0);
        assert_relative_eq!(mirrored.edges[0].y, 50.0);
    }

    #[test]
    fn mirror_adds_nothing_for_a_complete_face() {
        let med = Point2::new(150.0, 150.0);
        let pts = grid_points(50.0);
        let buckets = radial_buckets(&pts, med, 1.3, 1.7);
        let mirrored = mirror_missing(&buckets, med, 25.0);
        assert!(mirrored.edges.is_empty());
        assert!(mirrored.corners.is_empty());
    }

    #[test]
    fn full_face_assembles_into_the_grid_convention() {
        let med = Point2::new(150.0, 150.0);
        let pts = grid_points(50.0);
        let buckets = radial_buckets(&pts, med, 1.3, 1.7);
        let grid = assemble_grid(&buckets, med).expect("grid");

        assert_eq!(grid[0][0], Point2::new(100.0, 100.0));
        assert_eq!(grid[0][1], Point2::new(150.0, 100.0));
        assert_eq!(grid[1][0], Point2::new(100.0, 150.0));
        assert_eq!(grid[1][1], med);
        assert_eq!(grid[2][2], Point2::new(200.0, 200.0));
    }

    #[test]
    fn missing_points_fail_with_unresolved() {
        let med = Point2::new(150.0, 150.0);
        let buckets = RoleBuckets {
            edges: vec![Point2::new(150.0, 100.0)],
            corners: Vec::new(),
        };
        match assemble_grid(&buckets, med) {
            Err(FaceDetectError::Unresolved { corners: 0, edges: 1 }) => {}
            other => panic!("expected Unresolved, got {other:?}"),
        }
    }

    #[test]
    fn doubly_claimed_quadrant_is_ambiguous() {
        let med = Point2::new(150.0, 150.0);
        let mut buckets = radial_buckets(&grid_points(50.0), med, 1.3, 1.7);
        // shove one corner into the same quadrant as another
        buckets.corners[1] = Point2::new(110.0, 95.0);
        match assemble_grid(&buckets, med) {
            Err(FaceDetectError::AmbiguousAssignment) => {}
            other => panic!("expected AmbiguousAssignment, got {other:?}"),
        }
    }
}

use nalgebra::Point2;

/// Collapse candidates closer than `delta` so each physical facelet
/// contributes at most one point.
///
/// A single compaction pass keeps a candidate iff it is at least `delta`
/// away from every candidate kept before it; which near-duplicate survives
/// is arbitrary and carries no meaning. The result is stable under repeated
/// application.
pub fn merge_close_points(points: &[Point2<f32>], delta: f32) -> Vec<Point2<f32>> {
    let mut kept: Vec<Point2<f32>> = Vec::with_capacity(points.len());
    for p in points {
        if kept.iter().all(|q| (p - q).norm() >= delta) {
            kept.push(*p);
        }
    }
    kept
}

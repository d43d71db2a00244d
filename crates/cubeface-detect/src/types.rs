use std::fmt;

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// The six facelet colors of a standard cube.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FaceColor {
    White,
    Orange,
    Yellow,
    Green,
    Blue,
    Red,
}

impl FaceColor {
    pub fn name(&self) -> &'static str {
        match self {
            FaceColor::White => "white",
            FaceColor::Orange => "orange",
            FaceColor::Yellow => "yellow",
            FaceColor::Green => "green",
            FaceColor::Blue => "blue",
            FaceColor::Red => "red",
        }
    }
}

impl fmt::Display for FaceColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Facelet candidates split by radial distance from the medoid.
#[derive(Clone, Debug, Default)]
pub struct RoleBuckets {
    /// Candidates in the edge-facelet band (the four mid-side positions).
    pub edges: Vec<Point2<f32>>,
    /// Candidates in the corner-facelet band.
    pub corners: Vec<Point2<f32>>,
}

/// A fully resolved cube face for one frame.
///
/// Grids are indexed `[row][col]` with row 0 at the top of the face and
/// column 0 on the left; `[1][1]` is the face center.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FaceDetection {
    /// Image-space center of every facelet.
    pub centers: [[Point2<f32>; 3]; 3],
    /// Classified color of every facelet.
    pub colors: [[FaceColor; 3]; 3],
    /// Face center estimate (the candidate medoid).
    pub medoid: Point2<f32>,
    /// Merged candidate points the grid was resolved from.
    pub candidates: Vec<Point2<f32>>,
}

impl FaceDetection {
    /// The label grid flattened row-major, top-left first.
    pub fn labels_row_major(&self) -> [FaceColor; 9] {
        let mut out = [FaceColor::Red; 9];
        for (i, row) in self.colors.iter().enumerate() {
            out[i * 3..i * 3 + 3].copy_from_slice(row);
        }
        out
    }

    /// `(position, label)` pairs for every facelet, e.g. for overlay sinks.
    pub fn labeled_points(&self) -> Vec<(Point2<f32>, FaceColor)> {
        let mut out = Vec::with_capacity(9);
        for row in 0..3 {
            for col in 0..3 {
                out.push((self.centers[row][col], self.colors[row][col]));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn face_color_serializes_lowercase() {
        let json = serde_json::to_string(&FaceColor::Orange).expect("serialize");
        assert_eq!(json, "\"orange\"");
        assert_eq!(FaceColor::Blue.to_string(), "blue");
    }

    #[test]
    fn labels_row_major_follows_grid_convention() {
        let det = FaceDetection {
            centers: [[Point2::origin(); 3]; 3],
            colors: [
                [FaceColor::White, FaceColor::Orange, FaceColor::Yellow],
                [FaceColor::Green, FaceColor::Blue, FaceColor::Red],
                [FaceColor::White, FaceColor::Green, FaceColor::Blue],
            ],
            medoid: Point2::origin(),
            candidates: Vec::new(),
        };
        let flat = det.labels_row_major();
        assert_eq!(flat[0], FaceColor::White);
        assert_eq!(flat[4], FaceColor::Blue);
        assert_eq!(flat[8], FaceColor::Blue);
    }
}

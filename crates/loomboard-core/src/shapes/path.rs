//! Freeform path record.

use super::{ObjectId, ShapeStyle};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A freeform stroke captured from native free-drawing.
/// Points are absolute canvas coordinates; `left`/`top` track their minimum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Path {
    pub object_id: ObjectId,
    pub left: f64,
    pub top: f64,
    pub points: Vec<(f64, f64)>,
    #[serde(flatten)]
    pub style: ShapeStyle,
}

impl Path {
    /// Build a path from captured points. Empty input yields a degenerate
    /// path at the origin.
    pub fn from_points(points: Vec<(f64, f64)>) -> Self {
        let left = points.iter().map(|p| p.0).fold(f64::INFINITY, f64::min);
        let left = if left.is_finite() { left } else { 0.0 };
        let top = points.iter().map(|p| p.1).fold(f64::INFINITY, f64::min);
        let top = if top.is_finite() { top } else { 0.0 };
        Self {
            object_id: Uuid::new_v4(),
            left,
            top,
            points,
            style: ShapeStyle::stroked(),
        }
    }

    /// Width and height of the point cloud's bounding box.
    pub fn extent(&self) -> (f64, f64) {
        let mut max_x = f64::NEG_INFINITY;
        let mut min_x = f64::INFINITY;
        let mut max_y = f64::NEG_INFINITY;
        let mut min_y = f64::INFINITY;
        for &(x, y) in &self.points {
            min_x = min_x.min(x);
            max_x = max_x.max(x);
            min_y = min_y.min(y);
            max_y = max_y.max(y);
        }
        if self.points.is_empty() {
            (0.0, 0.0)
        } else {
            (max_x - min_x, max_y - min_y)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_points_tracks_min() {
        let path = Path::from_points(vec![(10.0, 30.0), (5.0, 40.0), (20.0, 25.0)]);
        assert_eq!(path.left, 5.0);
        assert_eq!(path.top, 25.0);
        assert_eq!(path.extent(), (15.0, 15.0));
    }

    #[test]
    fn test_empty_points_degenerate() {
        let path = Path::from_points(Vec::new());
        assert_eq!((path.left, path.top), (0.0, 0.0));
        assert_eq!(path.extent(), (0.0, 0.0));
    }
}

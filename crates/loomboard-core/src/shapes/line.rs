//! Line record.

use super::{ObjectId, ShapeStyle};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default length of a freshly created line, along both axes.
const DEFAULT_RUN: f64 = 100.0;

/// A straight segment between two endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Line {
    pub object_id: ObjectId,
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    #[serde(flatten)]
    pub style: ShapeStyle,
}

impl Line {
    /// Create a default diagonal line starting at `position`.
    pub fn new(position: Point) -> Self {
        Self {
            object_id: Uuid::new_v4(),
            x1: position.x,
            y1: position.y,
            x2: position.x + DEFAULT_RUN,
            y2: position.y + DEFAULT_RUN,
            style: ShapeStyle::stroked(),
        }
    }

    pub fn start(&self) -> Point {
        Point::new(self.x1, self.y1)
    }

    pub fn end(&self) -> Point {
        Point::new(self.x2, self.y2)
    }
}

//! Circle record.

use super::{ObjectId, ShapeStyle};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default radius for newly created circles.
const DEFAULT_RADIUS: f64 = 100.0;

/// A circle anchored by the top-left corner of its bounding box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Circle {
    pub object_id: ObjectId,
    pub left: f64,
    pub top: f64,
    pub radius: f64,
    #[serde(flatten)]
    pub style: ShapeStyle,
}

impl Circle {
    /// Create a default circle at `position`.
    pub fn new(position: Point) -> Self {
        Self {
            object_id: Uuid::new_v4(),
            left: position.x,
            top: position.y,
            radius: DEFAULT_RADIUS,
            style: ShapeStyle::filled(),
        }
    }
}

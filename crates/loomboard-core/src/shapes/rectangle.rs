//! Rectangle record.

use super::{ObjectId, ShapeStyle};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default edge length for newly created rectangles.
pub(crate) const DEFAULT_SIZE: f64 = 100.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rectangle {
    pub object_id: ObjectId,
    /// Left edge of the bounding box.
    pub left: f64,
    /// Top edge of the bounding box.
    pub top: f64,
    pub width: f64,
    pub height: f64,
    #[serde(flatten)]
    pub style: ShapeStyle,
}

impl Rectangle {
    /// Create a default 100x100 rectangle at `position`.
    pub fn new(position: Point) -> Self {
        Self {
            object_id: Uuid::new_v4(),
            left: position.x,
            top: position.y,
            width: DEFAULT_SIZE,
            height: DEFAULT_SIZE,
            style: ShapeStyle::filled(),
        }
    }
}

//! Triangle record.

use super::rectangle::DEFAULT_SIZE;
use super::{ObjectId, ShapeStyle};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An isoceles triangle inscribed in its bounding box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Triangle {
    pub object_id: ObjectId,
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    #[serde(flatten)]
    pub style: ShapeStyle,
}

impl Triangle {
    /// Create a default 100x100 triangle at `position`.
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

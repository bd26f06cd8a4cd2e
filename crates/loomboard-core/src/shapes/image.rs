//! Image record.

use super::rectangle::DEFAULT_SIZE;
use super::{ObjectId, ShapeStyle};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An image placed on the canvas. The pixel data itself is addressed by
/// `src` (a URL or data URI), never replicated inline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub object_id: ObjectId,
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    pub src: String,
    #[serde(flatten)]
    pub style: ShapeStyle,
}

impl Image {
    pub fn new(position: Point, src: impl Into<String>) -> Self {
        Self {
            object_id: Uuid::new_v4(),
            left: position.x,
            top: position.y,
            width: DEFAULT_SIZE,
            height: DEFAULT_SIZE,
            src: src.into(),
            style: ShapeStyle::filled(),
        }
    }
}

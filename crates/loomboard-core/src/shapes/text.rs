//! Text record.

use super::{ObjectId, ShapeStyle};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub(crate) const DEFAULT_TEXT: &str = "Tap to Type";
const DEFAULT_FONT_SIZE: f64 = 36.0;
const DEFAULT_FONT_FAMILY: &str = "Helvetica";
const DEFAULT_FONT_WEIGHT: &str = "400";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Text {
    pub object_id: ObjectId,
    pub left: f64,
    pub top: f64,
    pub text: String,
    pub font_size: f64,
    pub font_family: String,
    /// CSS-style weight string ("400", "600", ...).
    pub font_weight: String,
    #[serde(flatten)]
    pub style: ShapeStyle,
}

impl Text {
    /// Create a text record with the placeholder content.
    pub fn new(position: Point) -> Self {
        Self {
            object_id: Uuid::new_v4(),
            left: position.x,
            top: position.y,
            text: DEFAULT_TEXT.to_string(),
            font_size: DEFAULT_FONT_SIZE,
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            font_weight: DEFAULT_FONT_WEIGHT.to_string(),
            style: ShapeStyle::filled(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_defaults() {
        let text = Text::new(Point::ZERO);
        assert_eq!(text.text, "Tap to Type");
        assert_eq!(text.font_size, 36.0);
        assert_eq!(text.font_family, "Helvetica");
        assert_eq!(text.font_weight, "400");
    }
}

//! Shape records for the collaborative canvas.
//!
//! A [`ShapeRecord`] is the replicated unit: the whole record is written on
//! every sync, never individual fields. On the wire it serializes as a flat
//! map tagged by `kind`, with camelCase keys.

mod circle;
mod image;
mod line;
mod path;
mod rectangle;
mod text;
mod triangle;

pub use circle::Circle;
pub use image::Image;
pub use line::Line;
pub use path::Path;
pub use rectangle::Rectangle;
pub use text::Text;
pub use triangle::Triangle;

use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::color::DEFAULT_FILL;

/// Unique identifier for canvas objects. Generated client-side at creation
/// and immutable for the record's lifetime.
pub type ObjectId = Uuid;

/// Style properties shared by all shape kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeStyle {
    /// Fill color (None = no fill).
    #[serde(default)]
    pub fill: Option<String>,
    /// Stroke color (None = no stroke).
    #[serde(default)]
    pub stroke: Option<String>,
    /// Stroke width.
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f64,
    /// Overall opacity (0.0 = fully transparent, 1.0 = fully opaque).
    #[serde(default = "default_opacity")]
    pub opacity: f64,
}

fn default_stroke_width() -> f64 {
    2.0
}

fn default_opacity() -> f64 {
    1.0
}

impl ShapeStyle {
    /// Default style for filled shapes.
    pub fn filled() -> Self {
        Self {
            fill: Some(DEFAULT_FILL.to_string()),
            stroke: None,
            stroke_width: default_stroke_width(),
            opacity: default_opacity(),
        }
    }

    /// Default style for stroked shapes (lines, freeform paths).
    pub fn stroked() -> Self {
        Self {
            fill: None,
            stroke: Some(DEFAULT_FILL.to_string()),
            stroke_width: default_stroke_width(),
            opacity: default_opacity(),
        }
    }
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self::filled()
    }
}

/// The closed set of shape kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Rectangle,
    Triangle,
    Circle,
    Line,
    Text,
    Path,
    Image,
}

/// A replicated canvas object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ShapeRecord {
    Rectangle(Rectangle),
    Triangle(Triangle),
    Circle(Circle),
    Line(Line),
    Text(Text),
    Path(Path),
    Image(Image),
}

impl ShapeRecord {
    pub fn object_id(&self) -> ObjectId {
        match self {
            ShapeRecord::Rectangle(s) => s.object_id,
            ShapeRecord::Triangle(s) => s.object_id,
            ShapeRecord::Circle(s) => s.object_id,
            ShapeRecord::Line(s) => s.object_id,
            ShapeRecord::Text(s) => s.object_id,
            ShapeRecord::Path(s) => s.object_id,
            ShapeRecord::Image(s) => s.object_id,
        }
    }

    /// Assign a fresh id. Used when duplicating or pasting so the copy is a
    /// distinct record in the shared map.
    pub fn regenerate_id(&mut self) {
        let new_id = Uuid::new_v4();
        match self {
            ShapeRecord::Rectangle(s) => s.object_id = new_id,
            ShapeRecord::Triangle(s) => s.object_id = new_id,
            ShapeRecord::Circle(s) => s.object_id = new_id,
            ShapeRecord::Line(s) => s.object_id = new_id,
            ShapeRecord::Text(s) => s.object_id = new_id,
            ShapeRecord::Path(s) => s.object_id = new_id,
            ShapeRecord::Image(s) => s.object_id = new_id,
        }
    }

    pub fn kind(&self) -> ShapeKind {
        match self {
            ShapeRecord::Rectangle(_) => ShapeKind::Rectangle,
            ShapeRecord::Triangle(_) => ShapeKind::Triangle,
            ShapeRecord::Circle(_) => ShapeKind::Circle,
            ShapeRecord::Line(_) => ShapeKind::Line,
            ShapeRecord::Text(_) => ShapeKind::Text,
            ShapeRecord::Path(_) => ShapeKind::Path,
            ShapeRecord::Image(_) => ShapeKind::Image,
        }
    }

    /// Top-left anchor of the record's bounding box.
    pub fn position(&self) -> Point {
        match self {
            ShapeRecord::Rectangle(s) => Point::new(s.left, s.top),
            ShapeRecord::Triangle(s) => Point::new(s.left, s.top),
            ShapeRecord::Circle(s) => Point::new(s.left, s.top),
            ShapeRecord::Line(s) => Point::new(s.x1.min(s.x2), s.y1.min(s.y2)),
            ShapeRecord::Text(s) => Point::new(s.left, s.top),
            ShapeRecord::Path(s) => Point::new(s.left, s.top),
            ShapeRecord::Image(s) => Point::new(s.left, s.top),
        }
    }

    /// Move the record so its bounding box anchor lands on `position`.
    pub fn set_position(&mut self, position: Point) {
        let delta = position - self.position();
        self.translate(delta);
    }

    /// Translate the record by a delta.
    pub fn translate(&mut self, delta: Vec2) {
        match self {
            ShapeRecord::Rectangle(s) => {
                s.left += delta.x;
                s.top += delta.y;
            }
            ShapeRecord::Triangle(s) => {
                s.left += delta.x;
                s.top += delta.y;
            }
            ShapeRecord::Circle(s) => {
                s.left += delta.x;
                s.top += delta.y;
            }
            ShapeRecord::Line(s) => {
                s.x1 += delta.x;
                s.y1 += delta.y;
                s.x2 += delta.x;
                s.y2 += delta.y;
            }
            ShapeRecord::Text(s) => {
                s.left += delta.x;
                s.top += delta.y;
            }
            ShapeRecord::Path(s) => {
                s.left += delta.x;
                s.top += delta.y;
                for p in &mut s.points {
                    p.0 += delta.x;
                    p.1 += delta.y;
                }
            }
            ShapeRecord::Image(s) => {
                s.left += delta.x;
                s.top += delta.y;
            }
        }
    }

    /// Unscaled width of the record's bounding box.
    pub fn width(&self) -> f64 {
        match self {
            ShapeRecord::Rectangle(s) => s.width,
            ShapeRecord::Triangle(s) => s.width,
            ShapeRecord::Circle(s) => s.radius * 2.0,
            ShapeRecord::Line(s) => (s.x2 - s.x1).abs(),
            ShapeRecord::Text(_) => 0.0,
            ShapeRecord::Path(s) => s.extent().0,
            ShapeRecord::Image(s) => s.width,
        }
    }

    /// Unscaled height of the record's bounding box.
    pub fn height(&self) -> f64 {
        match self {
            ShapeRecord::Rectangle(s) => s.height,
            ShapeRecord::Triangle(s) => s.height,
            ShapeRecord::Circle(s) => s.radius * 2.0,
            ShapeRecord::Line(s) => (s.y2 - s.y1).abs(),
            ShapeRecord::Text(s) => s.font_size,
            ShapeRecord::Path(s) => s.extent().1,
            ShapeRecord::Image(s) => s.height,
        }
    }

    /// Set the raw width where the kind has one. Circles keep their aspect
    /// (radius = width / 2); lines move their second endpoint.
    pub fn set_width(&mut self, width: f64) {
        match self {
            ShapeRecord::Rectangle(s) => s.width = width,
            ShapeRecord::Triangle(s) => s.width = width,
            ShapeRecord::Circle(s) => s.radius = width / 2.0,
            ShapeRecord::Line(s) => {
                let dir = if s.x2 >= s.x1 { 1.0 } else { -1.0 };
                s.x2 = s.x1 + dir * width;
            }
            ShapeRecord::Text(_) => {}
            ShapeRecord::Path(_) => {}
            ShapeRecord::Image(s) => s.width = width,
        }
    }

    /// Set the raw height where the kind has one.
    pub fn set_height(&mut self, height: f64) {
        match self {
            ShapeRecord::Rectangle(s) => s.height = height,
            ShapeRecord::Triangle(s) => s.height = height,
            ShapeRecord::Circle(s) => s.radius = height / 2.0,
            ShapeRecord::Line(s) => {
                let dir = if s.y2 >= s.y1 { 1.0 } else { -1.0 };
                s.y2 = s.y1 + dir * height;
            }
            ShapeRecord::Text(s) => s.font_size = height,
            ShapeRecord::Path(_) => {}
            ShapeRecord::Image(s) => s.height = height,
        }
    }

    pub fn style(&self) -> &ShapeStyle {
        match self {
            ShapeRecord::Rectangle(s) => &s.style,
            ShapeRecord::Triangle(s) => &s.style,
            ShapeRecord::Circle(s) => &s.style,
            ShapeRecord::Line(s) => &s.style,
            ShapeRecord::Text(s) => &s.style,
            ShapeRecord::Path(s) => &s.style,
            ShapeRecord::Image(s) => &s.style,
        }
    }

    pub fn style_mut(&mut self) -> &mut ShapeStyle {
        match self {
            ShapeRecord::Rectangle(s) => &mut s.style,
            ShapeRecord::Triangle(s) => &mut s.style,
            ShapeRecord::Circle(s) => &mut s.style,
            ShapeRecord::Line(s) => &mut s.style,
            ShapeRecord::Text(s) => &mut s.style,
            ShapeRecord::Path(s) => &mut s.style,
            ShapeRecord::Image(s) => &mut s.style,
        }
    }

    /// Unscaled bounding box in canvas coordinates.
    pub fn bounds(&self) -> Rect {
        let pos = self.position();
        Rect::new(
            pos.x,
            pos.y,
            pos.x + self.width(),
            pos.y + self.height(),
        )
    }
}

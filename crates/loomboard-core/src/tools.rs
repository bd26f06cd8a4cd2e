//! Tool interaction state machine.
//!
//! Drives pointer input against a [`Scene`] and [`DocumentStore`]: drafting
//! new shapes with live resize, selecting and modifying existing ones, and
//! the attribute panel's typed edits. All interaction state lives on the
//! controller, never in globals, and time comes in as epoch milliseconds so
//! the delayed tool revert is deterministic.

use kurbo::Point;
use serde::{Deserialize, Serialize};

use loomboard_room::RoomError;

use crate::color::Rgba;
use crate::scene::{Scene, Visual};
use crate::shapes::{
    Circle, Image, Line, ObjectId, Path, Rectangle, ShapeKind, ShapeRecord, Text, Triangle,
};
use crate::store::DocumentStore;

/// Delay before the active tool snaps back to selection after a draw.
pub const TOOL_REVERT_MS: u64 = 700;

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    #[default]
    Select,
    Rectangle,
    Triangle,
    Circle,
    Line,
    Text,
    Freeform,
    Image,
    Eraser,
}

impl ToolKind {
    /// The shape kind this tool creates, if any.
    pub fn shape_kind(self) -> Option<ShapeKind> {
        match self {
            ToolKind::Rectangle => Some(ShapeKind::Rectangle),
            ToolKind::Triangle => Some(ShapeKind::Triangle),
            ToolKind::Circle => Some(ShapeKind::Circle),
            ToolKind::Line => Some(ShapeKind::Line),
            ToolKind::Text => Some(ShapeKind::Text),
            ToolKind::Freeform => Some(ShapeKind::Path),
            ToolKind::Image => Some(ShapeKind::Image),
            ToolKind::Select | ToolKind::Eraser => None,
        }
    }
}

/// Interaction state owned by the controller.
#[derive(Debug, Clone, Default)]
pub struct ToolState {
    pub active_tool: ToolKind,
    pub is_drawing: bool,
    /// Native free-drawing captures points outside the Drawing state; the
    /// finished stroke arrives via [`ToolController::path_created`].
    pub free_drawing: bool,
    /// Pointer-down position anchoring the draft's resize rules.
    pub anchor: Option<Point>,
    /// Shape being drawn, mirrored into the scene and store as it grows.
    pub draft: Option<ShapeRecord>,
    pub active_object: Option<ObjectId>,
    /// Set while an attribute panel input has focus; suppresses selection
    /// re-derivation so typing is not clobbered.
    pub is_editing_attribute: bool,
    /// When set, `tick` reverts to the selection tool at this deadline.
    pub revert_deadline_ms: Option<u64>,
}

/// Attribute panel values for the selected object. Dimensions are the
/// scaled (on-screen) ones; opacity fields speak 0-100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attributes {
    pub width: f64,
    pub height: f64,
    pub fill: String,
    pub stroke: String,
    pub stroke_width: f64,
    pub opacity: f64,
    pub stroke_opacity: f64,
    pub font_size: f64,
    pub font_family: String,
    pub font_weight: String,
}

impl Default for Attributes {
    fn default() -> Self {
        Self {
            width: 0.0,
            height: 0.0,
            fill: String::new(),
            stroke: String::new(),
            stroke_width: 0.0,
            opacity: 100.0,
            stroke_opacity: 100.0,
            font_size: 0.0,
            font_family: String::new(),
            font_weight: String::new(),
        }
    }
}

impl Attributes {
    /// Derive panel values from a visual. Colors are normalized to hex
    /// whatever their stored encoding; stroke opacity is read from the
    /// rgba alpha channel and defaults to fully opaque.
    pub fn from_visual(visual: &Visual) -> Self {
        let style = visual.record.style();
        let fill = style
            .fill
            .as_deref()
            .map(|f| Rgba::parse_or_black(f).to_hex())
            .unwrap_or_default();
        let (stroke, stroke_opacity) = match style.stroke.as_deref() {
            Some(s) => {
                let color = Rgba::parse_or_black(s);
                (color.to_hex(), color.alpha * 100.0)
            }
            None => (String::new(), 100.0),
        };
        let (font_size, font_family, font_weight) = match &visual.record {
            ShapeRecord::Text(t) => (t.font_size, t.font_family.clone(), t.font_weight.clone()),
            _ => (0.0, String::new(), String::new()),
        };
        Self {
            width: visual.scaled_width(),
            height: visual.scaled_height(),
            fill,
            stroke,
            stroke_width: style.stroke_width,
            opacity: style.opacity * 100.0,
            stroke_opacity,
            font_size,
            font_family,
            font_weight,
        }
    }
}

/// One typed edit from the attribute panel.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeEdit {
    /// Raw width; resets any transient horizontal scale.
    Width(f64),
    /// Raw height; resets any transient vertical scale.
    Height(f64),
    Fill(String),
    Stroke(String),
    StrokeWidth(f64),
    /// 0-100, stored on the record as a 0.0-1.0 fraction.
    Opacity(f64),
    /// 0-100, re-encoded into the stroke's rgba alpha.
    StrokeOpacity(f64),
    FontSize(f64),
    FontFamily(String),
    FontWeight(String),
    Text(String),
}

pub struct ToolController {
    pub state: ToolState,
    pub attributes: Attributes,
}

impl ToolController {
    pub fn new() -> Self {
        Self {
            state: ToolState::default(),
            attributes: Attributes::default(),
        }
    }

    /// Switch the active tool and cancel any pending revert.
    pub fn set_tool(&mut self, tool: ToolKind) {
        self.state.active_tool = tool;
        self.state.revert_deadline_ms = None;
    }

    /// Pointer pressed on the canvas.
    pub fn pointer_down(
        &mut self,
        scene: &mut Scene,
        store: &mut DocumentStore,
        point: Point,
    ) -> Result<(), RoomError> {
        if self.state.active_tool == ToolKind::Freeform {
            self.state.is_drawing = true;
            self.state.free_drawing = true;
            return Ok(());
        }

        if let Some(hit) = scene.hit_test(point) {
            let id = hit.record.object_id();
            let kind = hit.record.kind();
            match self.state.active_tool {
                ToolKind::Select => {
                    scene.select(vec![id]);
                    self.state.active_object = Some(id);
                    return Ok(());
                }
                ToolKind::Eraser => {
                    scene.remove(id);
                    store.delete_shape(id)?;
                    return Ok(());
                }
                tool => {
                    // A target of the matching kind, or one already in a
                    // multi-selection, is modified rather than drawn over.
                    if tool.shape_kind() == Some(kind) || scene.selection().contains(&id) {
                        scene.select(vec![id]);
                        self.state.active_object = Some(id);
                        return Ok(());
                    }
                }
            }
        } else if self.state.active_tool == ToolKind::Select {
            scene.clear_selection();
            self.state.active_object = None;
            return Ok(());
        }

        let Some(record) = create_record(self.state.active_tool, point) else {
            return Ok(());
        };
        self.state.active_object = Some(record.object_id());
        scene.add(record.clone());
        self.state.draft = Some(record);
        self.state.anchor = Some(point);
        self.state.is_drawing = true;
        Ok(())
    }

    /// Pointer moved while pressed. While drawing, resizes the draft from
    /// its anchor and syncs it so collaborators watch the shape grow.
    pub fn pointer_move(
        &mut self,
        scene: &mut Scene,
        store: &mut DocumentStore,
        point: Point,
    ) -> Result<(), RoomError> {
        if !self.state.is_drawing || self.state.free_drawing {
            return Ok(());
        }
        let Some(anchor) = self.state.anchor else {
            return Ok(());
        };
        let Some(draft) = self.state.draft.as_mut() else {
            return Ok(());
        };
        if !resize_draft(draft, anchor, point) {
            return Ok(());
        }
        let draft = draft.clone();
        if let Some(visual) = scene.visual_mut(draft.object_id()) {
            visual.record = draft.clone();
        }
        store.sync_shape(draft)
    }

    /// Pointer released: final sync, then schedule the revert to the
    /// selection tool.
    pub fn pointer_up(
        &mut self,
        scene: &mut Scene,
        store: &mut DocumentStore,
        point: Point,
        now_ms: u64,
    ) -> Result<(), RoomError> {
        if self.state.free_drawing {
            // The stroke lands via path_created.
            self.state.free_drawing = false;
            self.state.is_drawing = false;
            return Ok(());
        }
        if !self.state.is_drawing {
            return Ok(());
        }
        self.pointer_move(scene, store, point)?;
        self.state.is_drawing = false;
        self.state.anchor = None;
        if let Some(draft) = self.state.draft.take() {
            store.sync_shape(draft)?;
        }
        self.state.active_object = None;
        if self.state.active_tool != ToolKind::Select {
            self.state.revert_deadline_ms = Some(now_ms + TOOL_REVERT_MS);
        }
        Ok(())
    }

    /// Apply any expired deadline. Call on a timer or per frame.
    pub fn tick(&mut self, now_ms: u64) {
        if let Some(deadline) = self.state.revert_deadline_ms {
            if now_ms >= deadline {
                self.state.active_tool = ToolKind::Select;
                self.state.revert_deadline_ms = None;
            }
        }
    }

    /// A native free-drawing stroke finished: wrap the captured points in a
    /// path record and replicate it.
    pub fn path_created(
        &mut self,
        scene: &mut Scene,
        store: &mut DocumentStore,
        points: Vec<(f64, f64)>,
    ) -> Result<ObjectId, RoomError> {
        let record = ShapeRecord::Path(Path::from_points(points));
        let id = record.object_id();
        scene.add(record.clone());
        store.sync_shape(record)?;
        Ok(id)
    }

    /// Place an image record. The pixel source is referenced, not copied.
    pub fn insert_image(
        &mut self,
        scene: &mut Scene,
        store: &mut DocumentStore,
        position: Point,
        src: impl Into<String>,
    ) -> Result<ObjectId, RoomError> {
        let record = ShapeRecord::Image(Image::new(position, src));
        let id = record.object_id();
        scene.add(record.clone());
        store.sync_shape(record)?;
        Ok(id)
    }

    /// Selection changed. Ignored while an attribute input has focus; with a
    /// single selected object, derives the panel attributes from it.
    pub fn selection_created(&mut self, scene: &Scene) {
        if self.state.is_editing_attribute {
            return;
        }
        if let Some(visual) = scene.selected_visual() {
            self.state.active_object = Some(visual.record.object_id());
            self.attributes = Attributes::from_visual(visual);
        }
    }

    /// Interactive resize in progress: update the transient scale and the
    /// published dimensions. No store write until an attribute is committed.
    pub fn object_scaling(&mut self, scene: &mut Scene, id: ObjectId, scale_x: f64, scale_y: f64) {
        if let Some(visual) = scene.visual_mut(id) {
            visual.scale_x = scale_x;
            visual.scale_y = scale_y;
            self.attributes.width = visual.scaled_width();
            self.attributes.height = visual.scaled_height();
        }
    }

    /// Interactive move in progress: follow the pointer, clamped so the
    /// scaled bounding box stays on the canvas.
    pub fn object_moving(&mut self, scene: &mut Scene, id: ObjectId, position: Point) {
        if let Some(visual) = scene.visual_mut(id) {
            visual.record.set_position(position);
        }
        scene.clamp_to_bounds(id);
    }

    /// Interactive manipulation finished: replicate the final record.
    pub fn object_modified(
        &mut self,
        scene: &Scene,
        store: &mut DocumentStore,
        id: ObjectId,
    ) -> Result<(), RoomError> {
        match scene.visual(id) {
            Some(visual) => store.sync_shape(visual.record.clone()),
            None => Ok(()),
        }
    }

    /// The attribute panel gained/lost input focus.
    pub fn set_editing_attribute(&mut self, editing: bool) {
        self.state.is_editing_attribute = editing;
    }

    /// Apply one typed edit to the selected object. Unchanged values are
    /// skipped; every applied edit re-syncs the whole record.
    pub fn modify_attribute(
        &mut self,
        scene: &mut Scene,
        store: &mut DocumentStore,
        edit: AttributeEdit,
    ) -> Result<(), RoomError> {
        let Some(id) = self
            .state
            .active_object
            .or_else(|| scene.selection().first().copied())
        else {
            log::debug!("attribute edit with no selection, ignoring");
            return Ok(());
        };
        let Some(visual) = scene.visual_mut(id) else {
            return Ok(());
        };

        let changed = match edit {
            AttributeEdit::Width(width) => {
                visual.scale_x = 1.0;
                visual.record.set_width(width);
                self.attributes.width = width;
                true
            }
            AttributeEdit::Height(height) => {
                visual.scale_y = 1.0;
                visual.record.set_height(height);
                self.attributes.height = height;
                true
            }
            AttributeEdit::Fill(fill) => {
                let style = visual.record.style_mut();
                if style.fill.as_deref() == Some(fill.as_str()) {
                    false
                } else {
                    self.attributes.fill = Rgba::parse_or_black(&fill).to_hex();
                    style.fill = Some(fill);
                    true
                }
            }
            AttributeEdit::Stroke(stroke) => {
                let style = visual.record.style_mut();
                if style.stroke.as_deref() == Some(stroke.as_str()) {
                    false
                } else {
                    self.attributes.stroke = Rgba::parse_or_black(&stroke).to_hex();
                    style.stroke = Some(stroke);
                    true
                }
            }
            AttributeEdit::StrokeWidth(width) => {
                let style = visual.record.style_mut();
                if style.stroke_width == width {
                    false
                } else {
                    style.stroke_width = width;
                    self.attributes.stroke_width = width;
                    true
                }
            }
            AttributeEdit::Opacity(value) => {
                let style = visual.record.style_mut();
                let fraction = value / 100.0;
                if style.opacity == fraction {
                    false
                } else {
                    style.opacity = fraction;
                    self.attributes.opacity = value;
                    true
                }
            }
            AttributeEdit::StrokeOpacity(value) => {
                let style = visual.record.style_mut();
                let current = style
                    .stroke
                    .as_deref()
                    .map(Rgba::parse_or_black)
                    .unwrap_or_else(Rgba::black);
                let recoded = current.with_alpha(value / 100.0).to_rgba_string();
                if style.stroke.as_deref() == Some(recoded.as_str()) {
                    false
                } else {
                    style.stroke = Some(recoded);
                    self.attributes.stroke_opacity = value;
                    true
                }
            }
            AttributeEdit::FontSize(size) => match &mut visual.record {
                ShapeRecord::Text(t) if t.font_size != size => {
                    t.font_size = size;
                    self.attributes.font_size = size;
                    true
                }
                _ => false,
            },
            AttributeEdit::FontFamily(family) => match &mut visual.record {
                ShapeRecord::Text(t) if t.font_family != family => {
                    t.font_family = family.clone();
                    self.attributes.font_family = family;
                    true
                }
                _ => false,
            },
            AttributeEdit::FontWeight(weight) => match &mut visual.record {
                ShapeRecord::Text(t) if t.font_weight != weight => {
                    t.font_weight = weight.clone();
                    self.attributes.font_weight = weight;
                    true
                }
                _ => false,
            },
            AttributeEdit::Text(text) => match &mut visual.record {
                ShapeRecord::Text(t) if t.text != text => {
                    t.text = text;
                    true
                }
                _ => false,
            },
        };

        if changed {
            let record = visual.record.clone();
            store.sync_shape(record)?;
        }
        Ok(())
    }

    /// Delete every selected object, locally and in the store.
    pub fn delete_selected(
        &mut self,
        scene: &mut Scene,
        store: &mut DocumentStore,
    ) -> Result<(), RoomError> {
        let ids: Vec<ObjectId> = scene.selection().to_vec();
        if ids.is_empty() {
            return Ok(());
        }
        for id in &ids {
            scene.remove(*id);
        }
        store.delete_shapes(&ids)?;
        self.state.active_object = None;
        Ok(())
    }

    /// Wipe the board: one atomic delete of every record, then a clean
    /// scene and the default tool.
    pub fn reset(&mut self, scene: &mut Scene, store: &mut DocumentStore) -> Result<(), RoomError> {
        store.delete_all()?;
        scene.clear();
        self.state = ToolState::default();
        self.attributes = Attributes::default();
        Ok(())
    }
}

impl Default for ToolController {
    fn default() -> Self {
        Self::new()
    }
}

/// Create the draft record for a tool at the pointer-down position.
fn create_record(tool: ToolKind, position: Point) -> Option<ShapeRecord> {
    match tool {
        ToolKind::Rectangle => Some(ShapeRecord::Rectangle(Rectangle::new(position))),
        ToolKind::Triangle => Some(ShapeRecord::Triangle(Triangle::new(position))),
        ToolKind::Circle => Some(ShapeRecord::Circle(Circle::new(position))),
        ToolKind::Line => Some(ShapeRecord::Line(Line::new(position))),
        ToolKind::Text => Some(ShapeRecord::Text(Text::new(position))),
        // An image drafted by pointer has no source yet; insert_image is
        // the upload path that arrives with one.
        ToolKind::Image => Some(ShapeRecord::Image(Image::new(position, ""))),
        // Freeform strokes come from path_created.
        ToolKind::Select | ToolKind::Freeform | ToolKind::Eraser => None,
    }
}

/// Per-kind resize from the draft's anchor. Returns false when the kind has
/// no pointer-driven geometry.
fn resize_draft(draft: &mut ShapeRecord, anchor: Point, point: Point) -> bool {
    match draft {
        ShapeRecord::Rectangle(s) => {
            s.width = point.x - anchor.x;
            s.height = point.y - anchor.y;
            true
        }
        ShapeRecord::Triangle(s) => {
            s.width = point.x - anchor.x;
            s.height = point.y - anchor.y;
            true
        }
        ShapeRecord::Image(s) => {
            s.width = point.x - anchor.x;
            s.height = point.y - anchor.y;
            true
        }
        ShapeRecord::Circle(s) => {
            s.radius = (point.x - anchor.x).abs() / 2.0;
            true
        }
        ShapeRecord::Line(s) => {
            s.x2 = point.x;
            s.y2 = point.y;
            true
        }
        ShapeRecord::Text(_) | ShapeRecord::Path(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (ToolController, Scene, DocumentStore) {
        (
            ToolController::new(),
            Scene::new(800.0, 600.0),
            DocumentStore::new(),
        )
    }

    #[test]
    fn test_rectangle_drag_geometry() {
        let (mut tools, mut scene, mut store) = setup();
        tools.set_tool(ToolKind::Rectangle);

        tools
            .pointer_down(&mut scene, &mut store, Point::new(10.0, 10.0))
            .unwrap();
        tools
            .pointer_move(&mut scene, &mut store, Point::new(60.0, 80.0))
            .unwrap();
        tools
            .pointer_up(&mut scene, &mut store, Point::new(110.0, 110.0), 0)
            .unwrap();

        let doc = store.document();
        assert_eq!(doc.len(), 1);
        let record = doc.values().next().unwrap();
        assert_eq!(record.position(), Point::new(10.0, 10.0));
        assert_eq!(record.width(), 100.0);
        assert_eq!(record.height(), 100.0);
    }

    #[test]
    fn test_circle_drag_radius() {
        let (mut tools, mut scene, mut store) = setup();
        tools.set_tool(ToolKind::Circle);

        tools
            .pointer_down(&mut scene, &mut store, Point::new(50.0, 50.0))
            .unwrap();
        tools
            .pointer_up(&mut scene, &mut store, Point::new(150.0, 50.0), 0)
            .unwrap();

        let doc = store.document();
        match doc.values().next().unwrap() {
            ShapeRecord::Circle(circle) => assert_eq!(circle.radius, 50.0),
            other => panic!("expected circle, got {other:?}"),
        }
    }

    #[test]
    fn test_image_drag_geometry() {
        let (mut tools, mut scene, mut store) = setup();
        tools.set_tool(ToolKind::Image);

        tools
            .pointer_down(&mut scene, &mut store, Point::new(10.0, 10.0))
            .unwrap();
        tools
            .pointer_up(&mut scene, &mut store, Point::new(90.0, 60.0), 0)
            .unwrap();

        match store.document().into_values().next().unwrap() {
            ShapeRecord::Image(image) => {
                assert_eq!((image.width, image.height), (80.0, 50.0));
                assert!(image.src.is_empty());
            }
            other => panic!("expected image, got {other:?}"),
        }
    }

    #[test]
    fn test_draft_syncs_live_on_move() {
        let (mut tools, mut scene, mut store) = setup();
        tools.set_tool(ToolKind::Rectangle);

        tools
            .pointer_down(&mut scene, &mut store, Point::new(0.0, 0.0))
            .unwrap();
        assert!(store.is_empty());

        tools
            .pointer_move(&mut scene, &mut store, Point::new(30.0, 30.0))
            .unwrap();
        // Collaborators already see the half-drawn shape.
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_tool_reverts_to_select_after_delay() {
        let (mut tools, mut scene, mut store) = setup();
        tools.set_tool(ToolKind::Line);

        tools
            .pointer_down(&mut scene, &mut store, Point::new(0.0, 0.0))
            .unwrap();
        tools
            .pointer_up(&mut scene, &mut store, Point::new(50.0, 50.0), 1_000)
            .unwrap();

        tools.tick(1_000 + TOOL_REVERT_MS - 1);
        assert_eq!(tools.state.active_tool, ToolKind::Line);
        tools.tick(1_000 + TOOL_REVERT_MS);
        assert_eq!(tools.state.active_tool, ToolKind::Select);
    }

    #[test]
    fn test_pointer_down_selects_matching_kind() {
        let (mut tools, mut scene, mut store) = setup();
        let existing = ShapeRecord::Rectangle(Rectangle::new(Point::new(0.0, 0.0)));
        let id = existing.object_id();
        scene.add(existing.clone());
        store.sync_shape(existing).unwrap();

        tools.set_tool(ToolKind::Rectangle);
        tools
            .pointer_down(&mut scene, &mut store, Point::new(50.0, 50.0))
            .unwrap();

        // Selected the target instead of drafting a new shape over it.
        assert_eq!(scene.selection(), &[id]);
        assert_eq!(store.len(), 1);
        assert!(!tools.state.is_drawing);
    }

    #[test]
    fn test_selection_guard_during_attribute_edit() {
        let (mut tools, mut scene, _store) = setup();
        let record = ShapeRecord::Rectangle(Rectangle::new(Point::new(0.0, 0.0)));
        let id = record.object_id();
        scene.add(record);
        scene.select(vec![id]);

        tools.set_editing_attribute(true);
        tools.selection_created(&scene);
        assert_eq!(tools.attributes.width, 0.0);

        tools.set_editing_attribute(false);
        tools.selection_created(&scene);
        assert_eq!(tools.attributes.width, 100.0);
        assert_eq!(tools.attributes.fill, "#aabbcc");
    }

    #[test]
    fn test_scaling_publishes_scaled_dimensions() {
        let (mut tools, mut scene, _store) = setup();
        let record = ShapeRecord::Rectangle(Rectangle::new(Point::new(0.0, 0.0)));
        let id = record.object_id();
        scene.add(record);
        scene.select(vec![id]);
        tools.selection_created(&scene);

        tools.object_scaling(&mut scene, id, 1.5, 2.0);
        assert_eq!(tools.attributes.width, 150.0);
        assert_eq!(tools.attributes.height, 200.0);
    }

    #[test]
    fn test_width_edit_resets_scale() {
        let (mut tools, mut scene, mut store) = setup();
        let record = ShapeRecord::Rectangle(Rectangle::new(Point::new(0.0, 0.0)));
        let id = record.object_id();
        scene.add(record);
        scene.select(vec![id]);
        tools.state.active_object = Some(id);
        tools.object_scaling(&mut scene, id, 2.0, 2.0);

        tools
            .modify_attribute(&mut scene, &mut store, AttributeEdit::Width(80.0))
            .unwrap();

        let visual = scene.visual(id).unwrap();
        assert_eq!(visual.scale_x, 1.0);
        assert_eq!(visual.record.width(), 80.0);
        // The raw dimension is what replicated.
        assert_eq!(store.get(id).unwrap().width(), 80.0);
    }

    #[test]
    fn test_opacity_stored_as_fraction() {
        let (mut tools, mut scene, mut store) = setup();
        let record = ShapeRecord::Rectangle(Rectangle::new(Point::new(0.0, 0.0)));
        let id = record.object_id();
        scene.add(record);
        tools.state.active_object = Some(id);

        tools
            .modify_attribute(&mut scene, &mut store, AttributeEdit::Opacity(50.0))
            .unwrap();
        assert_eq!(store.get(id).unwrap().style().opacity, 0.5);
    }

    #[test]
    fn test_stroke_opacity_recodes_rgba() {
        let (mut tools, mut scene, mut store) = setup();
        let mut record = ShapeRecord::Rectangle(Rectangle::new(Point::new(0.0, 0.0)));
        record.style_mut().stroke = Some("#000000".to_string());
        let id = record.object_id();
        scene.add(record);
        tools.state.active_object = Some(id);

        tools
            .modify_attribute(&mut scene, &mut store, AttributeEdit::StrokeOpacity(50.0))
            .unwrap();
        assert_eq!(
            store.get(id).unwrap().style().stroke.as_deref(),
            Some("rgba(0,0,0,0.5)")
        );
    }

    #[test]
    fn test_unchanged_edit_skips_sync() {
        let (mut tools, mut scene, mut store) = setup();
        let record = ShapeRecord::Rectangle(Rectangle::new(Point::new(0.0, 0.0)));
        let id = record.object_id();
        scene.add(record);
        tools.state.active_object = Some(id);

        tools
            .modify_attribute(
                &mut scene,
                &mut store,
                AttributeEdit::Fill("#aabbcc".to_string()),
            )
            .unwrap();
        // Same value as the record already holds: no write happened.
        assert!(store.is_empty());
    }

    #[test]
    fn test_delete_selected_clears_scene_and_store() {
        let (mut tools, mut scene, mut store) = setup();
        let record = ShapeRecord::Rectangle(Rectangle::new(Point::new(0.0, 0.0)));
        let id = record.object_id();
        scene.add(record.clone());
        store.sync_shape(record).unwrap();
        scene.select(vec![id]);

        tools.delete_selected(&mut scene, &mut store).unwrap();
        assert!(scene.is_empty());
        assert!(store.is_empty());
        assert!(scene.selection().is_empty());
    }

    #[test]
    fn test_reset_empties_everything() {
        let (mut tools, mut scene, mut store) = setup();
        for x in [0.0, 120.0, 240.0] {
            let record = ShapeRecord::Rectangle(Rectangle::new(Point::new(x, 0.0)));
            scene.add(record.clone());
            store.sync_shape(record).unwrap();
        }
        tools.set_tool(ToolKind::Circle);

        tools.reset(&mut scene, &mut store).unwrap();
        assert!(store.is_empty());
        assert!(scene.is_empty());
        assert_eq!(tools.state.active_tool, ToolKind::Select);

        let mut rendered = Scene::new(800.0, 600.0);
        rendered.render(&store.document());
        assert!(rendered.is_empty());
    }

    #[test]
    fn test_path_created_replicates_stroke() {
        let (mut tools, mut scene, mut store) = setup();
        let id = tools
            .path_created(
                &mut scene,
                &mut store,
                vec![(10.0, 10.0), (12.0, 14.0), (15.0, 20.0)],
            )
            .unwrap();
        assert!(store.get(id).is_some());
        assert!(scene.visual(id).is_some());
    }

    #[test]
    fn test_eraser_deletes_hit_target() {
        let (mut tools, mut scene, mut store) = setup();
        let record = ShapeRecord::Rectangle(Rectangle::new(Point::new(0.0, 0.0)));
        let id = record.object_id();
        scene.add(record.clone());
        store.sync_shape(record).unwrap();

        tools.set_tool(ToolKind::Eraser);
        tools
            .pointer_down(&mut scene, &mut store, Point::new(50.0, 50.0))
            .unwrap();
        assert!(scene.visual(id).is_none());
        assert!(store.get(id).is_none());
    }
}

//! Local scene: the materialized view of the shared document.
//!
//! The scene is derivable state. [`Scene::render`] rebuilds it from a
//! document snapshot from scratch, every time, so applying the same snapshot
//! twice yields the same scene (idempotent render). Selection survives a
//! rebuild by object id, which keeps a remote echo of our own write from
//! interrupting in-progress editing.

use std::collections::BTreeMap;

use kurbo::{Point, Rect};

use crate::shapes::{ObjectId, ShapeRecord};

/// One on-canvas object: the replicated record plus transient interaction
/// state. Scale factors come from interactive resizing and are not part of
/// the wire format; geometry becomes real on the next attribute write.
#[derive(Debug, Clone)]
pub struct Visual {
    pub record: ShapeRecord,
    pub scale_x: f64,
    pub scale_y: f64,
}

impl Visual {
    fn new(record: ShapeRecord) -> Self {
        Self {
            record,
            scale_x: 1.0,
            scale_y: 1.0,
        }
    }

    pub fn scaled_width(&self) -> f64 {
        self.record.width() * self.scale_x
    }

    pub fn scaled_height(&self) -> f64 {
        self.record.height() * self.scale_y
    }

    /// Bounding box with transient scale applied, anchored at the record's
    /// position.
    pub fn scaled_bounds(&self) -> Rect {
        let pos = self.record.position();
        Rect::new(
            pos.x,
            pos.y,
            pos.x + self.scaled_width(),
            pos.y + self.scaled_height(),
        )
    }

    pub fn contains(&self, point: Point) -> bool {
        self.scaled_bounds().contains(point)
    }
}

/// The drawing surface: visuals in stacking order plus the current selection.
#[derive(Debug, Clone)]
pub struct Scene {
    width: f64,
    height: f64,
    visuals: Vec<Visual>,
    selection: Vec<ObjectId>,
}

impl Scene {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            visuals: Vec::new(),
            selection: Vec::new(),
        }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn len(&self) -> usize {
        self.visuals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visuals.is_empty()
    }

    pub fn visuals(&self) -> &[Visual] {
        &self.visuals
    }

    /// Add a visual on top of the stack.
    pub fn add(&mut self, record: ShapeRecord) {
        self.visuals.push(Visual::new(record));
    }

    /// Remove a visual. Returns the record if it was present; removing an
    /// absent id is a no-op.
    pub fn remove(&mut self, id: ObjectId) -> Option<ShapeRecord> {
        let index = self.visuals.iter().position(|v| v.record.object_id() == id)?;
        self.selection.retain(|s| *s != id);
        Some(self.visuals.remove(index).record)
    }

    pub fn visual(&self, id: ObjectId) -> Option<&Visual> {
        self.visuals.iter().find(|v| v.record.object_id() == id)
    }

    pub fn visual_mut(&mut self, id: ObjectId) -> Option<&mut Visual> {
        self.visuals.iter_mut().find(|v| v.record.object_id() == id)
    }

    /// Topmost visual under a point.
    pub fn hit_test(&self, point: Point) -> Option<&Visual> {
        self.visuals.iter().rev().find(|v| v.contains(point))
    }

    pub fn select(&mut self, ids: Vec<ObjectId>) {
        self.selection = ids;
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn selection(&self) -> &[ObjectId] {
        &self.selection
    }

    /// The single selected visual, if the selection has exactly one member.
    pub fn selected_visual(&self) -> Option<&Visual> {
        match self.selection.as_slice() {
            [id] => self.visual(*id),
            _ => None,
        }
    }

    pub fn clear(&mut self) {
        self.visuals.clear();
        self.selection.clear();
    }

    /// Rebuild the scene from a document snapshot. Clears every visual and
    /// re-creates one per record, then restores the selection for ids that
    /// still exist. Safe to call with the same snapshot any number of times.
    pub fn render(&mut self, document: &BTreeMap<ObjectId, ShapeRecord>) {
        let selection = std::mem::take(&mut self.selection);
        self.visuals.clear();
        for record in document.values() {
            self.visuals.push(Visual::new(record.clone()));
        }
        self.selection = selection
            .into_iter()
            .filter(|id| document.contains_key(id))
            .collect();
    }

    /// Clamp a visual's position so its scaled bounding box stays inside the
    /// canvas. Returns true if the position changed.
    pub fn clamp_to_bounds(&mut self, id: ObjectId) -> bool {
        let (width, height) = (self.width, self.height);
        let Some(visual) = self.visual_mut(id) else {
            return false;
        };
        let pos = visual.record.position();
        let max_x = (width - visual.scaled_width()).max(0.0);
        let max_y = (height - visual.scaled_height()).max(0.0);
        let clamped = Point::new(pos.x.clamp(0.0, max_x), pos.y.clamp(0.0, max_y));
        if clamped == pos {
            return false;
        }
        visual.record.set_position(clamped);
        true
    }
}

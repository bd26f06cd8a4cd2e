//! Copy, cut and paste.
//!
//! The clipboard holds one payload: a JSON array of serialized shape
//! records, fully overwritten on every copy. Pasting offsets each shape by
//! (+20, +20), assigns a fresh id and resets the fill, so a paste is a new
//! object wherever it lands. A malformed payload aborts the whole paste;
//! an individually undecodable entry is skipped without aborting the rest.

use kurbo::Vec2;
use serde_json::Value;
use thiserror::Error;

use loomboard_room::RoomError;

use crate::color::DEFAULT_FILL;
use crate::scene::Scene;
use crate::shapes::ShapeRecord;
use crate::store::DocumentStore;

/// Offset applied to pasted shapes so the copy is visibly distinct.
pub const PASTE_OFFSET: f64 = 20.0;

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("clipboard backend unavailable: {0}")]
    Unavailable(String),
}

/// Storage backend for the clipboard payload.
pub trait Clipboard {
    fn write(&mut self, payload: String) -> Result<(), ClipboardError>;
    fn read(&self) -> Result<Option<String>, ClipboardError>;
}

/// In-memory clipboard: a single slot, overwritten on every write.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    slot: Option<String>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clipboard for MemoryClipboard {
    fn write(&mut self, payload: String) -> Result<(), ClipboardError> {
        self.slot = Some(payload);
        Ok(())
    }

    fn read(&self) -> Result<Option<String>, ClipboardError> {
        Ok(self.slot.clone())
    }
}

/// Serialize the selected records to the clipboard. Returns how many were
/// copied; an empty selection leaves the clipboard untouched.
pub fn copy_selection(
    scene: &Scene,
    clipboard: &mut dyn Clipboard,
) -> Result<usize, ClipboardError> {
    let records: Vec<&ShapeRecord> = scene
        .selection()
        .iter()
        .filter_map(|id| scene.visual(*id).map(|v| &v.record))
        .collect();
    if records.is_empty() {
        return Ok(0);
    }
    let payload = match serde_json::to_string(&records) {
        Ok(payload) => payload,
        Err(err) => {
            log::error!("failed to serialize selection: {err}");
            return Ok(0);
        }
    };
    clipboard.write(payload)?;
    Ok(records.len())
}

/// Paste the clipboard payload onto the canvas. Each pasted shape gets a
/// fresh id, a (+20, +20) offset and the default fill, and is synced to the
/// store. Returns how many shapes were pasted.
pub fn paste(
    scene: &mut Scene,
    store: &mut DocumentStore,
    clipboard: &dyn Clipboard,
) -> Result<usize, RoomError> {
    let payload = match clipboard.read() {
        Ok(Some(payload)) => payload,
        Ok(None) => return Ok(0),
        Err(err) => {
            log::error!("clipboard read failed: {err}");
            return Ok(0);
        }
    };
    let entries: Vec<Value> = match serde_json::from_str(&payload) {
        Ok(entries) => entries,
        Err(err) => {
            // Malformed payload: abort, paste nothing.
            log::error!("malformed clipboard payload: {err}");
            return Ok(0);
        }
    };

    let mut pasted = 0;
    for entry in entries {
        let mut record: ShapeRecord = match serde_json::from_value(entry) {
            Ok(record) => record,
            Err(err) => {
                log::warn!("skipping unpasteable clipboard entry: {err}");
                continue;
            }
        };
        record.regenerate_id();
        record.translate(Vec2::new(PASTE_OFFSET, PASTE_OFFSET));
        record.style_mut().fill = Some(DEFAULT_FILL.to_string());
        scene.add(record.clone());
        store.sync_shape(record)?;
        pasted += 1;
    }
    Ok(pasted)
}

/// Copy the selection, then delete it.
pub fn cut_selection(
    scene: &mut Scene,
    store: &mut DocumentStore,
    clipboard: &mut dyn Clipboard,
) -> Result<usize, RoomError> {
    let copied = match copy_selection(scene, clipboard) {
        Ok(copied) => copied,
        Err(err) => {
            log::error!("clipboard write failed: {err}");
            return Ok(0);
        }
    };
    if copied == 0 {
        return Ok(0);
    }
    let ids: Vec<_> = scene.selection().to_vec();
    for id in &ids {
        scene.remove(*id);
    }
    store.delete_shapes(&ids)?;
    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::Rectangle;
    use kurbo::Point;

    fn selected_rect(scene: &mut Scene, store: &mut DocumentStore, x: f64, y: f64) -> ShapeRecord {
        let record = ShapeRecord::Rectangle(Rectangle::new(Point::new(x, y)));
        scene.add(record.clone());
        store.sync_shape(record.clone()).unwrap();
        scene.select(vec![record.object_id()]);
        record
    }

    #[test]
    fn test_copy_paste_offsets_and_renames() {
        let mut scene = Scene::new(800.0, 600.0);
        let mut store = DocumentStore::new();
        let mut clipboard = MemoryClipboard::new();
        let original = selected_rect(&mut scene, &mut store, 30.0, 40.0);

        assert_eq!(copy_selection(&scene, &mut clipboard).unwrap(), 1);
        assert_eq!(paste(&mut scene, &mut store, &clipboard).unwrap(), 1);

        assert_eq!(store.len(), 2);
        let copy = store
            .document()
            .into_values()
            .find(|r| r.object_id() != original.object_id())
            .unwrap();
        assert_eq!(copy.position(), Point::new(50.0, 60.0));
        assert_eq!(copy.style().fill.as_deref(), Some("#aabbcc"));
    }

    #[test]
    fn test_copy_overwrites_previous_payload() {
        let mut scene = Scene::new(800.0, 600.0);
        let mut store = DocumentStore::new();
        let mut clipboard = MemoryClipboard::new();

        selected_rect(&mut scene, &mut store, 0.0, 0.0);
        copy_selection(&scene, &mut clipboard).unwrap();

        let second = selected_rect(&mut scene, &mut store, 100.0, 100.0);
        copy_selection(&scene, &mut clipboard).unwrap();

        // Only the second selection is on the clipboard.
        let mut target_scene = Scene::new(800.0, 600.0);
        let mut target_store = DocumentStore::new();
        assert_eq!(
            paste(&mut target_scene, &mut target_store, &clipboard).unwrap(),
            1
        );
        let pasted = target_store.document().into_values().next().unwrap();
        assert_eq!(
            pasted.position(),
            second.position() + Vec2::new(20.0, 20.0)
        );
    }

    #[test]
    fn test_malformed_payload_aborts_whole_paste() {
        let mut scene = Scene::new(800.0, 600.0);
        let mut store = DocumentStore::new();
        let mut clipboard = MemoryClipboard::new();
        clipboard.write("{not json".to_string()).unwrap();

        assert_eq!(paste(&mut scene, &mut store, &clipboard).unwrap(), 0);
        assert!(store.is_empty());
        assert!(scene.is_empty());
    }

    #[test]
    fn test_entry_without_id_skipped_not_fatal() {
        let mut scene = Scene::new(800.0, 600.0);
        let mut store = DocumentStore::new();
        let mut clipboard = MemoryClipboard::new();

        let good = ShapeRecord::Rectangle(Rectangle::new(Point::new(0.0, 0.0)));
        let mut entries = vec![serde_json::to_value(&good).unwrap()];
        // Shape with its required id stripped out.
        let mut bad = serde_json::to_value(&good).unwrap();
        bad.as_object_mut().unwrap().remove("objectId");
        entries.push(bad);
        clipboard
            .write(serde_json::to_string(&entries).unwrap())
            .unwrap();

        assert_eq!(paste(&mut scene, &mut store, &clipboard).unwrap(), 1);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_cut_removes_after_copy() {
        let mut scene = Scene::new(800.0, 600.0);
        let mut store = DocumentStore::new();
        let mut clipboard = MemoryClipboard::new();
        let record = selected_rect(&mut scene, &mut store, 10.0, 10.0);

        assert_eq!(cut_selection(&mut scene, &mut store, &mut clipboard).unwrap(), 1);
        assert!(store.get(record.object_id()).is_none());
        assert!(scene.is_empty());

        // The cut content pastes back.
        assert_eq!(paste(&mut scene, &mut store, &clipboard).unwrap(), 1);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_paste_empty_clipboard_is_noop() {
        let mut scene = Scene::new(800.0, 600.0);
        let mut store = DocumentStore::new();
        let clipboard = MemoryClipboard::new();
        assert_eq!(paste(&mut scene, &mut store, &clipboard).unwrap(), 0);
    }
}

//! Comment thread overlay.
//!
//! Threads float above the canvas as draggable pins. Stacking is by
//! z-index over the unresolved set: placing or focusing a thread lifts it
//! to max+1, and a thread already on top is left alone, so no two
//! unresolved threads ever share a z-index. Drag versus click is an
//! explicit state machine: pointer-down arms a click timer, movement past
//! a threshold promotes to a drag and suppresses the minimize toggle.

use kurbo::Point;

use loomboard_room::{RoomError, ThreadId, ThreadMetadata, ThreadMetadataPatch, ThreadStore};

/// The click timer: expiry without qualifying movement toggles minimize.
pub const CLICK_TIMER_MS: u64 = 500;

/// Cumulative movement past this promotes an armed click to a drag.
pub const DRAG_THRESHOLD_PX: f64 = 3.0;

/// Pin footprint kept inside the canvas when clamping drags.
pub const PIN_FOOTPRINT_PX: f64 = 50.0;

/// Threads older than this render collapsed by default.
pub const START_MINIMIZED_AFTER_MS: u64 = 100;

/// Drag-detection state for the pin under the pointer.
#[derive(Debug, Clone, PartialEq)]
pub enum DragState {
    Idle,
    /// Pointer is down; waiting to find out if this is a click or a drag.
    ArmedForClick {
        thread: ThreadId,
        pressed_at_ms: u64,
        last: Point,
        travelled: f64,
        x: f64,
        y: f64,
    },
    /// The pin follows the pointer.
    Dragging {
        thread: ThreadId,
        last: Point,
        x: f64,
        y: f64,
    },
}

/// Emitted by the overlay for the render layer to act on.
#[derive(Debug, Clone, PartialEq)]
pub enum OverlayEvent {
    /// A short click completed: flip the thread's minimized state.
    ToggleMinimized(ThreadId),
}

/// One replica's view of the comment pins.
pub struct ThreadOverlay {
    store: ThreadStore,
    canvas_width: f64,
    canvas_height: f64,
    drag: DragState,
}

impl ThreadOverlay {
    pub fn new(store: ThreadStore, canvas_width: f64, canvas_height: f64) -> Self {
        Self {
            store,
            canvas_width,
            canvas_height,
            drag: DragState::Idle,
        }
    }

    pub fn store(&self) -> &ThreadStore {
        &self.store
    }

    pub fn drag_state(&self) -> &DragState {
        &self.drag
    }

    /// Highest z-index among unresolved threads, 0 when there are none.
    pub fn max_z_index(&self) -> i64 {
        self.store
            .threads()
            .iter()
            .filter(|t| !t.metadata.resolved)
            .map(|t| t.metadata.z_index)
            .max()
            .unwrap_or(0)
    }

    /// Create a thread at a screen point, stored canvas-relative, stacked
    /// on top of every unresolved thread.
    pub fn place(
        &mut self,
        point: Point,
        canvas_origin: Point,
        body: impl Into<String>,
        now_ms: u64,
    ) -> ThreadId {
        let metadata = ThreadMetadata {
            resolved: false,
            z_index: self.max_z_index() + 1,
            x: point.x - canvas_origin.x,
            y: point.y - canvas_origin.y,
            created_at_ms: now_ms,
        };
        self.store.create(body, metadata)
    }

    /// Bring a thread to the top of the unresolved stack. Already on top is
    /// a no-op, so focusing the same thread repeatedly does not climb.
    pub fn focus(&mut self, thread: ThreadId) -> Result<(), RoomError> {
        let max = self.max_z_index();
        let current = self
            .store
            .get(thread)
            .ok_or(RoomError::UnknownThread(thread))?;
        if current.metadata.z_index == max {
            return Ok(());
        }
        self.store.edit_metadata(
            thread,
            &ThreadMetadataPatch {
                z_index: Some(max + 1),
                ..Default::default()
            },
        )
    }

    /// Pointer pressed on a pin: focus it and arm the click timer.
    pub fn pointer_down(
        &mut self,
        thread: ThreadId,
        point: Point,
        now_ms: u64,
    ) -> Result<(), RoomError> {
        self.focus(thread)?;
        let current = self
            .store
            .get(thread)
            .ok_or(RoomError::UnknownThread(thread))?;
        self.drag = DragState::ArmedForClick {
            thread,
            pressed_at_ms: now_ms,
            last: point,
            travelled: 0.0,
            x: current.metadata.x,
            y: current.metadata.y,
        };
        Ok(())
    }

    /// Pointer moved while pressed. Enough travel turns the armed click
    /// into a drag; while dragging the pin follows, clamped to the canvas
    /// minus the pin footprint.
    pub fn pointer_move(&mut self, point: Point) {
        match self.drag.clone() {
            DragState::Idle => {}
            DragState::ArmedForClick {
                thread,
                pressed_at_ms,
                last,
                mut travelled,
                x,
                y,
            } => {
                travelled += (point - last).hypot();
                if travelled > DRAG_THRESHOLD_PX {
                    // Promote to a drag; the qualifying move itself counts.
                    self.drag = DragState::Dragging { thread, last, x, y };
                    self.pointer_move(point);
                } else {
                    self.drag = DragState::ArmedForClick {
                        thread,
                        pressed_at_ms,
                        last: point,
                        travelled,
                        x,
                        y,
                    };
                }
            }
            DragState::Dragging { thread, last, x, y } => {
                let delta = point - last;
                let max_x = (self.canvas_width - PIN_FOOTPRINT_PX).max(0.0);
                let max_y = (self.canvas_height - PIN_FOOTPRINT_PX).max(0.0);
                self.drag = DragState::Dragging {
                    thread,
                    last: point,
                    x: (x + delta.x).clamp(0.0, max_x),
                    y: (y + delta.y).clamp(0.0, max_y),
                };
            }
        }
    }

    /// Click timer check. Expiry while still armed (no qualifying movement)
    /// completes the click: the minimize toggle fires.
    pub fn tick(&mut self, now_ms: u64) -> Option<OverlayEvent> {
        if let DragState::ArmedForClick {
            thread,
            pressed_at_ms,
            ..
        } = self.drag
        {
            if now_ms >= pressed_at_ms + CLICK_TIMER_MS {
                self.drag = DragState::Idle;
                return Some(OverlayEvent::ToggleMinimized(thread));
            }
        }
        None
    }

    /// Pointer released. A drag writes its final position back through a
    /// partial metadata edit; an armed click is cancelled without toggling.
    pub fn pointer_up(&mut self) -> Result<(), RoomError> {
        match std::mem::replace(&mut self.drag, DragState::Idle) {
            DragState::Dragging { thread, x, y, .. } => self.store.edit_metadata(
                thread,
                &ThreadMetadataPatch {
                    x: Some(x),
                    y: Some(y),
                    ..Default::default()
                },
            ),
            DragState::ArmedForClick { .. } | DragState::Idle => Ok(()),
        }
    }

    /// Whether a thread should first render collapsed.
    pub fn starts_minimized(&self, created_at_ms: u64, now_ms: u64) -> bool {
        now_ms.saturating_sub(created_at_ms) > START_MINIMIZED_AFTER_MS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overlay() -> ThreadOverlay {
        ThreadOverlay::new(ThreadStore::new(), 800.0, 600.0)
    }

    #[test]
    fn test_place_stacks_above_unresolved() {
        let mut overlay = overlay();
        let a = overlay.place(Point::new(10.0, 10.0), Point::ZERO, "a", 0);
        let b = overlay.place(Point::new(20.0, 20.0), Point::ZERO, "b", 1);

        let store = overlay.store().clone();
        assert_eq!(store.get(a).unwrap().metadata.z_index, 1);
        assert_eq!(store.get(b).unwrap().metadata.z_index, 2);
    }

    #[test]
    fn test_focus_no_op_when_already_max() {
        let mut overlay = overlay();
        let a = overlay.place(Point::new(0.0, 0.0), Point::ZERO, "a", 0);
        let b = overlay.place(Point::new(0.0, 0.0), Point::ZERO, "b", 1);

        overlay.focus(b).unwrap();
        let store = overlay.store().clone();
        // b was already on top: no z-index churn.
        assert_eq!(store.get(b).unwrap().metadata.z_index, 2);

        overlay.focus(a).unwrap();
        assert_eq!(store.get(a).unwrap().metadata.z_index, 3);
        // No two unresolved threads share a z-index.
        assert_ne!(
            store.get(a).unwrap().metadata.z_index,
            store.get(b).unwrap().metadata.z_index
        );
    }

    #[test]
    fn test_resolved_threads_ignored_for_max() {
        let mut overlay = overlay();
        let a = overlay.place(Point::new(0.0, 0.0), Point::ZERO, "a", 0);
        overlay.store().resolve(a).unwrap();
        assert_eq!(overlay.max_z_index(), 0);

        let b = overlay.place(Point::new(0.0, 0.0), Point::ZERO, "b", 1);
        assert_eq!(overlay.store().get(b).unwrap().metadata.z_index, 1);
    }

    #[test]
    fn test_short_click_toggles_on_timer() {
        let mut overlay = overlay();
        let id = overlay.place(Point::new(100.0, 100.0), Point::ZERO, "a", 0);

        overlay.pointer_down(id, Point::new(100.0, 100.0), 1_000).unwrap();
        assert!(overlay.tick(1_000 + CLICK_TIMER_MS - 1).is_none());
        assert_eq!(
            overlay.tick(1_000 + CLICK_TIMER_MS),
            Some(OverlayEvent::ToggleMinimized(id))
        );
        assert_eq!(*overlay.drag_state(), DragState::Idle);
    }

    #[test]
    fn test_movement_suppresses_toggle_and_drags() {
        let mut overlay = overlay();
        let id = overlay.place(Point::new(100.0, 100.0), Point::ZERO, "a", 0);

        overlay.pointer_down(id, Point::new(100.0, 100.0), 1_000).unwrap();
        overlay.pointer_move(Point::new(110.0, 100.0));
        // Past the threshold: the click timer no longer fires.
        assert!(overlay.tick(1_000 + CLICK_TIMER_MS).is_none());
        assert!(matches!(overlay.drag_state(), DragState::Dragging { .. }));

        overlay.pointer_move(Point::new(150.0, 130.0));
        overlay.pointer_up().unwrap();

        let thread = overlay.store().get(id).unwrap();
        assert_eq!(thread.metadata.x, 150.0);
        assert_eq!(thread.metadata.y, 130.0);
    }

    #[test]
    fn test_drag_clamps_to_pin_footprint() {
        let mut overlay = overlay();
        let id = overlay.place(Point::new(700.0, 500.0), Point::ZERO, "a", 0);

        overlay.pointer_down(id, Point::new(700.0, 500.0), 0).unwrap();
        overlay.pointer_move(Point::new(2_000.0, 2_000.0));
        overlay.pointer_up().unwrap();

        let thread = overlay.store().get(id).unwrap();
        assert_eq!(thread.metadata.x, 800.0 - PIN_FOOTPRINT_PX);
        assert_eq!(thread.metadata.y, 600.0 - PIN_FOOTPRINT_PX);
    }

    #[test]
    fn test_drag_on_canvas_smaller_than_pin() {
        // Canvas narrower than the pin footprint: the pin parks at 0
        // instead of asserting on an inverted clamp range.
        let mut overlay = ThreadOverlay::new(ThreadStore::new(), 40.0, 600.0);
        let id = overlay.place(Point::new(10.0, 10.0), Point::ZERO, "a", 0);

        overlay.pointer_down(id, Point::new(10.0, 10.0), 0).unwrap();
        overlay.pointer_move(Point::new(30.0, 10.0));
        overlay.pointer_up().unwrap();

        let thread = overlay.store().get(id).unwrap();
        assert_eq!(thread.metadata.x, 0.0);
        assert_eq!(thread.metadata.y, 10.0);
    }

    #[test]
    fn test_release_before_timer_cancels_click() {
        let mut overlay = overlay();
        let id = overlay.place(Point::new(100.0, 100.0), Point::ZERO, "a", 0);
        let before = overlay.store().get(id).unwrap().metadata.clone();

        overlay.pointer_down(id, Point::new(100.0, 100.0), 0).unwrap();
        overlay.pointer_up().unwrap();
        assert!(overlay.tick(CLICK_TIMER_MS + 1).is_none());
        // Position untouched by the armed-then-released press.
        assert_eq!(overlay.store().get(id).unwrap().metadata, before);
    }

    #[test]
    fn test_starts_minimized_cutoff() {
        let overlay = overlay();
        assert!(!overlay.starts_minimized(1_000, 1_050));
        assert!(!overlay.starts_minimized(1_000, 1_100));
        assert!(overlay.starts_minimized(1_000, 1_101));
    }

    #[test]
    fn test_place_is_canvas_relative() {
        let mut overlay = overlay();
        let id = overlay.place(Point::new(250.0, 180.0), Point::new(50.0, 80.0), "a", 0);
        let thread = overlay.store().get(id).unwrap();
        assert_eq!(thread.metadata.x, 200.0);
        assert_eq!(thread.metadata.y, 100.0);
    }
}

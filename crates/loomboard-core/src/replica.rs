//! One client's bundle of engine state, wired to a shared room.
//!
//! This is the composition root used by integration tests and any host
//! shell: a document store, scene, tool controller, presence channel,
//! thread overlay and clipboard, all talking through the room's buses.

use loomboard_room::{BusHandle, EventBus, MapOp, ThreadStore};
use uuid::Uuid;

use crate::clipboard::{self, MemoryClipboard};
use crate::keyboard::Shortcut;
use crate::presence::{ChannelEvent, PresenceChannel};
use crate::scene::Scene;
use crate::shapes::ShapeRecord;
use crate::store::DocumentStore;
use crate::threads::ThreadOverlay;
use crate::tools::ToolController;

use loomboard_room::RoomError;

/// The shared side of a collaborative session.
pub struct Room {
    doc_bus: EventBus<MapOp<ShapeRecord>>,
    presence_bus: EventBus<ChannelEvent>,
    threads: ThreadStore,
}

impl Room {
    pub fn new() -> Self {
        Self {
            doc_bus: EventBus::new(),
            presence_bus: EventBus::new(),
            threads: ThreadStore::new(),
        }
    }

    /// Join the room as a fresh replica.
    pub fn join(&self, canvas_width: f64, canvas_height: f64) -> Replica {
        let replica_id = Uuid::new_v4();
        Replica {
            store: DocumentStore::with_replica(replica_id),
            scene: Scene::new(canvas_width, canvas_height),
            tools: ToolController::new(),
            presence: PresenceChannel::connect(&self.presence_bus, replica_id),
            overlay: ThreadOverlay::new(self.threads.clone(), canvas_width, canvas_height),
            clipboard: MemoryClipboard::new(),
            doc_handle: self.doc_bus.connect(),
        }
    }
}

impl Default for Room {
    fn default() -> Self {
        Self::new()
    }
}

/// One connected client.
pub struct Replica {
    pub store: DocumentStore,
    pub scene: Scene,
    pub tools: ToolController,
    pub presence: PresenceChannel,
    pub overlay: ThreadOverlay,
    pub clipboard: MemoryClipboard,
    doc_handle: BusHandle<MapOp<ShapeRecord>>,
}

impl Replica {
    /// Broadcast every op queued since the last flush.
    pub fn flush(&mut self) {
        for op in self.store.take_outgoing() {
            self.doc_handle.broadcast(op);
        }
    }

    /// Apply every op peers have broadcast. Returns how many won.
    pub fn receive(&mut self) -> usize {
        self.doc_handle
            .drain()
            .into_iter()
            .filter(|op| self.store.apply_remote(op.clone()))
            .count()
    }

    /// Rebuild the scene from the current document.
    pub fn render(&mut self) {
        self.scene.render(&self.store.document());
    }

    /// Route a decoded shortcut to the right subsystem.
    pub fn handle_shortcut(&mut self, shortcut: Shortcut) -> Result<(), RoomError> {
        match shortcut {
            Shortcut::Copy => {
                if let Err(err) = clipboard::copy_selection(&self.scene, &mut self.clipboard) {
                    log::error!("copy failed: {err}");
                }
                Ok(())
            }
            Shortcut::Paste => {
                clipboard::paste(&mut self.scene, &mut self.store, &self.clipboard)?;
                Ok(())
            }
            Shortcut::Cut => {
                clipboard::cut_selection(&mut self.scene, &mut self.store, &mut self.clipboard)?;
                Ok(())
            }
            Shortcut::Undo => {
                self.store.undo()?;
                self.render();
                Ok(())
            }
            Shortcut::Redo => {
                self.store.redo()?;
                self.render();
                Ok(())
            }
        }
    }
}

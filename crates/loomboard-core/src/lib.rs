//! Loomboard Core
//!
//! Sync engine for a real-time collaborative vector canvas: a replicated
//! last-writer-wins shape document with a local scene view, the tool
//! interaction state machine that drives it, an ephemeral presence and
//! reaction channel, a comment thread overlay, undo/redo history and
//! clipboard handling.

pub mod clipboard;
pub mod color;
pub mod history;
pub mod keyboard;
pub mod presence;
pub mod replica;
pub mod scene;
pub mod shapes;
pub mod store;
pub mod threads;
pub mod tools;

pub use clipboard::{Clipboard, MemoryClipboard};
pub use history::History;
pub use keyboard::Shortcut;
pub use presence::{CursorMode, Presence, PresenceChannel, ReactionEvent};
pub use replica::{Replica, Room};
pub use scene::{Scene, Visual};
pub use shapes::{ObjectId, ShapeKind, ShapeRecord, ShapeStyle};
pub use store::DocumentStore;
pub use threads::{DragState, OverlayEvent, ThreadOverlay};
pub use tools::{AttributeEdit, Attributes, ToolController, ToolKind, ToolState};

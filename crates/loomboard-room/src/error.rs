//! Error types for the room primitives.

use thiserror::Error;

/// Errors surfaced by the room layer.
#[derive(Debug, Error)]
pub enum RoomError {
    #[error("unknown thread: {0}")]
    UnknownThread(crate::threads::ThreadId),

    #[error("bus handle is disconnected")]
    Disconnected,

    #[error("transaction aborted: {0}")]
    TransactionAborted(String),
}

//! Loomboard Room Primitives
//!
//! The replicated building blocks a Loomboard client runs on top of: a
//! last-writer-wins replicated map for shared documents, a fire-and-forget
//! broadcast bus for ephemeral events, and a comment thread store with
//! partial-merge metadata edits. Everything here is in-memory so multiple
//! replicas can be wired together in a single process for tests.

pub mod bus;
pub mod clock;
pub mod error;
pub mod map;
pub mod threads;

pub use bus::{BusHandle, EventBus};
pub use clock::{LamportClock, ReplicaId, WriteStamp};
pub use error::RoomError;
pub use map::{MapOp, MapTransaction, ReplicatedMap};
pub use threads::{Thread, ThreadId, ThreadMetadata, ThreadMetadataPatch, ThreadStore};

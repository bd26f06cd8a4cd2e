//! Comment thread store.
//!
//! Threads live in a store shared by every replica in the room. Metadata
//! edits are partial merges: only the fields present in the patch are
//! touched, everything else is preserved.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::RoomError;

/// Unique identifier for a comment thread.
pub type ThreadId = Uuid;

/// Positional and ordering metadata attached to a thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadMetadata {
    pub resolved: bool,
    pub z_index: i64,
    pub x: f64,
    pub y: f64,
    pub created_at_ms: u64,
}

/// Partial metadata edit. `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadMetadataPatch {
    pub resolved: Option<bool>,
    pub z_index: Option<i64>,
    pub x: Option<f64>,
    pub y: Option<f64>,
}

impl ThreadMetadata {
    /// Merge a patch into this metadata, field by field.
    pub fn merge(&mut self, patch: &ThreadMetadataPatch) {
        if let Some(resolved) = patch.resolved {
            self.resolved = resolved;
        }
        if let Some(z_index) = patch.z_index {
            self.z_index = z_index;
        }
        if let Some(x) = patch.x {
            self.x = x;
        }
        if let Some(y) = patch.y {
            self.y = y;
        }
    }
}

/// A comment thread: first comment body plus metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Thread {
    pub id: ThreadId,
    pub body: String,
    pub metadata: ThreadMetadata,
}

/// Shared thread store. Clones see the same threads.
#[derive(Clone)]
pub struct ThreadStore {
    inner: Arc<Mutex<HashMap<ThreadId, Thread>>>,
}

impl ThreadStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Create a thread and return its id.
    pub fn create(&self, body: impl Into<String>, metadata: ThreadMetadata) -> ThreadId {
        let id = Uuid::new_v4();
        let thread = Thread {
            id,
            body: body.into(),
            metadata,
        };
        self.lock().insert(id, thread);
        id
    }

    pub fn get(&self, id: ThreadId) -> Option<Thread> {
        self.lock().get(&id).cloned()
    }

    /// Merge a partial metadata edit into a thread.
    pub fn edit_metadata(
        &self,
        id: ThreadId,
        patch: &ThreadMetadataPatch,
    ) -> Result<(), RoomError> {
        let mut threads = self.lock();
        let thread = threads.get_mut(&id).ok_or(RoomError::UnknownThread(id))?;
        thread.metadata.merge(patch);
        Ok(())
    }

    /// Mark a thread resolved.
    pub fn resolve(&self, id: ThreadId) -> Result<(), RoomError> {
        self.edit_metadata(
            id,
            &ThreadMetadataPatch {
                resolved: Some(true),
                ..Default::default()
            },
        )
    }

    /// Snapshot of all threads, oldest first.
    pub fn threads(&self) -> Vec<Thread> {
        let mut threads: Vec<Thread> = self.lock().values().cloned().collect();
        threads.sort_by_key(|t| (t.metadata.created_at_ms, t.id));
        threads
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<ThreadId, Thread>> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                log::warn!("thread store lock poisoned, recovering");
                poisoned.into_inner()
            }
        }
    }
}

impl Default for ThreadStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata(z: i64) -> ThreadMetadata {
        ThreadMetadata {
            resolved: false,
            z_index: z,
            x: 10.0,
            y: 20.0,
            created_at_ms: 1_000,
        }
    }

    #[test]
    fn test_create_and_get() {
        let store = ThreadStore::new();
        let id = store.create("first!", metadata(1));
        let thread = store.get(id).unwrap();
        assert_eq!(thread.body, "first!");
        assert_eq!(thread.metadata.z_index, 1);
    }

    #[test]
    fn test_edit_metadata_is_partial() {
        let store = ThreadStore::new();
        let id = store.create("hello", metadata(1));

        store
            .edit_metadata(
                id,
                &ThreadMetadataPatch {
                    x: Some(99.0),
                    ..Default::default()
                },
            )
            .unwrap();

        let thread = store.get(id).unwrap();
        assert_eq!(thread.metadata.x, 99.0);
        // Untouched fields survive the merge.
        assert_eq!(thread.metadata.y, 20.0);
        assert_eq!(thread.metadata.z_index, 1);
        assert!(!thread.metadata.resolved);
    }

    #[test]
    fn test_edit_unknown_thread_errors() {
        let store = ThreadStore::new();
        let result = store.edit_metadata(Uuid::new_v4(), &ThreadMetadataPatch::default());
        assert!(matches!(result, Err(RoomError::UnknownThread(_))));
    }

    #[test]
    fn test_clones_share_state() {
        let store = ThreadStore::new();
        let other = store.clone();
        let id = store.create("shared", metadata(1));
        assert!(other.get(id).is_some());

        other.resolve(id).unwrap();
        assert!(store.get(id).unwrap().metadata.resolved);
    }
}

//! Last-writer-wins replicated map.
//!
//! String-keyed, record-granular LWW: a write replaces the whole value for a
//! key, never merges fields. Deletes are tombstones that keep their stamp so a
//! delete racing an update converges the same way on every replica. Two maps
//! that applied the same set of ops, in any order, hold identical live
//! contents.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::clock::{LamportClock, ReplicaId, WriteStamp};
use crate::error::RoomError;

/// A single replicated write: full value, or a tombstone when `value` is None.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapOp<V> {
    pub key: String,
    pub value: Option<V>,
    pub stamp: WriteStamp,
}

#[derive(Debug, Clone)]
struct Entry<V> {
    value: Option<V>,
    stamp: WriteStamp,
}

/// One replica's view of the shared map.
#[derive(Debug, Clone)]
pub struct ReplicatedMap<V> {
    clock: LamportClock,
    entries: HashMap<String, Entry<V>>,
}

impl<V: Clone> ReplicatedMap<V> {
    pub fn new() -> Self {
        Self::with_clock(LamportClock::new())
    }

    pub fn with_replica(replica: ReplicaId) -> Self {
        Self::with_clock(LamportClock::with_replica(replica))
    }

    fn with_clock(clock: LamportClock) -> Self {
        Self {
            clock,
            entries: HashMap::new(),
        }
    }

    pub fn replica(&self) -> ReplicaId {
        self.clock.replica()
    }

    /// Get the live value for a key. Tombstoned keys read as absent.
    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.get(key).and_then(|e| e.value.as_ref())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Iterate over live `(key, value)` pairs in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries
            .iter()
            .filter_map(|(k, e)| e.value.as_ref().map(|v| (k.as_str(), v)))
    }

    /// Number of live keys.
    pub fn len(&self) -> usize {
        self.entries.values().filter(|e| e.value.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Local write: replace the whole value for `key`.
    /// Returns the op to broadcast to other replicas.
    pub fn set(&mut self, key: impl Into<String>, value: V) -> MapOp<V> {
        self.write(key.into(), Some(value))
    }

    /// Local delete: tombstone the key. Returns the op to broadcast.
    pub fn delete(&mut self, key: impl Into<String>) -> MapOp<V> {
        self.write(key.into(), None)
    }

    fn write(&mut self, key: String, value: Option<V>) -> MapOp<V> {
        let stamp = self.clock.tick();
        self.entries.insert(
            key.clone(),
            Entry {
                value: value.clone(),
                stamp,
            },
        );
        MapOp { key, value, stamp }
    }

    /// Apply a remote (or replayed) op. Returns true if the op won, i.e. it
    /// changed this replica's state. Losing ops are dropped, which makes
    /// apply idempotent and order-insensitive.
    pub fn apply(&mut self, op: MapOp<V>) -> bool {
        self.clock.observe(op.stamp);
        match self.entries.get(&op.key) {
            Some(current) if current.stamp >= op.stamp => false,
            _ => {
                self.entries.insert(
                    op.key,
                    Entry {
                        value: op.value,
                        stamp: op.stamp,
                    },
                );
                true
            }
        }
    }

    /// Run a composite change atomically: writes staged inside the closure
    /// are committed together after it returns Ok, or all discarded when it
    /// errors. Committed ops are applied locally and returned for broadcast.
    pub fn transaction<F>(&mut self, f: F) -> Result<Vec<MapOp<V>>, RoomError>
    where
        F: FnOnce(&mut MapTransaction<'_, V>) -> Result<(), RoomError>,
    {
        let mut tx = MapTransaction {
            map: self,
            staged: Vec::new(),
        };
        f(&mut tx)?;
        let staged = std::mem::take(&mut tx.staged);
        let ops = staged
            .into_iter()
            .map(|(key, value)| self.write(key, value))
            .collect();
        Ok(ops)
    }
}

impl<V: Clone> Default for ReplicatedMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Staging area for a [`ReplicatedMap::transaction`]. Writes are not visible
/// (and have no stamps) until the transaction commits.
pub struct MapTransaction<'a, V> {
    map: &'a ReplicatedMap<V>,
    staged: Vec<(String, Option<V>)>,
}

impl<V: Clone> MapTransaction<'_, V> {
    /// Read through to the committed state. Staged writes are not visible.
    pub fn get(&self, key: &str) -> Option<&V> {
        self.map.get(key)
    }

    /// Committed live keys, for whole-map operations like clear-all.
    pub fn keys(&self) -> Vec<String> {
        self.map.iter().map(|(k, _)| k.to_string()).collect()
    }

    pub fn set(&mut self, key: impl Into<String>, value: V) {
        self.staged.push((key.into(), Some(value)));
    }

    pub fn delete(&mut self, key: impl Into<String>) {
        self.staged.push((key.into(), None));
    }
}

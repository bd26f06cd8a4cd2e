//! Shape document store.
//!
//! Owns one replica's view of the shared shape map. Local mutations go
//! through atomic transactions whose ops are queued for broadcast; remote
//! ops are applied directly with LWW semantics. Every committed local
//! transaction is recorded as exactly one history entry.

use std::collections::BTreeMap;

use loomboard_room::{MapOp, ReplicatedMap, ReplicaId, RoomError};

use crate::history::{History, HistoryEntry, RecordChange};
use crate::shapes::{ObjectId, ShapeRecord};

pub struct DocumentStore {
    map: ReplicatedMap<ShapeRecord>,
    outgoing: Vec<MapOp<ShapeRecord>>,
    history: History,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self {
            map: ReplicatedMap::new(),
            outgoing: Vec::new(),
            history: History::new(),
        }
    }

    pub fn with_replica(replica: ReplicaId) -> Self {
        Self {
            map: ReplicatedMap::with_replica(replica),
            outgoing: Vec::new(),
            history: History::new(),
        }
    }

    pub fn replica(&self) -> ReplicaId {
        self.map.replica()
    }

    pub fn get(&self, id: ObjectId) -> Option<&ShapeRecord> {
        self.map.get(&id.to_string())
    }

    /// Number of live records.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Ordered snapshot of the live document.
    pub fn document(&self) -> BTreeMap<ObjectId, ShapeRecord> {
        self.map
            .iter()
            .filter_map(|(key, record)| {
                key.parse::<ObjectId>().ok().map(|id| (id, record.clone()))
            })
            .collect()
    }

    /// Upsert one record, full-record overwrite.
    pub fn sync_shape(&mut self, record: ShapeRecord) -> Result<(), RoomError> {
        let key = record.object_id().to_string();
        self.commit(vec![(key, Some(record))])
    }

    /// Delete one record.
    pub fn delete_shape(&mut self, id: ObjectId) -> Result<(), RoomError> {
        self.commit(vec![(id.to_string(), None)])
    }

    /// Delete several records in one transaction (one history entry).
    pub fn delete_shapes(&mut self, ids: &[ObjectId]) -> Result<(), RoomError> {
        if ids.is_empty() {
            return Ok(());
        }
        self.commit(ids.iter().map(|id| (id.to_string(), None)).collect())
    }

    /// Delete every record in one transaction. All keys go, or none do.
    pub fn delete_all(&mut self) -> Result<(), RoomError> {
        let keys: Vec<String> = self.map.iter().map(|(k, _)| k.to_string()).collect();
        if keys.is_empty() {
            return Ok(());
        }
        self.commit(keys.into_iter().map(|k| (k, None)).collect())
    }

    /// Apply one remote op. Never recorded in history, never re-queued.
    pub fn apply_remote(&mut self, op: MapOp<ShapeRecord>) -> bool {
        let won = self.map.apply(op);
        if won {
            log::debug!("remote op applied, {} live records", self.map.len());
        }
        won
    }

    /// Take the ops queued for broadcast since the last call.
    pub fn take_outgoing(&mut self) -> Vec<MapOp<ShapeRecord>> {
        std::mem::take(&mut self.outgoing)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Revert the most recent local transaction. Returns false when there is
    /// nothing to undo.
    pub fn undo(&mut self) -> Result<bool, RoomError> {
        let Some(entry) = self.history.pop_undo() else {
            return Ok(false);
        };
        let writes = entry
            .changes
            .iter()
            .map(|c| (c.key.clone(), c.before.clone()))
            .collect();
        self.apply_local(writes)?;
        self.history.stash_redo(entry);
        Ok(true)
    }

    /// Re-apply the most recently undone transaction.
    pub fn redo(&mut self) -> Result<bool, RoomError> {
        let Some(entry) = self.history.pop_redo() else {
            return Ok(false);
        };
        let writes = entry
            .changes
            .iter()
            .map(|c| (c.key.clone(), c.after.clone()))
            .collect();
        self.apply_local(writes)?;
        self.history.stash_undo(entry);
        Ok(true)
    }

    /// Commit a local transaction and record it as one history entry.
    fn commit(&mut self, writes: Vec<(String, Option<ShapeRecord>)>) -> Result<(), RoomError> {
        let changes: Vec<RecordChange> = writes
            .iter()
            .map(|(key, after)| RecordChange {
                key: key.clone(),
                before: self.map.get(key).cloned(),
                after: after.clone(),
            })
            .collect();
        self.apply_local(writes)?;
        self.history.record(HistoryEntry { changes });
        Ok(())
    }

    /// Apply local writes in one transaction without touching history.
    fn apply_local(&mut self, writes: Vec<(String, Option<ShapeRecord>)>) -> Result<(), RoomError> {
        let ops = self.map.transaction(|tx| {
            for (key, value) in writes {
                match value {
                    Some(record) => tx.set(key, record),
                    None => tx.delete(key),
                }
            }
            Ok(())
        })?;
        self.outgoing.extend(ops);
        Ok(())
    }
}

impl Default for DocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

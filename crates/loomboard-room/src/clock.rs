//! Lamport clocks and write stamps.
//!
//! Every local write is stamped with `(counter, replica)`. Stamps are totally
//! ordered, counter first and replica id as the tie-break, so the surviving
//! write for a key is a deterministic function of the set of writes and never
//! of their arrival order.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a replica (one connected client).
pub type ReplicaId = Uuid;

/// Totally ordered stamp attached to every write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WriteStamp {
    /// Lamport counter, advanced past every stamp the replica has seen.
    pub counter: u64,
    /// Tie-break between writes with equal counters.
    pub replica: ReplicaId,
}

/// Per-replica monotonic logical clock.
#[derive(Debug, Clone)]
pub struct LamportClock {
    replica: ReplicaId,
    counter: u64,
}

impl LamportClock {
    /// Create a clock for a fresh replica id.
    pub fn new() -> Self {
        Self::with_replica(Uuid::new_v4())
    }

    /// Create a clock for a known replica id.
    pub fn with_replica(replica: ReplicaId) -> Self {
        Self {
            replica,
            counter: 0,
        }
    }

    pub fn replica(&self) -> ReplicaId {
        self.replica
    }

    /// Advance the clock and return a stamp for a local write.
    pub fn tick(&mut self) -> WriteStamp {
        self.counter += 1;
        WriteStamp {
            counter: self.counter,
            replica: self.replica,
        }
    }

    /// Fold a remote stamp into the clock so subsequent local writes
    /// order after everything this replica has observed.
    pub fn observe(&mut self, stamp: WriteStamp) {
        if stamp.counter > self.counter {
            self.counter = stamp.counter;
        }
    }
}

impl Default for LamportClock {
    fn default() -> Self {
        Self::new()
    }
}

//! Fire-and-forget broadcast bus.
//!
//! Events are delivered unordered to every connected replica except the
//! sender, with no delivery or ordering guarantee; consumers must tolerate
//! loss and heal from current state. A subscription lives exactly as long as
//! its [`BusHandle`]: dropping the handle disconnects it, so a registration
//! is always paired with one release of the same identity.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

struct Inner<E> {
    inboxes: HashMap<u64, VecDeque<E>>,
    next_id: u64,
}

/// Shared broadcast bus. Clone handles out with [`EventBus::connect`].
pub struct EventBus<E> {
    inner: Arc<Mutex<Inner<E>>>,
}

impl<E: Clone> EventBus<E> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                inboxes: HashMap::new(),
                next_id: 0,
            })),
        }
    }

    /// Connect a replica to the bus. The returned handle owns the
    /// subscription; dropping it stops all delivery to this replica.
    pub fn connect(&self) -> BusHandle<E> {
        let mut inner = lock(&self.inner);
        let id = inner.next_id;
        inner.next_id += 1;
        inner.inboxes.insert(id, VecDeque::new());
        BusHandle {
            id,
            inner: Arc::clone(&self.inner),
        }
    }

    /// Number of connected handles.
    pub fn connections(&self) -> usize {
        lock(&self.inner).inboxes.len()
    }
}

impl<E: Clone> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Clone for EventBus<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// One replica's connection to an [`EventBus`].
pub struct BusHandle<E> {
    id: u64,
    inner: Arc<Mutex<Inner<E>>>,
}

impl<E: Clone> BusHandle<E> {
    /// Broadcast an event to every other connected replica.
    /// Fire-and-forget: there is no acknowledgement.
    pub fn broadcast(&self, event: E) {
        let mut inner = lock(&self.inner);
        let sender = self.id;
        for (&id, inbox) in inner.inboxes.iter_mut() {
            if id != sender {
                inbox.push_back(event.clone());
            }
        }
    }

    /// Take all pending events for this replica.
    pub fn drain(&self) -> Vec<E> {
        let mut inner = lock(&self.inner);
        match inner.inboxes.get_mut(&self.id) {
            Some(inbox) => inbox.drain(..).collect(),
            None => Vec::new(),
        }
    }

    /// Pending event count without draining.
    pub fn pending(&self) -> usize {
        lock(&self.inner)
            .inboxes
            .get(&self.id)
            .map_or(0, |inbox| inbox.len())
    }
}

impl<E> Drop for BusHandle<E> {
    fn drop(&mut self) {
        let mut inner = lock(&self.inner);
        inner.inboxes.remove(&self.id);
    }
}

fn lock<E>(inner: &Arc<Mutex<Inner<E>>>) -> MutexGuard<'_, Inner<E>> {
    match inner.lock() {
        Ok(guard) => guard,
        Err(poisoned) => {
            log::warn!("event bus lock poisoned, recovering");
            poisoned.into_inner()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_broadcast_skips_sender() {
        let bus: EventBus<u32> = EventBus::new();
        let a = bus.connect();
        let b = bus.connect();

        a.broadcast(7);
        assert_eq!(a.drain(), Vec::<u32>::new());
        assert_eq!(b.drain(), vec![7]);
    }

    #[test]
    fn test_drain_empties_inbox() {
        let bus: EventBus<u32> = EventBus::new();
        let a = bus.connect();
        let b = bus.connect();

        a.broadcast(1);
        a.broadcast(2);
        assert_eq!(b.drain(), vec![1, 2]);
        assert!(b.drain().is_empty());
    }

    #[test]
    fn test_drop_disconnects() {
        let bus: EventBus<u32> = EventBus::new();
        let a = bus.connect();
        let b = bus.connect();
        assert_eq!(bus.connections(), 2);

        drop(b);
        assert_eq!(bus.connections(), 1);

        // No delivery to the dropped handle, and no panic broadcasting.
        a.broadcast(9);
        assert_eq!(a.pending(), 0);
    }
}

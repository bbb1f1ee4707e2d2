//! Synchronous change notifications shared by every model.
//!
//! A model emits after releasing its own data lock, so listeners may read the
//! model that notified them. Listeners must not mutate that same model from inside
//! the callback.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

/// Handle returned by [`Signal::connect`], used to disconnect a listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotId(u64);

type Slot<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// A list of listeners called in connection order.
pub struct Signal<T = ()> {
    slots: Mutex<Vec<(SlotId, Slot<T>)>>,
    next_id: AtomicU64,
}

impl<T> Default for Signal<T> {
    fn default() -> Self {
        Self {
            slots: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }
}

impl<T> Signal<T> {
    pub fn connect(&self, listener: impl Fn(&T) + Send + Sync + 'static) -> SlotId {
        let id = SlotId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.slots.lock().push((id, Arc::new(listener)));
        id
    }

    /// Returns false if the slot was already gone.
    pub fn disconnect(&self, id: SlotId) -> bool {
        let mut slots = self.slots.lock();
        let before = slots.len();
        slots.retain(|(slot_id, _)| *slot_id != id);
        slots.len() != before
    }

    pub fn emit(&self, value: &T) {
        let snapshot: Vec<Slot<T>> = self
            .slots
            .lock()
            .iter()
            .map(|(_, slot)| Arc::clone(slot))
            .collect();

        for slot in snapshot {
            slot(value);
        }
    }

    pub fn len(&self) -> usize {
        self.slots.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.lock().is_empty()
    }
}

impl Signal<()> {
    pub fn notify(&self) {
        self.emit(&());
    }
}

impl<T> std::fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("listeners", &self.len())
            .finish()
    }
}

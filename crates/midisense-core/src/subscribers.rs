//! Ordered callback lists.
//!
//! Emission walks an immutable snapshot of the list while add/remove publish a
//! new one with arc-swap, so a callback may remove itself (or anything else)
//! while it is running. Removal takes effect from the next emission.

use arc_swap::ArcSwap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

pub type Callback<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Identifies one registration in a [`CallbackList`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CallbackId(u64);

pub struct CallbackList<T> {
    entries: ArcSwap<Vec<(CallbackId, Callback<T>)>>,
    next_id: AtomicU64,
}

impl<T> CallbackList<T> {
    pub fn new() -> Self {
        Self {
            entries: ArcSwap::from_pointee(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn add(&self, callback: Callback<T>) -> CallbackId {
        let id = CallbackId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.entries.rcu(|current| {
            let mut entries = Vec::with_capacity(current.len() + 1);
            entries.extend(current.iter().cloned());
            entries.push((id, Arc::clone(&callback)));
            entries
        });
        id
    }

    /// Returns `false` if `id` was not registered (or already removed).
    pub fn remove(&self, id: CallbackId) -> bool {
        let previous = self.entries.rcu(|current| {
            current
                .iter()
                .filter(|(entry_id, _)| *entry_id != id)
                .cloned()
                .collect::<Vec<_>>()
        });
        previous.iter().any(|(entry_id, _)| *entry_id == id)
    }

    pub fn clear(&self) {
        self.entries.store(Arc::new(Vec::new()));
    }

    /// Invoke every callback registered at the time of the call, in order.
    pub fn emit(&self, value: &T) {
        let snapshot = self.entries.load_full();
        for (_, callback) in snapshot.iter() {
            callback(value);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.load().is_empty()
    }
}

impl<T> Default for CallbackList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for CallbackList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackList")
            .field("len", &self.len())
            .finish()
    }
}

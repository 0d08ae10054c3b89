//! Observer registry for map updates.

use std::sync::Arc;

use parking_lot::Mutex;

/// Observer notified whenever the map's placement state changes.
///
/// Callbacks run synchronously on the mutating thread after the map has
/// released its grid lock, so implementations may query the map again.
pub trait MapListener: Send + Sync {
    /// Invoked once per structural update.
    fn on_map_update(&self);
}

impl<F> MapListener for F
where
    F: Fn() + Send + Sync,
{
    fn on_map_update(&self) {
        self()
    }
}

/// Handle returned on registration, used to unregister a listener.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

#[derive(Default)]
pub(crate) struct ListenerRegistry {
    inner: Mutex<Registrations>,
}

#[derive(Default)]
struct Registrations {
    next_id: u64,
    entries: Vec<(ListenerId, Arc<dyn MapListener>)>,
}

impl ListenerRegistry {
    pub(crate) fn register(&self, listener: Arc<dyn MapListener>) -> ListenerId {
        let mut inner = self.inner.lock();
        let id = ListenerId(inner.next_id);
        inner.next_id = inner.next_id.saturating_add(1);
        inner.entries.push((id, listener));
        id
    }

    pub(crate) fn unregister(&self, id: ListenerId) -> bool {
        let mut inner = self.inner.lock();
        let before = inner.entries.len();
        inner.entries.retain(|(entry, _)| *entry != id);
        inner.entries.len() != before
    }

    pub(crate) fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    /// Notifies every listener registered at the time of the call.
    ///
    /// The registry lock is released before any callback runs.
    pub(crate) fn notify(&self) {
        let listeners: Vec<Arc<dyn MapListener>> = self
            .inner
            .lock()
            .entries
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        for listener in listeners {
            listener.on_map_update();
        }
    }
}

impl std::fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("listeners", &self.len())
            .finish()
    }
}

//! Exclusive playback coordinator
//!
//! Keeps an explicit registry of live media handles and enforces the
//! site-wide rule that at most one of them plays at a time.

use crate::element::{MediaElement, MediaHandle, MediaId};
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use tracing::trace;

struct Entry {
    id: MediaId,
    handle: Weak<RefCell<dyn MediaElement>>,
}

/// Registry of the page's media elements
///
/// Holds weak references only: dropping the last handle to an element
/// (for example when a modal is removed) takes it out of every scan.
#[derive(Default)]
pub struct MediaRegistry {
    entries: RefCell<Vec<Entry>>,
    next_id: Cell<u64>,
}

impl MediaRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an element and return its identity
    pub fn register(&self, handle: &MediaHandle) -> MediaId {
        let id = MediaId::new(self.next_id.get());
        self.next_id.set(self.next_id.get() + 1);

        self.entries.borrow_mut().push(Entry {
            id,
            handle: Rc::downgrade(handle),
        });

        trace!(%id, "Registered media element");
        id
    }

    /// Remove an element from the registry
    pub fn unregister(&self, id: MediaId) {
        self.entries.borrow_mut().retain(|entry| entry.id != id);
    }

    /// Number of live registered elements
    pub fn len(&self) -> usize {
        self.live().len()
    }

    /// Whether no live element is registered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Pause every playing element except `keep`
    ///
    /// `None` pauses everything. Best effort: rejected pauses and elements
    /// that are busy elsewhere are skipped. Returns how many pause requests
    /// were accepted.
    pub fn pause_all_except(&self, keep: Option<MediaId>) -> usize {
        let mut paused = 0;

        for (id, handle) in self.live() {
            if Some(id) == keep {
                continue;
            }

            let Ok(mut element) = handle.try_borrow_mut() else {
                trace!(%id, "Skipping busy media element");
                continue;
            };

            if element.is_paused() {
                continue;
            }

            match element.pause() {
                Ok(()) => paused += 1,
                Err(e) => trace!(%id, error = %e, "Ignoring media element that refused to pause"),
            }
        }

        paused
    }

    /// Identities of the elements currently playing
    pub fn playing(&self) -> Vec<MediaId> {
        self.live()
            .into_iter()
            .filter(|(_, handle)| handle.try_borrow().is_ok_and(|el| !el.is_paused()))
            .map(|(id, _)| id)
            .collect()
    }

    /// Upgrade live entries, dropping dead ones
    fn live(&self) -> Vec<(MediaId, MediaHandle)> {
        let mut entries = self.entries.borrow_mut();
        entries.retain(|entry| entry.handle.strong_count() > 0);
        entries
            .iter()
            .filter_map(|entry| entry.handle.upgrade().map(|handle| (entry.id, handle)))
            .collect()
    }
}

// ABOUTME: Thread-safe handle to a pane tree.
// ABOUTME: One lock serializes every structural change, including closes raised by surfaces.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::content::{ContentEvent, PaneContent};
use crate::tree::{CloseOutcome, LayoutTree};

/// A pane tree shared between the thread driving the UI and the threads on
/// which hosted surfaces report that they closed.
pub struct SharedLayout<C> {
    inner: Arc<Mutex<LayoutTree<C>>>,
}

impl<C> Clone for SharedLayout<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C: PaneContent> SharedLayout<C> {
    pub fn new(tree: LayoutTree<C>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(tree)),
        }
    }

    /// Exclusive access to the tree. A panic on another thread while holding
    /// the lock does not make the tree unusable.
    pub fn lock(&self) -> MutexGuard<'_, LayoutTree<C>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Deliver a surface notification. Safe to call from any thread; a close
    /// for a pane that is already gone is a no-op reported as `Stale`.
    pub fn notify(&self, event: ContentEvent) -> Option<CloseOutcome> {
        self.lock().handle_content_event(event)
    }
}

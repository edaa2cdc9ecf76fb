// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Coverage-changed notifications.
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use understory_scratch::event::CoverageListeners;
//!
//! let seen = Rc::new(Cell::new(None));
//! let mut listeners = CoverageListeners::new();
//! let sink = Rc::clone(&seen);
//! let id = listeners.add(move |percent| sink.set(Some(percent)));
//!
//! listeners.emit(10);
//! assert_eq!(seen.get(), Some(10));
//!
//! assert!(listeners.remove(id));
//! assert!(listeners.is_empty());
//! ```

use alloc::boxed::Box;
use alloc::collections::VecDeque;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt;

/// Name of the notification emitted when the revealed percentage changes.
pub const PERCENTAGE_UPDATE_EVENT: &str = "percentage-update";

/// Handle returned by [`CoverageListeners::add`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(u8)>;

/// Registered receivers of coverage notifications.
///
/// Listeners are called synchronously in registration order, each exactly
/// once per [`emit`](Self::emit).
#[derive(Default)]
pub struct CoverageListeners {
    next_id: u64,
    entries: Vec<(ListenerId, Listener)>,
}

impl fmt::Debug for CoverageListeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CoverageListeners")
            .field("len", &self.entries.len())
            .finish_non_exhaustive()
    }
}

impl CoverageListeners {
    /// Creates an empty listener list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `listener` and returns a handle for removing it.
    pub fn add(&mut self, listener: impl FnMut(u8) + 'static) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, Box::new(listener)));
        id
    }

    /// Removes a listener. Returns `true` if it was registered.
    pub fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry, _)| *entry != id);
        self.entries.len() != before
    }

    /// Delivers `percent` to every listener.
    pub fn emit(&mut self, percent: u8) {
        for (_, listener) in &mut self.entries {
            listener(percent);
        }
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no listener is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A shared queue of coverage notifications awaiting delivery.
///
/// Hosts that keep the card behind a `RefCell` register a listener that only
/// [`push`](Self::push)es, then deliver with [`pop`](Self::pop) once the card
/// is no longer borrowed. Handlers may then call back into the card, and
/// whatever they report is queued behind the current notification.
///
/// ```
/// use std::cell::RefCell;
/// use understory_scratch::event::{CoverageListeners, DeferredCoverage};
///
/// let pending = DeferredCoverage::new();
/// let listeners = RefCell::new(CoverageListeners::new());
/// let sink = pending.clone();
/// listeners.borrow_mut().add(move |percent| sink.push(percent));
///
/// listeners.borrow_mut().emit(40);
/// // The borrow is released; a handler could now reach `listeners` again.
/// assert_eq!(pending.pop(), Some(40));
/// assert_eq!(pending.pop(), None);
/// ```
#[derive(Clone, Debug, Default)]
pub struct DeferredCoverage {
    pending: Rc<RefCell<VecDeque<u8>>>,
}

impl DeferredCoverage {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `percent` behind any pending notification.
    pub fn push(&self, percent: u8) {
        self.pending.borrow_mut().push_back(percent);
    }

    /// Takes the oldest pending notification.
    ///
    /// The queue is not borrowed once this returns, so the caller may deliver
    /// the value to code that pushes again.
    pub fn pop(&self) -> Option<u8> {
        self.pending.borrow_mut().pop_front()
    }

    /// Number of pending notifications.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Whether nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.borrow().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Rc;
    use alloc::vec;
    use core::cell::RefCell;

    #[test]
    fn every_listener_receives_each_emit_once() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut listeners = CoverageListeners::new();
        for tag in 0..3_u8 {
            let log = Rc::clone(&log);
            listeners.add(move |percent| log.borrow_mut().push((tag, percent)));
        }

        listeners.emit(10);

        assert_eq!(*log.borrow(), vec![(0, 10), (1, 10), (2, 10)]);
    }

    #[test]
    fn removed_listeners_are_not_called() {
        let hits = Rc::new(RefCell::new(0));
        let mut listeners = CoverageListeners::new();
        let counter = Rc::clone(&hits);
        let id = listeners.add(move |_| *counter.borrow_mut() += 1);

        assert!(listeners.remove(id));
        assert!(!listeners.remove(id));
        listeners.emit(42);

        assert_eq!(*hits.borrow(), 0);
    }

    #[test]
    fn deferred_notifications_pop_in_order_across_clones() {
        let pending = DeferredCoverage::new();
        let sink = pending.clone();
        sink.push(0);
        sink.push(35);

        assert_eq!(pending.len(), 2);
        assert_eq!(pending.pop(), Some(0));
        // Pushing while draining lands behind what is already queued.
        sink.push(100);
        assert_eq!(pending.pop(), Some(35));
        assert_eq!(pending.pop(), Some(100));
        assert!(pending.is_empty());
    }

    #[test]
    fn ids_are_not_reused() {
        let mut listeners = CoverageListeners::new();
        let a = listeners.add(|_| {});
        listeners.remove(a);
        let b = listeners.add(|_| {});
        assert_ne!(a, b);
        assert_eq!(listeners.len(), 1);
    }
}

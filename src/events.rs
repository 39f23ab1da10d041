//! Observer fan-out
//!
//! Observers hear about offset changes, state changes, open/close
//! transitions, releases, content swaps, and layout changes. Broadcasts are
//! synchronous, on the calling thread, in registration order, but order
//! carries no priority and subscribers must not rely on it.
//!
//! The registry snapshots the subscriber list before each broadcast and
//! defers registration changes made from inside a callback until the
//! broadcast completes, so a subscriber may remove itself (or add another)
//! without tripping over the iteration.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::detent::DetentSet;

/// Where the panel currently sits: resting at a detent, or tracking a
/// gesture / animation in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelPosition<D: DetentSet> {
    Stable(D),
    Scrolling,
}

impl<D: DetentSet> PanelPosition<D> {
    pub fn is_stable(&self) -> bool {
        matches!(self, PanelPosition::Stable(_))
    }
}

/// Identifies a piece of hosted content across swaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentId(pub u32);

/// Notifications about the state of a panel.
#[allow(unused_variables)]
pub trait PanelObserver<D: DetentSet> {
    /// The panel left its lowest detent (any height above resting).
    fn on_opened(&mut self) {}

    /// The panel returned to its lowest detent.
    fn on_closed(&mut self) {}

    /// The user let go of the panel; it is now settling on its own.
    fn on_released(&mut self) {}

    /// The continuous offset moved. `fraction` is the clamped position
    /// between the lowest and highest detents (0.0 resting, 1.0 fully open).
    fn on_offset_changed(&mut self, offset: f64, fraction: f64) {}

    /// Progress of the transition from the lowest detent to the next one.
    /// Guaranteed to be delivered with exactly 1.0 once the panel moves past
    /// that range, and 0.0 back at rest.
    fn on_peek_transition(&mut self, fraction: f64) {}

    fn on_state_changed(&mut self, position: PanelPosition<D>) {}

    fn on_content_changed(&mut self, content: ContentId) {}

    /// Layout pass finished. `container_height` is the window height minus
    /// the keyboard inset.
    fn on_layout_changed(&mut self, window_height: f64, container_height: f64) {}
}

pub type SharedObserver<D> = Rc<RefCell<dyn PanelObserver<D>>>;

/// Handle for unregistering an observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObserverId(u64);

enum PendingOp<D: DetentSet> {
    Add(ObserverId, SharedObserver<D>),
    Remove(ObserverId),
}

/// Multi-subscriber broadcast with deferred registration changes.
pub struct ObserverRegistry<D: DetentSet> {
    entries: RefCell<Vec<(ObserverId, SharedObserver<D>)>>,
    pending: RefCell<Vec<PendingOp<D>>>,
    broadcast_depth: Cell<usize>,
    next_id: Cell<u64>,
}

impl<D: DetentSet> ObserverRegistry<D> {
    pub fn new() -> Self {
        Self {
            entries: RefCell::new(Vec::new()),
            pending: RefCell::new(Vec::new()),
            broadcast_depth: Cell::new(0),
            next_id: Cell::new(0),
        }
    }

    pub fn add(&self, observer: SharedObserver<D>) -> ObserverId {
        let id = ObserverId(self.next_id.get());
        self.next_id.set(self.next_id.get() + 1);
        if self.broadcast_depth.get() > 0 {
            self.pending.borrow_mut().push(PendingOp::Add(id, observer));
        } else {
            self.entries.borrow_mut().push((id, observer));
        }
        id
    }

    /// Unregister. Unknown ids are ignored.
    pub fn remove(&self, id: ObserverId) {
        if self.broadcast_depth.get() > 0 {
            self.pending.borrow_mut().push(PendingOp::Remove(id));
        } else {
            self.entries.borrow_mut().retain(|(eid, _)| *eid != id);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Invoke `f` on every observer registered at the start of the call.
    pub fn notify(&self, mut f: impl FnMut(&mut dyn PanelObserver<D>)) {
        let snapshot: Vec<SharedObserver<D>> = self
            .entries
            .borrow()
            .iter()
            .map(|(_, obs)| Rc::clone(obs))
            .collect();

        self.broadcast_depth.set(self.broadcast_depth.get() + 1);
        for observer in &snapshot {
            f(&mut *observer.borrow_mut());
        }
        self.broadcast_depth.set(self.broadcast_depth.get() - 1);

        if self.broadcast_depth.get() == 0 {
            self.flush_pending();
        }
    }

    fn flush_pending(&self) {
        let ops: Vec<PendingOp<D>> = self.pending.borrow_mut().drain(..).collect();
        let mut entries = self.entries.borrow_mut();
        for op in ops {
            match op {
                PendingOp::Add(id, obs) => entries.push((id, obs)),
                PendingOp::Remove(id) => entries.retain(|(eid, _)| *eid != id),
            }
        }
    }
}

impl<D: DetentSet> Default for ObserverRegistry<D> {
    fn default() -> Self {
        Self::new()
    }
}

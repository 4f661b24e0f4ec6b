//! Single-threaded change-event primitive.
//!
//! Columns and filters expose explicit mutable fields plus explicit change
//! events; consumers subscribe directly instead of going through a global
//! property-change dispatch table. Handlers run synchronously on the owning
//! thread in subscription order.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// Identifies one subscribed handler so it can be detached later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(u64);

/// A synchronous multicast event.
///
/// `emit` iterates a snapshot of the handler list, so handlers may
/// subscribe or unsubscribe (including themselves) while the event fires
/// without invalidating the iteration.
pub struct Event<T> {
    handlers: RefCell<Vec<(HandlerId, Rc<dyn Fn(&T)>)>>,
    next_id: Cell<u64>,
}

impl<T> Event<T> {
    /// Create an event with no subscribers.
    pub fn new() -> Self {
        Self {
            handlers: RefCell::new(Vec::new()),
            next_id: Cell::new(0),
        }
    }

    /// Attach a handler; returns the id used to detach it.
    pub fn subscribe(&self, handler: impl Fn(&T) + 'static) -> HandlerId {
        let id = HandlerId(self.next_id.get());
        self.next_id.set(self.next_id.get() + 1);
        self.handlers.borrow_mut().push((id, Rc::new(handler)));
        id
    }

    /// Detach a handler. Returns `false` if the id was already detached.
    pub fn unsubscribe(&self, id: HandlerId) -> bool {
        let mut handlers = self.handlers.borrow_mut();
        let before = handlers.len();
        handlers.retain(|(handler_id, _)| *handler_id != id);
        handlers.len() != before
    }

    /// Invoke every handler subscribed at the time of the call.
    pub fn emit(&self, value: &T) {
        // Snapshot before invoking: a handler may mutate the subscription
        // list mid-emit.
        let snapshot: Vec<Rc<dyn Fn(&T)>> = self
            .handlers
            .borrow()
            .iter()
            .map(|(_, handler)| Rc::clone(handler))
            .collect();
        for handler in snapshot {
            handler(value);
        }
    }

    /// Number of attached handlers.
    pub fn handler_count(&self) -> usize {
        self.handlers.borrow().len()
    }
}

impl<T> Default for Event<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Event<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("handlers", &self.handler_count())
            .finish()
    }
}

//! Synchronous subscription lists for attribute and modifier notifications

use std::fmt;

/// Handle returned by `subscribe`, used to detach the handler again
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(usize);

/// Ordered list of boxed handlers of type `H`, usually a `dyn FnMut(..)`
///
/// Handlers run synchronously in registration order. A handler must not
/// mutate the object that is notifying it.
pub struct Listeners<H: ?Sized> {
    handlers: Vec<(SubscriptionId, Box<H>)>,
    next_id: usize,
}

impl<H: ?Sized> Listeners<H> {
    pub fn new() -> Self {
        Listeners {
            handlers: Vec::new(),
            next_id: 0,
        }
    }

    /// Register a handler
    pub fn subscribe(&mut self, handler: Box<H>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.handlers.push((id, handler));
        id
    }

    /// Remove a handler, returning whether it was registered
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(handler_id, _)| *handler_id != id);
        self.handlers.len() != before
    }

    /// Invoke `call` on every handler in registration order
    pub fn notify(&mut self, mut call: impl FnMut(&mut H)) {
        for (_, handler) in self.handlers.iter_mut() {
            call(handler);
        }
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Move the handlers out, leaving an empty list that keeps issuing fresh ids
    ///
    /// Used to notify with `&self` while the list is a field of `self`.
    pub(crate) fn take(&mut self) -> Self {
        Listeners {
            handlers: std::mem::take(&mut self.handlers),
            next_id: self.next_id,
        }
    }

    /// Put handlers taken with [`Listeners::take`] back in front of any added meanwhile
    pub(crate) fn restore(&mut self, mut taken: Self) {
        taken.handlers.append(&mut self.handlers);
        self.handlers = taken.handlers;
        self.next_id = self.next_id.max(taken.next_id);
    }
}

impl<H: ?Sized> Default for Listeners<H> {
    fn default() -> Self {
        Self::new()
    }
}

/// Subscriptions belong to one instance and are not carried over by `clone`
impl<H: ?Sized> Clone for Listeners<H> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<H: ?Sized> fmt::Debug for Listeners<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

//! Single-slot value which may be requested before or after it is bound.

use std::{cell::RefCell, fmt, mem};

use futures::{
    channel::oneshot,
    future::{self, LocalBoxFuture},
    FutureExt as _, TryFutureExt as _,
};

use crate::error::{Error, Result};

struct Inner<T> {
    /// Latest bound value.
    value: Option<T>,

    /// Requests made before the first bind.
    waiters: Vec<oneshot::Sender<T>>,
}

/// Slot for a value produced on a schedule independent from its consumers.
///
/// Requests issued before the first [`Deferred::set`] are all resolved with
/// the value of that first bind. Requests issued afterwards resolve with
/// whatever the slot holds at the moment of the request.
///
/// Resolution never happens inside [`Deferred::set`]: it only completes the
/// pending handles, and their continuations run once the executor polls
/// them.
pub struct Deferred<T>(RefCell<Inner<T>>);

impl<T> Deferred<T> {
    /// Creates an empty [`Deferred`].
    pub fn new() -> Self {
        Self(RefCell::new(Inner {
            value: None,
            waiters: Vec::new(),
        }))
    }

    /// Indicates whether some value was ever bound.
    pub fn is_set(&self) -> bool {
        self.0.borrow().value.is_some()
    }

    /// Returns number of requests still waiting for the first bind.
    pub fn waiters_count(&self) -> usize {
        self.0
            .borrow()
            .waiters
            .iter()
            .filter(|w| !w.is_canceled())
            .count()
    }
}

impl<T> Deferred<T>
where
    T: Clone + 'static,
{
    /// Returns the currently bound value, if any.
    pub fn current(&self) -> Option<T> {
        self.0.borrow().value.clone()
    }

    /// Requests the value.
    ///
    /// The returned future resolves with the current value if the slot is
    /// already bound, or with the first bound value otherwise. It errors
    /// only if this [`Deferred`] is dropped before anything was bound.
    pub fn get(&self) -> LocalBoxFuture<'static, Result<T>> {
        let mut inner = self.0.borrow_mut();
        if let Some(value) = inner.value.clone() {
            return future::ok(value).boxed_local();
        }

        inner.waiters.retain(|w| !w.is_canceled());
        let (tx, rx) = oneshot::channel();
        inner.waiters.push(tx);

        rx.map_err(|_| Error::TransceiverDropped).boxed_local()
    }

    /// Binds `value`, overwriting the previous one, and resolves all pending
    /// requests with it.
    pub fn set(&self, value: T) -> &Self {
        let waiters = {
            let mut inner = self.0.borrow_mut();
            inner.value = Some(value.clone());
            mem::take(&mut inner.waiters)
        };

        for waiter in waiters {
            // Receiver is gone, nobody to resolve.
            let _ = waiter.send(value.clone());
        }

        self
    }
}

impl<T> Default for Deferred<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for Deferred<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.0.borrow();
        f.debug_struct("Deferred")
            .field("value", &inner.value)
            .field("waiters", &inner.waiters.len())
            .finish()
    }
}

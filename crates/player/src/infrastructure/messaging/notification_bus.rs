//! Notification bus for action outcomes.
//!
//! Two independent channels: state deltas and error signals. Observers are
//! invoked in registration order. The observer list is snapshotted before
//! delivery, so observers may subscribe or unsubscribe (themselves included)
//! from inside a callback; changes take effect on the next publish.

use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex};

use underworld_domain::StateDelta;

use crate::ports::inbound::{ErrorObserver, ErrorSignal, StateObserver};

/// Ordered, duplicate-free list of observers compared by `Arc` identity.
struct Registry<T: ?Sized> {
    observers: Mutex<Vec<Arc<T>>>,
}

impl<T: ?Sized> Registry<T> {
    fn new() -> Self {
        Self {
            observers: Mutex::new(Vec::new()),
        }
    }

    fn add(&self, observer: Arc<T>) -> bool {
        let mut observers = self.observers.lock().unwrap_or_else(|p| p.into_inner());
        if observers.iter().any(|existing| same_observer(existing, &observer)) {
            return false;
        }
        observers.push(observer);
        true
    }

    fn remove(&self, observer: &Arc<T>) -> bool {
        let mut observers = self.observers.lock().unwrap_or_else(|p| p.into_inner());
        let before = observers.len();
        observers.retain(|existing| !same_observer(existing, observer));
        observers.len() != before
    }

    fn snapshot(&self) -> Vec<Arc<T>> {
        self.observers
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }

    fn len(&self) -> usize {
        self.observers
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .len()
    }

    fn clear(&self) {
        self.observers
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clear();
    }
}

// Compare data pointers only; vtable pointers for the same type may differ
// between codegen units.
fn same_observer<T: ?Sized>(a: &Arc<T>, b: &Arc<T>) -> bool {
    std::ptr::eq(Arc::as_ptr(a) as *const (), Arc::as_ptr(b) as *const ())
}

/// Publish/subscribe hub between the action dispatcher and the UI.
///
/// Cloning is cheap; clones share the same observer lists.
#[derive(Clone)]
pub struct NotificationBus {
    state: Arc<Registry<dyn StateObserver>>,
    errors: Arc<Registry<dyn ErrorObserver>>,
}

impl NotificationBus {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Registry::new()),
            errors: Arc::new(Registry::new()),
        }
    }

    /// Register a state observer. Returns `false` if it was already registered.
    pub fn subscribe_to_state_deltas(&self, observer: Arc<dyn StateObserver>) -> bool {
        self.state.add(observer)
    }

    /// Remove a state observer. Returns `false` if it was not registered.
    pub fn unsubscribe_from_state_deltas(&self, observer: &Arc<dyn StateObserver>) -> bool {
        self.state.remove(observer)
    }

    pub fn subscribe_to_errors(&self, observer: Arc<dyn ErrorObserver>) -> bool {
        self.errors.add(observer)
    }

    pub fn unsubscribe_from_errors(&self, observer: &Arc<dyn ErrorObserver>) -> bool {
        self.errors.remove(observer)
    }

    /// Deliver a delta to every state observer registered right now.
    ///
    /// A panicking observer is logged and skipped; the rest still run.
    pub fn publish_state_delta(&self, delta: &StateDelta) {
        for observer in self.state.snapshot() {
            let delivered =
                panic::catch_unwind(AssertUnwindSafe(|| observer.on_state_delta(delta)));
            if delivered.is_err() {
                tracing::warn!(
                    events = delta.events.len(),
                    "State observer panicked; continuing with remaining observers"
                );
            }
        }
    }

    /// Deliver an error signal to every error observer registered right now.
    pub fn publish_error(&self, signal: &ErrorSignal) {
        for observer in self.errors.snapshot() {
            let delivered = panic::catch_unwind(AssertUnwindSafe(|| observer.on_error(signal)));
            if delivered.is_err() {
                tracing::warn!(
                    code = ?signal.code,
                    "Error observer panicked; continuing with remaining observers"
                );
            }
        }
    }

    pub fn state_observer_count(&self) -> usize {
        self.state.len()
    }

    pub fn error_observer_count(&self) -> usize {
        self.errors.len()
    }

    /// Drop every observer on both channels.
    pub fn clear(&self) {
        self.state.clear();
        self.errors.clear();
    }
}

impl Default for NotificationBus {
    fn default() -> Self {
        Self::new()
    }
}

//! Tracking event hub.
//!
//! Stand-in for the AR engine's per-observer status callbacks. Listeners
//! are registered with [`TrackingHub::subscribe`] and stay registered for
//! exactly as long as the returned [`Subscription`] lives.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use tracing::{debug, warn};

use crate::types::TrackingStatus;

/// A status change for one observed target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetStatusEvent {
    pub target_id: String,
    pub status: TrackingStatus,
}

impl TargetStatusEvent {
    pub fn new(target_id: impl Into<String>, status: TrackingStatus) -> Self {
        Self {
            target_id: target_id.into(),
            status,
        }
    }
}

impl fmt::Display for TargetStatusEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.target_id, self.status)
    }
}

type Listener = Rc<RefCell<dyn FnMut(&TargetStatusEvent)>>;

#[derive(Default)]
struct HubInner {
    next_id: u64,
    listeners: Vec<(u64, Listener)>,
}

/// Single-threaded fan-out of tracking events.
#[derive(Default, Clone)]
pub struct TrackingHub {
    inner: Rc<RefCell<HubInner>>,
}

impl TrackingHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener. It is removed when the returned handle is
    /// dropped or cancelled.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: FnMut(&TargetStatusEvent) + 'static,
    {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.listeners.push((id, Rc::new(RefCell::new(listener))));
        debug!(subscription = id, listeners = inner.listeners.len(), "Listener subscribed");

        Subscription {
            id,
            hub: Rc::downgrade(&self.inner),
        }
    }

    /// Deliver an event to every current listener. Returns how many
    /// listeners received it.
    pub fn publish(&self, event: &TargetStatusEvent) -> usize {
        // Snapshot so listeners may subscribe or unsubscribe while we deliver.
        let listeners: Vec<(u64, Listener)> = self.inner.borrow().listeners.clone();

        let mut delivered = 0;
        for (id, listener) in listeners {
            match listener.try_borrow_mut() {
                Ok(mut callback) => {
                    (&mut *callback)(event);
                    delivered += 1;
                }
                Err(_) => {
                    warn!(subscription = id, %event, "Listener busy, event skipped");
                }
            }
        }
        delivered
    }

    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }
}

/// Registration handle returned by [`TrackingHub::subscribe`].
#[must_use = "dropping a Subscription unsubscribes the listener immediately"]
pub struct Subscription {
    id: u64,
    hub: Weak<RefCell<HubInner>>,
}

impl Subscription {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Whether the hub still exists and still holds this listener.
    pub fn is_active(&self) -> bool {
        self.hub
            .upgrade()
            .map(|inner| inner.borrow().listeners.iter().any(|(id, _)| *id == self.id))
            .unwrap_or(false)
    }

    /// Unsubscribe explicitly. Equivalent to dropping the handle.
    pub fn cancel(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.hub.upgrade() {
            if let Ok(mut inner) = inner.try_borrow_mut() {
                inner.listeners.retain(|(id, _)| *id != self.id);
                debug!(subscription = self.id, "Listener unsubscribed");
            } else {
                warn!(subscription = self.id, "Hub busy while unsubscribing");
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Publish/subscribe channel for live risk alerts, keyed by user id.
//!
//! Subscriptions own their cancellation instead of borrowing a UI lifecycle:
//! dropping the handle or calling [`AlertSubscription::cancel`] releases the
//! underlying slot, and cancellation is synchronous and idempotent.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use super::domain::{RiskAlert, UserId};

type AlertCallback = Arc<dyn Fn(&RiskAlert) + Send + Sync>;

struct BusInner {
    subscribers: Mutex<HashMap<String, HashMap<u64, AlertCallback>>>,
    next_id: AtomicU64,
}

/// In-process alert bus. Cloning shares the underlying subscriber table.
#[derive(Clone)]
pub struct AlertBus {
    inner: Arc<BusInner>,
}

impl Default for AlertBus {
    fn default() -> Self {
        Self {
            inner: Arc::new(BusInner {
                subscribers: Mutex::new(HashMap::new()),
                next_id: AtomicU64::new(1),
            }),
        }
    }
}

impl AlertBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` for alerts addressed to `user`. The returned
    /// handle stops delivery when cancelled or dropped.
    pub fn subscribe(
        &self,
        user: &UserId,
        callback: impl Fn(&RiskAlert) + Send + Sync + 'static,
    ) -> AlertSubscription {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let mut subscribers = self
            .inner
            .subscribers
            .lock()
            .expect("alert mutex poisoned");
        subscribers
            .entry(user.0.clone())
            .or_default()
            .insert(id, Arc::new(callback));

        AlertSubscription {
            bus: Arc::clone(&self.inner),
            user: user.0.clone(),
            id,
            active: AtomicBool::new(true),
        }
    }

    /// Deliver `alert` to every live subscriber for `user`. Exactly one
    /// invocation per subscriber per call.
    pub fn publish(&self, user: &UserId, alert: &RiskAlert) {
        // Callbacks run outside the lock so a callback may subscribe or
        // cancel without deadlocking.
        let callbacks: Vec<AlertCallback> = {
            let subscribers = self
                .inner
                .subscribers
                .lock()
                .expect("alert mutex poisoned");
            subscribers
                .get(user.as_str())
                .map(|entries| entries.values().cloned().collect())
                .unwrap_or_default()
        };

        for callback in callbacks {
            callback(alert);
        }
    }

    #[cfg(test)]
    pub(crate) fn subscriber_count(&self, user: &UserId) -> usize {
        let subscribers = self
            .inner
            .subscribers
            .lock()
            .expect("alert mutex poisoned");
        subscribers
            .get(user.as_str())
            .map(|entries| entries.len())
            .unwrap_or(0)
    }
}

/// Handle owning one subscription slot on the bus.
pub struct AlertSubscription {
    bus: Arc<BusInner>,
    user: String,
    id: u64,
    active: AtomicBool,
}

impl AlertSubscription {
    /// Stop delivery and release the slot. Safe to call more than once.
    pub fn cancel(&self) {
        if !self.active.swap(false, Ordering::AcqRel) {
            return;
        }
        let mut subscribers = self.bus.subscribers.lock().expect("alert mutex poisoned");
        if let Some(entries) = subscribers.get_mut(&self.user) {
            entries.remove(&self.id);
            if entries.is_empty() {
                subscribers.remove(&self.user);
            }
        }
    }
}

impl Drop for AlertSubscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

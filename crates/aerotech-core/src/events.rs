// Refresh bus: "shared data changed, re-read yours".
//
// A payload-free broadcast with an explicit listener registry. Views
// subscribe when they mount and hold the returned `Subscription`; dropping
// it deregisters the listener. `notify` calls every live listener
// synchronously, in registration order. Listeners are expected to kick off
// their own async refetch and return immediately.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, warn};

type Listener = Arc<dyn Fn() -> anyhow::Result<()> + Send + Sync>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    listeners: Vec<(u64, &'static str, Listener)>,
}

/// Process-wide refresh signal. Cheap to clone; clones share listeners.
#[derive(Clone, Default)]
pub struct RefreshBus {
    registry: Arc<Mutex<Registry>>,
}

impl RefreshBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener` under a name used in logs. Delivery stops when the
    /// returned guard is dropped.
    pub fn subscribe<F>(&self, name: &'static str, listener: F) -> Subscription
    where
        F: Fn() -> anyhow::Result<()> + Send + Sync + 'static,
    {
        let mut registry = self.registry.lock();
        let id = registry.next_id;
        registry.next_id += 1;
        registry.listeners.push((id, name, Arc::new(listener)));
        debug!("Refresh listener '{}' subscribed (id {})", name, id);

        Subscription {
            id,
            name,
            registry: Arc::clone(&self.registry),
        }
    }

    /// Signal every registered listener once.
    ///
    /// The registry lock is released before listeners run, so a listener may
    /// subscribe or drop subscriptions without deadlocking. A listener error
    /// is logged and does not stop delivery to the rest.
    pub fn notify(&self) {
        let snapshot: Vec<(&'static str, Listener)> = self
            .registry
            .lock()
            .listeners
            .iter()
            .map(|(_, name, listener)| (*name, Arc::clone(listener)))
            .collect();

        debug!("Refresh signal published to {} listener(s)", snapshot.len());

        for (name, listener) in snapshot {
            if let Err(e) = listener() {
                warn!("Refresh listener '{}' failed: {:#}", name, e);
            }
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.registry.lock().listeners.len()
    }
}

impl fmt::Debug for RefreshBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefreshBus")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

/// Scoped registration on a [`RefreshBus`]. Deregisters on drop.
#[must_use = "dropping a Subscription immediately unsubscribes the listener"]
pub struct Subscription {
    id: u64,
    name: &'static str,
    registry: Arc<Mutex<Registry>>,
}

impl Subscription {
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.registry.lock().listeners.retain(|(id, _, _)| *id != self.id);
        debug!("Refresh listener '{}' unsubscribed (id {})", self.name, self.id);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

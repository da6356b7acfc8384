//! # Broadcast bus
//!
//! Name-keyed observer registry that delivers [Envelopes](crate::envelope::Envelope)
//! synchronously, on the posting thread.
//!
//! Handlers are invoked in registration order, but callers must not rely on it.
//! No lock is held while handlers run, so a handler may post, register or
//! remove observers on the same bus. Registrations made during a delivery
//! do not receive that delivery.

use crate::{
    common::Lazy,
    envelope::Envelope,
    name::NotificationName,
    notification::AppNotification,
};
use parking_lot::RwLock;
use std::{any::Any, sync::Arc};
use tracing::{debug, trace, warn};

mod observer;
mod registry;
mod subscription;


pub use observer::*;
pub use subscription::*;

use registry::{Callback, Registration, Registry};

static SHARED: Lazy<Bus> = Lazy::new(Bus::new);

/// Runtime options of a [Bus]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BusConfig {
    /// Warn when a name receives a payload type
    /// that differs from the first payload type posted under it
    pub warn_on_name_collision: bool,
    /// Warn when a post reaches no observer
    pub warn_on_unobserved: bool,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            warn_on_name_collision: true,
            warn_on_unobserved: false,
        }
    }
}

/// Process-local broadcast bus
///
/// Cloning gives another handle to the same registry.
#[derive(Clone)]
pub struct Bus {
    shared: Arc<Shared>,
}

pub(crate) struct Shared {
    config: BusConfig,
    registry: RwLock<Registry>,
}

impl Bus {
    /// Creates an empty bus with default options
    pub fn new() -> Self {
        Self::with_config(BusConfig::default())
    }

    /// Creates an empty bus
    pub fn with_config(config: BusConfig) -> Self {
        Self {
            shared: Arc::new(Shared {
                config,
                registry: RwLock::new(Registry::default()),
            }),
        }
    }

    /// Process-wide bus, created on first use
    ///
    /// Prefer passing an explicitly created bus to the components that need it,
    /// this one is for applications that really want a single global bus.
    pub fn shared() -> &'static Bus {
        &SHARED
    }

    /// Options of this bus
    pub fn config(&self) -> &BusConfig {
        &self.shared.config
    }

    /// Registers `handler` for every notification posted under `name`
    ///
    /// Registrations are additive: registering the same observer twice
    /// leads to two invocations per post.
    /// The registration lives until it is removed or `observer` is dropped.
    pub fn add_observer<F>(&self, observer: &Observer, name: impl Into<NotificationName>, handler: F)
    where
        F: Fn(&Envelope) + Send + Sync + 'static,
    {
        let name = name.into();
        trace!(%name, observer = ?observer.id(), "add observer");
        observer.attach(&self.shared);
        self.shared
            .registry
            .write()
            .insert(name, observer, Callback::Handler(Arc::new(handler)));
    }

    /// Removes every registration of `observer`, returns how many were removed
    pub fn remove_observer(&self, observer: &Observer) -> usize {
        let removed = self.shared.registry.write().remove(observer.id(), None);
        let removed = count_removed(observer.id(), removed);
        trace!(observer = ?observer.id(), removed, "remove observer");
        removed
    }

    /// Removes registrations of `observer` under `name`, returns how many were removed
    pub fn remove_observer_for(&self, observer: &Observer, name: &NotificationName) -> usize {
        let removed = self
            .shared
            .registry
            .write()
            .remove(observer.id(), Some(name));
        let removed = count_removed(observer.id(), removed);
        trace!(%name, observer = ?observer.id(), removed, "remove observer");
        removed
    }

    /// Number of live registrations under `name`
    pub fn observer_count(&self, name: &NotificationName) -> usize {
        self.shared.registry.read().live_count(name)
    }

    /// Posts an untyped payload under `name`, returns the number of deliveries
    pub fn post<P>(&self, name: impl Into<NotificationName>, payload: P) -> usize
    where
        P: Any + Send + Sync,
    {
        self.post_envelope(Envelope::new(name.into(), payload))
    }

    /// Delivers `envelope` to every live registration under its name
    /// before returning, returns the number of deliveries
    ///
    /// With [warn_on_name_collision](BusConfig::warn_on_name_collision) set,
    /// warns when an observed name gets a payload type that differs from
    /// the first one posted to its current registrations
    pub fn post_envelope(&self, envelope: Envelope) -> usize {
        let targets = {
            let registry = self.shared.registry.read();
            if self.shared.config.warn_on_name_collision {
                let first = registry.check_payload_type(
                    envelope.name(),
                    envelope.payload_type_id(),
                    envelope.payload_type_name(),
                );
                if let Some(first) = first {
                    warn!(
                        name = %envelope.name(),
                        first,
                        posted = envelope.payload_type_name(),
                        "notification name is shared by different payload types"
                    );
                }
            }
            registry.targets(envelope.name())
        };
        if targets.has_stale {
            let pruned = self.shared.registry.write().prune(envelope.name());
            trace!(name = %envelope.name(), pruned = pruned.len(), "prune stale observers");
        }

        let envelope = Arc::new(envelope);
        let mut delivered = 0;
        for callback in targets.callbacks {
            match callback {
                Callback::Handler(handler) => {
                    handler(envelope.as_ref());
                    delivered += 1;
                }
                Callback::Channel(sender) => {
                    if sender.send(Arc::clone(&envelope)).is_ok() {
                        delivered += 1;
                    }
                }
            }
        }

        if delivered == 0 && self.shared.config.warn_on_unobserved {
            warn!(name = %envelope.name(), "notification has no observers");
        }
        debug!(name = %envelope.name(), delivered, "notification posted");
        delivered
    }

    /// Subscribes to `N` through a channel instead of a handler
    pub fn subscribe<N: AppNotification>(&self) -> Subscription<N> {
        let observer = Observer::new();
        let (sender, receiver) = tokio::sync::mpsc::unbounded_channel();
        let name = N::name();
        trace!(%name, observer = ?observer.id(), "subscribe");
        observer.attach(&self.shared);
        self.shared
            .registry
            .write()
            .insert(name, &observer, Callback::Channel(sender));
        Subscription::new(Arc::downgrade(&self.shared), observer, receiver)
    }
}

impl Default for Bus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Bus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bus")
            .field("config", &self.shared.config)
            .finish()
    }
}

impl Shared {
    pub(crate) fn remove(&self, observer: ObserverId) -> usize {
        let removed = self.registry.write().remove(observer, None);
        count_removed(observer, removed)
    }

    #[cfg(test)]
    pub(crate) fn tracked_names(&self) -> usize {
        self.registry.read().len()
    }
}

// takes the removed registrations by value so they are dropped after the registry lock
fn count_removed(observer: ObserverId, removed: Vec<Registration>) -> usize {
    removed.iter().filter(|r| r.belongs_to(observer)).count()
}

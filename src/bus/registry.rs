use super::{observer::Anchor, Observer, ObserverId};
use crate::{envelope::Envelope, name::NotificationName};
use parking_lot::Mutex;
use std::{
    any::TypeId,
    collections::HashMap,
    sync::{Arc, Weak},
};
use tokio::sync::mpsc::UnboundedSender;

pub(crate) type Handler = dyn Fn(&Envelope) + Send + Sync;

/// Where a delivery goes
#[derive(Clone)]
pub(crate) enum Callback {
    Handler(Arc<Handler>),
    Channel(UnboundedSender<Arc<Envelope>>),
}

pub(crate) struct Registration {
    observer: ObserverId,
    anchor: Weak<Anchor>,
    callback: Callback,
}

/// Registrations under one name and the first payload type posted to them
#[derive(Default)]
struct Entry {
    registrations: Vec<Registration>,
    payload_type: Mutex<Option<(TypeId, &'static str)>>,
}

/// Live callbacks for one name, in registration order
pub(crate) struct Targets {
    pub(crate) callbacks: Vec<Callback>,
    pub(crate) has_stale: bool,
}

/// Registry contents must be dropped after the registry lock is released:
/// handlers may own the last clone of an [Observer],
/// whose drop removes registrations again
#[derive(Default)]
pub(crate) struct Registry {
    entries: HashMap<NotificationName, Entry>,
}

impl Registry {
    pub(crate) fn insert(&mut self, name: NotificationName, observer: &Observer, callback: Callback) {
        self.entries
            .entry(name)
            .or_default()
            .registrations
            .push(Registration {
                observer: observer.id(),
                anchor: observer.downgrade(),
                callback,
            });
    }

    pub(crate) fn targets(&self, name: &NotificationName) -> Targets {
        let mut targets = Targets {
            callbacks: Vec::new(),
            has_stale: false,
        };
        let registrations = self.entries.get(name).map(|entry| &entry.registrations);
        for registration in registrations.into_iter().flatten() {
            if registration.is_live() {
                targets.callbacks.push(registration.callback.clone());
            } else {
                targets.has_stale = true;
            }
        }
        targets
    }

    /// Records the payload type posted under an observed `name`,
    /// returns the first recorded type name if it differs
    ///
    /// Unobserved names are not tracked
    pub(crate) fn check_payload_type(
        &self,
        name: &NotificationName,
        type_id: TypeId,
        type_name: &'static str,
    ) -> Option<&'static str> {
        let entry = self.entries.get(name)?;
        let mut payload_type = entry.payload_type.lock();
        let (first_id, first_name) = *payload_type.get_or_insert((type_id, type_name));
        if first_id == type_id {
            None
        } else {
            Some(first_name)
        }
    }

    /// Removes registrations of `observer`, stale ones are swept along
    pub(crate) fn remove(
        &mut self,
        observer: ObserverId,
        name: Option<&NotificationName>,
    ) -> Vec<Registration> {
        self.retain(name, |registration| {
            registration.observer != observer && registration.is_live()
        })
    }

    /// Removes registrations of dropped observers and closed channels
    pub(crate) fn prune(&mut self, name: &NotificationName) -> Vec<Registration> {
        self.retain(Some(name), Registration::is_live)
    }

    pub(crate) fn live_count(&self, name: &NotificationName) -> usize {
        self.entries.get(name).map_or(0, |entry| {
            entry.registrations.iter().filter(|r| r.is_live()).count()
        })
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    fn retain(
        &mut self,
        name: Option<&NotificationName>,
        mut keep: impl FnMut(&Registration) -> bool,
    ) -> Vec<Registration> {
        let mut removed = Vec::new();
        for (entry_name, entry) in self.entries.iter_mut() {
            if name.map_or(false, |name| name != entry_name) {
                continue;
            }
            let (kept, dropped): (Vec<_>, Vec<_>) =
                entry.registrations.drain(..).partition(|r| keep(r));
            entry.registrations = kept;
            removed.extend(dropped);
        }
        self.entries.retain(|_, entry| !entry.registrations.is_empty());
        removed
    }
}

impl Registration {
    pub(crate) fn belongs_to(&self, observer: ObserverId) -> bool {
        self.observer == observer
    }

    fn is_live(&self) -> bool {
        if self.anchor.strong_count() == 0 {
            return false;
        }
        match &self.callback {
            Callback::Handler(_) => true,
            Callback::Channel(sender) => !sender.is_closed(),
        }
    }
}

use super::Shared;
use parking_lot::Mutex;
use std::{
    fmt,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Weak,
    },
};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of an observer and the lifetime anchor of its registrations
///
/// Clones share the identity. The [Bus](crate::bus::Bus) keeps only a weak
/// reference: once every clone is dropped, the registrations made with it
/// are removed from every bus it was registered on, releasing their handlers.
#[derive(Clone)]
pub struct Observer {
    anchor: Arc<Anchor>,
}

/// Opaque id of an [Observer]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ObserverId(u64);

pub(crate) struct Anchor {
    id: ObserverId,
    buses: Mutex<Vec<Weak<Shared>>>,
}

impl Observer {
    /// Creates an observer with a fresh identity
    pub fn new() -> Self {
        let id = ObserverId(NEXT_ID.fetch_add(1, Ordering::Relaxed));
        Self {
            anchor: Arc::new(Anchor {
                id,
                buses: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Id of this observer
    pub fn id(&self) -> ObserverId {
        self.anchor.id
    }

    pub(crate) fn downgrade(&self) -> Weak<Anchor> {
        Arc::downgrade(&self.anchor)
    }

    /// Remembers `bus` for cleanup when the observer goes away
    pub(crate) fn attach(&self, bus: &Arc<Shared>) {
        let mut buses = self.anchor.buses.lock();
        buses.retain(|known| known.strong_count() > 0);
        if !buses.iter().any(|known| known.as_ptr() == Arc::as_ptr(bus)) {
            buses.push(Arc::downgrade(bus));
        }
    }
}

impl Drop for Anchor {
    fn drop(&mut self) {
        for bus in self.buses.get_mut().drain(..) {
            if let Some(bus) = bus.upgrade() {
                bus.remove(self.id);
            }
        }
    }
}

impl Default for Observer {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Observer {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for Observer {}

impl fmt::Debug for Observer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Observer").field(&self.id().0).finish()
    }
}

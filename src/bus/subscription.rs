use super::{Observer, Shared};
use crate::{envelope::Envelope, notification::AppNotification};
use std::{
    marker::PhantomData,
    sync::{Arc, Weak},
};
use tokio::sync::mpsc::UnboundedReceiver;

pub use tokio::sync::mpsc::error::TryRecvError;
use tracing::trace;

/// Channel-backed subscription to the notification `N`
///
/// Created with [Bus::subscribe](crate::bus::Bus::subscribe).
/// Dropping the subscription unsubscribes it.
pub struct Subscription<N: AppNotification> {
    bus: Weak<Shared>,
    observer: Option<Observer>,
    receiver: UnboundedReceiver<Arc<Envelope>>,
    kind: PhantomData<fn() -> N>,
}

impl<N: AppNotification> Subscription<N> {
    pub(super) fn new(
        bus: Weak<Shared>,
        observer: Observer,
        receiver: UnboundedReceiver<Arc<Envelope>>,
    ) -> Self {
        Self {
            bus,
            observer: Some(observer),
            receiver,
            kind: PhantomData,
        }
    }

    /// Receives the next envelope posted under the name of `N`
    ///
    /// Returns None once the subscription is closed or the bus is dropped
    pub async fn recv(&mut self) -> Option<Arc<Envelope>> {
        self.receiver.recv().await
    }

    /// Receives an already posted envelope without waiting
    ///
    /// Fails with [TryRecvError::Empty] if nothing is queued yet and with
    /// [TryRecvError::Disconnected] once the subscription is closed and drained
    pub fn try_recv(&mut self) -> Result<Arc<Envelope>, TryRecvError> {
        self.receiver.try_recv()
    }

    /// Receives the next payload of `N`
    ///
    /// Envelopes posted under the same name with another payload type are skipped
    pub async fn recv_payload(&mut self) -> Option<N::Payload>
    where
        N::Payload: Clone,
    {
        loop {
            let envelope = self.recv().await?;
            match envelope.payload::<N>() {
                Some(payload) => return Some(payload.clone()),
                None => trace!(
                    name = %envelope.name(),
                    payload = envelope.payload_type_name(),
                    "subscription skips mismatched payload"
                ),
            }
        }
    }

    /// Unsubscribes, envelopes already posted can still be received
    pub fn close(&mut self) {
        let observer = match self.observer.take() {
            Some(observer) => observer,
            None => return,
        };
        if let Some(bus) = self.bus.upgrade() {
            bus.remove(observer.id());
        }
        self.receiver.close();
    }
}

impl<N: AppNotification> Drop for Subscription<N> {
    fn drop(&mut self) {
        self.close();
    }
}

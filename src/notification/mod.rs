//! # Typed notifications
//!
//! A notification kind is a type implementing [AppNotification]:
//! it has a name used as the routing key on the [Bus] and a payload type.
//! The functions of this module post and observe kinds
//! without touching untyped payloads.

use crate::{
    bus::{Bus, Observer},
    envelope::Envelope,
    name::NotificationName,
};
use std::any::Any;
use tracing::trace;

#[cfg(test)]
mod test;

/// A kind of application notification
///
/// Usually declared with [declare](crate::declare).
/// Kinds that share a name are delivered to the same observers,
/// extraction with the wrong kind yields nothing.
pub trait AppNotification: Sized + 'static {
    /// Payload data type that is sent with this notification
    type Payload: Any + Send + Sync;

    /// Notification name used for posting and registration
    ///
    /// Defaults to the name derived by [NotificationName::of]:
    /// readable as the type path, distinct for every distinct type
    fn name() -> NotificationName {
        NotificationName::of::<Self>()
    }

    /// Payload of this notification
    fn payload(&self) -> &Self::Payload;

    /// Converts this notification into its payload
    fn into_payload(self) -> Self::Payload;
}

/// Name of the notification kind `N`
pub fn resolve_name<N: AppNotification>() -> NotificationName {
    N::name()
}

/// Posts `notification` to every observer registered under its name
///
/// Observers are invoked on the calling thread before this fn returns.
/// Returns the number of deliveries, posting without observers is a no-op
pub fn post<N: AppNotification>(bus: &Bus, notification: N) -> usize {
    bus.post(N::name(), notification.into_payload())
}

/// Registers `handler` for notifications posted under `name`
pub fn register<F>(bus: &Bus, name: NotificationName, observer: &Observer, handler: F)
where
    F: Fn(&Envelope) + Send + Sync + 'static,
{
    bus.add_observer(observer, name, handler)
}

/// Registers `handler` for payloads of the notification kind `N`
///
/// Envelopes posted under the name of `N` with another payload type are ignored
pub fn observe<N, F>(bus: &Bus, observer: &Observer, handler: F)
where
    N: AppNotification,
    F: Fn(&N::Payload) + Send + Sync + 'static,
{
    register(bus, N::name(), observer, move |envelope| {
        match envelope.payload::<N>() {
            Some(payload) => handler(payload),
            None => trace!(
                name = %envelope.name(),
                payload = envelope.payload_type_name(),
                "observer skips mismatched payload"
            ),
        }
    })
}

/// Typed payload of `envelope`, `None` if it was not posted as `N`
pub fn extract_payload<N: AppNotification>(envelope: &Envelope) -> Option<&N::Payload> {
    envelope.payload::<N>()
}

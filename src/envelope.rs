//! # Envelopes

use crate::{common::UntypedBox, name::NotificationName, notification::AppNotification};
use std::{
    any::{self, Any, TypeId},
    fmt,
};
use thiserror::Error;

/// A posted notification as it is seen by observers:
/// the name it was posted under and its untyped payload
pub struct Envelope {
    name: NotificationName,
    payload: UntypedBox,
}

/// The payload of an [Envelope] is not the payload type of the requested notification
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("notification `{name}` carries `{actual}`, expected `{expected}`")]
pub struct PayloadMismatch {
    /// Name the envelope was posted under
    pub name: NotificationName,
    /// Payload type of the requested notification
    pub expected: &'static str,
    /// Payload type actually carried by the envelope
    pub actual: &'static str,
}

impl Envelope {
    /// Wraps an untyped payload
    pub fn new<P: Any + Send + Sync>(name: NotificationName, payload: P) -> Self {
        Self {
            name,
            payload: UntypedBox::new(payload),
        }
    }

    /// Name the envelope was posted under
    pub fn name(&self) -> &NotificationName {
        &self.name
    }

    /// Type name of the carried payload
    pub fn payload_type_name(&self) -> &'static str {
        self.payload.type_name()
    }

    /// Typed payload for the notification `N`, `None` if the payload has another type
    pub fn payload<N: AppNotification>(&self) -> Option<&N::Payload> {
        self.payload.get_ref()
    }

    /// Same as [payload](Envelope::payload), but explains a mismatch
    pub fn try_payload<N: AppNotification>(&self) -> Result<&N::Payload, PayloadMismatch> {
        self.payload.get_ref().ok_or_else(|| self.mismatch::<N>())
    }

    /// Takes the payload out of the envelope,
    /// giving the envelope back if the payload has another type
    pub fn into_payload<N: AppNotification>(self) -> Result<N::Payload, Self> {
        let Self { name, payload } = self;
        payload
            .consume()
            .map_err(|payload| Self { name, payload })
    }

    pub(crate) fn payload_type_id(&self) -> TypeId {
        self.payload.type_id()
    }

    fn mismatch<N: AppNotification>(&self) -> PayloadMismatch {
        PayloadMismatch {
            name: self.name.clone(),
            expected: any::type_name::<N::Payload>(),
            actual: self.payload.type_name(),
        }
    }
}

impl fmt::Debug for Envelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Envelope")
            .field("name", &self.name)
            .field("payload", &self.payload.type_name())
            .finish()
    }
}

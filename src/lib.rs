#![warn(missing_docs)]
#![warn(clippy::missing_safety_doc)]
#![warn(clippy::missing_panics_doc)]

//! Type-safe application notifications over a name-keyed observer bus
//!
//! ```rust
//! use typed_notify::{bus::{Bus, Observer}, notification};
//!
//! typed_notify::declare! {
//!     /// A user signed in
//!     pub notification SignedIn(String);
//! }
//!
//! let bus = Bus::new();
//! let observer = Observer::new();
//! notification::observe::<SignedIn, _>(&bus, &observer, |user| {
//!     println!("welcome, {}", user);
//! });
//! assert_eq!(SignedIn::post(&bus, "ferris".to_string()), 1);
//! ```

mod common;

pub mod bus;
pub mod envelope;
pub mod name;
pub mod notification;

pub use bus::{Bus, BusConfig, Observer, Subscription};
pub use envelope::{Envelope, PayloadMismatch};
pub use name::NotificationName;
pub use notification::AppNotification;

#[doc(hidden)]
pub use doc_comment::doc_comment as __doc_comment;

/// Declare [notification kinds](crate::notification::AppNotification)
///
/// ## Syntax
///
/// `<visibility>? notification <name>(<payload type>);` \
/// `<visibility>? notification <name>(<payload type>) = "<notification name>";`
///
/// Each kind becomes a newtype over its payload.
/// Without an explicit notification name the name is derived from the type path.
///
/// ## Example
///
/// ```rust
/// typed_notify::declare! {
///    /// N1 notification
///    notification N1(i32);
///    /// N2 notification
///    pub(crate) notification N2((i32, bool)) = "app.n2";
///    /// N3 notification
///    pub notification N3(Vec<String>);
/// }
///
/// use typed_notify::notification::resolve_name;
///
/// assert!(resolve_name::<N1>().as_str().ends_with("N1"));
/// assert_eq!(resolve_name::<N2>(), "app.n2");
/// ```
#[macro_export]
macro_rules! declare {
    () => {};

    (
        $(#[$attr:meta])*
        $v:vis notification $name:ident ($payload:ty) $(= $explicit:literal)?;
        $($next:tt)*
    ) => {
        $(#[$attr])*
        $v struct $name(pub $payload);

        impl $crate::notification::AppNotification for $name {
            type Payload = $payload;

            $(
                fn name() -> $crate::name::NotificationName {
                    $crate::name::NotificationName::from_static($explicit)
                }
            )?

            fn payload(&self) -> &$payload {
                &self.0
            }

            fn into_payload(self) -> $payload {
                self.0
            }
        }

        impl $name {
            $crate::__doc_comment! {
                concat!("Posts a payload to the observers of ", stringify!($name)),
                #[allow(dead_code)]
                $v fn post(bus: &$crate::bus::Bus, payload: $payload) -> usize {
                    $crate::notification::post(bus, $name(payload))
                }
            }
        }

        $crate::declare!($($next)*);
    };
}

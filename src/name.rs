//! # Notification names

use std::{
    any::{self, TypeId},
    borrow::Cow,
    fmt,
};

/// Routing key of a notification on the [Bus](crate::bus::Bus)
///
/// Two notifications with equal names are delivered to the same observers,
/// whatever their payload types are
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NotificationName {
    text: Cow<'static, str>,
    // set for derived names only
    owner: Option<TypeId>,
}

impl NotificationName {
    /// Creates a name from a static string without allocating
    pub const fn from_static(name: &'static str) -> Self {
        Self {
            text: Cow::Borrowed(name),
            owner: None,
        }
    }

    /// Derives a name from the type identity of `T`
    ///
    /// The name reads as the type path of `T`, but it is keyed by the `TypeId`:
    /// two types never share a derived name, even when their paths print the same,
    /// and a derived name never equals a name built from a string
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            text: Cow::Borrowed(any::type_name::<T>()),
            owner: Some(TypeId::of::<T>()),
        }
    }

    /// The name as a string slice
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Whether the name was derived from a type
    pub fn is_derived(&self) -> bool {
        self.owner.is_some()
    }
}

impl From<&'static str> for NotificationName {
    fn from(name: &'static str) -> Self {
        Self::from_static(name)
    }
}

impl From<String> for NotificationName {
    fn from(name: String) -> Self {
        Self {
            text: Cow::Owned(name),
            owner: None,
        }
    }
}

impl AsRef<str> for NotificationName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl PartialEq<str> for NotificationName {
    fn eq(&self, other: &str) -> bool {
        self.owner.is_none() && self.as_str() == other
    }
}

impl PartialEq<&str> for NotificationName {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl fmt::Display for NotificationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for NotificationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.owner {
            Some(owner) => write!(f, "NotificationName({:?}, {:?})", self.as_str(), owner),
            None => write!(f, "NotificationName({:?})", self.as_str()),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    mod first {
        pub struct Ready;
    }

    mod second {
        pub struct Ready;
    }

    #[test]
    fn derived_names_are_path_qualified() {
        let a = NotificationName::of::<first::Ready>();
        let b = NotificationName::of::<second::Ready>();
        assert_ne!(a, b);
        assert!(a.as_str().ends_with("first::Ready"));
        assert_eq!(a, NotificationName::of::<first::Ready>());
        assert!(a.is_derived());
    }

    #[test]
    fn same_path_types_get_distinct_names() {
        let a = {
            struct Ready;
            NotificationName::of::<Ready>()
        };
        let b = {
            struct Ready;
            NotificationName::of::<Ready>()
        };
        assert_eq!(a.as_str(), b.as_str());
        assert_ne!(a, b);
    }

    #[test]
    fn derived_name_differs_from_its_text() {
        let derived = NotificationName::of::<first::Ready>();
        let text = NotificationName::from(derived.as_str().to_string());
        assert_ne!(derived, text);
        assert!(derived != *derived.as_str());
        assert!(!text.is_derived());
    }

    #[test]
    fn owned_and_static_names_compare_equal() {
        let owned = NotificationName::from(String::from("app.ready"));
        assert_eq!(owned, NotificationName::from_static("app.ready"));
        assert_eq!(owned, "app.ready");
        assert_eq!(owned.to_string(), "app.ready");
    }
}

use std::any::{self, Any, TypeId};

/// Type-erased value that remembers what it was built from
pub(crate) struct UntypedBox {
    inner: Box<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl UntypedBox {
    pub(crate) fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            inner: Box::new(value),
            type_name: any::type_name::<T>(),
        }
    }

    pub(crate) fn type_id(&self) -> TypeId {
        Any::type_id(&*self.inner)
    }

    pub(crate) fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub(crate) fn get_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref()
    }

    pub(crate) fn consume<T: Any>(self) -> Result<T, Self> {
        let type_name = self.type_name;
        match self.inner.downcast::<T>() {
            Ok(value) => Ok(*value),
            Err(inner) => Err(Self { inner, type_name }),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn checked_access() {
        let boxed = UntypedBox::new(42u32);
        assert_eq!(boxed.type_id(), TypeId::of::<u32>());
        assert_eq!(boxed.type_name(), "u32");
        assert_eq!(boxed.get_ref::<u32>(), Some(&42));
        assert!(boxed.get_ref::<i32>().is_none());

        let boxed = boxed.consume::<String>().unwrap_err();
        assert_eq!(boxed.consume::<u32>().ok(), Some(42));
    }
}

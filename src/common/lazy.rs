use parking_lot::Once;
use std::{cell::UnsafeCell, mem::MaybeUninit, ops::Deref};

/// Value created on first access and kept for the rest of the process
pub(crate) struct Lazy<T> {
    once: Once,
    init: fn() -> T,
    cell: UnsafeCell<MaybeUninit<T>>,
}

// the cell is written exactly once under `Once`
// and only shared references are handed out afterwards
unsafe impl<T: Send + Sync> Sync for Lazy<T> {}

impl<T> Lazy<T> {
    pub(crate) const fn new(init: fn() -> T) -> Self {
        Self {
            once: Once::new(),
            init,
            cell: UnsafeCell::new(MaybeUninit::uninit()),
        }
    }

    pub(crate) fn force(&self) -> &T {
        self.once.call_once(|| {
            let value = (self.init)();
            unsafe { &mut *self.cell.get() }.write(value);
        });
        unsafe { (&*self.cell.get()).assume_init_ref() }
    }
}

impl<T> Deref for Lazy<T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.force()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering::SeqCst};

    static INIT_CALLS: AtomicUsize = AtomicUsize::new(0);

    fn init() -> Vec<&'static str> {
        INIT_CALLS.fetch_add(1, SeqCst);
        vec!["ready"]
    }

    #[test]
    fn initialized_once() {
        static VALUE: Lazy<Vec<&'static str>> = Lazy::new(init);
        assert_eq!(VALUE[0], "ready");
        assert_eq!(VALUE.len(), 1);
        assert!(std::ptr::eq(VALUE.force(), VALUE.force()));
        assert_eq!(INIT_CALLS.load(SeqCst), 1);
    }
}

use crate::ObjectClass;
use core::cell::Cell;

/// Common prefix of every native object allocation.
#[repr(C)]
pub(crate) struct Header {
    pub(crate) class: &'static ObjectClass,
    ref_count: Cell<usize>,
    floating: Cell<bool>,
}

/// An object allocation, which is always accessed through a pointer to its [`Header`].
#[repr(C)]
pub(crate) struct Instance<T> {
    pub(crate) header: Header,
    pub(crate) value: T,
}

impl Header {
    pub(crate) const fn new(class: &'static ObjectClass, floating: bool) -> Self {
        Self {
            class,
            ref_count: Cell::new(1),
            floating: Cell::new(floating),
        }
    }

    pub(crate) fn ref_count(&self) -> usize {
        self.ref_count.get()
    }

    pub(crate) fn is_floating(&self) -> bool {
        self.floating.get()
    }

    pub(crate) fn increment(&self) {
        match self.ref_count.get().checked_add(1) {
            Some(count) => self.ref_count.set(count),
            None => panic!("reference count overflow for {}", (self.class.type_name)()),
        }
    }

    /// Returns `true` if the last reference was released.
    pub(crate) fn decrement(&self) -> bool {
        let count = self.ref_count.get();
        debug_assert_ne!(count, 0, "object was already finalized");
        self.ref_count.set(count - 1);
        count == 1
    }

    /// Clears the floating flag, returning its previous value.
    pub(crate) fn take_floating(&self) -> bool {
        self.floating.replace(false)
    }
}

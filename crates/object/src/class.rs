use crate::header::{Header, Instance};
use alloc::boxed::Box;
use core::ptr::NonNull;

/// A table of functions describing the native type of an object.
///
/// There is exactly one [`ObjectClass`] for each type of value stored in an object, which is
/// obtained with [`ObjectClass::of()`].
#[derive(Clone, Copy)]
pub struct ObjectClass {
    pub(crate) type_id: fn() -> core::any::TypeId,
    pub(crate) type_name: fn() -> &'static str,
    pub(crate) finalize: unsafe fn(NonNull<Header>),
    pub(crate) debug: unsafe fn(NonNull<Header>, &mut core::fmt::Formatter) -> core::fmt::Result,
}

trait HasClass: Sized + 'static {
    const CLASS: &'static ObjectClass;
}

impl<T: core::fmt::Debug + 'static> HasClass for T {
    const CLASS: &'static ObjectClass = {
        let finalize: unsafe fn(NonNull<Header>) = |header| {
            // SAFETY: the class of an object is only ever `T::CLASS` if it is an `Instance<T>`.
            // SAFETY: the allocation originates from `Box::into_raw`.
            let _ = unsafe { Box::from_raw(header.as_ptr().cast::<Instance<T>>()) };

            // `T` is automatically dropped
        };

        let debug: unsafe fn(NonNull<Header>, &mut core::fmt::Formatter) -> core::fmt::Result =
            |header, f| {
                // SAFETY: the class of an object is only ever `T::CLASS` if it is an `Instance<T>`.
                let instance = unsafe { header.cast::<Instance<T>>().as_ref() };
                core::fmt::Debug::fmt(&instance.value, f)
            };

        &ObjectClass {
            type_id: core::any::TypeId::of::<T>,
            type_name: core::any::type_name::<T>,
            finalize,
            debug,
        }
    };
}

impl ObjectClass {
    /// Gets the class for objects containing a `T`.
    pub fn of<T: core::fmt::Debug + 'static>() -> &'static Self {
        <T as HasClass>::CLASS
    }

    /// Gets the name of the type of the value stored in objects of this class.
    pub fn type_name(&self) -> &'static str {
        (self.type_name)()
    }

    /// Returns `true` if this is the class for objects containing a `T`.
    pub fn is<T: 'static>(&self) -> bool {
        (self.type_id)() == core::any::TypeId::of::<T>()
    }
}

impl core::fmt::Debug for ObjectClass {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ObjectClass")
            .field("type_name", &self.type_name())
            .finish_non_exhaustive()
    }
}

impl PartialEq for ObjectClass {
    fn eq(&self, other: &Self) -> bool {
        (self.type_id)() == (other.type_id)()
    }
}

impl Eq for ObjectClass {}

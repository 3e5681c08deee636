use crate::{
    header::{Header, Instance},
    ObjectClass, RawObject,
};
use alloc::boxed::Box;
use core::ptr::NonNull;

fn allocate<T: core::fmt::Debug + 'static>(value: T, floating: bool) -> RawObject {
    let instance = Box::new(Instance {
        header: Header::new(ObjectClass::of::<T>(), floating),
        value,
    });

    // SAFETY: `Box::into_raw` never returns null.
    let instance = unsafe { NonNull::new_unchecked(Box::into_raw(instance)) };

    // `Instance` is `repr(C)`, so a pointer to it is also a pointer to its `Header`.
    RawObject::new(instance.cast::<Header>())
}

/// Allocates an object with a single *floating* reference, which is how native constructors of
/// initially unowned types return new objects.
///
/// The reference must eventually be claimed with [`ref_sink()`] (or [`Object::from_raw_full()`]),
/// otherwise the object is leaked.
pub fn new_floating<T: core::fmt::Debug + 'static>(value: T) -> RawObject {
    allocate(value, true)
}

/// Allocates an object with a single reference owned by the returned [`Object`].
pub fn new_owned<T: core::fmt::Debug + 'static>(value: T) -> Object {
    Object {
        header: allocate(value, false).header_ptr(),
    }
}

/// Claims a strong reference to an object returned by a native function.
///
/// If the object is floating, its floating reference is converted into the returned one and the
/// reference count is unchanged. Otherwise, a new reference is added. Either way, the returned
/// [`Object`] owns exactly one strong reference and the object is no longer floating.
///
/// # Safety
///
/// `raw` must refer to an object that has not been finalized.
pub unsafe fn ref_sink(raw: RawObject) -> Object {
    // SAFETY: caller ensures the object is alive.
    let header = unsafe { raw.header_ptr().as_ref() };

    if !header.take_floating() {
        header.increment();
    }

    Object {
        header: raw.header_ptr(),
    }
}

/// An owned, strong reference to a native object.
///
/// Cloning an [`Object`] adds a reference, and dropping it releases one. The value stored in the
/// object is dropped when the last reference is released.
pub struct Object {
    header: NonNull<Header>,
}

impl Object {
    fn header(&self) -> &Header {
        // SAFETY: `self` owns a reference, so the object has not been finalized.
        unsafe { self.header.as_ref() }
    }

    /// Takes ownership of a reference that was transferred along with `raw`.
    ///
    /// Unlike [`ref_sink()`], this does not change the reference count or the floating flag.
    ///
    /// # Safety
    ///
    /// `raw` must refer to an object that has not been finalized, and the caller must own one of
    /// its references.
    pub unsafe fn from_raw_full(raw: RawObject) -> Self {
        Self {
            header: raw.header_ptr(),
        }
    }

    /// Adds a new reference to the object referred to by `raw`, without sinking it.
    ///
    /// # Safety
    ///
    /// `raw` must refer to an object that has not been finalized.
    pub unsafe fn from_raw_none(raw: RawObject) -> Self {
        // SAFETY: caller ensures the object is alive.
        unsafe { raw.header_ptr().as_ref() }.increment();

        Self {
            header: raw.header_ptr(),
        }
    }

    /// Gets a pointer to the object without affecting the reference count.
    pub fn as_raw(&self) -> RawObject {
        RawObject::new(self.header)
    }

    /// Gives up ownership of the reference, returning a pointer that carries it.
    pub fn into_raw(self) -> RawObject {
        let raw = self.as_raw();
        core::mem::forget(self);
        raw
    }

    /// The current number of references to the object.
    pub fn ref_count(&self) -> usize {
        self.header().ref_count()
    }

    /// Returns `true` if the object still has a floating reference.
    ///
    /// This is only possible if the object was created with [`new_floating()`] and adopted with
    /// [`Object::from_raw_full()`] or [`Object::from_raw_none()`].
    pub fn is_floating(&self) -> bool {
        self.header().is_floating()
    }

    /// Gets the class of the object.
    pub fn class(&self) -> &'static ObjectClass {
        self.header().class
    }

    /// Gets the name of the type of the value stored in the object.
    pub fn type_name(&self) -> &'static str {
        self.class().type_name()
    }

    /// Gets a reference to the value stored in the object, if it is a `T`.
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        if self.class().is::<T>() {
            // SAFETY: the class check ensures the allocation is an `Instance<T>`.
            let instance = unsafe { self.header.cast::<Instance<T>>().as_ref() };
            Some(&instance.value)
        } else {
            None
        }
    }

    /// Returns `true` if both references point to the same object.
    pub fn ptr_eq(this: &Self, other: &Self) -> bool {
        this.header == other.header
    }
}

impl Clone for Object {
    fn clone(&self) -> Self {
        self.header().increment();
        Self {
            header: self.header,
        }
    }
}

impl Drop for Object {
    fn drop(&mut self) {
        if self.header().decrement() {
            let finalize = self.header().class.finalize;

            // SAFETY: the last reference was released, and the header belongs to an object of
            // this class.
            unsafe { finalize(self.header) }
        }
    }
}

impl core::fmt::Debug for Object {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        #[repr(transparent)]
        struct Value<'a>(&'a Object);

        impl core::fmt::Debug for Value<'_> {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                // SAFETY: the object is alive while a reference is held.
                unsafe { (self.0.class().debug)(self.0.header, f) }
            }
        }

        f.debug_struct("Object")
            .field("type_name", &self.type_name())
            .field("ref_count", &self.ref_count())
            .field("value", &Value(self))
            .finish()
    }
}

use crate::{header::Header, ObjectClass};
use core::ptr::NonNull;

/// An untracked pointer to a native object.
///
/// This is the form in which objects cross the native call boundary. A [`RawObject`] does not
/// own a reference; whoever produced it documents whether a reference was transferred along with
/// it. Use [`ref_sink()`] or [`Object::from_raw_full()`] to turn it into an owned [`Object`].
///
/// [`ref_sink()`]: crate::ref_sink()
/// [`Object`]: crate::Object
/// [`Object::from_raw_full()`]: crate::Object::from_raw_full()
#[derive(Clone, Copy, Eq, Hash, PartialEq)]
#[repr(transparent)]
pub struct RawObject {
    header: NonNull<Header>,
}

impl RawObject {
    pub(crate) const fn new(header: NonNull<Header>) -> Self {
        Self { header }
    }

    pub(crate) const fn header_ptr(self) -> NonNull<Header> {
        self.header
    }

    /// Interprets a pointer returned by a native function as an object.
    ///
    /// Returns `None` if `pointer` is null.
    ///
    /// # Safety
    ///
    /// A non-null `pointer` must have been obtained from [`RawObject::as_ptr()`], and the object
    /// must not have been finalized.
    pub unsafe fn from_ptr(pointer: *mut ()) -> Option<Self> {
        NonNull::new(pointer.cast::<Header>()).map(Self::new)
    }

    /// Gets the address of the object, suitable for storing in a pointer-sized argument.
    pub const fn as_ptr(self) -> *mut () {
        self.header.as_ptr().cast::<()>()
    }

    /// # Safety
    ///
    /// The object must not have been finalized.
    unsafe fn header<'a>(self) -> &'a Header {
        // SAFETY: caller ensures the object is still alive.
        unsafe { self.header.as_ref() }
    }

    /// Gets the current number of references to the object.
    ///
    /// # Safety
    ///
    /// The object must not have been finalized.
    pub unsafe fn ref_count(self) -> usize {
        // SAFETY: ensured by caller.
        unsafe { self.header().ref_count() }
    }

    /// Returns `true` if the object still has a floating reference.
    ///
    /// # Safety
    ///
    /// The object must not have been finalized.
    pub unsafe fn is_floating(self) -> bool {
        // SAFETY: ensured by caller.
        unsafe { self.header().is_floating() }
    }

    /// Gets the class of the object.
    ///
    /// # Safety
    ///
    /// The object must not have been finalized.
    pub unsafe fn class(self) -> &'static ObjectClass {
        // SAFETY: ensured by caller.
        unsafe { self.header().class }
    }
}

impl core::fmt::Debug for RawObject {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        // Can't read the header, the object might have been finalized.
        f.debug_tuple("RawObject").field(&self.header).finish()
    }
}

use ctorbridge_object::RawObject;

/// An untyped value passed to or returned from a native function.
///
/// Every constructor zero-initializes the whole union before storing a value, so all of the
/// bytes of an [`Argument`] are always initialized. What an [`Argument`] actually contains is
/// described by the [`TypeInfo`] of the corresponding argument or return value.
///
/// [`TypeInfo`]: ctorbridge_info::TypeInfo
#[derive(Clone, Copy)]
#[repr(C)]
pub union Argument {
    v_boolean: bool,
    v_int8: i8,
    v_uint8: u8,
    v_int16: i16,
    v_uint16: u16,
    v_int32: i32,
    v_uint32: u32,
    v_int64: i64,
    v_uint64: u64,
    v_float: f32,
    v_double: f64,
    v_pointer: *mut (),
}

macro_rules! accessors {
    ($($ty:ty => $from:ident / $as:ident($field:ident);)*) => {$(
        #[doc = concat!("Creates an [`Argument`] containing a [`", stringify!($ty), "`].")]
        pub fn $from(value: $ty) -> Self {
            let mut arg = Self::ZERO;
            arg.$field = value;
            arg
        }

        #[doc = concat!("Interprets the [`Argument`] as containing a [`", stringify!($ty), "`].")]
        ///
        /// # Safety
        ///
        /// The argument must have been created with the corresponding constructor.
        pub unsafe fn $as(self) -> $ty {
            // SAFETY: ensured by caller.
            unsafe { self.$field }
        }
    )*};
}

impl Argument {
    /// An [`Argument`] with all bits set to zero, which is also a null pointer.
    pub const ZERO: Self = Self { v_uint64: 0 };

    accessors! {
        bool => from_bool / as_bool(v_boolean);
        i8 => from_i8 / as_i8(v_int8);
        u8 => from_u8 / as_u8(v_uint8);
        i16 => from_i16 / as_i16(v_int16);
        u16 => from_u16 / as_u16(v_uint16);
        i32 => from_i32 / as_i32(v_int32);
        u32 => from_u32 / as_u32(v_uint32);
        i64 => from_i64 / as_i64(v_int64);
        u64 => from_u64 / as_u64(v_uint64);
        f32 => from_f32 / as_f32(v_float);
        f64 => from_f64 / as_f64(v_double);
        *mut () => from_pointer / as_pointer(v_pointer);
    }

    /// Creates an [`Argument`] pointing to an object. No reference is transferred.
    pub fn from_object(object: RawObject) -> Self {
        Self::from_pointer(object.as_ptr())
    }

    /// Interprets the [`Argument`] as a pointer to an object, returning `None` if it is null.
    ///
    /// # Safety
    ///
    /// The argument must contain a pointer, which is either null or refers to an object that has
    /// not been finalized.
    pub unsafe fn as_object(self) -> Option<RawObject> {
        // SAFETY: ensured by caller.
        unsafe { RawObject::from_ptr(self.as_pointer()) }
    }

    /// Interprets the [`Argument`] as a pointer to a NUL-terminated UTF-8 string, returning
    /// `None` if it is null or is not valid UTF-8.
    ///
    /// # Safety
    ///
    /// The argument must contain a pointer, which is either null or refers to a NUL-terminated
    /// string that outlives `'a`.
    pub unsafe fn as_utf8<'a>(self) -> Option<&'a str> {
        // SAFETY: ensured by caller.
        let pointer = unsafe { self.as_pointer() };
        if pointer.is_null() {
            return None;
        }

        // SAFETY: caller ensures the string is NUL-terminated and lives long enough.
        let c_str = unsafe { core::ffi::CStr::from_ptr(pointer.cast::<core::ffi::c_char>()) };
        c_str.to_str().ok()
    }

    /// Returns `true` if every bit of the argument is zero.
    pub fn is_zero(&self) -> bool {
        // SAFETY: all bytes are initialized by the constructors.
        unsafe { self.v_uint64 == 0 }
    }
}

impl Default for Argument {
    fn default() -> Self {
        Self::ZERO
    }
}

impl core::fmt::Debug for Argument {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        // SAFETY: all bytes are initialized by the constructors.
        let bits = unsafe { self.v_uint64 };
        write!(f, "Argument({bits:#018X})")
    }
}

use alloc::rc::Rc;
use ctorbridge_object::Object;

/// Trait for host values that have no direct native representation, such as instances of host
/// classes.
pub trait ForeignValue: core::any::Any + core::fmt::Debug {
    /// A short, human readable description of the kind of value, used in error messages.
    fn kind(&self) -> &'static str;

    /// Gets the native object backing this value, if there is one.
    ///
    /// Values with a backing object can be passed to native functions expecting an object.
    fn object(&self) -> Option<Object> {
        None
    }

    #[allow(missing_docs)]
    fn as_any(&self) -> &dyn core::any::Any;

    #[allow(missing_docs)]
    fn into_any(self: Rc<Self>) -> Rc<dyn core::any::Any>;
}

/// A value of the embedding host.
#[derive(Clone, Debug, Default)]
#[non_exhaustive]
pub enum Value {
    #[allow(missing_docs)]
    #[default]
    Nil,
    #[allow(missing_docs)]
    Bool(bool),
    #[allow(missing_docs)]
    Integer(i64),
    #[allow(missing_docs)]
    Float(f64),
    #[allow(missing_docs)]
    String(Rc<str>),
    /// A strong reference to a native object.
    Object(Object),
    /// Some other host value.
    Foreign(Rc<dyn ForeignValue>),
}

impl Value {
    /// A short, human readable description of the kind of value, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Nil => "nil",
            Self::Bool(_) => "boolean",
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Object(_) => "object",
            Self::Foreign(foreign) => foreign.kind(),
        }
    }

    /// Returns `true` if this is [`Value::Nil`].
    pub fn is_nil(&self) -> bool {
        matches!(self, Self::Nil)
    }

    /// Gets the native object this value refers to, if any.
    pub fn object(&self) -> Option<Object> {
        match self {
            Self::Object(object) => Some(object.clone()),
            Self::Foreign(foreign) => foreign.object(),
            _ => None,
        }
    }

    /// Gets a reference to the foreign value if it is a `T`.
    pub fn downcast_foreign_ref<T: ForeignValue>(&self) -> Option<&T> {
        match self {
            Self::Foreign(foreign) => foreign.as_any().downcast_ref::<T>(),
            _ => None,
        }
    }

    /// Gets the foreign value if it is a `T`.
    pub fn downcast_foreign<T: ForeignValue>(&self) -> Option<Rc<T>> {
        match self {
            Self::Foreign(foreign) => foreign.clone().into_any().downcast::<T>().ok(),
            _ => None,
        }
    }

    /// Creates a [`Value::Foreign`].
    pub fn foreign<T: ForeignValue>(value: Rc<T>) -> Self {
        Self::Foreign(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

macro_rules! from_integer {
    ($($ty:ty),*) => {$(
        impl From<$ty> for Value {
            fn from(value: $ty) -> Self {
                Self::Integer(i64::from(value))
            }
        }
    )*};
}

from_integer!(i8, u8, i16, u16, i32, u32, i64);

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.into())
    }
}

impl From<alloc::string::String> for Value {
    fn from(value: alloc::string::String) -> Self {
        Self::String(value.into())
    }
}

impl From<Object> for Value {
    fn from(value: Object) -> Self {
        Self::Object(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Nil, Into::into)
    }
}

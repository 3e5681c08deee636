use crate::{BaseInfo, TypeTag};
use alloc::boxed::Box;

/// A type that is fully described by its [`TypeTag`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[non_exhaustive]
#[allow(missing_docs)]
pub enum BasicType {
    Void,
    Boolean,
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Float,
    Double,
    GType,
    Utf8,
    Filename,
    GList,
    GSList,
    GHash,
    Error,
    Unichar,
}

impl BasicType {
    /// Gets the corresponding [`TypeTag`].
    pub const fn tag(self) -> TypeTag {
        match self {
            Self::Void => TypeTag::Void,
            Self::Boolean => TypeTag::Boolean,
            Self::Int8 => TypeTag::Int8,
            Self::UInt8 => TypeTag::UInt8,
            Self::Int16 => TypeTag::Int16,
            Self::UInt16 => TypeTag::UInt16,
            Self::Int32 => TypeTag::Int32,
            Self::UInt32 => TypeTag::UInt32,
            Self::Int64 => TypeTag::Int64,
            Self::UInt64 => TypeTag::UInt64,
            Self::Float => TypeTag::Float,
            Self::Double => TypeTag::Double,
            Self::GType => TypeTag::GType,
            Self::Utf8 => TypeTag::Utf8,
            Self::Filename => TypeTag::Filename,
            Self::GList => TypeTag::GList,
            Self::GSList => TypeTag::GSList,
            Self::GHash => TypeTag::GHash,
            Self::Error => TypeTag::Error,
            Self::Unichar => TypeTag::Unichar,
        }
    }
}

/// Describes the type of an argument or return value.
///
/// The [`TypeTag`] of a [`TypeInfo`] is [`TypeTag::Interface`] if and only if it refers to a
/// [`BaseInfo`], which is why the interface is stored in the variant rather than alongside the
/// tag.
#[derive(Clone, Debug, Eq, PartialEq)]
#[allow(clippy::exhaustive_enums)]
pub enum TypeInfo {
    /// A type without any additional information.
    Basic(BasicType),
    /// A C array.
    #[non_exhaustive]
    Array {
        /// The type of the array elements.
        element: Box<TypeInfo>,
    },
    /// A type described by a [`BaseInfo`].
    Interface(BaseInfo),
}

impl TypeInfo {
    /// The `void` type, used for functions that return nothing.
    pub const VOID: Self = Self::Basic(BasicType::Void);

    /// Creates a [`TypeInfo`] for a type with no additional information.
    pub const fn basic(basic: BasicType) -> Self {
        Self::Basic(basic)
    }

    /// Creates a [`TypeInfo`] for an array of `element`s.
    pub fn array(element: TypeInfo) -> Self {
        Self::Array {
            element: Box::new(element),
        }
    }

    /// Creates a [`TypeInfo`] referring to the type described by `info`.
    ///
    /// Only a reference to `info` is kept, see [`BaseInfo::to_reference()`].
    pub fn interface(info: &BaseInfo) -> Self {
        Self::Interface(info.to_reference())
    }

    /// Gets the [`TypeTag`].
    pub fn tag(&self) -> TypeTag {
        match self {
            Self::Basic(basic) => basic.tag(),
            Self::Array { .. } => TypeTag::Array,
            Self::Interface(_) => TypeTag::Interface,
        }
    }

    /// Gets the [`BaseInfo`] describing this type, if the [`tag()`] is [`TypeTag::Interface`].
    ///
    /// [`tag()`]: TypeInfo::tag()
    pub fn interface_info(&self) -> Option<&BaseInfo> {
        match self {
            Self::Interface(info) => Some(info),
            _ => None,
        }
    }

    /// Returns `true` if values of this type are passed as pointers.
    pub fn is_pointer(&self) -> bool {
        match self {
            Self::Basic(basic) => !basic.tag().is_basic_value() && *basic != BasicType::Void,
            Self::Array { .. } => true,
            Self::Interface(info) => info.info_type().is_pointer(),
        }
    }
}

impl core::fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Basic(basic) => f.write_str(basic.tag().name()),
            Self::Array { element } => write!(f, "array<{element}>"),
            Self::Interface(info) => write!(f, "{} {info}", info.info_type()),
        }
    }
}

/// The category of a [`BaseInfo`].
///
/// [`BaseInfo`]: crate::BaseInfo
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
#[non_exhaustive]
#[allow(missing_docs)]
pub enum InfoType {
    Invalid,
    Function,
    Callback,
    Struct,
    Boxed,
    Enum,
    Flags,
    /// A reference counted class instance.
    Object,
    /// An interface implemented by objects. Instances of an interface type are always objects.
    Interface,
    Constant,
    Union,
    Value,
    Signal,
    VFunc,
    Property,
    Field,
    Arg,
    Type,
    Unresolved,
}

impl InfoType {
    /// Gets the canonical name of the category.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Invalid => "invalid",
            Self::Function => "function",
            Self::Callback => "callback",
            Self::Struct => "struct",
            Self::Boxed => "boxed",
            Self::Enum => "enum",
            Self::Flags => "flags",
            Self::Object => "object",
            Self::Interface => "interface",
            Self::Constant => "constant",
            Self::Union => "union",
            Self::Value => "value",
            Self::Signal => "signal",
            Self::VFunc => "vfunc",
            Self::Property => "property",
            Self::Field => "field",
            Self::Arg => "arg",
            Self::Type => "type",
            Self::Unresolved => "unresolved",
        }
    }

    /// Returns `true` if values of this category are passed to and from native functions as
    /// integers.
    pub const fn is_enumeration(self) -> bool {
        matches!(self, Self::Enum | Self::Flags)
    }

    /// Returns `true` if values of this category are passed to and from native functions as
    /// pointers.
    pub const fn is_pointer(self) -> bool {
        matches!(
            self,
            Self::Struct | Self::Boxed | Self::Object | Self::Interface | Self::Union
        )
    }
}

impl core::fmt::Display for InfoType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

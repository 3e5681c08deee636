/// Identifies the kind of a type described by a [`TypeInfo`].
///
/// [`TypeInfo`]: crate::TypeInfo
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
#[non_exhaustive]
#[allow(missing_docs)]
pub enum TypeTag {
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
    Array,
    /// The type is described by a [`BaseInfo`], such as an object, struct or enumeration.
    ///
    /// [`BaseInfo`]: crate::BaseInfo
    Interface,
    GList,
    GSList,
    GHash,
    Error,
    Unichar,
}

impl TypeTag {
    /// Gets the canonical name of the tag.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Void => "void",
            Self::Boolean => "gboolean",
            Self::Int8 => "gint8",
            Self::UInt8 => "guint8",
            Self::Int16 => "gint16",
            Self::UInt16 => "guint16",
            Self::Int32 => "gint32",
            Self::UInt32 => "guint32",
            Self::Int64 => "gint64",
            Self::UInt64 => "guint64",
            Self::Float => "gfloat",
            Self::Double => "gdouble",
            Self::GType => "GType",
            Self::Utf8 => "utf8",
            Self::Filename => "filename",
            Self::Array => "array",
            Self::Interface => "interface",
            Self::GList => "glist",
            Self::GSList => "gslist",
            Self::GHash => "ghash",
            Self::Error => "error",
            Self::Unichar => "gunichar",
        }
    }

    /// Returns `true` for numeric, boolean and character types.
    pub const fn is_basic_value(self) -> bool {
        matches!(
            self,
            Self::Boolean
                | Self::Int8
                | Self::UInt8
                | Self::Int16
                | Self::UInt16
                | Self::Int32
                | Self::UInt32
                | Self::Int64
                | Self::UInt64
                | Self::Float
                | Self::Double
                | Self::GType
                | Self::Unichar
        )
    }
}

impl core::fmt::Display for TypeTag {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

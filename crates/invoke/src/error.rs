use alloc::boxed::Box;
use ctorbridge_info::{Direction, TypeTag};

/// Error type used when a native function could not be called.
///
/// Errors reported by the native function itself are not represented here; they are returned
/// to the caller unchanged.
#[derive(Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum InvokeError {
    /// No native function was registered for the descriptor's symbol.
    #[non_exhaustive]
    UnresolvedSymbol {
        #[allow(missing_docs)]
        symbol: Box<str>,
    },
    /// The number of arguments did not match the number of arguments of the descriptor.
    #[non_exhaustive]
    ArityMismatch {
        /// The name of the native function.
        function: Box<str>,
        #[allow(missing_docs)]
        expected: usize,
        #[allow(missing_docs)]
        actual: usize,
    },
    /// The value passed as the instance of a method is not backed by an object.
    #[non_exhaustive]
    InvalidInstance {
        /// The name of the object the method belongs to.
        container: Box<str>,
        /// The kind of value that was provided.
        actual: &'static str,
    },
    /// A value could not be converted to the type of the argument.
    #[non_exhaustive]
    ArgumentType {
        /// The zero-based position of the argument.
        index: usize,
        #[allow(missing_docs)]
        name: Box<str>,
        /// Describes the type of the argument.
        expected: Box<str>,
        /// The kind of value that was provided.
        actual: &'static str,
    },
    /// An integer did not fit into the type of the argument.
    #[non_exhaustive]
    OutOfRange {
        /// The zero-based position of the argument.
        index: usize,
        #[allow(missing_docs)]
        tag: TypeTag,
        #[allow(missing_docs)]
        value: i64,
    },
    /// `nil` was provided for an argument that may not be `NULL`.
    #[non_exhaustive]
    NullArgument {
        /// The zero-based position of the argument.
        index: usize,
        #[allow(missing_docs)]
        name: Box<str>,
    },
    /// A string argument contained a NUL byte.
    #[non_exhaustive]
    InteriorNul {
        /// The zero-based position of the argument.
        index: usize,
    },
    /// Values of the argument's type cannot be passed yet.
    #[non_exhaustive]
    UnsupportedType {
        /// The zero-based position of the argument.
        index: usize,
        /// Describes the type of the argument.
        type_name: Box<str>,
    },
    /// Only input arguments are supported.
    #[non_exhaustive]
    UnsupportedDirection {
        /// The zero-based position of the argument.
        index: usize,
        #[allow(missing_docs)]
        direction: Direction,
    },
}

impl core::fmt::Display for InvokeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::UnresolvedSymbol { symbol } => {
                write!(f, "could not resolve native function '{symbol}'")
            }
            Self::ArityMismatch {
                function,
                expected,
                actual,
            } => write!(
                f,
                "{function}: wrong number of arguments (given {actual}, expected {expected})"
            ),
            Self::InvalidInstance { container, actual } => {
                write!(f, "instance must be a {container}, not {actual}")
            }
            Self::ArgumentType {
                index,
                name,
                expected,
                actual,
            } => write!(
                f,
                "argument #{} ({name}) must be {expected}, not {actual}",
                index + 1
            ),
            Self::OutOfRange { index, tag, value } => write!(
                f,
                "argument #{}: {value} is out of range for {tag}",
                index + 1
            ),
            Self::NullArgument { index, name } => {
                write!(f, "argument #{} ({name}) may not be nil", index + 1)
            }
            Self::InteriorNul { index } => {
                write!(f, "argument #{}: string contains a NUL byte", index + 1)
            }
            Self::UnsupportedType { index, type_name } => write!(
                f,
                "argument #{}: passing {type_name} is not supported",
                index + 1
            ),
            Self::UnsupportedDirection { index, direction } => write!(
                f,
                "argument #{}: {direction:?} arguments are not supported",
                index + 1
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for InvokeError {}

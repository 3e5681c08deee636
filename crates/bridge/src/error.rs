use crate::{Arity, ConstructError, ShapeMismatch};
use alloc::boxed::Box;
use ctorbridge_core::{raise::Raise, site::CallSite};
use ctorbridge_info::RepositoryError;
use ctorbridge_invoke::InvokeError;

/// The class of the host exception that a [`BridgeError`] is reported as.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[non_exhaustive]
#[allow(missing_docs)]
pub enum ExceptionClass {
    RuntimeError,
    ArgumentError,
    TypeError,
    NoMethodError,
}

impl ExceptionClass {
    /// The name of the host exception class.
    pub const fn name(self) -> &'static str {
        match self {
            Self::RuntimeError => "RuntimeError",
            Self::ArgumentError => "ArgumentError",
            Self::TypeError => "TypeError",
            Self::NoMethodError => "NoMethodError",
        }
    }
}

impl core::fmt::Display for ExceptionClass {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// Indicates why a [`BridgeError`] occurred.
#[derive(Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum BridgeCause {
    /// A constructor could not be used to initialize a receiver.
    Construct(ConstructError),
    /// A native function could not be called.
    Invoke(InvokeError),
    /// A namespace could not be loaded.
    Repository(RepositoryError),
    /// A method was called that is not defined for the receiver.
    #[non_exhaustive]
    UndefinedMethod {
        /// The name of the class of the receiver, or the kind of value if it has no class.
        receiver: Box<str>,
        #[allow(missing_docs)]
        method: Box<str>,
    },
    /// A method was called with the wrong number of arguments.
    #[non_exhaustive]
    ArgumentCount {
        #[allow(missing_docs)]
        method: Box<str>,
        #[allow(missing_docs)]
        given: usize,
        #[allow(missing_docs)]
        expected: Arity,
    },
    /// A method was called on or with a value of the wrong kind.
    #[non_exhaustive]
    WrongType {
        #[allow(missing_docs)]
        expected: &'static str,
        #[allow(missing_docs)]
        actual: &'static str,
    },
    /// A class was redefined with a different parent class.
    #[non_exhaustive]
    SuperclassMismatch {
        #[allow(missing_docs)]
        class: Box<str>,
    },
    /// A native function reported an error.
    #[non_exhaustive]
    Native {
        #[allow(missing_docs)]
        message: Box<str>,
    },
}

impl BridgeCause {
    /// Gets the host exception class used to report this cause.
    pub fn exception_class(&self) -> ExceptionClass {
        match self {
            Self::Construct(ConstructError::AlreadyInitialized { .. }) => {
                ExceptionClass::ArgumentError
            }
            Self::Construct(_) => ExceptionClass::RuntimeError,
            Self::Invoke(
                InvokeError::ArgumentType { .. } | InvokeError::InvalidInstance { .. },
            ) => ExceptionClass::TypeError,
            Self::Invoke(
                InvokeError::ArityMismatch { .. }
                | InvokeError::OutOfRange { .. }
                | InvokeError::NullArgument { .. }
                | InvokeError::InteriorNul { .. },
            ) => ExceptionClass::ArgumentError,
            Self::Invoke(_) | Self::Repository(_) | Self::Native { .. } => {
                ExceptionClass::RuntimeError
            }
            Self::UndefinedMethod { .. } => ExceptionClass::NoMethodError,
            Self::ArgumentCount { .. } => ExceptionClass::ArgumentError,
            Self::WrongType { .. } | Self::SuperclassMismatch { .. } => ExceptionClass::TypeError,
        }
    }
}

impl core::fmt::Display for BridgeCause {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Construct(error) => core::fmt::Display::fmt(error, f),
            Self::Invoke(error) => core::fmt::Display::fmt(error, f),
            Self::Repository(error) => core::fmt::Display::fmt(error, f),
            Self::UndefinedMethod { receiver, method } => {
                write!(f, "undefined method '{method}' for {receiver}")
            }
            Self::ArgumentCount {
                method,
                given,
                expected,
            } => write!(
                f,
                "{method}: wrong number of arguments (given {given}, expected {expected})"
            ),
            Self::WrongType { expected, actual } => {
                write!(f, "wrong argument type {actual} (expected {expected})")
            }
            Self::SuperclassMismatch { class } => {
                write!(f, "superclass mismatch for class {class}")
            }
            Self::Native { message } => f.write_str(message),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for BridgeCause {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Construct(error) => Some(error),
            Self::Invoke(error) => Some(error),
            Self::Repository(error) => Some(error),
            _ => None,
        }
    }
}

struct Inner {
    cause: BridgeCause,
    site: Option<&'static CallSite>,
}

/// An error reported to the host as an exception.
#[repr(transparent)]
pub struct BridgeError {
    inner: Box<Inner>,
}

impl BridgeError {
    const _SIZE_CHECK: () = if core::mem::size_of::<Option<Self>>() > core::mem::size_of::<usize>()
    {
        panic!("BridgeError is too big")
    };

    /// Creates an error with the given cause.
    pub fn new(cause: BridgeCause, site: Option<&'static CallSite>) -> Self {
        Self {
            inner: Box::new(Inner { cause, site }),
        }
    }

    /// Creates an error reported by a native function.
    pub fn native(message: &str) -> Self {
        Self::new(
            BridgeCause::Native {
                message: message.into(),
            },
            None,
        )
    }

    /// Gets the reason why the error occurred.
    pub fn cause(&self) -> &BridgeCause {
        &self.inner.cause
    }

    /// Gets the host method that was being called when the error occurred.
    pub fn site(&self) -> Option<&'static CallSite> {
        self.inner.site
    }

    /// Gets the class of the host exception.
    pub fn exception_class(&self) -> ExceptionClass {
        self.inner.cause.exception_class()
    }

    pub(crate) fn with_site(mut self, site: &'static CallSite) -> Self {
        self.inner.site.get_or_insert(site);
        self
    }
}

impl Raise<ConstructError> for BridgeError {
    fn raise(cause: ConstructError, site: Option<&'static CallSite>) -> Self {
        Self::new(BridgeCause::Construct(cause), site)
    }

    #[cfg(feature = "std")]
    fn as_error(&self) -> Option<&(dyn std::error::Error + '_)> {
        Some(self)
    }
}

impl Raise<ShapeMismatch> for BridgeError {
    fn raise(cause: ShapeMismatch, site: Option<&'static CallSite>) -> Self {
        Self::raise(ConstructError::ShapeMismatch(cause), site)
    }

    #[cfg(feature = "std")]
    fn as_error(&self) -> Option<&(dyn std::error::Error + '_)> {
        Some(self)
    }
}

impl Raise<InvokeError> for BridgeError {
    fn raise(cause: InvokeError, site: Option<&'static CallSite>) -> Self {
        Self::new(BridgeCause::Invoke(cause), site)
    }

    #[cfg(feature = "std")]
    fn as_error(&self) -> Option<&(dyn std::error::Error + '_)> {
        Some(self)
    }
}

impl Raise<RepositoryError> for BridgeError {
    fn raise(cause: RepositoryError, site: Option<&'static CallSite>) -> Self {
        Self::new(BridgeCause::Repository(cause), site)
    }

    #[cfg(feature = "std")]
    fn as_error(&self) -> Option<&(dyn std::error::Error + '_)> {
        Some(self)
    }
}

impl Raise<BridgeCause> for BridgeError {
    fn raise(cause: BridgeCause, site: Option<&'static CallSite>) -> Self {
        Self::new(cause, site)
    }

    #[cfg(feature = "std")]
    fn as_error(&self) -> Option<&(dyn std::error::Error + '_)> {
        Some(self)
    }
}

impl core::fmt::Display for BridgeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.cause())?;

        if let Some(site) = self.site() {
            write!(f, " ({site})")?;
        }

        Ok(())
    }
}

impl core::fmt::Debug for BridgeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BridgeError")
            .field("class", &self.exception_class())
            .field("cause", self.cause())
            .field("site", &self.site())
            .finish()
    }
}

#[cfg(feature = "std")]
impl std::error::Error for BridgeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.cause())
    }
}

use crate::Receiver;
use alloc::{boxed::Box, rc::Rc};
use ctorbridge_core::{raise::Raise, site::CallSite};
use ctorbridge_info::{CallableInfo, InfoType, Transfer, TypeInfo, TypeTag};
use ctorbridge_invoke::{Argument, InvokeError, Library, Value};
use ctorbridge_object::{ref_sink, Object};

/// Describes why the return type of a constructor was refused.
#[derive(Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum ShapeMismatch {
    /// The constructor does not return an interface type.
    #[non_exhaustive]
    NotInterface {
        /// The symbol of the constructor.
        constructor: Box<str>,
        /// The tag of the declared return type.
        tag: TypeTag,
    },
    /// The constructor returns an interface type that does not describe an object.
    #[non_exhaustive]
    NotObject {
        /// The symbol of the constructor.
        constructor: Box<str>,
        /// The category of the declared return type.
        info_type: InfoType,
    },
}

impl core::fmt::Display for ShapeMismatch {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotInterface { constructor, tag } => {
                write!(f, "{constructor}: expected interface-typed return, got {tag}")
            }
            Self::NotObject {
                constructor,
                info_type,
            } => write!(f, "{constructor}: expected object-typed return, got {info_type}"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ShapeMismatch {}

/// Error produced by [`ConstructorInfo::invoke()`] when the native call itself succeeded, or was
/// never attempted.
#[derive(Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum ConstructError {
    /// The declared return type is not an object.
    ShapeMismatch(ShapeMismatch),
    /// The constructor returned a null pointer.
    #[non_exhaustive]
    NullReturn {
        /// The symbol of the constructor.
        constructor: Box<str>,
    },
    /// The receiver was already bound to an object.
    #[non_exhaustive]
    AlreadyInitialized {
        /// The name of the class of the receiver.
        class: Box<str>,
    },
}

impl From<ShapeMismatch> for ConstructError {
    fn from(mismatch: ShapeMismatch) -> Self {
        Self::ShapeMismatch(mismatch)
    }
}

impl core::fmt::Display for ConstructError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::ShapeMismatch(mismatch) => core::fmt::Display::fmt(mismatch, f),
            Self::NullReturn { constructor } => write!(f, "{constructor} returned NULL"),
            Self::AlreadyInitialized { class } => {
                write!(f, "{class} instance is already initialized")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConstructError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ShapeMismatch(mismatch) => Some(mismatch),
            _ => None,
        }
    }
}

/// What [`ConstructorInfo::invoke()`] does with a value returned by a constructor whose return
/// type was refused.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum RejectedReturn {
    /// The value is discarded as is. If it was an object, its reference is never released.
    #[default]
    Leak,
    /// If the return type is an interface whose instances are objects, and the value carries a
    /// reference owned by the caller, that reference is released. Other values are discarded as
    /// with [`RejectedReturn::Leak`].
    Release,
}

/// A [`CallableInfo`] describing a constructor, which is invoked to initialize a [`Receiver`].
#[derive(Clone, Debug)]
pub struct ConstructorInfo {
    info: CallableInfo,
    rejected_return: RejectedReturn,
}

impl ConstructorInfo {
    /// Wraps the given descriptor.
    pub fn new(info: CallableInfo) -> Self {
        Self {
            info,
            rejected_return: RejectedReturn::default(),
        }
    }

    /// Sets what happens to return values that are refused.
    pub fn with_rejected_return(mut self, policy: RejectedReturn) -> Self {
        self.rejected_return = policy;
        self
    }

    /// The descriptor of the native constructor.
    pub fn info(&self) -> &CallableInfo {
        &self.info
    }

    #[allow(missing_docs)]
    pub fn rejected_return(&self) -> RejectedReturn {
        self.rejected_return
    }

    /// Checks that the declared return type describes an object.
    pub fn check_return_type(&self) -> Result<(), ShapeMismatch> {
        let return_type = self.info.return_type();
        match return_type {
            TypeInfo::Interface(interface) => match interface.info_type() {
                InfoType::Object => Ok(()),
                info_type => Err(ShapeMismatch::NotObject {
                    constructor: self.info.symbol().into(),
                    info_type,
                }),
            },
            TypeInfo::Basic(_) | TypeInfo::Array { .. } => Err(ShapeMismatch::NotInterface {
                constructor: self.info.symbol().into(),
                tag: return_type.tag(),
            }),
        }
    }

    /// Calls the native constructor with the given `args`, and binds the object it returns to
    /// the `receiver`.
    ///
    /// The `args` exclude the receiver, and are passed to [`Library::invoke_raw()`] as is. Once
    /// the native function returns, the declared return type is checked. The native call happens
    /// even if the return type is wrong.
    ///
    /// The returned object is claimed with [`ref_sink()`]: a floating reference becomes owned by
    /// the `receiver`, otherwise a new reference is added for it. On success, the `receiver` owns
    /// exactly one reference to the object, and is returned.
    ///
    /// # Errors
    ///
    /// - If the `receiver` is already bound to an object, [`ConstructError::AlreadyInitialized`]
    ///   is returned before calling the native function.
    /// - Errors from [`Library::invoke_raw()`], including those of the native function, are
    ///   returned unchanged.
    /// - If the declared return type is not an object, [`ConstructError::ShapeMismatch`] is
    ///   returned. The returned value is handled according to the [`RejectedReturn`] policy.
    /// - If the constructor returned a null pointer, [`ConstructError::NullReturn`] is returned.
    ///
    /// In all of these cases, the `receiver` is left unmodified.
    pub fn invoke<E>(
        &self,
        library: &Library<E>,
        receiver: &Rc<Receiver>,
        args: &[Value],
        site: Option<&'static CallSite>,
    ) -> Result<Rc<Receiver>, E>
    where
        E: Raise<InvokeError> + Raise<ConstructError>,
    {
        let symbol = self.info.symbol();

        if receiver.is_initialized() {
            return Err(E::raise(
                ConstructError::AlreadyInitialized {
                    class: receiver.class().name().into(),
                },
                site,
            ));
        }

        tracing::trace!(constructor = symbol, args = args.len(), "invoking constructor");

        let result = library.invoke_raw(&self.info, args, site)?;

        if let Err(mismatch) = self.check_return_type() {
            self.reject(result, &mismatch);
            return Err(E::raise(ConstructError::ShapeMismatch(mismatch), site));
        }

        // SAFETY: the return type describes an object.
        let raw = unsafe { result.as_object() };
        let Some(raw) = raw else {
            return Err(E::raise(
                ConstructError::NullReturn {
                    constructor: symbol.into(),
                },
                site,
            ));
        };

        // SAFETY: native functions return live objects for object return types.
        let object = unsafe { ref_sink(raw) };

        tracing::debug!(
            constructor = symbol,
            type_name = object.type_name(),
            ref_count = object.ref_count(),
            "claimed constructed object"
        );

        if let Err(object) = receiver.initialize(object) {
            drop(object);
            return Err(E::raise(
                ConstructError::AlreadyInitialized {
                    class: receiver.class().name().into(),
                },
                site,
            ));
        }

        Ok(receiver.clone())
    }

    fn reject(&self, result: Argument, mismatch: &ShapeMismatch) {
        let symbol = self.info.symbol();
        let releasable = self.rejected_return == RejectedReturn::Release
            && matches!(
                mismatch,
                ShapeMismatch::NotObject {
                    info_type: InfoType::Interface,
                    ..
                }
            );

        if !releasable {
            if !result.is_zero() {
                tracing::warn!(constructor = symbol, "discarding rejected return value");
            }
            return;
        }

        // SAFETY: instances of interfaces are objects.
        let Some(raw) = (unsafe { result.as_object() }) else {
            return;
        };

        // SAFETY: native functions return live objects for interface return types.
        let floating = unsafe { raw.is_floating() };
        if !floating && self.info.caller_owns() != Transfer::Everything {
            tracing::trace!(constructor = symbol, "rejected return value is not owned");
            return;
        }

        // SAFETY: the reference carried by `raw` belongs to the caller.
        let object = unsafe {
            if floating {
                ref_sink(raw)
            } else {
                Object::from_raw_full(raw)
            }
        };

        tracing::debug!(
            constructor = symbol,
            type_name = object.type_name(),
            "releasing rejected return value"
        );

        drop(object);
    }
}

impl From<CallableInfo> for ConstructorInfo {
    fn from(info: CallableInfo) -> Self {
        Self::new(info)
    }
}

//! Provides the [`Raise`] trait.

use crate::site::CallSite;

/// Trait for error types of an embedding host.
///
/// Code that calls into native functions is generic over the host error type, and requires an
/// implementation of [`Raise<C>`] for every cause `C` that it can report. Errors produced by the
/// native functions themselves are already of the host error type, and are passed through
/// unchanged.
pub trait Raise<C: core::fmt::Debug>: core::fmt::Debug {
    /// Creates a host error with the given cause and an optional [`CallSite`] indicating which
    /// host method was being called.
    fn raise(cause: C, site: Option<&'static CallSite>) -> Self
    where
        Self: Sized;

    /// Attempts to interpret the error as an [`std::error::Error`].
    #[cfg(feature = "std")]
    fn as_error(&self) -> Option<&(dyn std::error::Error + '_)> {
        None
    }
}

/// Implementation of [`Raise`] that only records that an error occurred, without storing
/// additional information.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, PartialOrd, Ord)]
#[allow(clippy::exhaustive_structs)]
pub struct ErrorOccurred;

impl core::fmt::Display for ErrorOccurred {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("host error occurred")
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ErrorOccurred {}

impl<C: core::fmt::Debug> Raise<C> for ErrorOccurred {
    fn raise(_: C, _: Option<&'static CallSite>) -> Self {
        Self
    }

    #[cfg(feature = "std")]
    fn as_error(&self) -> Option<&(dyn std::error::Error + '_)> {
        Some(self)
    }
}

#[cfg(feature = "anyhow")]
impl<C> Raise<C> for anyhow::Error
where
    C: core::fmt::Debug + core::fmt::Display + Send + Sync + 'static,
{
    fn raise(cause: C, site: Option<&'static CallSite>) -> Self {
        let mut err = anyhow::anyhow!(cause);
        if let Some(site) = site {
            err = err.context(site);
        }
        err
    }

    #[cfg(feature = "std")]
    fn as_error(&self) -> Option<&(dyn std::error::Error + '_)> {
        Some(self.as_ref())
    }
}

/// Helper trait for producing host errors out of [`Result`]s.
pub trait RaiseWith<T, C: core::fmt::Debug> {
    /// Produces a host error from a [`Result`]'s [`Err`] case.
    fn raise_with<E: Raise<C>>(self, site: Option<&'static CallSite>) -> Result<T, E>;
}

impl<T, C: core::fmt::Debug> RaiseWith<T, C> for Result<T, C> {
    #[inline]
    fn raise_with<E: Raise<C>>(self, site: Option<&'static CallSite>) -> Result<T, E> {
        match self {
            Ok(ok) => Ok(ok),
            Err(cause) => Err(E::raise(cause, site)),
        }
    }
}

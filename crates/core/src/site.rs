//! Provides the [`CallSite`] struct.

/// Describes the host method that was being called when an error was raised.
///
/// Host bindings keep these in `static`s so that an error can refer to one without allocating.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[allow(clippy::exhaustive_structs)]
pub struct CallSite {
    /// The name of the host class that the method is defined on.
    pub class: &'static str,
    /// The name of the method.
    pub method: &'static str,
}

impl CallSite {
    /// Creates a new [`CallSite`] for the given `class` and `method`.
    pub const fn new(class: &'static str, method: &'static str) -> Self {
        Self { class, method }
    }
}

impl core::fmt::Display for CallSite {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "in {}#{}", self.class, self.method)
    }
}

//! Invokes natively implemented constructors discovered through runtime introspection, and binds
//! the objects they return to host instances.
//!
//! The central piece is [`ConstructorInfo::invoke()`], which calls the native function described
//! by a [`CallableInfo`], checks that the declared return type is an object, takes ownership of
//! the returned object with [`ref_sink()`], and stores it in a [`Receiver`].
//!
//! The [`Runtime`] exposes this as the `invoke` method of the host class `ConstructorInfo`, and
//! the [`Loader`] defines host classes with class-level constructors for the object types of a
//! namespace in the [`Repository`].
//!
//! # Related Crates
//!
//! The implementation is split into multiple component crates, which are re-exported here:
//! - [`ctorbridge_core`], which provides the [`Raise`] trait used to report errors. It's modules
//!   are re-exported in the crate root.
//! - [`ctorbridge_info`], re-exported as the [`info`] module, which contains the introspection
//!   descriptors and the [`Repository`].
//! - [`ctorbridge_object`], re-exported as the [`object`] module, which implements reference
//!   counted native objects.
//! - [`ctorbridge_invoke`], re-exported as the [`invoke`] module, which converts host values and
//!   calls native functions.
//!
//! # Feature Flags
//!
//! ## `std`
//!
//! Enables a dependency on the [Rust standard library](std), providing [`std::error::Error`]
//! implementations for the error types.
//!
//! - Enabled by: `default`
//!
//! ## `anyhow`
//!
//! Implements [`Raise`] for [`anyhow::Error`], allowing it to be used as the error type of
//! [`ConstructorInfo::invoke()`].
//!
//! [`CallableInfo`]: info::CallableInfo
//! [`Repository`]: info::Repository
//! [`ref_sink()`]: object::ref_sink()
//! [`Raise`]: raise::Raise
//! [`anyhow::Error`]: https://docs.rs/anyhow/latest/anyhow/struct.Error.html

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![deny(missing_debug_implementations)]
#![deny(missing_docs)]
#![deny(unreachable_pub)]
#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::missing_safety_doc)]
#![deny(clippy::alloc_instead_of_core)]
#![deny(clippy::std_instead_of_alloc)]
#![deny(clippy::cast_possible_truncation)]

#[cfg(feature = "std")]
extern crate std;

extern crate alloc;

mod constructor;
mod error;
mod loader;
mod receiver;
mod runtime;

pub use constructor::{ConstructError, ConstructorInfo, RejectedReturn, ShapeMismatch};
pub use ctorbridge_core::{raise, site};
pub use ctorbridge_info as info;
pub use ctorbridge_invoke as invoke;
pub use ctorbridge_object as object;
pub use error::{BridgeCause, BridgeError, ExceptionClass};
pub use loader::{LoadHooks, Loader};
pub use receiver::Receiver;
pub use runtime::{
    Arity, Class, GType, InfoValue, Method, MethodFn, Runtime, RuntimeBuilder, TypeRegistry,
};

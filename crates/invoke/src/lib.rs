//! Calls natively implemented functions described by a [`CallableInfo`].
//!
//! Host [`Value`]s are converted into untyped [`Argument`]s according to the argument types of
//! the [`CallableInfo`], then passed to the native function registered in a [`Library`] under
//! the descriptor's symbol. The [`Argument`] returned by the native function is handed back as
//! is; interpreting it is up to the caller.
//!
//! [`CallableInfo`]: ctorbridge_info::CallableInfo

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![deny(missing_debug_implementations)]
#![deny(missing_docs)]
#![deny(unreachable_pub)]
#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::cast_possible_truncation)]
#![deny(clippy::missing_safety_doc)]
#![deny(clippy::alloc_instead_of_core)]
#![deny(clippy::std_instead_of_core)]

#[cfg(feature = "std")]
extern crate std;

extern crate alloc;

mod argument;
mod error;
mod library;
mod marshal;
mod value;

pub use argument::Argument;
pub use error::InvokeError;
pub use library::{Library, NativeFn};
pub use value::{ForeignValue, Value};

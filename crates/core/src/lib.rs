//! Provides the foundation shared by the `ctorbridge-*` crates.
//!
//! The `ctorbridge-*` crates each implement one part of calling natively implemented
//! constructors that are described by runtime introspection data. This crate contains the
//! [`Raise`] trait, which generic code uses to turn a failure into the error type of the
//! embedding host.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![deny(missing_debug_implementations)]
#![deny(missing_docs)]
#![deny(unreachable_pub)]
#![forbid(unsafe_code)]
#![deny(clippy::cast_possible_truncation)]
#![deny(clippy::exhaustive_enums)]
#![deny(clippy::exhaustive_structs)]
#![deny(clippy::std_instead_of_core)]

#[cfg(feature = "std")]
extern crate std;

pub mod raise;
pub mod site;

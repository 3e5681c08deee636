//! Descriptors for natively implemented functions and types, discovered at runtime rather than
//! at compile time.
//!
//! A [`Repository`] contains the [`BaseInfo`]s of one or more namespaces. Object and struct
//! infos list their methods as [`CallableInfo`]s, which describe the argument and return types
//! of a native function with [`TypeInfo`]s.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![deny(missing_debug_implementations)]
#![deny(missing_docs)]
#![deny(unreachable_pub)]
#![forbid(unsafe_code)]
#![deny(clippy::cast_possible_truncation)]
#![deny(clippy::alloc_instead_of_core)]
#![deny(clippy::std_instead_of_core)]

#[cfg(feature = "std")]
extern crate std;

extern crate alloc;

mod base;
mod callable;
mod info_type;
mod repository;
mod type_info;
mod type_tag;

pub use base::{BaseInfo, BaseInfoBuilder};
pub use callable::{ArgInfo, CallableInfo, CallableInfoBuilder, Direction, FunctionFlags, Transfer};
pub use info_type::InfoType;
pub use repository::{Namespace, Repository, RepositoryError};
pub use type_info::{BasicType, TypeInfo};
pub use type_tag::TypeTag;

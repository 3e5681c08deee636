//! Reference counted objects that are created by native code and handed to a host.
//!
//! Native constructors typically return a *floating* reference: the object has a reference
//! count of one, but nobody owns that reference yet. The host claims it with [`ref_sink()`],
//! which produces an [`Object`] owning exactly one strong reference.
//!
//! Objects are not thread safe; reference counts are stored in [`Cell`]s.
//!
//! [`Cell`]: core::cell::Cell

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![deny(missing_debug_implementations)]
#![deny(missing_docs)]
#![deny(unreachable_pub)]
#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::cast_possible_truncation)]
#![deny(clippy::exhaustive_enums)]
#![deny(clippy::missing_safety_doc)]
#![deny(clippy::alloc_instead_of_core)]
#![deny(clippy::std_instead_of_core)]

#[cfg(feature = "std")]
extern crate std;

extern crate alloc;

mod class;
mod header;
mod object;
mod raw;

pub use class::ObjectClass;
pub use object::{new_floating, new_owned, ref_sink, Object};
pub use raw::RawObject;

//! Managed object base shared by every ledger entity.
//!
//! A [`Managed`] handle gives its value shared ownership with a reference
//! count and a bounded last-error slot. Plain values are the single-owner
//! form; wrap them when they need to be referenced from several collections.

pub mod handle;
mod last_error;
mod managed;

pub use last_error::{LAST_ERROR_CAPACITY, LastError, NULL_OBJECT_MESSAGE};
pub use managed::Managed;

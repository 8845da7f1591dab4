//! Null-tolerant handle operations.
//!
//! These are safe to call unconditionally from cleanup paths: a missing handle
//! is never an error here.

use crate::{Managed, NULL_OBJECT_MESSAGE};

/// Takes a new strong reference, or returns `None` for a missing handle.
pub fn acquire<T>(obj: Option<&Managed<T>>) -> Option<Managed<T>> {
    obj.cloned()
}

/// Releases the handle held in `slot` and leaves the slot empty so the caller
/// cannot reuse it.
pub fn release<T>(slot: &mut Option<Managed<T>>) {
    drop(slot.take());
}

/// Current strong count, 0 for a missing handle.
pub fn refcount<T>(obj: Option<&Managed<T>>) -> usize {
    obj.map_or(0, Managed::refcount)
}

/// Records `msg` on the object; does nothing for a missing handle.
pub fn set_last_error<T>(obj: Option<&Managed<T>>, msg: Option<&str>) {
    if let Some(obj) = obj {
        obj.set_last_error(msg);
    }
}

/// Last recorded message, or [`NULL_OBJECT_MESSAGE`] for a missing handle.
pub fn get_last_error<T>(obj: Option<&Managed<T>>) -> String {
    match obj {
        Some(obj) => obj.last_error(),
        None => NULL_OBJECT_MESSAGE.to_owned(),
    }
}

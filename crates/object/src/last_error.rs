//! Bounded per-instance diagnostic slot.

use std::cell::RefCell;

use tracing::debug;

/// Maximum number of bytes a stored message may occupy.
///
/// Messages longer than this are cut at the nearest character boundary below
/// the limit.
pub const LAST_ERROR_CAPACITY: usize = 1023;

/// Message reported when asking a missing object for its last error.
pub const NULL_OBJECT_MESSAGE: &str = "Object is NULL.";

/// Holds the most recent diagnostic message recorded against one object.
///
/// Writes go through a shared reference so that an object reachable from
/// several owners can still record what went wrong with it.
#[derive(Debug, Default)]
pub struct LastError {
    message: RefCell<String>,
}

impl LastError {
    /// Creates an empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the stored message, or clears it when `msg` is `None`.
    pub fn set(&self, msg: Option<&str>) {
        let mut slot = self.message.borrow_mut();
        slot.clear();

        let Some(msg) = msg else {
            return;
        };

        let kept = truncate_to_boundary(msg, LAST_ERROR_CAPACITY);
        if kept.len() < msg.len() {
            debug!(
                len = msg.len(),
                cap = LAST_ERROR_CAPACITY,
                "truncating last error message"
            );
        }

        slot.push_str(kept);
    }

    /// Returns a copy of the stored message, empty if none was recorded.
    pub fn get(&self) -> String {
        self.message.borrow().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.message.borrow().is_empty()
    }
}

fn truncate_to_boundary(msg: &str, cap: usize) -> &str {
    if msg.len() <= cap {
        return msg;
    }

    let mut end = cap;
    while !msg.is_char_boundary(end) {
        end -= 1;
    }

    &msg[..end]
}

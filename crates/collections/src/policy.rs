//! Storage growth policies.
//!
//! Every collection carries a policy that is consulted before its storage is
//! grown. The default never refuses; [`FailAfter`] refuses after a fixed
//! number of grants so allocation failure paths can be exercised.

use std::{cell::Cell, fmt::Debug, rc::Rc};

/// Decides whether a collection may grow its storage.
pub trait GrowthPolicy: Debug {
    /// Asked before a collection currently holding `len` elements makes room
    /// for `additional` more. Returning `false` makes the operation fail with
    /// [`AllocationFailed`](crate::CollectionError::AllocationFailed).
    fn permit(&self, len: usize, additional: usize) -> bool;
}

/// Policy that never refuses.
#[derive(Copy, Clone, Debug, Default)]
pub struct Unbounded;

impl GrowthPolicy for Unbounded {
    fn permit(&self, _len: usize, _additional: usize) -> bool {
        true
    }
}

/// Policy that grants a fixed number of requests and refuses every one after.
#[derive(Debug)]
pub struct FailAfter {
    remaining: Cell<usize>,
}

impl FailAfter {
    /// Grants `grants` requests before refusing.
    pub fn new(grants: usize) -> Self {
        Self {
            remaining: Cell::new(grants),
        }
    }

    /// Number of requests that will still be granted.
    pub fn remaining(&self) -> usize {
        self.remaining.get()
    }

    /// Resets the number of remaining grants.
    pub fn reset(&self, grants: usize) {
        self.remaining.set(grants);
    }
}

impl GrowthPolicy for FailAfter {
    fn permit(&self, _len: usize, _additional: usize) -> bool {
        match self.remaining.get() {
            0 => false,
            n => {
                self.remaining.set(n - 1);
                true
            }
        }
    }
}

/// Shared policy handle, inherited by collections derived from another one.
pub type SharedPolicy = Rc<dyn GrowthPolicy>;

pub(crate) fn default_policy() -> SharedPolicy {
    Rc::new(Unbounded)
}

//! Wire encodings and the list/set flavour markers.

use serde::{Deserialize, Serialize};

/// CBOR tag marking an array as a set.
pub const SET_TAG: u64 = 258;

/// How a collection is written on the wire.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Encoding {
    /// Plain definite-length array.
    Array,

    /// Array wrapped in tag 258.
    #[default]
    TaggedSet,
}

impl Encoding {
    pub fn is_tagged(self) -> bool {
        matches!(self, Self::TaggedSet)
    }
}

/// Marker distinguishing list collections from set collections.
pub trait Flavor: 'static {
    /// Short name used in diagnostics.
    const NAME: &'static str;

    /// Encoding a new collection of this flavour starts with.
    const DEFAULT_ENCODING: Encoding;

    /// Narrows a requested encoding to one this flavour supports.
    fn select(requested: Encoding) -> Encoding;
}

/// Ordered list: always a plain array, duplicates allowed.
#[derive(Debug)]
pub enum ListFlavor {}

impl Flavor for ListFlavor {
    const NAME: &'static str = "list";
    const DEFAULT_ENCODING: Encoding = Encoding::Array;

    fn select(_requested: Encoding) -> Encoding {
        Encoding::Array
    }
}

/// Set: may be written with the tag 258 wrapper.
#[derive(Debug)]
pub enum SetFlavor {}

impl Flavor for SetFlavor {
    const NAME: &'static str = "set";
    const DEFAULT_ENCODING: Encoding = Encoding::TaggedSet;

    fn select(requested: Encoding) -> Encoding {
        requested
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_never_tags() {
        assert_eq!(ListFlavor::select(Encoding::TaggedSet), Encoding::Array);
        assert_eq!(ListFlavor::DEFAULT_ENCODING, Encoding::Array);
    }

    #[test]
    fn test_set_defaults_tagged() {
        assert_eq!(SetFlavor::DEFAULT_ENCODING, Encoding::TaggedSet);
        assert_eq!(SetFlavor::select(Encoding::Array), Encoding::Array);
    }
}

use serde::{Deserialize, Serialize};

use crate::Encoding;

/// Default value for `initial_capacity` in [`CollectionParams`].
const DEFAULT_INITIAL_CAPACITY: usize = 0;

/// Default bound on how deeply collections may nest inside one another
/// while decoding.
pub const DEFAULT_MAX_DECODE_DEPTH: usize = 32;

/// Parameters controlling how collections are built and decoded.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct CollectionParams {
    /// Encoding newly built sets use. Lists ignore this.
    #[serde(default = "default_set_encoding")]
    pub set_encoding: Encoding,

    /// Number of slots reserved up front by a new collection.
    #[serde(default = "default_initial_capacity")]
    pub initial_capacity: usize,

    /// Largest element count a decoder will accept from a definite-length
    /// header. Unlimited if unset.
    #[serde(default)]
    pub max_decode_len: Option<u64>,

    /// Deepest nesting of collections a decoder will follow, counting the
    /// outermost collection as 1.
    #[serde(default = "default_max_decode_depth")]
    pub max_decode_depth: usize,
}

impl Default for CollectionParams {
    fn default() -> Self {
        Self {
            set_encoding: default_set_encoding(),
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            max_decode_len: None,
            max_decode_depth: DEFAULT_MAX_DECODE_DEPTH,
        }
    }
}

impl CollectionParams {
    pub fn decode_limits(&self) -> DecodeLimits {
        DecodeLimits {
            max_len: self.max_decode_len,
            max_depth: self.max_decode_depth,
        }
    }
}

fn default_set_encoding() -> Encoding {
    Encoding::TaggedSet
}

fn default_initial_capacity() -> usize {
    DEFAULT_INITIAL_CAPACITY
}

fn default_max_decode_depth() -> usize {
    DEFAULT_MAX_DECODE_DEPTH
}

/// Bounds enforced while decoding untrusted input.
///
/// Collections nested inside the elements of a collection being decoded
/// inherit the outer limits.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct DecodeLimits {
    /// Maximum number of elements, for both definite and indefinite arrays.
    pub max_len: Option<u64>,

    /// Maximum nesting depth of collections.
    pub max_depth: usize,
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self {
            max_len: None,
            max_depth: DEFAULT_MAX_DECODE_DEPTH,
        }
    }
}

impl DecodeLimits {
    pub fn with_max_len(max_len: u64) -> Self {
        Self {
            max_len: Some(max_len),
            ..Self::default()
        }
    }

    pub fn max_depth(self, max_depth: usize) -> Self {
        Self { max_depth, ..self }
    }

    /// Returns the limit that `len` breaks, if any.
    pub(crate) fn exceeded_by(&self, len: u64) -> Option<u64> {
        self.max_len.filter(|&max| len > max)
    }
}

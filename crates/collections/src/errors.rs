use thiserror::Error;

pub type CollectionResult<T> = Result<T, CollectionError>;

/// Message used when a collection is expected but some other CBOR item is
/// found.
pub const MAJOR_TYPE_MISMATCH: &str = "major type mismatch";

/// Errors raised by collection operations and the collection codec.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollectionError {
    /// A required handle was absent.
    #[error("required argument is null")]
    NullArgument,

    /// The growth policy or the allocator refused to provide storage.
    #[error("memory allocation failed")]
    AllocationFailed,

    #[error("index {index} out of bounds for collection of length {len}")]
    OutOfBounds { index: usize, len: usize },

    /// Range passed to `slice` does not lie within the collection.
    #[error("invalid range {start}..{end} for collection of length {len}")]
    InvalidRange { start: usize, end: usize, len: usize },

    /// An element encoder reported a failure.
    #[error("encoding failed: {0}")]
    Encoding(String),

    /// Malformed or structurally wrong CBOR.
    #[error("decoding failed: {0}")]
    Decoding(String),

    /// Declared element count exceeds the configured decode limit.
    #[error("declared length {declared} exceeds limit {limit}")]
    LimitExceeded { declared: u64, limit: u64 },

    /// Collections nest deeper than the configured decode limit.
    #[error("collections nested deeper than {limit}")]
    DepthExceeded { limit: usize },
}

impl CollectionError {
    /// Returns if this is a decode-side failure.
    pub fn is_decoding(&self) -> bool {
        matches!(
            self,
            Self::Decoding(_) | Self::LimitExceeded { .. } | Self::DepthExceeded { .. }
        )
    }
}

impl From<minicbor::decode::Error> for CollectionError {
    fn from(err: minicbor::decode::Error) -> Self {
        Self::Decoding(err.to_string())
    }
}

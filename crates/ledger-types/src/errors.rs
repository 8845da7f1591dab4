use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerTypeError {
    #[error("invalid length: expected {expected} bytes, got {got}")]
    InvalidLength { expected: usize, got: usize },

    #[error("invalid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),
}

pub type LedgerTypeResult<T> = Result<T, LedgerTypeError>;

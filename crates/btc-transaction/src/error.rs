use btc_primitives::{ErrorKind, PrimitivesError};
use btc_script::ScriptError;

/// Error types for transaction operations.
#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    /// The transaction structure is invalid (e.g. an unsupported segwit flag).
    #[error("invalid transaction: {0}")]
    InvalidTransaction(String),
    /// Signing could not proceed (e.g. input index out of range, unrecognized
    /// funding script).
    #[error("signing error: {0}")]
    SigningError(String),
    /// An error occurred during binary/hex serialization or deserialization.
    #[error("serialization error: {0}")]
    SerializationError(String),
    /// An amount was out of range or a sum of amounts overflowed.
    #[error("amount error: {0}")]
    AmountError(String),
    /// An underlying script error (forwarded from `btc-script`).
    #[error("script error: {0}")]
    Script(#[from] ScriptError),
    /// An underlying primitives error (forwarded from `btc-primitives`).
    #[error("primitives error: {0}")]
    Primitives(#[from] PrimitivesError),
}

impl TransactionError {
    /// Coarse category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            TransactionError::InvalidTransaction(_) | TransactionError::SerializationError(_) => {
                ErrorKind::Format
            }
            TransactionError::SigningError(_) => ErrorKind::SignatureInput,
            TransactionError::AmountError(_) => ErrorKind::Arithmetic,
            TransactionError::Script(e) => e.kind(),
            TransactionError::Primitives(e) => e.kind(),
        }
    }
}

use btc_primitives::{ErrorKind, PrimitivesError};

/// Error types for script and address operations.
///
/// Covers malformed script bytes, ASM parsing, push encoding limits and
/// address decoding.
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    /// Generic invalid script error.
    #[error("invalid script: {0}")]
    InvalidScript(String),

    /// Invalid opcode data encountered during ASM parsing.
    #[error("invalid opcode data: {0}")]
    InvalidOpcodeData(String),

    /// A push opcode was passed where only non-push opcodes are allowed.
    #[error("use push_data for push opcodes: {0}")]
    InvalidOpcodeType(String),

    /// Invalid address string.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// The script has no address form.
    #[error("no address for script {0}")]
    UnsupportedAddress(String),

    /// Invalid hex string.
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    /// Not enough data in script to complete a push operation.
    #[error("not enough data")]
    DataTooSmall,

    /// Push data exceeds maximum allowed size.
    #[error("data too big")]
    DataTooBig,

    /// Error from primitives crate.
    #[error("primitives error: {0}")]
    Primitives(#[from] PrimitivesError),
}

impl ScriptError {
    /// Coarse category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ScriptError::Primitives(e) => e.kind(),
            _ => ErrorKind::Format,
        }
    }
}

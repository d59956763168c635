/// Broad failure category shared by every crate in the workspace.
///
/// Each crate-level error type maps onto one of these through a `kind()`
/// method so callers can branch on the category without matching every
/// variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed input: bad varint, truncated stream, bad opcode or length,
    /// invalid characters in a text encoding.
    Format,
    /// A Base58Check or Bech32/Bech32m checksum did not verify.
    Checksum,
    /// Signing could not proceed: out-of-range index, unrecognized script
    /// template, invalid key.
    SignatureInput,
    /// An amount sum overflowed or went out of range.
    Arithmetic,
}

/// Unified error type for all primitives operations.
///
/// Covers errors from hashing, EC operations, encoding, and key management.
#[derive(Debug, thiserror::Error)]
pub enum PrimitivesError {
    #[error("invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    #[error("invalid WIF format: {0}")]
    InvalidWif(String),

    #[error("checksum mismatch")]
    ChecksumMismatch,

    #[error("invalid hex: {0}")]
    InvalidHex(String),

    #[error("invalid hash: {0}")]
    InvalidHash(String),

    #[error("invalid base58: {0}")]
    InvalidBase58(String),

    #[error("invalid bech32: {0}")]
    InvalidBech32(String),

    #[error("unknown network: {0}")]
    UnknownNetwork(String),

    #[error("unexpected end of data")]
    UnexpectedEof,
}

impl PrimitivesError {
    /// Classify this error into the shared failure taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            PrimitivesError::InvalidPrivateKey(_) | PrimitivesError::InvalidPublicKey(_) => {
                ErrorKind::SignatureInput
            }
            PrimitivesError::ChecksumMismatch => ErrorKind::Checksum,
            PrimitivesError::InvalidSignature(_)
            | PrimitivesError::InvalidWif(_)
            | PrimitivesError::InvalidHex(_)
            | PrimitivesError::InvalidHash(_)
            | PrimitivesError::InvalidBase58(_)
            | PrimitivesError::InvalidBech32(_)
            | PrimitivesError::UnknownNetwork(_)
            | PrimitivesError::UnexpectedEof => ErrorKind::Format,
        }
    }
}

impl From<hex::FromHexError> for PrimitivesError {
    fn from(e: hex::FromHexError) -> Self {
        PrimitivesError::InvalidHex(e.to_string())
    }
}

impl From<::bech32::Error> for PrimitivesError {
    fn from(e: ::bech32::Error) -> Self {
        match e {
            ::bech32::Error::InvalidChecksum => PrimitivesError::ChecksumMismatch,
            other => PrimitivesError::InvalidBech32(other.to_string()),
        }
    }
}

/// Bitcoin SDK - Cryptographic primitives, hashing, and wire codecs.
///
/// This crate provides the foundational building blocks for transaction
/// construction and signing:
/// - Hash functions (SHA-256, SHA-256d, RIPEMD-160, Hash160)
/// - Chain hash type for transaction identification
/// - Protocol variable-length integers and a byte reader/writer
/// - Base58Check and Bech32/Bech32m text encodings
/// - secp256k1 keys and low-S DER ECDSA signatures
/// - Network parameters (address version bytes, WIF prefix, bech32 prefix)

pub mod hash;
pub mod chainhash;
pub mod util;
pub mod base58;
pub mod bech32;
pub mod ec;
pub mod network;

mod error;
pub use error::{ErrorKind, PrimitivesError};
pub use network::{Network, NetworkParams};

//! secp256k1 private key.
//!
//! Wraps a k256 signing key and adds WIF encoding and construction from
//! short big-endian secrets.

use std::fmt;

use k256::ecdsa::SigningKey;
use rand::rngs::OsRng;
use zeroize::Zeroizing;

use crate::base58;
use crate::ec::public_key::PublicKey;
use crate::ec::signature::Signature;
use crate::network::NetworkParams;
use crate::PrimitivesError;

/// Length of a serialized private key in bytes.
const PRIVATE_KEY_BYTES_LEN: usize = 32;

/// Flag byte appended to a WIF payload for keys with compressed public keys.
const COMPRESS_MAGIC: u8 = 0x01;

/// A secp256k1 private key: a scalar in `[1, n-1]`.
///
/// Keys are immutable once constructed. The secret is never printed by
/// `Debug`.
#[derive(Clone)]
pub struct PrivateKey {
    inner: SigningKey,
}

impl PrivateKey {
    /// Generate a new random private key using the OS random number generator.
    pub fn new() -> Self {
        PrivateKey {
            inner: SigningKey::random(&mut OsRng),
        }
    }

    /// Create a private key from a raw 32-byte big-endian scalar.
    ///
    /// # Arguments
    /// * `bytes` - Exactly 32 bytes.
    ///
    /// # Returns
    /// `Ok(PrivateKey)`, or `InvalidPrivateKey` if the length is wrong or
    /// the scalar is zero or not below the curve order.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        if bytes.len() != PRIVATE_KEY_BYTES_LEN {
            return Err(PrimitivesError::InvalidPrivateKey(format!(
                "expected {} bytes, got {}",
                PRIVATE_KEY_BYTES_LEN,
                bytes.len()
            )));
        }
        let inner = SigningKey::from_bytes(bytes.into())
            .map_err(|_| PrimitivesError::InvalidPrivateKey("scalar out of range".to_string()))?;
        Ok(PrivateKey { inner })
    }

    /// Create a private key from a big-endian secret of at most 32 bytes.
    ///
    /// Shorter secrets are left-padded with zeros, so a 16-byte secret is
    /// read as the same integer it denotes.
    ///
    /// # Arguments
    /// * `secret` - Big-endian integer bytes, 1 to 32 long.
    ///
    /// # Returns
    /// `Ok(PrivateKey)`, or `InvalidPrivateKey` if the secret is empty,
    /// longer than 32 bytes, zero, or not below the curve order.
    pub fn from_secret_bytes(secret: &[u8]) -> Result<Self, PrimitivesError> {
        if secret.is_empty() || secret.len() > PRIVATE_KEY_BYTES_LEN {
            return Err(PrimitivesError::InvalidPrivateKey(format!(
                "secret must be 1 to {} bytes, got {}",
                PRIVATE_KEY_BYTES_LEN,
                secret.len()
            )));
        }
        let mut padded = Zeroizing::new([0u8; PRIVATE_KEY_BYTES_LEN]);
        padded[PRIVATE_KEY_BYTES_LEN - secret.len()..].copy_from_slice(secret);
        Self::from_bytes(padded.as_ref())
    }

    /// Create a private key from a hexadecimal secret.
    ///
    /// Accepts up to 64 hex characters; shorter values are left-padded.
    pub fn from_hex(hex_str: &str) -> Result<Self, PrimitivesError> {
        let bytes = Zeroizing::new(hex::decode(hex_str)?);
        Self::from_secret_bytes(&bytes)
    }

    /// Decode a WIF (Wallet Import Format) private key.
    ///
    /// # Arguments
    /// * `wif` - Base58Check text of `prefix || key || [0x01]`.
    ///
    /// # Returns
    /// The key and the WIF prefix byte it was encoded with, or an error if
    /// the checksum, length or compression flag is wrong.
    pub fn from_wif(wif: &str) -> Result<(Self, u8), PrimitivesError> {
        let payload = Zeroizing::new(base58::check_decode(wif)?);
        let key_end = 1 + PRIVATE_KEY_BYTES_LEN;
        match payload.len() {
            n if n == key_end => {}
            n if n == key_end + 1 && payload[key_end] == COMPRESS_MAGIC => {}
            n if n == key_end + 1 => {
                return Err(PrimitivesError::InvalidWif(
                    "invalid compression flag".to_string(),
                ))
            }
            n => {
                return Err(PrimitivesError::InvalidWif(format!("invalid length {}", n)));
            }
        }
        let key = Self::from_bytes(&payload[1..key_end])?;
        Ok((key, payload[0]))
    }

    /// Encode the private key as a compressed-key WIF string.
    ///
    /// # Arguments
    /// * `params` - Network whose WIF prefix to use.
    pub fn to_wif(&self, params: &NetworkParams) -> String {
        let mut payload = Zeroizing::new(Vec::with_capacity(PRIVATE_KEY_BYTES_LEN + 2));
        payload.push(params.wif_prefix);
        payload.extend_from_slice(self.to_bytes().as_ref());
        payload.push(COMPRESS_MAGIC);
        base58::check_encode(&payload)
    }

    /// Serialize the private key as a 32-byte big-endian scalar.
    pub fn to_bytes(&self) -> Zeroizing<[u8; 32]> {
        Zeroizing::new(self.inner.to_bytes().into())
    }

    /// Derive the corresponding public key.
    pub fn pub_key(&self) -> PublicKey {
        PublicKey::from_verifying_key(*self.inner.verifying_key())
    }

    /// Sign a 32-byte digest with an RFC6979 deterministic nonce.
    ///
    /// The returned signature is already low-S normalized.
    pub fn sign(&self, hash: &[u8; 32]) -> Result<Signature, PrimitivesError> {
        Signature::sign(hash, self)
    }

    pub(crate) fn signing_key(&self) -> &SigningKey {
        &self.inner
    }
}

impl Default for PrivateKey {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for PrivateKey {
    fn eq(&self, other: &Self) -> bool {
        *self.to_bytes() == *other.to_bytes()
    }
}

impl Eq for PrivateKey {}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("pub_key", &self.pub_key().to_hex())
            .finish_non_exhaustive()
    }
}

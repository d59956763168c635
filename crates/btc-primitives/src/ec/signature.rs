//! ECDSA signatures over secp256k1.
//!
//! Signing uses RFC6979 deterministic nonces. Every signature produced here
//! is low-S normalized, and DER encoding normalizes again so that a
//! signature built from arbitrary components still serializes canonically.

use k256::ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};
use k256::ecdsa;
use k256::elliptic_curve::scalar::IsHigh;
use k256::elliptic_curve::PrimeField;
use k256::{FieldBytes, Scalar};

use crate::ec::private_key::PrivateKey;
use crate::ec::public_key::PublicKey;
use crate::PrimitivesError;

/// DER tag for a SEQUENCE.
const DER_SEQUENCE: u8 = 0x30;
/// DER tag for an INTEGER.
const DER_INTEGER: u8 = 0x02;

/// An ECDSA signature as a pair of 32-byte big-endian integers `(r, s)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signature {
    r: [u8; 32],
    s: [u8; 32],
}

impl Signature {
    /// Create a signature from raw `r` and `s` components.
    ///
    /// No range check is done; use [`Signature::from_der`] to parse
    /// untrusted input.
    pub fn new(r: [u8; 32], s: [u8; 32]) -> Self {
        Signature { r, s }
    }

    /// The `r` component.
    pub fn r(&self) -> &[u8; 32] {
        &self.r
    }

    /// The `s` component.
    pub fn s(&self) -> &[u8; 32] {
        &self.s
    }

    /// Sign a 32-byte digest.
    ///
    /// # Arguments
    /// * `hash` - The digest to sign, used as-is (no further hashing).
    /// * `priv_key` - The signing key.
    ///
    /// # Returns
    /// A low-S signature. The nonce is derived per RFC6979, so signing the
    /// same digest with the same key always yields the same signature.
    pub fn sign(hash: &[u8; 32], priv_key: &PrivateKey) -> Result<Self, PrimitivesError> {
        let sig: ecdsa::Signature = priv_key
            .signing_key()
            .sign_prehash(hash)
            .map_err(|e| PrimitivesError::InvalidSignature(e.to_string()))?;
        let sig = sig.normalize_s().unwrap_or(sig);

        let (r, s) = sig.split_bytes();
        Ok(Signature {
            r: r.into(),
            s: s.into(),
        })
    }

    /// Verify this signature against a digest and public key.
    ///
    /// High-S signatures are rejected.
    pub fn verify(&self, hash: &[u8; 32], pub_key: &PublicKey) -> bool {
        let sig = match ecdsa::Signature::from_scalars(
            FieldBytes::from(self.r),
            FieldBytes::from(self.s),
        ) {
            Ok(sig) => sig,
            Err(_) => return false,
        };
        pub_key.verifying_key().verify_prehash(hash, &sig).is_ok()
    }

    /// Whether `s` is at most half the curve order.
    pub fn is_low_s(&self) -> bool {
        match scalar_from_bytes(&self.s) {
            Some(s) => !bool::from(s.is_high()),
            None => false,
        }
    }

    /// Return a copy with `s` replaced by `n - s` when `s` is high.
    pub fn normalize_s(&self) -> Self {
        let s = match scalar_from_bytes(&self.s) {
            Some(s) if bool::from(s.is_high()) => (-s).to_bytes().into(),
            _ => self.s,
        };
        Signature { r: self.r, s }
    }

    /// Serialize as strict DER, normalizing `s` to the low half first.
    ///
    /// Layout: `0x30 len 0x02 rlen r 0x02 slen s`, with each integer in
    /// minimal form and a leading zero byte when its high bit is set.
    pub fn to_der(&self) -> Vec<u8> {
        let normalized = self.normalize_s();
        let rb = der_int(&normalized.r);
        let sb = der_int(&normalized.s);

        let body_len = 4 + rb.len() + sb.len();
        let mut out = Vec::with_capacity(body_len + 2);
        out.push(DER_SEQUENCE);
        out.push(body_len as u8);
        out.push(DER_INTEGER);
        out.push(rb.len() as u8);
        out.extend_from_slice(&rb);
        out.push(DER_INTEGER);
        out.push(sb.len() as u8);
        out.extend_from_slice(&sb);
        out
    }

    /// Parse a DER-encoded signature.
    ///
    /// The sequence length must cover the input exactly, and both integers
    /// must lie in `[1, n-1]`.
    pub fn from_der(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        if bytes.len() < 8 {
            return Err(malformed("too short"));
        }
        if bytes[0] != DER_SEQUENCE {
            return Err(malformed("no sequence tag"));
        }
        if bytes[1] as usize + 2 != bytes.len() {
            return Err(malformed("bad sequence length"));
        }

        let (r_bytes, rest) = read_der_int(&bytes[2..], "r")?;
        let (s_bytes, rest) = read_der_int(rest, "s")?;
        if !rest.is_empty() {
            return Err(malformed("trailing bytes"));
        }

        let r = to_32_bytes(r_bytes)?;
        let s = to_32_bytes(s_bytes)?;
        ecdsa::Signature::from_scalars(FieldBytes::from(r), FieldBytes::from(s))
            .map_err(|_| malformed("component out of range"))?;
        Ok(Signature { r, s })
    }
}

// ---------------------------------------------------------------------------
// DER helpers
// ---------------------------------------------------------------------------

fn malformed(reason: &str) -> PrimitivesError {
    PrimitivesError::InvalidSignature(format!("malformed signature: {}", reason))
}

fn scalar_from_bytes(bytes: &[u8; 32]) -> Option<Scalar> {
    Option::from(Scalar::from_repr(FieldBytes::from(*bytes)))
}

/// Minimal big-endian form of an unsigned integer for a DER INTEGER.
fn der_int(val: &[u8; 32]) -> Vec<u8> {
    let start = val.iter().position(|&b| b != 0).unwrap_or(31);
    let trimmed = &val[start..];
    let mut out = Vec::with_capacity(trimmed.len() + 1);
    if trimmed[0] & 0x80 != 0 {
        out.push(0x00);
    }
    out.extend_from_slice(trimmed);
    out
}

/// Read one `0x02 len value` element, returning the value and the remainder.
fn read_der_int<'a>(data: &'a [u8], name: &str) -> Result<(&'a [u8], &'a [u8]), PrimitivesError> {
    if data.len() < 2 || data[0] != DER_INTEGER {
        return Err(PrimitivesError::InvalidSignature(format!(
            "malformed signature: no integer marker for {}",
            name
        )));
    }
    let len = data[1] as usize;
    if len == 0 || 2 + len > data.len() {
        return Err(PrimitivesError::InvalidSignature(format!(
            "malformed signature: bogus {} length",
            name
        )));
    }
    Ok((&data[2..2 + len], &data[2 + len..]))
}

fn to_32_bytes(bytes: &[u8]) -> Result<[u8; 32], PrimitivesError> {
    let start = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
    let trimmed = &bytes[start..];
    if trimmed.len() > 32 {
        return Err(malformed("integer wider than 32 bytes"));
    }
    let mut out = [0u8; 32];
    out[32 - trimmed.len()..].copy_from_slice(trimmed);
    Ok(out)
}

//! Base58 and Base58Check encoding.
//!
//! Raw Base58 converts between a big-endian byte string and text over the
//! Bitcoin alphabet, one `'1'` per leading zero byte. Base58Check appends
//! the first four bytes of SHA-256d of the payload before encoding and
//! verifies them on decode.

use crate::hash::sha256d;
use crate::PrimitivesError;

/// Width of a decoded address: version (1) + hash (20) + checksum (4).
pub const ADDRESS_DECODED_LEN: usize = 25;

const CHECKSUM_LEN: usize = 4;

/// Encode a byte slice to a Base58 string.
///
/// Leading zero bytes become leading `'1'` characters.
///
/// # Arguments
/// * `data` - The bytes to encode.
///
/// # Returns
/// A Base58-encoded string.
pub fn encode(data: &[u8]) -> String {
    bs58::encode(data).with_alphabet(bs58::Alphabet::BITCOIN).into_string()
}

/// Decode a Base58 string to a byte vector.
///
/// Leading `'1'` characters decode to leading zero bytes.
///
/// # Arguments
/// * `s` - The Base58 string to decode.
///
/// # Returns
/// `Ok(Vec<u8>)` on success, or `InvalidBase58` for characters outside
/// the alphabet.
pub fn decode(s: &str) -> Result<Vec<u8>, PrimitivesError> {
    bs58::decode(s)
        .with_alphabet(bs58::Alphabet::BITCOIN)
        .into_vec()
        .map_err(|e| PrimitivesError::InvalidBase58(e.to_string()))
}

/// Encode a payload with a 4-byte double-SHA-256 checksum (Base58Check).
///
/// # Arguments
/// * `payload` - The bytes to encode (typically version byte + hash).
///
/// # Returns
/// `encode(payload || sha256d(payload)[..4])`.
pub fn check_encode(payload: &[u8]) -> String {
    let checksum = sha256d(payload);
    let mut data = Vec::with_capacity(payload.len() + CHECKSUM_LEN);
    data.extend_from_slice(payload);
    data.extend_from_slice(&checksum[..CHECKSUM_LEN]);
    encode(&data)
}

/// Decode a Base58Check string of any length, verifying its checksum.
///
/// # Arguments
/// * `s` - The Base58Check string to decode.
///
/// # Returns
/// The full payload (version byte included, checksum removed), or
/// `ChecksumMismatch` if the trailing four bytes do not verify.
pub fn check_decode(s: &str) -> Result<Vec<u8>, PrimitivesError> {
    let decoded = decode(s)?;
    if decoded.len() < CHECKSUM_LEN {
        return Err(PrimitivesError::InvalidBase58(
            "data too short for checksum".to_string(),
        ));
    }
    let (payload, checksum) = decoded.split_at(decoded.len() - CHECKSUM_LEN);
    if checksum != &sha256d(payload)[..CHECKSUM_LEN] {
        return Err(PrimitivesError::ChecksumMismatch);
    }
    Ok(payload.to_vec())
}

/// Decode a Base58Check address into its version byte and 20-byte hash.
///
/// The decoded bytes are left-padded into a fixed 25-byte buffer, split into
/// a 21-byte versioned payload and a 4-byte checksum, and the checksum is
/// verified before anything is returned.
///
/// # Arguments
/// * `s` - A Base58Check address string.
///
/// # Returns
/// `(version, hash)`, `InvalidBase58` if the decoded bytes do not fit in
/// 25, or `ChecksumMismatch`.
pub fn decode_with_checksum_versioned(s: &str) -> Result<(u8, [u8; 20]), PrimitivesError> {
    let decoded = decode(s)?;
    if decoded.len() > ADDRESS_DECODED_LEN {
        return Err(PrimitivesError::InvalidBase58(format!(
            "decoded value is {} bytes, wider than {}",
            decoded.len(),
            ADDRESS_DECODED_LEN
        )));
    }
    let mut buf = [0u8; ADDRESS_DECODED_LEN];
    buf[ADDRESS_DECODED_LEN - decoded.len()..].copy_from_slice(&decoded);

    let (payload, checksum) = buf.split_at(ADDRESS_DECODED_LEN - CHECKSUM_LEN);
    if checksum != &sha256d(payload)[..CHECKSUM_LEN] {
        return Err(PrimitivesError::ChecksumMismatch);
    }

    let mut hash = [0u8; 20];
    hash.copy_from_slice(&payload[1..]);
    Ok((payload[0], hash))
}

/// Decode a Base58Check address and return its 20-byte hash.
///
/// Same as [`decode_with_checksum_versioned`] with the version byte
/// stripped.
pub fn decode_with_checksum(s: &str) -> Result<[u8; 20], PrimitivesError> {
    decode_with_checksum_versioned(s).map(|(_, hash)| hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base58_empty() {
        assert_eq!(encode(&[]), "");
        assert_eq!(decode("").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_base58_single_zero_byte() {
        assert_eq!(encode(&[0]), "1");
        assert_eq!(decode("1").unwrap(), vec![0]);
    }

    #[test]
    fn test_base58_decoded_address() {
        let input = hex::decode("00010966776006953D5567439E5E39F86A0D273BEED61967F6").unwrap();
        assert_eq!(encode(&input), "16UwLL9Risc3QfPqBUvKofHmBQ7wMtjvM");
        assert_eq!(decode("16UwLL9Risc3QfPqBUvKofHmBQ7wMtjvM").unwrap(), input);
    }

    #[test]
    fn test_base58_decoded_hash() {
        let input = hex::decode("0123456789ABCDEF").unwrap();
        assert_eq!(encode(&input), "C3CPq7c8PY");
        assert_eq!(decode("C3CPq7c8PY").unwrap(), input);
    }

    #[test]
    fn test_base58_leading_zeros() {
        let input = hex::decode("000000287FB4CD").unwrap();
        assert_eq!(encode(&input), "111233QC4");
        assert_eq!(decode("111233QC4").unwrap(), input);
    }

    #[test]
    fn test_base58_two_leading_zeros_then_one() {
        let encoded = encode(&[0x00, 0x00, 0x01]);
        assert_eq!(encoded, "112");
        assert_eq!(encoded.chars().take_while(|&c| c == '1').count(), 2);
    }

    #[test]
    fn test_base58_all_zeros() {
        assert_eq!(encode(&[0, 0, 0, 0]), "1111");
        assert_eq!(encode(&[0; 7]), "1111111");
    }

    #[test]
    fn test_base58_large_number() {
        assert_eq!(encode(&[255, 255, 255, 255]), "7YXq9G");
        assert_eq!(decode("7YXq9G").unwrap(), vec![255, 255, 255, 255]);
    }

    #[test]
    fn test_base58_decode_invalid_character() {
        for bad in ["invalid!@#$%", "1234!@#$%", "0OIl", "abc def"] {
            let err = decode(bad).unwrap_err();
            assert_eq!(err.kind(), crate::ErrorKind::Format, "{}", bad);
        }
    }

    // -- Base58Check --

    #[test]
    fn test_check_roundtrip() {
        let payload = hex::decode("00f54a5851e9372b87810a8e60cdd2e7cfd80b6e31").unwrap();
        let encoded = check_encode(&payload);
        assert_eq!(encoded, "1PMycacnJaSqwwJqjawXBErnLsZ7RkXUAs");
        assert_eq!(check_decode(&encoded).unwrap(), payload);
    }

    #[test]
    fn test_check_bad_checksum() {
        let payload = vec![0x80, 0x01, 0x02, 0x03];
        let mut encoded = check_encode(&payload);
        let last = encoded.pop().unwrap();
        encoded.push(if last == '2' { '3' } else { '2' });
        assert!(matches!(check_decode(&encoded), Err(PrimitivesError::ChecksumMismatch)));
    }

    #[test]
    fn test_decode_with_checksum_strips_version() {
        let (version, hash) =
            decode_with_checksum_versioned("1PMycacnJaSqwwJqjawXBErnLsZ7RkXUAs").unwrap();
        assert_eq!(version, 0x00);
        assert_eq!(hex::encode(hash), "f54a5851e9372b87810a8e60cdd2e7cfd80b6e31");

        let hash = decode_with_checksum("mtdruWYVEV1wz5yL7GvpBj4MgifCB7yhPd").unwrap();
        assert_eq!(hex::encode(hash), "8fe80c75c9560e8b56ed64ea3c26e18d2c52211b");
    }

    #[test]
    fn test_decode_with_checksum_corrupted() {
        // Last character changed from 's' to 't'.
        let err = decode_with_checksum("1PMycacnJaSqwwJqjawXBErnLsZ7RkXUAt").unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Checksum);
    }

    #[test]
    fn test_decode_with_checksum_too_wide() {
        let too_long = "z".repeat(40);
        let err = decode_with_checksum(&too_long).unwrap_err();
        assert!(matches!(err, PrimitivesError::InvalidBase58(_)));
    }

    #[test]
    fn test_decode_with_checksum_short_payload_is_padded() {
        // A Base58Check string for a 21-byte payload whose leading zero run
        // is written without '1' prefixes still lands in the 25-byte frame.
        let mut payload = vec![0u8; 21];
        payload[20] = 0x01;
        let encoded = check_encode(&payload);
        let trimmed = encoded.trim_start_matches('1');
        let (version, hash) = decode_with_checksum_versioned(trimmed).unwrap();
        assert_eq!(version, 0x00);
        assert_eq!(hash[19], 0x01);
    }
}

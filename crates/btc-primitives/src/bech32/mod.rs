//! Bech32 and Bech32m encoding of segwit witness programs (BIP173, BIP350).
//!
//! An address is `hrp || '1' || data || checksum`. The data part carries the
//! witness version as its first 5-bit group followed by the program
//! regrouped from 8-bit to 5-bit values. Version 0 programs use the Bech32
//! checksum; versions 1 through 16 use Bech32m.

use ::bech32::{u5, FromBase32, ToBase32, Variant};

use crate::PrimitivesError;

const MAX_LEN: usize = 90;

/// Highest witness version a segwit output can carry.
pub const MAX_WITNESS_VERSION: u8 = 16;

/// The checksum variant mandated for a witness version.
pub fn variant_for_witness_version(version: u8) -> Variant {
    if version == 0 {
        Variant::Bech32
    } else {
        Variant::Bech32m
    }
}

fn check_program(version: u8, program: &[u8]) -> Result<(), PrimitivesError> {
    if version > MAX_WITNESS_VERSION {
        return Err(PrimitivesError::InvalidBech32(format!(
            "invalid witness version {}",
            version
        )));
    }
    if !(2..=40).contains(&program.len()) {
        return Err(PrimitivesError::InvalidBech32(format!(
            "invalid witness program length {}",
            program.len()
        )));
    }
    if version == 0 && program.len() != 20 && program.len() != 32 {
        return Err(PrimitivesError::InvalidBech32(format!(
            "invalid v0 witness program length {}",
            program.len()
        )));
    }
    Ok(())
}

/// Encode a witness program as a segwit address.
///
/// # Arguments
/// * `hrp` - Human-readable prefix (`bc`, `tb`, `bcrt`).
/// * `witness_version` - Witness version, 0 through 16.
/// * `program` - The witness program (20 or 32 bytes for v0, 2..=40 otherwise).
///
/// # Returns
/// The lowercase address, or `InvalidBech32` for an invalid version,
/// program length or prefix.
pub fn encode(hrp: &str, witness_version: u8, program: &[u8]) -> Result<String, PrimitivesError> {
    check_program(witness_version, program)?;
    let mut data = vec![u5::try_from_u8(witness_version)?];
    data.extend(program.to_base32());
    let hrp = hrp.to_ascii_lowercase();
    Ok(::bech32::encode(&hrp, data, variant_for_witness_version(witness_version))?)
}

/// Decode a segwit address and return its witness version and program.
///
/// # Arguments
/// * `hrp` - The expected human-readable prefix.
/// * `text` - The address string (all lowercase or all uppercase).
///
/// # Returns
/// `(witness_version, program)`. Fails with `InvalidBech32` for bad
/// characters, mixed case, a prefix other than `hrp` or an invalid
/// program, and with `ChecksumMismatch` if the checksum does not verify
/// or uses the wrong variant for the witness version.
pub fn decode(hrp: &str, text: &str) -> Result<(u8, Vec<u8>), PrimitivesError> {
    if text.len() > MAX_LEN {
        return Err(PrimitivesError::InvalidBech32(format!(
            "length {} exceeds {}",
            text.len(),
            MAX_LEN
        )));
    }
    let (found_hrp, data, variant) = ::bech32::decode(text)?;
    if found_hrp != hrp.to_ascii_lowercase() {
        return Err(PrimitivesError::InvalidBech32(format!(
            "prefix {:?} does not match expected {:?}",
            found_hrp, hrp
        )));
    }

    let (version, groups) = data
        .split_first()
        .ok_or_else(|| PrimitivesError::InvalidBech32("empty data section".to_string()))?;
    let version = version.to_u8();
    if version > MAX_WITNESS_VERSION {
        return Err(PrimitivesError::InvalidBech32(format!(
            "invalid witness version {}",
            version
        )));
    }
    if variant != variant_for_witness_version(version) {
        return Err(PrimitivesError::ChecksumMismatch);
    }

    let program = Vec::<u8>::from_base32(groups)?;
    check_program(version, &program)?;
    Ok((version, program))
}

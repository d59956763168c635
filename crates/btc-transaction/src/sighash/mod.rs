//! Signature hash computation for transaction signing.
//!
//! Computes the digest that is signed by ECDSA to authorize spending a
//! transaction input. Two algorithms are provided:
//!
//! - the legacy algorithm, which serializes a modified copy of the whole
//!   transaction, and
//! - BIP143, used for segwit v0 inputs, which commits to the value being
//!   spent and reuses three transaction-wide hashes across inputs.
//!
//! See <https://github.com/bitcoin/bips/blob/master/bip-0143.mediawiki>

use btc_primitives::hash::sha256d;
use btc_primitives::util::ByteWriter;
use btc_script::Script;

use crate::output::TransactionOutput;
use crate::transaction::Transaction;
use crate::TransactionError;

// -----------------------------------------------------------------------
// Sighash flag constants
// -----------------------------------------------------------------------

/// Sign all inputs and all outputs (the default).
pub const SIGHASH_ALL: u32 = 0x01;

/// Sign all inputs but no outputs, allowing outputs to be modified.
pub const SIGHASH_NONE: u32 = 0x02;

/// Sign all inputs and only the output with the same index as the signed input.
pub const SIGHASH_SINGLE: u32 = 0x03;

/// Combined with another flag: only sign the current input, allowing other
/// inputs to be added later.
pub const SIGHASH_ANYONECANPAY: u32 = 0x80;

/// Mask applied to extract the base sighash type (ALL, NONE, SINGLE).
pub const SIGHASH_MASK: u32 = 0x1f;

/// Digest returned by the legacy algorithm for `SIGHASH_SINGLE` when the
/// input has no output at the same index.
pub const SIGHASH_SINGLE_BUG: [u8; 32] = [
    1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    0, 0,
];

fn check_index(tx: &Transaction, input_index: usize) -> Result<(), TransactionError> {
    if input_index >= tx.inputs.len() {
        return Err(TransactionError::SigningError(format!(
            "input index {} out of range (tx has {} inputs)",
            input_index,
            tx.inputs.len()
        )));
    }
    Ok(())
}

// -----------------------------------------------------------------------
// Legacy signature hash
// -----------------------------------------------------------------------

/// Compute the legacy signature hash for a given input.
///
/// A copy of the transaction is made with every scriptSig cleared and the
/// scriptSig of `input_index` replaced by `script_pubkey`. The flags then
/// adjust the copy:
///
/// - `SIGHASH_NONE` drops all outputs and zeroes the other inputs' sequences;
/// - `SIGHASH_SINGLE` keeps outputs up to `input_index`, blanking the earlier
///   ones, and zeroes the other inputs' sequences;
/// - `SIGHASH_ANYONECANPAY` keeps only the signed input.
///
/// The copy is serialized in the legacy form, the sighash type appended as
/// 4 bytes LE, and the result double-hashed. `OP_CODESEPARATOR` is not
/// handled; `script_pubkey` is used as given.
///
/// # Arguments
/// * `tx`            - The transaction being signed.
/// * `input_index`   - Index of the input being signed.
/// * `script_pubkey` - Locking script of the output being spent.
/// * `sighash_type`  - The combined sighash flags.
///
/// # Returns
/// A 32-byte double-SHA256 digest, or `SIGHASH_SINGLE_BUG` when
/// `SIGHASH_SINGLE` is used without a matching output.
pub fn legacy_signature_hash(
    tx: &Transaction,
    input_index: usize,
    script_pubkey: &Script,
    sighash_type: u32,
) -> Result<[u8; 32], TransactionError> {
    check_index(tx, input_index)?;

    let base_type = sighash_type & SIGHASH_MASK;
    if base_type == SIGHASH_SINGLE && input_index >= tx.outputs.len() {
        return Ok(SIGHASH_SINGLE_BUG);
    }

    let mut copy = tx.clone();
    for (i, input) in copy.inputs.iter_mut().enumerate() {
        input.script_sig = if i == input_index {
            script_pubkey.clone()
        } else {
            Script::new()
        };
    }

    if base_type == SIGHASH_NONE || base_type == SIGHASH_SINGLE {
        if base_type == SIGHASH_NONE {
            copy.outputs.clear();
        } else {
            copy.outputs.truncate(input_index + 1);
            for output in copy.outputs.iter_mut().take(input_index) {
                *output = TransactionOutput::new(u64::MAX, Script::new());
            }
        }
        for (i, input) in copy.inputs.iter_mut().enumerate() {
            if i != input_index {
                input.sequence = 0;
            }
        }
    }

    if sighash_type & SIGHASH_ANYONECANPAY != 0 {
        let signed = copy.inputs.swap_remove(input_index);
        copy.inputs = vec![signed];
    }

    let mut preimage = copy.to_legacy_bytes();
    preimage.extend_from_slice(&sighash_type.to_le_bytes());
    Ok(sha256d(&preimage))
}

// -----------------------------------------------------------------------
// BIP143 signature hash
// -----------------------------------------------------------------------

/// Transaction-wide hashes shared by every BIP143 digest of one transaction.
///
/// They depend only on the outpoints, sequences and outputs, so a cache
/// built once can serve every input. A cache must not be reused after those
/// fields change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SegwitSighashCache {
    /// sha256d of all outpoints.
    pub hash_prevouts: [u8; 32],
    /// sha256d of all input sequence numbers.
    pub hash_sequence: [u8; 32],
    /// sha256d of all serialized outputs.
    pub hash_outputs: [u8; 32],
}

impl SegwitSighashCache {
    /// Compute the three hashes for `tx`.
    pub fn new(tx: &Transaction) -> Self {
        let mut prevouts = ByteWriter::with_capacity(tx.inputs.len() * 36);
        let mut sequences = ByteWriter::with_capacity(tx.inputs.len() * 4);
        for input in &tx.inputs {
            prevouts.write_bytes(&input.outpoint_bytes());
            sequences.write_u32_le(input.sequence);
        }

        let mut outputs = ByteWriter::new();
        for output in &tx.outputs {
            output.write_to(&mut outputs);
        }

        SegwitSighashCache {
            hash_prevouts: sha256d(prevouts.as_bytes()),
            hash_sequence: sha256d(sequences.as_bytes()),
            hash_outputs: sha256d(outputs.as_bytes()),
        }
    }
}

/// Compute the BIP143 signature hash for a given input.
///
/// # Arguments
/// * `tx`           - The transaction being signed.
/// * `input_index`  - Index of the input being signed.
/// * `script_code`  - The scriptCode; for P2WPKH the P2PKH script of the key hash.
/// * `amount`       - Value of the output being spent.
/// * `sighash_type` - The combined sighash flags.
///
/// # Returns
/// A 32-byte double-SHA256 digest.
pub fn segwit_signature_hash(
    tx: &Transaction,
    input_index: usize,
    script_code: &Script,
    amount: u64,
    sighash_type: u32,
) -> Result<[u8; 32], TransactionError> {
    check_index(tx, input_index)?;
    let cache = SegwitSighashCache::new(tx);
    segwit_signature_hash_cached(tx, &cache, input_index, script_code, amount, sighash_type)
}

/// Same as [`segwit_signature_hash`] with precomputed transaction-wide hashes.
pub fn segwit_signature_hash_cached(
    tx: &Transaction,
    cache: &SegwitSighashCache,
    input_index: usize,
    script_code: &Script,
    amount: u64,
    sighash_type: u32,
) -> Result<[u8; 32], TransactionError> {
    let preimage = calc_segwit_preimage(tx, cache, input_index, script_code, amount, sighash_type)?;
    Ok(sha256d(&preimage))
}

/// Compute the BIP143 preimage bytes before double-hashing.
///
/// The preimage consists of:
/// 1. nVersion (4 bytes LE)
/// 2. hashPrevouts (32 bytes) - zero with ANYONECANPAY
/// 3. hashSequence (32 bytes) - zero with ANYONECANPAY, SINGLE or NONE
/// 4. outpoint (32+4 bytes) - txid + vout of the input being signed
/// 5. scriptCode (varint + script)
/// 6. amount (8 bytes LE) - value of the output being spent
/// 7. nSequence (4 bytes LE) - sequence of the input being signed
/// 8. hashOutputs (32 bytes) - all outputs, the matching output for SINGLE,
///    otherwise zero
/// 9. nLocktime (4 bytes LE)
/// 10. sighashType (4 bytes LE)
pub fn calc_segwit_preimage(
    tx: &Transaction,
    cache: &SegwitSighashCache,
    input_index: usize,
    script_code: &Script,
    amount: u64,
    sighash_type: u32,
) -> Result<Vec<u8>, TransactionError> {
    check_index(tx, input_index)?;

    let input = &tx.inputs[input_index];
    let base_type = sighash_type & SIGHASH_MASK;
    let anyone_can_pay = sighash_type & SIGHASH_ANYONECANPAY != 0;

    let hash_prevouts = if anyone_can_pay {
        [0u8; 32]
    } else {
        cache.hash_prevouts
    };

    let hash_sequence =
        if anyone_can_pay || base_type == SIGHASH_SINGLE || base_type == SIGHASH_NONE {
            [0u8; 32]
        } else {
            cache.hash_sequence
        };

    let hash_outputs = if base_type != SIGHASH_SINGLE && base_type != SIGHASH_NONE {
        cache.hash_outputs
    } else if base_type == SIGHASH_SINGLE && input_index < tx.outputs.len() {
        sha256d(&tx.outputs[input_index].to_bytes())
    } else {
        [0u8; 32]
    };

    let mut writer = ByteWriter::with_capacity(160 + script_code.len());
    writer.write_i32_le(tx.version);
    writer.write_bytes(&hash_prevouts);
    writer.write_bytes(&hash_sequence);
    writer.write_bytes(&input.outpoint_bytes());
    script_code.write_to(&mut writer);
    writer.write_u64_le(amount);
    writer.write_u32_le(input.sequence);
    writer.write_bytes(&hash_outputs);
    writer.write_u32_le(tx.lock_time);
    writer.write_u32_le(sighash_type);

    Ok(writer.into_bytes())
}

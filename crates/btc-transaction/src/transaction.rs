//! Core transaction type.
//!
//! Represents a complete transaction with version, inputs, outputs, lock time
//! and the declared segwit flag. Supports the legacy and segwit wire forms,
//! txid/wtxid computation, size and weight, lock-time interpretation and the
//! legacy and BIP143 signature hashes.

use std::fmt;

use btc_primitives::chainhash::{double_hash_h, Hash};
use btc_primitives::util::{ByteReader, ByteWriter, VarInt};
use btc_script::Script;
use tracing::trace;

use crate::input::{TransactionInput, DEFAULT_SEQUENCE_NUMBER};
use crate::output::{TransactionOutput, MAX_MONEY};
use crate::sighash::{self, SIGHASH_ALL};
use crate::signer::SigningState;
use crate::witness::Witness;
use crate::TransactionError;

/// Marker byte that replaces the input count in the segwit form.
pub const SEGWIT_MARKER: u8 = 0x00;

/// The only segwit flag value defined so far.
pub const SEGWIT_FLAG: u8 = 0x01;

/// Lock times below this value are block heights, at or above it Unix
/// timestamps.
pub const LOCKTIME_THRESHOLD: u32 = 500_000_000;

/// Weight units per non-witness byte.
pub const WITNESS_SCALE_FACTOR: usize = 4;

/// Smallest possible encoded input: outpoint, empty script, sequence.
const MIN_INPUT_SIZE: usize = 36 + 1 + 4;

/// Smallest possible encoded output: amount and empty script.
const MIN_OUTPUT_SIZE: usize = 8 + 1;

/// Interpretation of a transaction's lock time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LockTime {
    /// Valid from the given block height.
    Height(u32),
    /// Valid from the given Unix timestamp.
    Timestamp(u32),
}

impl LockTime {
    /// Classify a raw lock time value.
    pub fn from_consensus(value: u32) -> Self {
        if value < LOCKTIME_THRESHOLD {
            LockTime::Height(value)
        } else {
            LockTime::Timestamp(value)
        }
    }
}

/// A Bitcoin transaction.
///
/// # Wire format
///
/// | Field        | Size                              |
/// |--------------|-----------------------------------|
/// | version      | 4 bytes (LE)                      |
/// | marker, flag | `00 01`, segwit form only         |
/// | input count  | VarInt                            |
/// | inputs       | variable (per input)              |
/// | output count | VarInt                            |
/// | outputs      | variable (per output)             |
/// | witnesses    | one stack per input, segwit only  |
/// | lock_time    | 4 bytes (LE)                      |
///
/// The form written by `to_bytes` follows `is_segwit`, not the contents of
/// the witnesses: a segwit transaction whose witnesses are all empty still
/// carries the marker and flag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    /// Transaction format version.
    pub version: i32,

    /// Ordered list of transaction inputs.
    pub inputs: Vec<TransactionInput>,

    /// Ordered list of transaction outputs.
    pub outputs: Vec<TransactionOutput>,

    /// Lock time. See [`LockTime`].
    pub lock_time: u32,

    /// Whether the transaction is written in the segwit form.
    pub is_segwit: bool,
}

impl Transaction {
    /// Create an empty legacy transaction with version 1 and lock time 0.
    pub fn new() -> Self {
        Transaction {
            version: 1,
            inputs: Vec::new(),
            outputs: Vec::new(),
            lock_time: 0,
            is_segwit: false,
        }
    }

    /// Create an empty segwit transaction with version 1 and lock time 0.
    pub fn new_segwit() -> Self {
        Transaction {
            is_segwit: true,
            ..Self::new()
        }
    }

    // -----------------------------------------------------------------
    // Deserialization
    // -----------------------------------------------------------------

    /// Parse a transaction from a hex-encoded string.
    ///
    /// # Arguments
    /// * `hex_str` - A hex string of the raw transaction bytes.
    ///
    /// # Returns
    /// `Ok(Transaction)` on success, or a `TransactionError` if the hex is
    /// invalid or the bytes do not form a valid transaction.
    pub fn from_hex(hex_str: &str) -> Result<Self, TransactionError> {
        let bytes = hex::decode(hex_str).map_err(|e| {
            TransactionError::SerializationError(format!("invalid hex: {}", e))
        })?;
        Self::from_bytes(&bytes)
    }

    /// Parse a transaction from raw bytes.
    ///
    /// This method requires the byte slice to contain exactly one complete
    /// transaction with no trailing data.
    ///
    /// # Arguments
    /// * `bytes` - The raw transaction bytes.
    ///
    /// # Returns
    /// `Ok(Transaction)` on success, or a `TransactionError` if the data
    /// is truncated, malformed, or has trailing bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TransactionError> {
        let mut reader = ByteReader::new(bytes);
        let tx = Self::read_from(&mut reader)?;
        if reader.remaining() != 0 {
            return Err(TransactionError::SerializationError(format!(
                "trailing {} bytes after transaction",
                reader.remaining()
            )));
        }
        Ok(tx)
    }

    /// Deserialize a transaction from a `ByteReader`.
    ///
    /// A `0x00` byte where the input count belongs is taken as the segwit
    /// marker; the following flag byte must be `0x01`. Transactions with
    /// zero inputs therefore cannot be read in the legacy form.
    ///
    /// # Arguments
    /// * `reader` - The reader positioned at the start of a serialized transaction.
    ///
    /// # Returns
    /// `Ok(Transaction)` on success, or a `TransactionError` on truncated
    /// data or an unknown segwit flag.
    pub fn read_from(reader: &mut ByteReader<'_>) -> Result<Self, TransactionError> {
        let version = reader.read_i32_le().map_err(|e| {
            TransactionError::SerializationError(format!("reading version: {}", e))
        })?;

        let is_segwit = reader.peek_u8() == Some(SEGWIT_MARKER);
        if is_segwit {
            reader.read_u8().map_err(|e| {
                TransactionError::SerializationError(format!("reading segwit marker: {}", e))
            })?;
            let flag = reader.read_u8().map_err(|e| {
                TransactionError::SerializationError(format!("reading segwit flag: {}", e))
            })?;
            if flag != SEGWIT_FLAG {
                return Err(TransactionError::InvalidTransaction(format!(
                    "unsupported segwit flag 0x{:02x}",
                    flag
                )));
            }
            trace!(position = reader.position(), "segwit marker found");
        }

        let input_count = read_count(reader, "input", MIN_INPUT_SIZE)?;
        let mut inputs = Vec::with_capacity(input_count);
        for _ in 0..input_count {
            inputs.push(TransactionInput::read_from(reader)?);
        }

        let output_count = read_count(reader, "output", MIN_OUTPUT_SIZE)?;
        let mut outputs = Vec::with_capacity(output_count);
        for _ in 0..output_count {
            outputs.push(TransactionOutput::read_from(reader)?);
        }

        if is_segwit {
            for input in inputs.iter_mut() {
                input.witness = Witness::read_from(reader)?;
            }
        }

        let lock_time = reader.read_u32_le().map_err(|e| {
            TransactionError::SerializationError(format!("reading lock time: {}", e))
        })?;

        trace!(
            inputs = input_count,
            outputs = output_count,
            segwit = is_segwit,
            "parsed transaction"
        );

        Ok(Transaction {
            version,
            inputs,
            outputs,
            lock_time,
            is_segwit,
        })
    }

    // -----------------------------------------------------------------
    // Serialization
    // -----------------------------------------------------------------

    /// Serialize this transaction to raw bytes.
    ///
    /// Uses the segwit form when `is_segwit` is set, the legacy form otherwise.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.serialize(self.is_segwit)
    }

    /// Serialize this transaction in the legacy form, omitting any witness
    /// data. This is the form hashed for the txid.
    pub fn to_legacy_bytes(&self) -> Vec<u8> {
        self.serialize(false)
    }

    /// Serialize this transaction to a hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    fn serialize(&self, with_witness: bool) -> Vec<u8> {
        let mut writer = ByteWriter::with_capacity(256);
        writer.write_i32_le(self.version);

        if with_witness {
            writer.write_u8(SEGWIT_MARKER);
            writer.write_u8(SEGWIT_FLAG);
        }

        writer.write_varint(VarInt::from(self.inputs.len()));
        for input in &self.inputs {
            input.write_to(&mut writer);
        }

        writer.write_varint(VarInt::from(self.outputs.len()));
        for output in &self.outputs {
            output.write_to(&mut writer);
        }

        if with_witness {
            for input in &self.inputs {
                input.witness.write_to(&mut writer);
            }
        }

        writer.write_u32_le(self.lock_time);
        writer.into_bytes()
    }

    // -----------------------------------------------------------------
    // Identifiers and size
    // -----------------------------------------------------------------

    /// Transaction id: double SHA-256 of the legacy form.
    ///
    /// Displays in the conventional reversed byte order.
    pub fn txid(&self) -> Hash {
        double_hash_h(&self.to_legacy_bytes())
    }

    /// Witness transaction id: double SHA-256 of the serialized form.
    ///
    /// Equal to `txid` for legacy transactions.
    pub fn wtxid(&self) -> Hash {
        double_hash_h(&self.to_bytes())
    }

    /// Size in bytes of the serialized form.
    pub fn size(&self) -> usize {
        self.to_bytes().len()
    }

    /// BIP141 weight: legacy bytes count four times, witness bytes once.
    pub fn weight(&self) -> usize {
        let base = self.to_legacy_bytes().len();
        base * (WITNESS_SCALE_FACTOR - 1) + self.size()
    }

    /// Virtual size: weight divided by four, rounded up.
    pub fn vsize(&self) -> usize {
        (self.weight() + WITNESS_SCALE_FACTOR - 1) / WITNESS_SCALE_FACTOR
    }

    // -----------------------------------------------------------------
    // Inputs and outputs
    // -----------------------------------------------------------------

    /// Append a `TransactionInput` to this transaction.
    pub fn add_input(&mut self, input: TransactionInput) {
        self.inputs.push(input);
    }

    /// Append a `TransactionOutput` to this transaction.
    pub fn add_output(&mut self, output: TransactionOutput) {
        self.outputs.push(output);
    }

    /// Sum of all output amounts.
    ///
    /// # Returns
    /// The total, or an `AmountError` if the sum overflows or exceeds
    /// `MAX_MONEY`.
    pub fn total_output_amount(&self) -> Result<u64, TransactionError> {
        let total = self
            .outputs
            .iter()
            .try_fold(0u64, |acc, o| acc.checked_add(o.amount))
            .ok_or_else(|| TransactionError::AmountError("output amounts overflow".to_string()))?;
        if total > MAX_MONEY {
            return Err(TransactionError::AmountError(format!(
                "output total {} exceeds maximum {}",
                total, MAX_MONEY
            )));
        }
        Ok(total)
    }

    // -----------------------------------------------------------------
    // Lock time
    // -----------------------------------------------------------------

    /// Interpret the lock time as a block height or a timestamp.
    pub fn lock_time_kind(&self) -> LockTime {
        LockTime::from_consensus(self.lock_time)
    }

    /// Whether the lock time is enforced.
    ///
    /// The lock time only restricts the transaction when it is non-zero and
    /// at least one input has a sequence number below the maximum.
    pub fn is_lock_time_enabled(&self) -> bool {
        self.lock_time != 0
            && self
                .inputs
                .iter()
                .any(|input| input.sequence != DEFAULT_SEQUENCE_NUMBER)
    }

    // -----------------------------------------------------------------
    // Signing
    // -----------------------------------------------------------------

    /// Progress of signing, derived from the inputs' unlocking data.
    pub fn signing_state(&self) -> SigningState {
        SigningState::of(self)
    }

    /// Legacy signature hash of `input_index` with `SIGHASH_ALL`.
    ///
    /// # Arguments
    /// * `input_index`   - Index of the input being signed.
    /// * `script_pubkey` - Locking script of the output being spent.
    pub fn sig_hash(
        &self,
        input_index: usize,
        script_pubkey: &Script,
    ) -> Result<[u8; 32], TransactionError> {
        self.sig_hash_with_type(input_index, script_pubkey, SIGHASH_ALL)
    }

    /// Legacy signature hash of `input_index` with an explicit sighash type.
    pub fn sig_hash_with_type(
        &self,
        input_index: usize,
        script_pubkey: &Script,
        sighash_type: u32,
    ) -> Result<[u8; 32], TransactionError> {
        sighash::legacy_signature_hash(self, input_index, script_pubkey, sighash_type)
    }

    /// BIP143 signature hash of `input_index` with `SIGHASH_ALL`.
    ///
    /// # Arguments
    /// * `input_index` - Index of the input being signed.
    /// * `script_code` - The scriptCode; for P2WPKH the P2PKH script of the key hash.
    /// * `amount`      - Value of the output being spent.
    pub fn sig_hash_segwit(
        &self,
        input_index: usize,
        script_code: &Script,
        amount: u64,
    ) -> Result<[u8; 32], TransactionError> {
        self.sig_hash_segwit_with_type(input_index, script_code, amount, SIGHASH_ALL)
    }

    /// BIP143 signature hash of `input_index` with an explicit sighash type.
    pub fn sig_hash_segwit_with_type(
        &self,
        input_index: usize,
        script_code: &Script,
        amount: u64,
        sighash_type: u32,
    ) -> Result<[u8; 32], TransactionError> {
        sighash::segwit_signature_hash(self, input_index, script_code, amount, sighash_type)
    }
}

impl Default for Transaction {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// Read an element count, bounded by what the remaining bytes can hold.
fn read_count(
    reader: &mut ByteReader<'_>,
    what: &str,
    min_size: usize,
) -> Result<usize, TransactionError> {
    let count = reader.read_varint().map_err(|e| {
        TransactionError::SerializationError(format!("reading {} count: {}", what, e))
    })?;
    let max = (reader.remaining() / min_size) as u64;
    if count.value() > max {
        return Err(TransactionError::SerializationError(format!(
            "{} count {} exceeds what {} remaining bytes can hold",
            what,
            count.value(),
            reader.remaining()
        )));
    }
    Ok(count.value() as usize)
}

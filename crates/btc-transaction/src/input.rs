//! Transaction input referencing a previous output.
//!
//! Contains the previous transaction id, output index, unlocking script
//! (scriptSig), sequence number and the segwit witness stack. Provides
//! binary serialization/deserialization following the Bitcoin wire format.

use btc_primitives::chainhash::Hash;
use btc_primitives::util::{ByteReader, ByteWriter};
use btc_script::Script;

use crate::witness::Witness;
use crate::TransactionError;

/// Default sequence number indicating a finalized input (no lock-time).
pub const DEFAULT_SEQUENCE_NUMBER: u32 = 0xFFFF_FFFF;

/// A single input in a Bitcoin transaction.
///
/// Each input references an output from a previous transaction by its
/// transaction id (`previous_txid`) and output index (`previous_index`).
/// The scriptSig and witness supply the data required to satisfy the
/// referenced output's locking script.
///
/// The unlocking data is set while building (`with_script_sig`,
/// `with_witness`) and afterwards only through `install_unlocking`, the
/// single mutation used by the signer.
///
/// # Wire format (legacy section)
///
/// | Field          | Size            |
/// |----------------|-----------------|
/// | previous_txid  | 32 bytes (wire) |
/// | previous_index | 4 bytes (LE)    |
/// | script length  | VarInt          |
/// | script_sig     | variable        |
/// | sequence       | 4 bytes (LE)    |
///
/// The witness is written separately, after all outputs, and only for
/// segwit transactions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionInput {
    /// Id of the transaction holding the output being spent.
    pub previous_txid: Hash,

    /// Index of the output within the previous transaction.
    pub previous_index: u32,

    /// Sequence number. Defaults to `0xFFFFFFFF` (finalized).
    pub sequence: u32,

    pub(crate) script_sig: Script,
    pub(crate) witness: Witness,
}

impl TransactionInput {
    /// Create an input spending `previous_txid:previous_index` with an empty
    /// scriptSig, an empty witness and a finalized sequence number.
    pub fn new(previous_txid: Hash, previous_index: u32) -> Self {
        TransactionInput {
            previous_txid,
            previous_index,
            sequence: DEFAULT_SEQUENCE_NUMBER,
            script_sig: Script::new(),
            witness: Witness::new(),
        }
    }

    /// Set the sequence number while building.
    pub fn with_sequence(mut self, sequence: u32) -> Self {
        self.sequence = sequence;
        self
    }

    /// Set a placeholder or pre-built scriptSig while building.
    pub fn with_script_sig(mut self, script_sig: Script) -> Self {
        self.script_sig = script_sig;
        self
    }

    /// Set a pre-built witness while building.
    pub fn with_witness(mut self, witness: Witness) -> Self {
        self.witness = witness;
        self
    }

    /// The unlocking script (scriptSig).
    pub fn script_sig(&self) -> &Script {
        &self.script_sig
    }

    /// The witness stack.
    pub fn witness(&self) -> &Witness {
        &self.witness
    }

    /// True when either a scriptSig or a witness is present.
    pub fn has_unlocking_data(&self) -> bool {
        !self.script_sig.is_empty() || !self.witness.is_empty()
    }

    /// Replace the unlocking data of this input in one step.
    ///
    /// Both fields are overwritten together so an input never carries a
    /// scriptSig from one signing attempt and a witness from another.
    pub fn install_unlocking(&mut self, script_sig: Script, witness: Witness) {
        self.script_sig = script_sig;
        self.witness = witness;
    }

    /// Serialize the 36-byte outpoint (txid in wire order, then index).
    pub fn outpoint_bytes(&self) -> [u8; 36] {
        let mut out = [0u8; 36];
        out[..32].copy_from_slice(self.previous_txid.as_bytes());
        out[32..].copy_from_slice(&self.previous_index.to_le_bytes());
        out
    }

    /// Deserialize the legacy section of an input from a `ByteReader`.
    ///
    /// The witness is left empty; the transaction parser fills it in once
    /// it reaches the witness section.
    ///
    /// # Arguments
    /// * `reader` - The reader positioned at the start of an encoded input.
    ///
    /// # Returns
    /// `Ok(TransactionInput)` on success, or a `TransactionError` if the
    /// data is truncated or malformed.
    pub fn read_from(reader: &mut ByteReader<'_>) -> Result<Self, TransactionError> {
        let txid_bytes = reader.read_array::<32>().map_err(|e| {
            TransactionError::SerializationError(format!("reading previous txid: {}", e))
        })?;

        let previous_index = reader.read_u32_le().map_err(|e| {
            TransactionError::SerializationError(format!("reading output index: {}", e))
        })?;

        let script_sig = Script::read_from(reader).map_err(|e| {
            TransactionError::SerializationError(format!("reading scriptSig: {}", e))
        })?;

        let sequence = reader.read_u32_le().map_err(|e| {
            TransactionError::SerializationError(format!("reading sequence number: {}", e))
        })?;

        Ok(TransactionInput {
            previous_txid: Hash::new(txid_bytes),
            previous_index,
            sequence,
            script_sig,
            witness: Witness::new(),
        })
    }

    /// Serialize the legacy section of this input into a `ByteWriter`.
    pub fn write_to(&self, writer: &mut ByteWriter) {
        writer.write_bytes(&self.outpoint_bytes());
        self.script_sig.write_to(writer);
        writer.write_u32_le(self.sequence);
    }
}

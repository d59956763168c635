//! Transaction output with an amount and locking script.
//!
//! Defines the spending conditions for the output's value. Provides
//! binary serialization/deserialization following the Bitcoin wire format.

use btc_primitives::util::{ByteReader, ByteWriter, VarInt};
use btc_script::Script;

use crate::TransactionError;

/// Satoshis per bitcoin.
pub const COIN: u64 = 100_000_000;

/// Largest amount any single output or sum of outputs may carry.
pub const MAX_MONEY: u64 = 21_000_000 * COIN;

/// A single output in a Bitcoin transaction.
///
/// Each output specifies an `amount` in satoshis and a `script_pubkey`
/// (locking script) that defines the conditions under which the funds
/// may be spent.
///
/// # Wire format
///
/// | Field          | Size         |
/// |----------------|--------------|
/// | amount         | 8 bytes (LE) |
/// | script length  | VarInt       |
/// | script_pubkey  | variable     |
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionOutput {
    /// The number of satoshis locked by this output.
    pub amount: u64,

    /// The locking script (scriptPubKey) that defines spending conditions.
    pub script_pubkey: Script,
}

impl TransactionOutput {
    /// Create an output without range-checking the amount.
    pub fn new(amount: u64, script_pubkey: Script) -> Self {
        TransactionOutput {
            amount,
            script_pubkey,
        }
    }

    /// Create an output, rejecting amounts above `MAX_MONEY`.
    ///
    /// # Returns
    /// `Ok(TransactionOutput)`, or an `AmountError` when the amount is out
    /// of range.
    pub fn checked_new(amount: u64, script_pubkey: Script) -> Result<Self, TransactionError> {
        if amount > MAX_MONEY {
            return Err(TransactionError::AmountError(format!(
                "output amount {} exceeds maximum {}",
                amount, MAX_MONEY
            )));
        }
        Ok(Self::new(amount, script_pubkey))
    }

    /// Deserialize a `TransactionOutput` from a `ByteReader`.
    ///
    /// Reads an 8-byte LE amount followed by a length-prefixed script.
    /// Amounts are not range-checked here so any encoded output survives a
    /// parse/serialize round trip.
    ///
    /// # Arguments
    /// * `reader` - The reader positioned at the start of an encoded output.
    ///
    /// # Returns
    /// `Ok(TransactionOutput)` on success, or a `TransactionError` if the
    /// data is truncated.
    pub fn read_from(reader: &mut ByteReader<'_>) -> Result<Self, TransactionError> {
        let amount = reader.read_u64_le().map_err(|e| {
            TransactionError::SerializationError(format!("reading amount: {}", e))
        })?;

        let script_pubkey = Script::read_from(reader).map_err(|e| {
            TransactionError::SerializationError(format!("reading scriptPubKey: {}", e))
        })?;

        Ok(TransactionOutput {
            amount,
            script_pubkey,
        })
    }

    /// Serialize this output into a `ByteWriter`.
    pub fn write_to(&self, writer: &mut ByteWriter) {
        writer.write_u64_le(self.amount);
        self.script_pubkey.write_to(writer);
    }

    /// Serialize this output to a byte vector.
    ///
    /// This is also the form committed to by the signature hashes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer = ByteWriter::with_capacity(self.serialized_size());
        self.write_to(&mut writer);
        writer.into_bytes()
    }

    /// Encoded size of the output in bytes.
    pub fn serialized_size(&self) -> usize {
        8 + VarInt::from(self.script_pubkey.len()).length() + self.script_pubkey.len()
    }
}

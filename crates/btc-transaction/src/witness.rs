//! Segregated witness stack attached to a transaction input.
//!
//! A witness is an ordered list of byte strings. On the wire the stack is
//! prefixed with its element count and every element carries its own
//! length prefix. Witnesses are only serialized for segwit transactions.

use btc_primitives::util::{ByteReader, ByteWriter, VarInt};

use crate::TransactionError;

/// The witness stack of a single input.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Witness(Vec<Vec<u8>>);

impl Witness {
    /// Create an empty witness.
    pub fn new() -> Self {
        Witness(Vec::new())
    }

    /// Append an element to the top of the stack.
    pub fn push(&mut self, item: impl Into<Vec<u8>>) {
        self.0.push(item.into());
    }

    /// Number of stack elements.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when the stack has no elements.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Element at `index`, counting from the bottom of the stack.
    pub fn get(&self, index: usize) -> Option<&[u8]> {
        self.0.get(index).map(Vec::as_slice)
    }

    /// Iterate over the elements from bottom to top.
    pub fn iter(&self) -> impl Iterator<Item = &[u8]> {
        self.0.iter().map(Vec::as_slice)
    }

    /// Serialize the count-prefixed stack.
    pub fn serialize(&self) -> Vec<u8> {
        let mut writer = ByteWriter::with_capacity(self.serialized_size());
        self.write_to(&mut writer);
        writer.into_bytes()
    }

    /// Serialize to a hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.serialize())
    }

    /// Encoded size of the stack in bytes.
    pub fn serialized_size(&self) -> usize {
        self.0.iter().fold(VarInt::from(self.0.len()).length(), |acc, item| {
            acc + VarInt::from(item.len()).length() + item.len()
        })
    }

    /// Write the count-prefixed stack into a `ByteWriter`.
    pub fn write_to(&self, writer: &mut ByteWriter) {
        writer.write_varint(VarInt::from(self.0.len()));
        for item in &self.0 {
            writer.write_var_bytes(item);
        }
    }

    /// Read a count-prefixed stack from a `ByteReader`.
    pub fn read_from(reader: &mut ByteReader<'_>) -> Result<Self, TransactionError> {
        let count = reader.read_varint().map_err(|e| {
            TransactionError::SerializationError(format!("reading witness item count: {}", e))
        })?;

        // Every element needs at least one length byte.
        let count = count.value();
        if count > reader.remaining() as u64 {
            return Err(TransactionError::SerializationError(format!(
                "witness item count {} exceeds remaining {} bytes",
                count,
                reader.remaining()
            )));
        }

        let mut items = Vec::with_capacity(count as usize);
        for i in 0..count {
            let item = reader.read_var_bytes().map_err(|e| {
                TransactionError::SerializationError(format!("reading witness item {}: {}", i, e))
            })?;
            items.push(item.to_vec());
        }
        Ok(Witness(items))
    }
}

impl From<Vec<Vec<u8>>> for Witness {
    fn from(items: Vec<Vec<u8>>) -> Self {
        Witness(items)
    }
}

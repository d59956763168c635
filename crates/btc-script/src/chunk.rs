//! Script chunk parsing and encoding.
//!
//! A script chunk is either an opcode or a data push with its associated
//! bytes. This module decodes raw script bytes into chunks and encodes push
//! data with the minimal push prefix.

use btc_primitives::util::ByteReader;

use crate::opcodes::*;
use crate::ScriptError;

/// A single parsed element of a script.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScriptChunk {
    /// The opcode byte. For direct pushes (1-75 bytes) this is the length.
    pub op: u8,
    /// The pushed bytes, if this chunk is a push operation.
    pub data: Option<Vec<u8>>,
}

impl ScriptChunk {
    /// Whether this chunk pushes data (including the empty push `OP_0`).
    pub fn is_push(&self) -> bool {
        self.op <= OP_PUSHDATA4
    }

    /// Render this chunk as an ASM token.
    ///
    /// Pushes render as hex; everything else uses the opcode name.
    pub fn to_asm_string(&self) -> String {
        match &self.data {
            Some(data) if self.op > OP_0 => hex::encode(data),
            _ => opcode_to_string(self.op),
        }
    }
}

/// Decode raw script bytes into a vector of chunks.
///
/// # Arguments
/// * `bytes` - The raw script bytes.
///
/// # Returns
/// The parsed chunks, or `DataTooSmall` if a push runs past the end.
pub fn decode_script(bytes: &[u8]) -> Result<Vec<ScriptChunk>, ScriptError> {
    let mut reader = ByteReader::new(bytes);
    let mut chunks = Vec::new();
    while reader.remaining() > 0 {
        chunks.push(read_chunk(&mut reader).map_err(|_| ScriptError::DataTooSmall)?);
    }
    Ok(chunks)
}

fn read_chunk(reader: &mut ByteReader<'_>) -> Result<ScriptChunk, btc_primitives::PrimitivesError> {
    let op = reader.read_u8()?;
    let len = match op {
        OP_DATA_1..=OP_DATA_75 => op as usize,
        OP_PUSHDATA1 => reader.read_u8()? as usize,
        OP_PUSHDATA2 => reader.read_u16_le()? as usize,
        OP_PUSHDATA4 => reader.read_u32_le()? as usize,
        _ => return Ok(ScriptChunk { op, data: None }),
    };
    let data = reader.read_bytes(len)?.to_vec();
    Ok(ScriptChunk {
        op,
        data: Some(data),
    })
}

/// Compute the push prefix for a payload of the given length.
///
/// # Returns
/// The length byte for 0-75 bytes, otherwise the shortest `OP_PUSHDATA`
/// form, or `DataTooBig` beyond four-byte lengths.
pub fn push_data_prefix(data_len: usize) -> Result<Vec<u8>, ScriptError> {
    if data_len <= OP_DATA_75 as usize {
        Ok(vec![data_len as u8])
    } else if data_len <= 0xff {
        Ok(vec![OP_PUSHDATA1, data_len as u8])
    } else if data_len <= 0xffff {
        let mut buf = vec![OP_PUSHDATA2];
        buf.extend_from_slice(&(data_len as u16).to_le_bytes());
        Ok(buf)
    } else if data_len <= 0xffff_ffff {
        let mut buf = vec![OP_PUSHDATA4];
        buf.extend_from_slice(&(data_len as u32).to_le_bytes());
        Ok(buf)
    } else {
        Err(ScriptError::DataTooBig)
    }
}

/// Encode several payloads as consecutive minimal pushes.
pub fn encode_push_datas(parts: &[&[u8]]) -> Result<Vec<u8>, ScriptError> {
    let mut result = Vec::new();
    for part in parts {
        result.extend_from_slice(&push_data_prefix(part.len())?);
        result.extend_from_slice(part);
    }
    Ok(result)
}

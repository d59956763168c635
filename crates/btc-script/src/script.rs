/// Bitcoin Script type: a sequence of opcodes and data pushes.
///
/// A `Script` is kept as its exact bytes so that serialization is
/// byte-for-byte reproducible; the element view is derived on demand with
/// [`Script::chunks`]. The standard output templates are associated
/// constructors, and [`crate::ScriptType`] classifies a script back into one
/// of them.

use std::fmt;

use btc_primitives::bech32::MAX_WITNESS_VERSION;
use btc_primitives::hash::{hash160, sha256};
use btc_primitives::util::{ByteReader, ByteWriter, VarInt};

use crate::chunk::{decode_script, push_data_prefix, ScriptChunk};
use crate::opcodes::*;
use crate::ScriptError;

/// A Bitcoin script, represented as a byte vector newtype.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Script(Vec<u8>);

impl Script {
    // -----------------------------------------------------------------------
    // Constructors
    // -----------------------------------------------------------------------

    /// Create a new empty script.
    pub fn new() -> Self {
        Script(Vec::new())
    }

    /// Create a script from a hex-encoded string.
    pub fn from_hex(hex_str: &str) -> Result<Self, ScriptError> {
        let bytes = hex::decode(hex_str).map_err(|e| ScriptError::InvalidHex(e.to_string()))?;
        Ok(Script(bytes))
    }

    /// Create a script from raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Script(bytes.to_vec())
    }

    /// Create a script from an ASM string.
    ///
    /// Tokens naming a known opcode (e.g. `OP_DUP`) are emitted directly;
    /// any other token is treated as hex push data.
    ///
    /// # Arguments
    /// * `asm` - A space-separated ASM string.
    ///
    /// # Returns
    /// A `Script`, or an error if a token is neither an opcode nor hex.
    pub fn from_asm(asm: &str) -> Result<Self, ScriptError> {
        let mut script = Script::new();
        for token in asm.split_whitespace() {
            match string_to_opcode(token) {
                Some(op) => script.append_opcodes(&[op])?,
                None => script.append_push_data_hex(token)?,
            }
        }
        Ok(script)
    }

    // -----------------------------------------------------------------------
    // Standard templates
    // -----------------------------------------------------------------------

    /// Pay-to-public-key-hash:
    /// `OP_DUP OP_HASH160 <20 bytes> OP_EQUALVERIFY OP_CHECKSIG`.
    pub fn p2pkh(pubkey_hash: &[u8; 20]) -> Self {
        let mut b = Vec::with_capacity(25);
        b.extend_from_slice(&[OP_DUP, OP_HASH160, OP_DATA_20]);
        b.extend_from_slice(pubkey_hash);
        b.extend_from_slice(&[OP_EQUALVERIFY, OP_CHECKSIG]);
        Script(b)
    }

    /// Pay-to-script-hash: `OP_HASH160 <20 bytes> OP_EQUAL`.
    pub fn p2sh(script_hash: &[u8; 20]) -> Self {
        let mut b = Vec::with_capacity(23);
        b.extend_from_slice(&[OP_HASH160, OP_DATA_20]);
        b.extend_from_slice(script_hash);
        b.push(OP_EQUAL);
        Script(b)
    }

    /// Version 0 key-hash witness program: `OP_0 <20 bytes>`.
    pub fn p2wpkh(pubkey_hash: &[u8; 20]) -> Self {
        Self::witness_program_unchecked(0, pubkey_hash)
    }

    /// Version 0 script-hash witness program: `OP_0 <32 bytes>`.
    pub fn p2wsh(script_hash: &[u8; 32]) -> Self {
        Self::witness_program_unchecked(0, script_hash)
    }

    /// Version 1 taproot witness program: `OP_1 <32-byte x-only key>`.
    pub fn p2tr(output_key: &[u8; 32]) -> Self {
        Self::witness_program_unchecked(1, output_key)
    }

    /// P2SH output wrapping a P2WPKH redeem script.
    ///
    /// The redeem script is `p2wpkh(pubkey_hash)`; the output commits to its
    /// HASH160.
    pub fn p2sh_p2wpkh(pubkey_hash: &[u8; 20]) -> Self {
        Self::p2sh(&Self::p2wpkh(pubkey_hash).script_hash())
    }

    /// Build a witness program output for any version and program.
    ///
    /// # Returns
    /// The script, or `InvalidScript` if the version exceeds 16, the
    /// program is not 2..=40 bytes, or a version 0 program is not 20 or 32
    /// bytes.
    pub fn witness_program(version: u8, program: &[u8]) -> Result<Self, ScriptError> {
        if version > MAX_WITNESS_VERSION {
            return Err(ScriptError::InvalidScript(format!(
                "witness version {} out of range",
                version
            )));
        }
        if !(2..=40).contains(&program.len()) || (version == 0 && ![20, 32].contains(&program.len()))
        {
            return Err(ScriptError::InvalidScript(format!(
                "invalid v{} program length {}",
                version,
                program.len()
            )));
        }
        Ok(Self::witness_program_unchecked(version, program))
    }

    pub(crate) fn witness_program_unchecked(version: u8, program: &[u8]) -> Self {
        let mut b = Vec::with_capacity(2 + program.len());
        b.push(if version == 0 { OP_0 } else { OP_1 + version - 1 });
        b.push(program.len() as u8);
        b.extend_from_slice(program);
        Script(b)
    }

    /// HASH160 of the script bytes, the payload of a P2SH output.
    pub fn script_hash(&self) -> [u8; 20] {
        hash160(&self.0)
    }

    /// SHA-256 of the script bytes, the payload of a P2WSH output.
    pub fn witness_script_hash(&self) -> [u8; 32] {
        sha256(&self.0)
    }

    // -----------------------------------------------------------------------
    // Serialization
    // -----------------------------------------------------------------------

    /// Encode the script as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    /// Render the script as space-separated ASM.
    ///
    /// Returns an empty string if the script is empty or malformed.
    pub fn to_asm(&self) -> String {
        match self.chunks() {
            Ok(chunks) => chunks
                .iter()
                .map(ScriptChunk::to_asm_string)
                .collect::<Vec<_>>()
                .join(" "),
            Err(_) => String::new(),
        }
    }

    /// Return a reference to the underlying bytes.
    pub fn to_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consume the script and return its bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    /// Return the length of the script in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the script is empty (zero bytes).
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Serialize as embedded in a transaction: a VarInt length followed by
    /// the script bytes. An empty script serializes as `00`.
    pub fn serialize(&self) -> Vec<u8> {
        let mut writer = ByteWriter::with_capacity(VarInt::from(self.len()).length() + self.len());
        self.write_to(&mut writer);
        writer.into_bytes()
    }

    /// Write the length-prefixed script to a wire writer.
    pub fn write_to(&self, writer: &mut ByteWriter) {
        writer.write_var_bytes(&self.0);
    }

    /// Read a length-prefixed script from a wire reader.
    ///
    /// # Returns
    /// The script, or an `UnexpectedEof` primitives error if the length
    /// prefix or body is truncated.
    pub fn read_from(reader: &mut ByteReader<'_>) -> Result<Self, ScriptError> {
        Ok(Script(reader.read_var_bytes()?.to_vec()))
    }

    // -----------------------------------------------------------------------
    // Pattern checks
    // -----------------------------------------------------------------------

    /// `OP_DUP OP_HASH160 <20> OP_EQUALVERIFY OP_CHECKSIG`
    pub fn is_p2pkh(&self) -> bool {
        let b = &self.0;
        b.len() == 25
            && b[0] == OP_DUP
            && b[1] == OP_HASH160
            && b[2] == OP_DATA_20
            && b[23] == OP_EQUALVERIFY
            && b[24] == OP_CHECKSIG
    }

    /// `OP_HASH160 <20> OP_EQUAL`
    pub fn is_p2sh(&self) -> bool {
        let b = &self.0;
        b.len() == 23 && b[0] == OP_HASH160 && b[1] == OP_DATA_20 && b[22] == OP_EQUAL
    }

    /// Begins with `OP_RETURN`.
    pub fn is_null_data(&self) -> bool {
        self.0.first() == Some(&OP_RETURN)
    }

    /// Split a witness program output into its version and program.
    ///
    /// A witness program is a version opcode (`OP_0` or `OP_1..=OP_16`)
    /// followed by a single direct push of 2 to 40 bytes.
    pub fn witness_program_parts(&self) -> Option<(u8, &[u8])> {
        let b = &self.0;
        if b.len() < 4 || b.len() > 42 || b[1] as usize != b.len() - 2 {
            return None;
        }
        let version = match b[0] {
            OP_0 => 0,
            op if (OP_1..=OP_16).contains(&op) => op - OP_1 + 1,
            _ => return None,
        };
        Some((version, &b[2..]))
    }

    /// Extract the public key hash from a P2PKH or P2WPKH script.
    pub fn public_key_hash(&self) -> Option<[u8; 20]> {
        let slice = if self.is_p2pkh() {
            &self.0[3..23]
        } else {
            match self.witness_program_parts() {
                Some((0, program)) if program.len() == 20 => program,
                _ => return None,
            }
        };
        let mut out = [0u8; 20];
        out.copy_from_slice(slice);
        Some(out)
    }

    /// Parse the script into a vector of decoded chunks.
    pub fn chunks(&self) -> Result<Vec<ScriptChunk>, ScriptError> {
        decode_script(&self.0)
    }

    // -----------------------------------------------------------------------
    // Building
    // -----------------------------------------------------------------------

    /// Append data with the minimal push prefix.
    pub fn append_push_data(&mut self, data: &[u8]) -> Result<(), ScriptError> {
        let prefix = push_data_prefix(data.len())?;
        self.0.extend_from_slice(&prefix);
        self.0.extend_from_slice(data);
        Ok(())
    }

    /// Append hex-encoded data with the minimal push prefix.
    pub fn append_push_data_hex(&mut self, hex_str: &str) -> Result<(), ScriptError> {
        let data =
            hex::decode(hex_str).map_err(|_| ScriptError::InvalidOpcodeData(hex_str.to_string()))?;
        self.append_push_data(&data)
    }

    /// Append non-push opcodes.
    ///
    /// Direct push and `OP_PUSHDATA` opcodes are rejected; use
    /// [`Script::append_push_data`] for those.
    pub fn append_opcodes(&mut self, opcodes: &[u8]) -> Result<(), ScriptError> {
        if let Some(&op) = opcodes
            .iter()
            .find(|&&op| (OP_DATA_1..=OP_PUSHDATA4).contains(&op))
        {
            return Err(ScriptError::InvalidOpcodeType(opcode_to_string(op)));
        }
        self.0.extend_from_slice(opcodes);
        Ok(())
    }
}

impl Default for Script {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Vec<u8>> for Script {
    fn from(bytes: Vec<u8>) -> Self {
        Script(bytes)
    }
}

impl AsRef<[u8]> for Script {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Script {
    /// Display the script as a lowercase hex string.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Script({})", self.to_hex())
    }
}

impl serde::Serialize for Script {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> serde::Deserialize<'de> for Script {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Script::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

//! Classification of output scripts into the standard templates.

use std::fmt;

use crate::Script;

/// A standard output template, with the hash or key it commits to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScriptType {
    /// Pay-to-public-key-hash.
    P2pkh([u8; 20]),
    /// Version 0 witness key hash.
    P2wpkh([u8; 20]),
    /// Pay-to-script-hash.
    P2sh([u8; 20]),
    /// Version 0 witness script hash.
    P2wsh([u8; 32]),
    /// Version 1 taproot output key.
    P2tr([u8; 32]),
    /// Provably unspendable `OP_RETURN` output.
    NullData,
    /// Anything else, including future witness versions.
    NonStandard,
}

impl ScriptType {
    /// Match a script against the standard templates.
    pub fn classify(script: &Script) -> Self {
        if script.is_p2pkh() {
            return ScriptType::P2pkh(copy_array(&script.to_bytes()[3..23]));
        }
        if script.is_p2sh() {
            return ScriptType::P2sh(copy_array(&script.to_bytes()[2..22]));
        }
        if script.is_null_data() {
            return ScriptType::NullData;
        }
        match script.witness_program_parts() {
            Some((0, program)) if program.len() == 20 => ScriptType::P2wpkh(copy_array(program)),
            Some((0, program)) if program.len() == 32 => ScriptType::P2wsh(copy_array(program)),
            Some((1, program)) if program.len() == 32 => ScriptType::P2tr(copy_array(program)),
            _ => ScriptType::NonStandard,
        }
    }

    /// Short lowercase name, e.g. `"p2wpkh"`.
    pub fn name(&self) -> &'static str {
        match self {
            ScriptType::P2pkh(_) => "p2pkh",
            ScriptType::P2wpkh(_) => "p2wpkh",
            ScriptType::P2sh(_) => "p2sh",
            ScriptType::P2wsh(_) => "p2wsh",
            ScriptType::P2tr(_) => "p2tr",
            ScriptType::NullData => "nulldata",
            ScriptType::NonStandard => "nonstandard",
        }
    }

    /// Whether spending this output uses witness data.
    pub fn is_witness(&self) -> bool {
        matches!(
            self,
            ScriptType::P2wpkh(_) | ScriptType::P2wsh(_) | ScriptType::P2tr(_)
        )
    }
}

impl fmt::Display for ScriptType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Script {
    /// Classify this script. See [`ScriptType::classify`].
    pub fn script_type(&self) -> ScriptType {
        ScriptType::classify(self)
    }
}

fn copy_array<const N: usize>(slice: &[u8]) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(slice);
    out
}

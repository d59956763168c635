//! ECDSA signing of transaction inputs.
//!
//! The signer computes the signature hash for an input, signs it with
//! RFC6979 nonces, normalizes the signature to low-S, DER-encodes it with
//! the sighash type byte appended and installs the unlocking data:
//!
//! | Path           | scriptSig                  | witness          |
//! |----------------|----------------------------|------------------|
//! | P2PKH          | `<sig> <pubkey>`           | empty            |
//! | P2WPKH         | empty                      | `[sig, pubkey]`  |
//! | P2SH-P2WPKH    | `<0014{pubkey hash}>`      | `[sig, pubkey]`  |
//!
//! Installation is the last step, so a failed call leaves the input as it
//! was.

use std::fmt;

use btc_primitives::ec::PrivateKey;
use btc_script::{Script, ScriptType};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::sighash::{SIGHASH_ALL, SIGHASH_ANYONECANPAY, SIGHASH_MASK, SIGHASH_SINGLE};
use crate::transaction::Transaction;
use crate::witness::Witness;
use crate::TransactionError;

/// Signing options.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignerConfig {
    /// Sighash type committed to by the signature. Its low byte is appended
    /// to the DER signature.
    pub sighash_type: u32,
}

impl Default for SignerConfig {
    fn default() -> Self {
        SignerConfig {
            sighash_type: SIGHASH_ALL,
        }
    }
}

/// How an input is unlocked.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SigningPath {
    /// Legacy P2PKH: signature and key in the scriptSig.
    Legacy,
    /// Native P2WPKH: signature and key in the witness.
    Witness,
    /// P2WPKH nested in P2SH: redeem script in the scriptSig, signature and
    /// key in the witness.
    NestedWitness,
}

impl SigningPath {
    fn uses_witness(self) -> bool {
        !matches!(self, SigningPath::Legacy)
    }
}

/// Progress of signing across a transaction's inputs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SigningState {
    /// No input carries unlocking data.
    Unsigned,
    /// Some, but not all, inputs carry unlocking data.
    PartiallySigned,
    /// Every input carries unlocking data.
    FullySigned,
}

impl SigningState {
    /// Derive the state from the inputs of `tx`.
    pub fn of(tx: &Transaction) -> Self {
        let signed = tx.inputs.iter().filter(|i| i.has_unlocking_data()).count();
        if signed == 0 {
            SigningState::Unsigned
        } else if signed == tx.inputs.len() {
            SigningState::FullySigned
        } else {
            SigningState::PartiallySigned
        }
    }
}

impl fmt::Display for SigningState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SigningState::Unsigned => "unsigned",
            SigningState::PartiallySigned => "partially signed",
            SigningState::FullySigned => "fully signed",
        };
        f.write_str(s)
    }
}

/// Signs transaction inputs with a fixed configuration.
#[derive(Clone, Debug, Default)]
pub struct Signer {
    config: SignerConfig,
}

impl Signer {
    /// Create a signer with the given configuration.
    pub fn new(config: SignerConfig) -> Self {
        Signer { config }
    }

    /// The signer's configuration.
    pub fn config(&self) -> &SignerConfig {
        &self.config
    }

    /// Sign input `input_index` of `tx` as a P2PKH or P2WPKH spend of `key`.
    ///
    /// Legacy inputs are signed against the P2PKH script of the key's hash.
    /// Witness inputs use the same script as BIP143 scriptCode and commit to
    /// `funding_amount`; the transaction is switched to the segwit form.
    ///
    /// # Arguments
    /// * `tx`               - The transaction being signed.
    /// * `key`              - The private key controlling the funding output.
    /// * `input_index`      - Index of the input to sign.
    /// * `funding_amount`   - Value of the output being spent.
    /// * `is_witness_input` - Whether the funding output is P2WPKH.
    ///
    /// # Returns
    /// `Ok(())` once the unlocking data is installed, or a `SigningError`
    /// for an out-of-range index or unsupported sighash type.
    pub fn sign_input(
        &self,
        tx: &mut Transaction,
        key: &PrivateKey,
        input_index: usize,
        funding_amount: u64,
        is_witness_input: bool,
    ) -> Result<(), TransactionError> {
        let path = if is_witness_input {
            SigningPath::Witness
        } else {
            SigningPath::Legacy
        };
        self.sign_with_path(tx, key, input_index, funding_amount, path)
    }

    /// Sign input `input_index` of `tx`, picking the path from the funding
    /// output's script.
    ///
    /// P2PKH, P2WPKH and P2SH-wrapped P2WPKH outputs paying to `key` are
    /// supported. Any other template, or a script paying to a different
    /// key, is a `SigningError`.
    pub fn sign_input_for_script(
        &self,
        tx: &mut Transaction,
        key: &PrivateKey,
        input_index: usize,
        funding_amount: u64,
        funding_script: &Script,
    ) -> Result<(), TransactionError> {
        let pkh = key.pub_key().hash160();
        let path = match funding_script.script_type() {
            ScriptType::P2pkh(hash) if hash == pkh => SigningPath::Legacy,
            ScriptType::P2wpkh(hash) if hash == pkh => SigningPath::Witness,
            ScriptType::P2sh(hash) if hash == Script::p2wpkh(&pkh).script_hash() => {
                SigningPath::NestedWitness
            }
            ScriptType::P2pkh(_) | ScriptType::P2wpkh(_) | ScriptType::P2sh(_) => {
                return Err(TransactionError::SigningError(
                    "funding script does not pay to the signing key".to_string(),
                ));
            }
            other => {
                return Err(TransactionError::SigningError(format!(
                    "cannot sign for {} output",
                    other.name()
                )));
            }
        };
        self.sign_with_path(tx, key, input_index, funding_amount, path)
    }

    fn sign_with_path(
        &self,
        tx: &mut Transaction,
        key: &PrivateKey,
        input_index: usize,
        funding_amount: u64,
        path: SigningPath,
    ) -> Result<(), TransactionError> {
        if input_index >= tx.inputs.len() {
            return Err(TransactionError::SigningError(format!(
                "input index {} out of range (tx has {} inputs)",
                input_index,
                tx.inputs.len()
            )));
        }
        let sighash_type = self.checked_sighash_type()?;

        let pub_key = key.pub_key();
        let pkh = pub_key.hash160();
        let script_code = Script::p2pkh(&pkh);

        let digest = if path.uses_witness() {
            tx.sig_hash_segwit_with_type(input_index, &script_code, funding_amount, sighash_type)?
        } else {
            tx.sig_hash_with_type(input_index, &script_code, sighash_type)?
        };

        let signature = key.sign(&digest)?;
        let mut sig_buf = signature.to_der();
        sig_buf.push(sighash_type as u8);
        let pub_key_bytes = pub_key.to_compressed();

        let (script_sig, witness) = match path {
            SigningPath::Legacy => {
                let mut script = Script::new();
                script.append_push_data(&sig_buf)?;
                script.append_push_data(&pub_key_bytes)?;
                (script, Witness::new())
            }
            SigningPath::Witness => (
                Script::new(),
                Witness::from(vec![sig_buf, pub_key_bytes.to_vec()]),
            ),
            SigningPath::NestedWitness => {
                let mut script = Script::new();
                script.append_push_data(Script::p2wpkh(&pkh).to_bytes())?;
                (script, Witness::from(vec![sig_buf, pub_key_bytes.to_vec()]))
            }
        };

        let input = tx.inputs.get_mut(input_index).ok_or_else(|| {
            TransactionError::SigningError(format!("input index {} out of range", input_index))
        })?;
        input.install_unlocking(script_sig, witness);
        if path.uses_witness() {
            tx.is_segwit = true;
        }

        debug!(
            input = input_index,
            path = ?path,
            sighash_type = sighash_type,
            "signed input"
        );
        Ok(())
    }

    fn checked_sighash_type(&self) -> Result<u32, TransactionError> {
        let t = self.config.sighash_type;
        let base = t & SIGHASH_MASK;
        let known_bits = SIGHASH_MASK | SIGHASH_ANYONECANPAY;
        if t & !known_bits != 0 || !(SIGHASH_ALL..=SIGHASH_SINGLE).contains(&base) {
            return Err(TransactionError::SigningError(format!(
                "unsupported sighash type 0x{:02x}",
                t
            )));
        }
        Ok(t)
    }
}

/// Sign an input with the default configuration (`SIGHASH_ALL`).
///
/// See [`Signer::sign_input`].
pub fn sign_input(
    tx: &mut Transaction,
    key: &PrivateKey,
    input_index: usize,
    funding_amount: u64,
    is_witness_input: bool,
) -> Result<(), TransactionError> {
    Signer::default().sign_input(tx, key, input_index, funding_amount, is_witness_input)
}

/// Sign an input for a known funding script with the default configuration.
///
/// See [`Signer::sign_input_for_script`].
pub fn sign_input_for_script(
    tx: &mut Transaction,
    key: &PrivateKey,
    input_index: usize,
    funding_amount: u64,
    funding_script: &Script,
) -> Result<(), TransactionError> {
    Signer::default().sign_input_for_script(tx, key, input_index, funding_amount, funding_script)
}

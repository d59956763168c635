/// Bitcoin address handling.
///
/// Legacy addresses (P2PKH, P2SH) are Base58Check text of a version byte
/// and a 20-byte hash. Segwit addresses (P2WPKH, P2WSH, P2TR and future
/// versions) are Bech32 or Bech32m text of a witness version and program.
/// The network is carried by the version byte or the human-readable part.

use std::fmt;
use std::str::FromStr;

use btc_primitives::ec::PublicKey;
use btc_primitives::{base58, bech32, Network, NetworkParams};

use crate::{Script, ScriptError, ScriptType};

/// What an address pays to.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum AddressPayload {
    /// HASH160 of a public key (P2PKH).
    PubkeyHash([u8; 20]),
    /// HASH160 of a redeem script (P2SH).
    ScriptHash([u8; 20]),
    /// A segwit output of any version.
    WitnessProgram {
        /// Witness version, 0 to 16.
        version: u8,
        /// Witness program, 2 to 40 bytes.
        program: Vec<u8>,
    },
}

/// A Bitcoin address: a payload bound to a network.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Address {
    payload: AddressPayload,
    network: Network,
}

impl Address {
    /// Create an address from a payload and network.
    ///
    /// Witness programs are validated against the segwit length rules.
    pub fn new(payload: AddressPayload, network: Network) -> Result<Self, ScriptError> {
        if let AddressPayload::WitnessProgram { version, program } = &payload {
            Script::witness_program(*version, program)?;
        }
        Ok(Address { payload, network })
    }

    /// P2PKH address of a public key's compressed encoding.
    pub fn p2pkh(pub_key: &PublicKey, network: Network) -> Self {
        Address {
            payload: AddressPayload::PubkeyHash(pub_key.hash160()),
            network,
        }
    }

    /// Native segwit v0 key-hash address of a public key.
    pub fn p2wpkh(pub_key: &PublicKey, network: Network) -> Self {
        Address {
            payload: AddressPayload::WitnessProgram {
                version: 0,
                program: pub_key.hash160().to_vec(),
            },
            network,
        }
    }

    /// P2SH address wrapping a P2WPKH redeem script for a public key.
    pub fn p2sh_p2wpkh(pub_key: &PublicKey, network: Network) -> Self {
        let redeem = Script::p2wpkh(&pub_key.hash160());
        Address {
            payload: AddressPayload::ScriptHash(redeem.script_hash()),
            network,
        }
    }

    /// Recover the address a standard output script pays to.
    ///
    /// # Returns
    /// The address, `UnsupportedAddress` for null-data and non-standard
    /// scripts, or `InvalidScript` for a witness program that breaks the
    /// segwit length rules.
    pub fn from_script(script: &Script, network: Network) -> Result<Self, ScriptError> {
        let payload = match script.script_type() {
            ScriptType::P2pkh(hash) => AddressPayload::PubkeyHash(hash),
            ScriptType::P2sh(hash) => AddressPayload::ScriptHash(hash),
            _ => match script.witness_program_parts() {
                Some((version, program)) => AddressPayload::WitnessProgram {
                    version,
                    program: program.to_vec(),
                },
                None => return Err(ScriptError::UnsupportedAddress(script.to_hex())),
            },
        };
        Address::new(payload, network)
    }

    /// Parse an address string, detecting its network.
    ///
    /// Bech32 strings are matched by human-readable part. Base58Check
    /// strings are matched by version byte; testnet and regtest share
    /// version bytes, so those parse as `Network::Testnet`.
    ///
    /// # Returns
    /// The address, a `Checksum`-kind error on checksum mismatch, or a
    /// `Format`-kind error for anything else malformed or unknown.
    pub fn from_string(addr: &str) -> Result<Self, ScriptError> {
        if let Some(network) = bech32_network(addr) {
            let params = network.params();
            let (version, program) = bech32::decode(&params.bech32_hrp, addr)?;
            return Ok(Address {
                payload: AddressPayload::WitnessProgram { version, program },
                network,
            });
        }

        let (version, hash) = base58::decode_with_checksum_versioned(addr)?;
        for network in Network::ALL {
            let params = network.params();
            if version == params.p2pkh_version {
                return Ok(Address {
                    payload: AddressPayload::PubkeyHash(hash),
                    network,
                });
            }
            if version == params.p2sh_version {
                return Ok(Address {
                    payload: AddressPayload::ScriptHash(hash),
                    network,
                });
            }
        }
        Err(ScriptError::InvalidAddress(format!(
            "unknown version byte 0x{:02x} in '{}'",
            version, addr
        )))
    }

    /// The payload this address pays to.
    pub fn payload(&self) -> &AddressPayload {
        &self.payload
    }

    /// The network this address belongs to.
    pub fn network(&self) -> Network {
        self.network
    }

    /// The output script paying to this address.
    pub fn script_pubkey(&self) -> Script {
        match &self.payload {
            AddressPayload::PubkeyHash(hash) => Script::p2pkh(hash),
            AddressPayload::ScriptHash(hash) => Script::p2sh(hash),
            AddressPayload::WitnessProgram { version, program } => {
                Script::witness_program_unchecked(*version, program)
            }
        }
    }

    /// Encode this address using explicit network parameters.
    ///
    /// # Returns
    /// The address text, or an error if `params` carries an HRP that
    /// cannot be Bech32-encoded.
    pub fn encode_with(&self, params: &NetworkParams) -> Result<String, ScriptError> {
        Ok(match &self.payload {
            AddressPayload::PubkeyHash(hash) => versioned_check_encode(params.p2pkh_version, hash),
            AddressPayload::ScriptHash(hash) => versioned_check_encode(params.p2sh_version, hash),
            AddressPayload::WitnessProgram { version, program } => {
                bech32::encode(&params.bech32_hrp, *version, program)?
            }
        })
    }
}

fn versioned_check_encode(version: u8, hash: &[u8; 20]) -> String {
    let mut payload = Vec::with_capacity(21);
    payload.push(version);
    payload.extend_from_slice(hash);
    base58::check_encode(&payload)
}

/// Network whose bech32 prefix, plus separator, starts `addr`.
fn bech32_network(addr: &str) -> Option<Network> {
    let lower = addr.to_ascii_lowercase();
    let sep = lower.rfind('1')?;
    let hrp = &lower[..sep];
    Network::ALL
        .into_iter()
        .find(|network| network.params().bech32_hrp == hrp)
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self.encode_with(&self.network.params()).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

impl FromStr for Address {
    type Err = ScriptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Address::from_string(s)
    }
}

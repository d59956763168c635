//! Network parameters.
//!
//! A `Network` names one of the built-in chains; `NetworkParams` holds the
//! values that differ between them (address version bytes, WIF prefix,
//! segwit address prefix). Applications that target a custom chain can
//! deserialize their own `NetworkParams` from configuration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::PrimitivesError;

/// A built-in Bitcoin network.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    /// Bitcoin mainnet.
    #[default]
    Mainnet,
    /// Bitcoin testnet (also signet).
    Testnet,
    /// Local regression-test network.
    Regtest,
}

/// Encoding parameters that differ between networks.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NetworkParams {
    /// Base58Check version byte of P2PKH addresses.
    pub p2pkh_version: u8,
    /// Base58Check version byte of P2SH addresses.
    pub p2sh_version: u8,
    /// Base58Check version byte of WIF private keys.
    pub wif_prefix: u8,
    /// Human-readable prefix of Bech32/Bech32m addresses.
    pub bech32_hrp: String,
}

impl Network {
    /// All built-in networks, mainnet first.
    pub const ALL: [Network; 3] = [Network::Mainnet, Network::Testnet, Network::Regtest];

    /// The encoding parameters of this network.
    pub fn params(&self) -> NetworkParams {
        match self {
            Network::Mainnet => NetworkParams {
                p2pkh_version: 0x00,
                p2sh_version: 0x05,
                wif_prefix: 0x80,
                bech32_hrp: "bc".to_string(),
            },
            Network::Testnet => NetworkParams {
                p2pkh_version: 0x6f,
                p2sh_version: 0xc4,
                wif_prefix: 0xef,
                bech32_hrp: "tb".to_string(),
            },
            Network::Regtest => NetworkParams {
                p2pkh_version: 0x6f,
                p2sh_version: 0xc4,
                wif_prefix: 0xef,
                bech32_hrp: "bcrt".to_string(),
            },
        }
    }

    /// Identify a built-in network from its parameters.
    ///
    /// # Returns
    /// The first built-in network whose parameters are equal, or `None`
    /// for custom parameters.
    pub fn from_params(params: &NetworkParams) -> Option<Network> {
        Network::ALL.into_iter().find(|n| &n.params() == params)
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Network::Mainnet => "mainnet",
            Network::Testnet => "testnet",
            Network::Regtest => "regtest",
        };
        f.write_str(name)
    }
}

impl FromStr for Network {
    type Err = PrimitivesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mainnet" | "main" | "bitcoin" => Ok(Network::Mainnet),
            "testnet" | "test" | "signet" => Ok(Network::Testnet),
            "regtest" => Ok(Network::Regtest),
            other => Err(PrimitivesError::UnknownNetwork(other.to_string())),
        }
    }
}

impl Default for NetworkParams {
    fn default() -> Self {
        Network::default().params()
    }
}

impl From<Network> for NetworkParams {
    fn from(network: Network) -> Self {
        network.params()
    }
}

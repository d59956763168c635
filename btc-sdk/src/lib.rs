#![deny(missing_docs)]

//! Bitcoin SDK - transaction building and signing.
//!
//! Re-exports the workspace crates for convenient single-crate usage,
//! plus a prelude of the types most callers need.

pub use btc_primitives as primitives;
pub use btc_script as script;
pub use btc_transaction as transaction;

/// Commonly used types.
pub mod prelude {
    pub use btc_primitives::chainhash::Hash;
    pub use btc_primitives::ec::{PrivateKey, PublicKey, Signature};
    pub use btc_primitives::{ErrorKind, Network, NetworkParams};
    pub use btc_script::{Address, AddressPayload, Script, ScriptType};
    pub use btc_transaction::sighash::{
        SIGHASH_ALL, SIGHASH_ANYONECANPAY, SIGHASH_NONE, SIGHASH_SINGLE,
    };
    pub use btc_transaction::{
        sign_input, sign_input_for_script, Signer, SignerConfig, SigningState, Transaction,
        TransactionError, TransactionInput, TransactionOutput, Witness,
    };
}

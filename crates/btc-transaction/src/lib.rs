/// Bitcoin transaction model with legacy and segwit wire formats.
///
/// Provides `Transaction`, `TransactionInput`, `TransactionOutput` and
/// `Witness`, the legacy and BIP143 signature-hash algorithms, and an
/// ECDSA signer that installs P2PKH, P2WPKH and P2SH-P2WPKH unlocking data.

pub mod transaction;
pub mod input;
pub mod output;
pub mod witness;
pub mod sighash;
pub mod signer;

mod error;
pub use error::TransactionError;
pub use transaction::{LockTime, Transaction};
pub use input::TransactionInput;
pub use output::TransactionOutput;
pub use witness::Witness;
pub use signer::{sign_input, sign_input_for_script, Signer, SignerConfig, SigningPath, SigningState};

#[cfg(test)]
mod tests;

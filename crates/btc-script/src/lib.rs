/// Bitcoin script construction, classification and address handling.
///
/// Provides the `Script` byte-vector type with its standard output
/// templates, script chunk parsing, opcode definitions, a classifier for
/// standard output forms and Base58Check/Bech32 addresses.

pub mod script;
pub mod opcodes;
pub mod chunk;
pub mod script_type;
pub mod address;

mod error;
pub use error::ScriptError;
pub use script::Script;
pub use script_type::ScriptType;
pub use address::{Address, AddressPayload};
pub use chunk::ScriptChunk;

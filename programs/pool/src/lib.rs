//! XYK pool program
//!
//! Thin on-chain wrapper around `xyk_model`: decodes instruction bytes,
//! loads the 32-byte pool record from the pool account, runs one
//! transition and stores the record again.

pub mod entrypoint;
pub mod error;
pub mod instruction;
pub mod processor;

pub use error::XykError;
pub use instruction::{decode_instruction, encode_instruction, PoolIx};
pub use processor::process;

pinocchio_pubkey::declare_id!("EYZmnDZqskkz4GcvTU4t5dUPaMwRSgpEX43856gpK1e9");

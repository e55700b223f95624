//! Load → execute → store over a raw pool record

use xyk_model::{Pool, PoolInstruction, PoolOutcome};

use crate::error::XykError;

/// Run one instruction against the serialized pool in `record`.
///
/// The record is only written after the transition succeeds, so on any
/// error the account data is left as it was.
pub fn process(record: &mut [u8], instruction: PoolInstruction) -> Result<PoolOutcome, XykError> {
    let mut pool = Pool::unpack(record)?;
    let outcome = pool.execute(instruction)?;
    pool.pack_into(record)?;
    Ok(outcome)
}

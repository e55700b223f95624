//! Program-level errors and their `ProgramError` encoding

use pinocchio::program_error::ProgramError;
use xyk_model::{LayoutError, PoolError};

/// Offset added to `PoolError::code()` in `ProgramError::Custom`
pub const POOL_ERROR_BASE: u32 = 0x100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XykError {
    /// Rejected by the pool state machine
    Pool(PoolError),
    /// Pool account data is not a valid record
    Layout(LayoutError),
    /// Unknown discriminator or malformed payload
    InvalidInstruction,
    /// Wrong number of accounts
    NotEnoughAccounts,
    /// Pool account not owned by this program
    InvalidOwner,
    /// Pool account not writable
    NotWritable,
    /// Caller did not sign
    MissingSignature,
}

impl From<PoolError> for XykError {
    fn from(e: PoolError) -> Self {
        XykError::Pool(e)
    }
}

impl From<LayoutError> for XykError {
    fn from(e: LayoutError) -> Self {
        XykError::Layout(e)
    }
}

impl From<XykError> for ProgramError {
    fn from(e: XykError) -> Self {
        match e {
            XykError::Pool(pool) => ProgramError::Custom(POOL_ERROR_BASE + pool.code()),
            XykError::Layout(_) => ProgramError::InvalidAccountData,
            XykError::InvalidInstruction => ProgramError::InvalidInstructionData,
            XykError::NotEnoughAccounts => ProgramError::NotEnoughAccountKeys,
            XykError::InvalidOwner => ProgramError::IncorrectProgramId,
            XykError::NotWritable => ProgramError::InvalidArgument,
            XykError::MissingSignature => ProgramError::MissingRequiredSignature,
        }
    }
}

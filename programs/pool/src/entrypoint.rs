//! XYK pool program entrypoint

use pinocchio::{
    account_info::AccountInfo,
    msg,
    program_error::ProgramError,
    pubkey::Pubkey,
    ProgramResult,
};
use pinocchio_log::log;
use xyk_model::{PoolInstruction, PoolOutcome};

use crate::error::XykError;
use crate::instruction::decode_instruction;
use crate::processor::process;

#[cfg(feature = "bpf-entrypoint")]
pinocchio::entrypoint!(process_instruction);

/// Process one pool instruction
///
/// Expected accounts:
/// 0. `[writable]` Pool record (owned by this program, 32 bytes)
/// 1. `[signer]` Caller
pub fn process_instruction(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    instruction_data: &[u8],
) -> ProgramResult {
    let instruction = decode_instruction(instruction_data).map_err(|e| {
        msg!("Error: Invalid instruction data");
        ProgramError::from(e)
    })?;

    let [pool_account, caller, ..] = accounts else {
        msg!("Error: Pool instructions require 2 accounts");
        return Err(XykError::NotEnoughAccounts.into());
    };

    if !pool_account.is_owned_by(program_id) {
        msg!("Error: Pool account has wrong owner");
        return Err(XykError::InvalidOwner.into());
    }
    if !pool_account.is_writable() {
        msg!("Error: Pool account must be writable");
        return Err(XykError::NotWritable.into());
    }
    if !caller.is_signer() {
        msg!("Error: Caller must sign");
        return Err(XykError::MissingSignature.into());
    }

    match instruction {
        PoolInstruction::Initialize { .. } => msg!("Instruction: Initialize"),
        PoolInstruction::AddLiquidity { .. } => msg!("Instruction: AddLiquidity"),
        PoolInstruction::Swap { .. } => msg!("Instruction: Swap"),
        PoolInstruction::RemoveLiquidity { .. } => msg!("Instruction: RemoveLiquidity"),
    }

    let mut data = pool_account.try_borrow_mut_data()?;
    let outcome = process(&mut data, instruction)?;
    log_outcome(&outcome);
    Ok(())
}

fn log_outcome(outcome: &PoolOutcome) {
    match *outcome {
        PoolOutcome::Initialized { reserve_a, reserve_b } => {
            log!("Pool initialized: reserve_a={} reserve_b={}", reserve_a, reserve_b);
        }
        PoolOutcome::LiquidityAdded { shares_minted } => {
            log!("Liquidity added: shares_minted={}", shares_minted);
        }
        PoolOutcome::Swapped {
            amount_in,
            fee_amount,
            amount_out,
        } => {
            log!("Swapped: in={} fee={} out={}", amount_in, fee_amount, amount_out);
        }
        PoolOutcome::LiquidityRemoved { amount_a, amount_b } => {
            log!("Liquidity removed: amount_a={} amount_b={}", amount_a, amount_b);
        }
    }
}

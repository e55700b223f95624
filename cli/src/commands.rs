//! Pool commands: load state, run one transition, persist, report

use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::path::Path;
use xyk_model::{Pool, PoolInstruction, PoolOutcome, SwapDirection, PRICE_SCALE};

use crate::config::XykConfig;
use crate::store::{self, PoolState};

/// Apply one instruction to pool and ledger together.
///
/// Works on a copy and only replaces `state` on success, so a rejected
/// instruction leaves both untouched.
pub fn apply(
    state: &mut PoolState,
    instruction: PoolInstruction,
    holder: &str,
) -> Result<PoolOutcome> {
    let mut next = state.clone();

    if let PoolInstruction::RemoveLiquidity { shares } = instruction {
        next.holders.check(holder, shares)?;
    }

    let outcome = next
        .pool
        .execute(instruction)
        .with_context(|| format!("{} rejected", instruction.name()))?;

    match outcome {
        PoolOutcome::LiquidityAdded { shares_minted } => {
            next.holders.credit(holder, shares_minted)?;
        }
        PoolOutcome::LiquidityRemoved { .. } => {
            if let PoolInstruction::RemoveLiquidity { shares } = instruction {
                next.holders.debit(holder, shares)?;
            }
        }
        PoolOutcome::Initialized { .. } | PoolOutcome::Swapped { .. } => {}
    }

    *state = next;
    Ok(outcome)
}

/// Load, apply, save. Nothing is written when the instruction fails.
pub fn run_instruction(
    config: &XykConfig,
    instruction: PoolInstruction,
    holder: &str,
) -> Result<()> {
    let mut state = store::load(&config.state_path)
        .with_context(|| format!("Failed to load state: {}", config.state_path.display()))?;
    log::debug!("Applying {:?} for holder {}", instruction, holder);

    let outcome = match apply(&mut state, instruction, holder) {
        Ok(outcome) => outcome,
        Err(e) => {
            log::warn!("{:#}", e);
            return Err(e);
        }
    };

    store::save(&config.state_path, &state)
        .with_context(|| format!("Failed to save state: {}", config.state_path.display()))?;
    log::info!("{} committed: {:?}", instruction.name(), outcome);

    print_outcome(&outcome, holder);
    print_pool(&state.pool);
    Ok(())
}

/// Apply a JSON array of instructions in order, stopping at the first failure.
///
/// The prefix that succeeded is persisted either way.
pub fn replay(config: &XykConfig, file: &Path, holder: &str) -> Result<usize> {
    let raw = fs::read_to_string(file)
        .with_context(|| format!("Failed to read replay file: {}", file.display()))?;
    let instructions: Vec<PoolInstruction> = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse replay file: {}", file.display()))?;

    let mut state = store::load(&config.state_path)
        .with_context(|| format!("Failed to load state: {}", config.state_path.display()))?;

    println!("{}", "=== Replay ===".bright_green().bold());
    let mut applied = 0;
    let mut failure = None;
    for (step, instruction) in instructions.iter().enumerate() {
        log::debug!("Replay step {}: {:?}", step, instruction);
        match apply(&mut state, *instruction, holder) {
            Ok(outcome) => {
                log::info!("Step {} {} committed", step, instruction.name());
                print_outcome(&outcome, holder);
                applied += 1;
            }
            Err(e) => {
                log::warn!("Step {} failed: {:#}", step, e);
                failure = Some(e.context(format!("Replay stopped at step {}", step)));
                break;
            }
        }
    }

    store::save(&config.state_path, &state)
        .with_context(|| format!("Failed to save state: {}", config.state_path.display()))?;
    println!(
        "{} {}/{}",
        "Applied:".bright_cyan(),
        applied,
        instructions.len()
    );
    print_pool(&state.pool);

    match failure {
        Some(e) => Err(e),
        None => Ok(applied),
    }
}

/// Preview a swap without touching the state file.
pub fn quote(config: &XykConfig, amount_in: u64, direction: SwapDirection) -> Result<()> {
    let state = store::load(&config.state_path)
        .with_context(|| format!("Failed to load state: {}", config.state_path.display()))?;
    let quote = state
        .pool
        .quote_swap(amount_in, direction)
        .context("swap quote rejected")?;

    println!("{}", "=== Swap Quote ===".bright_green().bold());
    println!("{} {}", "Direction:".bright_cyan(), direction_label(direction));
    println!("{} {}", "Amount in:".bright_cyan(), quote.amount_in);
    println!("{} {}", "Fee:".bright_cyan(), quote.fee_amount);
    println!("{} {}", "Amount out:".bright_cyan(), quote.amount_out);

    if let Ok(spot) = state.pool.spot_price(direction) {
        println!("{} {}", "Spot price:".bright_cyan(), format_price(spot));
    }
    Ok(())
}

pub fn show(config: &XykConfig) -> Result<()> {
    let state = store::load(&config.state_path)
        .with_context(|| format!("Failed to load state: {}", config.state_path.display()))?;

    println!("{} {}", "State file:".bright_cyan(), config.state_path.display());
    print_pool(&state.pool);

    println!("\n{}", "=== Holders ===".bright_green().bold());
    if state.holders.is_empty() {
        println!("{}", "No holders".dimmed());
    }
    for (holder, shares) in state.holders.iter() {
        println!("{} {}", format!("{}:", holder).bright_cyan(), shares);
    }
    Ok(())
}

fn direction_label(direction: SwapDirection) -> &'static str {
    match direction {
        SwapDirection::AToB => "A -> B",
        SwapDirection::BToA => "B -> A",
    }
}

/// Render a PRICE_SCALE fixed-point value with 6 decimals
fn format_price(value: u128) -> String {
    let whole = value / PRICE_SCALE;
    let frac = (value % PRICE_SCALE) / (PRICE_SCALE / 1_000_000);
    format!("{}.{:06}", whole, frac)
}

fn print_outcome(outcome: &PoolOutcome, holder: &str) {
    match *outcome {
        PoolOutcome::Initialized { reserve_a, reserve_b } => {
            println!("{}", "Pool initialized".bright_green().bold());
            println!("{} {} / {}", "Seed reserves:".bright_cyan(), reserve_a, reserve_b);
        }
        PoolOutcome::LiquidityAdded { shares_minted } => {
            println!("{}", "Liquidity added".bright_green().bold());
            println!("{} {} -> {}", "Shares minted:".bright_cyan(), shares_minted, holder);
        }
        PoolOutcome::Swapped {
            amount_in,
            fee_amount,
            amount_out,
        } => {
            println!("{}", "Swap executed".bright_green().bold());
            println!("{} {} (fee {})", "Amount in:".bright_cyan(), amount_in, fee_amount);
            println!("{} {}", "Amount out:".bright_cyan(), amount_out);
        }
        PoolOutcome::LiquidityRemoved { amount_a, amount_b } => {
            println!("{}", "Liquidity removed".bright_green().bold());
            println!("{} {} / {} <- {}", "Withdrawn:".bright_cyan(), amount_a, amount_b, holder);
        }
    }
}

fn print_pool(pool: &Pool) {
    println!("\n{}", "=== Pool ===".bright_green().bold());
    if !pool.is_initialized() {
        println!("{}", "Pool not initialized".yellow());
        return;
    }
    println!("{} {}", "Fee (bps):".bright_cyan(), pool.fee_bps);
    println!("{} {}", "Reserve A:".bright_cyan(), pool.reserve_a);
    println!("{} {}", "Reserve B:".bright_cyan(), pool.reserve_b);
    println!("{} {}", "Total shares:".bright_cyan(), pool.total_shares);
    println!("{} {}", "k:".bright_cyan(), pool.invariant_k());
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use xyk_model::PoolError;

    fn init(fee_bps: u16) -> PoolInstruction {
        PoolInstruction::Initialize {
            amount_a: 1000,
            amount_b: 500,
            fee_bps,
        }
    }

    fn add(amount_a: u64, amount_b: u64) -> PoolInstruction {
        PoolInstruction::AddLiquidity { amount_a, amount_b }
    }

    fn remove(shares: u64) -> PoolInstruction {
        PoolInstruction::RemoveLiquidity { shares }
    }

    #[test]
    fn test_apply_credits_and_debits_holders() {
        let mut state = PoolState::default();
        apply(&mut state, init(0), "alice").unwrap();
        apply(&mut state, add(200, 100), "alice").unwrap();
        apply(&mut state, add(120, 60), "bob").unwrap();

        assert_eq!(state.holders.balance("alice"), 200);
        assert_eq!(state.holders.balance("bob"), 20);
        assert_eq!(state.holders.total(), state.pool.total_shares as u128);

        apply(&mut state, remove(150), "alice").unwrap();
        assert_eq!(state.holders.balance("alice"), 50);
        assert_eq!(state.holders.total(), state.pool.total_shares as u128);
    }

    #[test]
    fn test_remove_beyond_holder_balance_rejected_before_pool() {
        let mut state = PoolState::default();
        apply(&mut state, init(0), "alice").unwrap();
        apply(&mut state, add(200, 100), "alice").unwrap();
        apply(&mut state, add(120, 60), "bob").unwrap();
        let before = state.clone();

        // Pool has 220 shares, bob only owns 20
        let err = apply(&mut state, remove(21), "bob").unwrap_err();

        assert!(err.to_string().contains("cannot burn 21"));
        assert_eq!(state, before);
    }

    #[test]
    fn test_pool_rejection_leaves_state() {
        let mut state = PoolState::default();
        apply(&mut state, init(0), "alice").unwrap();
        apply(&mut state, add(200, 100), "alice").unwrap();
        let before = state.clone();

        let err = apply(
            &mut state,
            PoolInstruction::Swap {
                amount_in: 50,
                min_amount_out: 30,
                direction: SwapDirection::AToB,
            },
            "alice",
        )
        .unwrap_err();

        assert_eq!(err.downcast_ref::<PoolError>(), Some(&PoolError::SlippageExceeded));
        assert_eq!(state, before);
    }

    #[test]
    fn test_run_instruction_persists() {
        let dir = tempdir().unwrap();
        let config = XykConfig::default().with_state_path(Some(dir.path().join("state.json")));

        run_instruction(&config, init(30), "alice").unwrap();
        run_instruction(&config, add(200, 100), "alice").unwrap();
        assert!(run_instruction(&config, init(30), "alice").is_err());

        let state = store::load(&config.state_path).unwrap();
        assert_eq!(state.pool.total_shares, 200);
        assert_eq!(state.holders.balance("alice"), 200);
    }

    #[test]
    fn test_replay_persists_applied_prefix() {
        let dir = tempdir().unwrap();
        let config = XykConfig::default().with_state_path(Some(dir.path().join("state.json")));
        let script = dir.path().join("script.json");
        fs::write(
            &script,
            r#"[
                {"op": "initialize", "amount_a": 1000, "amount_b": 500, "fee_bps": 30},
                {"op": "add_liquidity", "amount_a": 200, "amount_b": 100},
                {"op": "swap", "amount_in": 50, "min_amount_out": 20, "direction": "a_to_b"},
                {"op": "remove_liquidity", "shares": 500},
                {"op": "remove_liquidity", "shares": 50}
            ]"#,
        )
        .unwrap();

        let err = replay(&config, &script, "alice").unwrap_err();
        assert!(format!("{:#}", err).contains("Replay stopped at step 3"));

        let state = store::load(&config.state_path).unwrap();
        assert_eq!((state.pool.reserve_a, state.pool.reserve_b), (1250, 577));
        assert_eq!(state.pool.total_shares, 200);
        assert_eq!(state.holders.balance("alice"), 200);
    }

    #[test]
    fn test_replay_full_script() {
        let dir = tempdir().unwrap();
        let config = XykConfig::default().with_state_path(Some(dir.path().join("state.json")));
        let script = dir.path().join("script.json");
        fs::write(
            &script,
            r#"[
                {"op": "initialize", "amount_a": 1000, "amount_b": 500, "fee_bps": 30},
                {"op": "add_liquidity", "amount_a": 200, "amount_b": 100},
                {"op": "swap", "amount_in": 50, "min_amount_out": 20, "direction": "a_to_b"},
                {"op": "remove_liquidity", "shares": 50}
            ]"#,
        )
        .unwrap();

        assert_eq!(replay(&config, &script, "alice").unwrap(), 4);

        let state = store::load(&config.state_path).unwrap();
        assert_eq!(
            (state.pool.reserve_a, state.pool.reserve_b, state.pool.total_shares),
            (938, 433, 150)
        );
        assert_eq!(state.holders.balance("alice"), 150);
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(PRICE_SCALE / 2), "0.500000");
        assert_eq!(format_price(PRICE_SCALE * 2), "2.000000");
    }
}

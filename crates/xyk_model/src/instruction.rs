//! Instruction-level entry into the pool state machine
//!
//! Front ends (the on-chain program, the CLI replay log) decode their input
//! into a [`PoolInstruction`] and hand it to [`Pool::execute`], so every
//! surface drives exactly the same transitions.

use crate::pool::{Pool, SwapDirection};
use crate::PoolError;

/// One pool transition with its parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "op", rename_all = "snake_case"))]
pub enum PoolInstruction {
    Initialize {
        amount_a: u64,
        amount_b: u64,
        fee_bps: u16,
    },
    AddLiquidity {
        amount_a: u64,
        amount_b: u64,
    },
    Swap {
        amount_in: u64,
        min_amount_out: u64,
        direction: SwapDirection,
    },
    RemoveLiquidity {
        shares: u64,
    },
}

/// Result of a successful transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "event", rename_all = "snake_case"))]
pub enum PoolOutcome {
    Initialized {
        reserve_a: u64,
        reserve_b: u64,
    },
    LiquidityAdded {
        shares_minted: u64,
    },
    Swapped {
        amount_in: u64,
        fee_amount: u64,
        amount_out: u64,
    },
    LiquidityRemoved {
        amount_a: u64,
        amount_b: u64,
    },
}

impl PoolInstruction {
    pub fn name(&self) -> &'static str {
        match self {
            PoolInstruction::Initialize { .. } => "initialize",
            PoolInstruction::AddLiquidity { .. } => "add_liquidity",
            PoolInstruction::Swap { .. } => "swap",
            PoolInstruction::RemoveLiquidity { .. } => "remove_liquidity",
        }
    }
}

impl Pool {
    /// Apply one instruction. On error the pool is unchanged.
    pub fn execute(&mut self, instruction: PoolInstruction) -> Result<PoolOutcome, PoolError> {
        match instruction {
            PoolInstruction::Initialize {
                amount_a,
                amount_b,
                fee_bps,
            } => {
                self.initialize_with_fee(amount_a, amount_b, fee_bps)?;
                Ok(PoolOutcome::Initialized {
                    reserve_a: self.reserve_a,
                    reserve_b: self.reserve_b,
                })
            }
            PoolInstruction::AddLiquidity { amount_a, amount_b } => {
                let shares_minted = self.add_liquidity(amount_a, amount_b)?;
                Ok(PoolOutcome::LiquidityAdded { shares_minted })
            }
            PoolInstruction::Swap {
                amount_in,
                min_amount_out,
                direction,
            } => {
                let quote = self.swap_with_quote(amount_in, min_amount_out, direction)?;
                Ok(PoolOutcome::Swapped {
                    amount_in: quote.amount_in,
                    fee_amount: quote.fee_amount,
                    amount_out: quote.amount_out,
                })
            }
            PoolInstruction::RemoveLiquidity { shares } => {
                let (amount_a, amount_b) = self.remove_liquidity(shares)?;
                Ok(PoolOutcome::LiquidityRemoved { amount_a, amount_b })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_execute_lifecycle() {
        let mut pool = Pool::new();

        let outcome = pool
            .execute(PoolInstruction::Initialize {
                amount_a: 1000,
                amount_b: 500,
                fee_bps: 0,
            })
            .unwrap();
        assert_eq!(
            outcome,
            PoolOutcome::Initialized {
                reserve_a: 1000,
                reserve_b: 500
            }
        );

        let outcome = pool
            .execute(PoolInstruction::AddLiquidity {
                amount_a: 200,
                amount_b: 100,
            })
            .unwrap();
        assert_eq!(outcome, PoolOutcome::LiquidityAdded { shares_minted: 200 });

        let outcome = pool
            .execute(PoolInstruction::Swap {
                amount_in: 50,
                min_amount_out: 20,
                direction: SwapDirection::AToB,
            })
            .unwrap();
        assert_eq!(
            outcome,
            PoolOutcome::Swapped {
                amount_in: 50,
                fee_amount: 0,
                amount_out: 24
            }
        );

        let outcome = pool
            .execute(PoolInstruction::RemoveLiquidity { shares: 50 })
            .unwrap();
        // 1250 * 50 / 200, 576 * 50 / 200
        assert_eq!(
            outcome,
            PoolOutcome::LiquidityRemoved {
                amount_a: 312,
                amount_b: 144
            }
        );
    }

    #[test]
    fn test_execute_error_leaves_pool_unchanged() {
        let mut pool = Pool::new();
        let err = pool
            .execute(PoolInstruction::Swap {
                amount_in: 1,
                min_amount_out: 0,
                direction: SwapDirection::BToA,
            })
            .unwrap_err();

        assert_eq!(err, PoolError::PoolNotInitialized);
        assert_eq!(pool, Pool::new());
    }

    #[test]
    fn test_instruction_names() {
        assert_eq!(PoolInstruction::RemoveLiquidity { shares: 1 }.name(), "remove_liquidity");
        assert_eq!(
            PoolInstruction::AddLiquidity {
                amount_a: 1,
                amount_b: 1
            }
            .name(),
            "add_liquidity"
        );
    }
}

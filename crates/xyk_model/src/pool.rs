//! Pool record and its four transitions
//!
//! Each transition reads the record once, validates and computes into
//! locals, and only then writes the new values back. An `Err` therefore
//! never leaves a partially updated pool behind.

use crate::math::{self, invariant};
use crate::{PoolError, ShareAnchor, DEFAULT_FEE_BPS, MAX_FEE_BPS, PRICE_SCALE, SHARE_ANCHOR};

/// Lifecycle of the pool record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PoolStatus {
    /// Record exists in storage but the pool was never created
    #[default]
    Uninitialized,
    /// Created by `initialize`; never leaves this state
    Initialized,
}

/// Which asset the caller supplies to a swap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SwapDirection {
    /// Supply asset A, receive asset B
    AToB,
    /// Supply asset B, receive asset A
    BToA,
}

/// Priced swap, before the slippage check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapQuote {
    /// Gross input supplied by the caller
    pub amount_in: u64,
    /// Part of the input retained as fee
    pub fee_amount: u64,
    /// Input that is priced against the curve
    pub amount_in_after_fee: u64,
    /// Output paid by the pool
    pub amount_out: u64,
    /// Input-side reserve after the swap (includes the fee)
    pub new_reserve_in: u64,
    /// Output-side reserve after the swap
    pub new_reserve_out: u64,
}

/// Single two-asset constant product pool
///
/// # Invariants
/// - `status == Uninitialized` implies all balances are zero.
/// - While `total_shares > 0` both reserves are positive.
/// - Swaps never decrease `reserve_a * reserve_b`.
/// - Deposits and withdrawals never lower the per-share value of either
///   reserve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pool {
    pub status: PoolStatus,
    /// Swap fee in basis points, fixed at creation
    pub fee_bps: u16,
    pub reserve_a: u64,
    pub reserve_b: u64,
    /// Outstanding liquidity-provider shares
    pub total_shares: u64,
}

impl Pool {
    /// A record that has not been created yet.
    pub const fn new() -> Self {
        Self {
            status: PoolStatus::Uninitialized,
            fee_bps: 0,
            reserve_a: 0,
            reserve_b: 0,
            total_shares: 0,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.status == PoolStatus::Initialized
    }

    fn require_initialized(&self) -> Result<(), PoolError> {
        if !self.is_initialized() {
            return Err(PoolError::PoolNotInitialized);
        }
        Ok(())
    }

    /// Create the pool with [`DEFAULT_FEE_BPS`].
    pub fn initialize(&mut self, amount_a: u64, amount_b: u64) -> Result<(), PoolError> {
        self.initialize_with_fee(amount_a, amount_b, DEFAULT_FEE_BPS)
    }

    /// Create the pool with seed reserves and a fixed swap fee.
    ///
    /// No shares are minted here. The first `add_liquidity` call mints
    /// against the asset A anchor like every later zero-supply deposit.
    ///
    /// # Errors
    /// - `AlreadyInitialized`: the record was created before
    /// - `InvalidAmount`: either seed amount is zero
    /// - `InvalidFee`: `fee_bps > MAX_FEE_BPS`
    pub fn initialize_with_fee(
        &mut self,
        amount_a: u64,
        amount_b: u64,
        fee_bps: u16,
    ) -> Result<(), PoolError> {
        if self.is_initialized() {
            return Err(PoolError::AlreadyInitialized);
        }
        if amount_a == 0 || amount_b == 0 {
            return Err(PoolError::InvalidAmount);
        }
        if fee_bps > MAX_FEE_BPS {
            return Err(PoolError::InvalidFee);
        }

        *self = Pool {
            status: PoolStatus::Initialized,
            fee_bps,
            reserve_a: amount_a,
            reserve_b: amount_b,
            total_shares: 0,
        };
        Ok(())
    }

    /// Deposit both assets and mint shares.
    ///
    /// - Zero supply: mints against [`SHARE_ANCHOR`], i.e. `amount_a` shares.
    /// - Otherwise: mints the smaller of the two pro-rata share amounts. The
    ///   full amounts are still added to the reserves, so any excess on the
    ///   non-binding side accrues to existing holders.
    ///
    /// # Errors
    /// - `PoolNotInitialized`
    /// - `InvalidAmount`: a zero amount, or a deposit too small to mint a share
    /// - `ArithmeticOverflow`: reserves or supply would leave `u64`
    pub fn add_liquidity(&mut self, amount_a: u64, amount_b: u64) -> Result<u64, PoolError> {
        self.require_initialized()?;
        if amount_a == 0 || amount_b == 0 {
            return Err(PoolError::InvalidAmount);
        }

        let shares_minted = if self.total_shares == 0 {
            match SHARE_ANCHOR {
                ShareAnchor::AssetA => amount_a,
            }
        } else {
            math::proportional_shares(
                amount_a,
                amount_b,
                self.reserve_a,
                self.reserve_b,
                self.total_shares,
            )?
        };
        if shares_minted == 0 {
            return Err(PoolError::InvalidAmount);
        }

        let reserve_a = self
            .reserve_a
            .checked_add(amount_a)
            .ok_or(PoolError::ArithmeticOverflow)?;
        let reserve_b = self
            .reserve_b
            .checked_add(amount_b)
            .ok_or(PoolError::ArithmeticOverflow)?;
        let total_shares = self
            .total_shares
            .checked_add(shares_minted)
            .ok_or(PoolError::ArithmeticOverflow)?;

        self.reserve_a = reserve_a;
        self.reserve_b = reserve_b;
        self.total_shares = total_shares;
        Ok(shares_minted)
    }

    /// `(reserve_in, reserve_out)` for a swap direction.
    pub fn reserves(&self, direction: SwapDirection) -> (u64, u64) {
        match direction {
            SwapDirection::AToB => (self.reserve_a, self.reserve_b),
            SwapDirection::BToA => (self.reserve_b, self.reserve_a),
        }
    }

    /// Price a swap without touching the pool.
    ///
    /// Uses the same arithmetic and checks as [`Pool::swap`] apart from the
    /// slippage bound.
    pub fn quote_swap(
        &self,
        amount_in: u64,
        direction: SwapDirection,
    ) -> Result<SwapQuote, PoolError> {
        self.require_initialized()?;
        if amount_in == 0 {
            return Err(PoolError::InvalidAmount);
        }
        if self.total_shares == 0 || self.reserve_a == 0 || self.reserve_b == 0 {
            return Err(PoolError::EmptyPool);
        }

        let (reserve_in, reserve_out) = self.reserves(direction);

        let (amount_in_after_fee, fee_amount) = math::apply_fee(amount_in, self.fee_bps)?;
        let amount_out = math::constant_product_out(reserve_in, reserve_out, amount_in_after_fee)?;

        // Full input (fee included) stays in the pool
        let new_reserve_in = reserve_in
            .checked_add(amount_in)
            .ok_or(PoolError::ArithmeticOverflow)?;

        if amount_out == 0 {
            return Err(PoolError::InvalidAmount);
        }
        if amount_out >= reserve_out {
            return Err(PoolError::InsufficientLiquidity);
        }

        Ok(SwapQuote {
            amount_in,
            fee_amount,
            amount_in_after_fee,
            amount_out,
            new_reserve_in,
            new_reserve_out: reserve_out - amount_out,
        })
    }

    /// Swap `amount_in` of one asset for the other along the curve.
    ///
    /// Returns the amount paid out.
    ///
    /// # Errors
    /// - `PoolNotInitialized`, `EmptyPool`
    /// - `InvalidAmount`: zero input, or input too small to buy one unit
    /// - `ArithmeticOverflow`: input reserve would leave `u64`
    /// - `InsufficientLiquidity`: output would reach the full reserve
    /// - `SlippageExceeded`: output below `min_amount_out`
    pub fn swap(
        &mut self,
        amount_in: u64,
        min_amount_out: u64,
        direction: SwapDirection,
    ) -> Result<u64, PoolError> {
        self.swap_with_quote(amount_in, min_amount_out, direction)
            .map(|quote| quote.amount_out)
    }

    /// [`Pool::swap`], returning the full quote that was committed.
    pub fn swap_with_quote(
        &mut self,
        amount_in: u64,
        min_amount_out: u64,
        direction: SwapDirection,
    ) -> Result<SwapQuote, PoolError> {
        let quote = self.quote_swap(amount_in, direction)?;
        if quote.amount_out < min_amount_out {
            return Err(PoolError::SlippageExceeded);
        }

        match direction {
            SwapDirection::AToB => {
                self.reserve_a = quote.new_reserve_in;
                self.reserve_b = quote.new_reserve_out;
            }
            SwapDirection::BToA => {
                self.reserve_b = quote.new_reserve_in;
                self.reserve_a = quote.new_reserve_out;
            }
        }
        Ok(quote)
    }

    /// Amounts a burn of `shares` would pay out, without touching the pool.
    pub fn quote_remove_liquidity(&self, shares: u64) -> Result<(u64, u64), PoolError> {
        self.require_initialized()?;
        if shares == 0 {
            return Err(PoolError::InvalidAmount);
        }
        if shares > self.total_shares {
            return Err(PoolError::InsufficientShares);
        }

        let amount_a = math::pro_rata(self.reserve_a, shares, self.total_shares)?;
        let amount_b = math::pro_rata(self.reserve_b, shares, self.total_shares)?;
        Ok((amount_a, amount_b))
    }

    /// Burn `shares` and pay out the pro-rata slice of both reserves.
    ///
    /// The caller's ownership of `shares` is checked by the holder ledger
    /// before this is invoked. Burning the whole supply empties both
    /// reserves exactly.
    ///
    /// # Errors
    /// - `PoolNotInitialized`
    /// - `InvalidAmount`: zero shares
    /// - `InsufficientShares`: more than `total_shares`
    pub fn remove_liquidity(&mut self, shares: u64) -> Result<(u64, u64), PoolError> {
        let (amount_a, amount_b) = self.quote_remove_liquidity(shares)?;

        // pro_rata never exceeds the reserve and shares <= total_shares
        self.reserve_a -= amount_a;
        self.reserve_b -= amount_b;
        self.total_shares -= shares;
        Ok((amount_a, amount_b))
    }

    /// Current `reserve_a * reserve_b`.
    pub fn invariant_k(&self) -> u128 {
        invariant(self.reserve_a, self.reserve_b)
    }

    /// Marginal price of the input asset in units of the output asset,
    /// scaled by [`PRICE_SCALE`].
    pub fn spot_price(&self, direction: SwapDirection) -> Result<u128, PoolError> {
        self.require_initialized()?;
        let (reserve_in, reserve_out) = self.reserves(direction);
        if reserve_in == 0 || reserve_out == 0 {
            return Err(PoolError::EmptyPool);
        }
        let scaled = (reserve_out as u128)
            .checked_mul(PRICE_SCALE)
            .ok_or(PoolError::ArithmeticOverflow)?;
        Ok(scaled / reserve_in as u128)
    }
}

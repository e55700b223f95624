//! Checked fixed-point helpers for constant product math (x·y=k)
//!
//! Every helper widens to `u128` before multiplying, floors on division and
//! narrows back to `u64` through [`narrow`]. None of them panic.

use crate::{PoolError, BPS_SCALE};

/// Narrow a `u128` intermediate back to the `u64` amount width.
#[inline]
pub fn narrow(value: u128) -> Result<u64, PoolError> {
    u64::try_from(value).map_err(|_| PoolError::ArithmeticOverflow)
}

/// `a * b / denominator`, floored.
///
/// Fails with `EmptyPool` on a zero denominator: every caller divides by a
/// reserve or the share supply.
#[inline]
pub fn mul_div_floor(a: u64, b: u64, denominator: u64) -> Result<u128, PoolError> {
    if denominator == 0 {
        return Err(PoolError::EmptyPool);
    }
    let product = (a as u128)
        .checked_mul(b as u128)
        .ok_or(PoolError::ArithmeticOverflow)?;
    Ok(product / denominator as u128)
}

/// Split an input amount into `(amount_after_fee, fee_amount)`.
///
/// `amount_after_fee = amount_in * (BPS_SCALE - fee_bps) / BPS_SCALE`,
/// floored, so the fee is effectively rounded up.
#[inline]
pub fn apply_fee(amount_in: u64, fee_bps: u16) -> Result<(u64, u64), PoolError> {
    let fee_bps = fee_bps as u64;
    if fee_bps > BPS_SCALE {
        return Err(PoolError::InvalidFee);
    }
    let after_fee = narrow(mul_div_floor(amount_in, BPS_SCALE - fee_bps, BPS_SCALE)?)?;
    // after_fee <= amount_in because the multiplier is <= 1
    let fee_amount = amount_in - after_fee;
    Ok((after_fee, fee_amount))
}

/// Constant product output for a net input:
///
/// `amount_out = reserve_out * amount_in / (reserve_in + amount_in)`, floored.
///
/// The result is strictly below `reserve_out` whenever `reserve_in > 0`.
#[inline]
pub fn constant_product_out(
    reserve_in: u64,
    reserve_out: u64,
    amount_in: u64,
) -> Result<u64, PoolError> {
    if reserve_in == 0 || reserve_out == 0 {
        return Err(PoolError::EmptyPool);
    }
    let numerator = (reserve_out as u128)
        .checked_mul(amount_in as u128)
        .ok_or(PoolError::ArithmeticOverflow)?;
    let denominator = (reserve_in as u128)
        .checked_add(amount_in as u128)
        .ok_or(PoolError::ArithmeticOverflow)?;
    narrow(numerator / denominator)
}

/// Shares credited for a deposit into a pool with shares outstanding.
///
/// `min(amount_a * total_shares / reserve_a, amount_b * total_shares / reserve_b)`
///
/// Only the binding side is credited; the excess of the other asset stays in
/// the pool.
#[inline]
pub fn proportional_shares(
    amount_a: u64,
    amount_b: u64,
    reserve_a: u64,
    reserve_b: u64,
    total_shares: u64,
) -> Result<u64, PoolError> {
    let from_a = mul_div_floor(amount_a, total_shares, reserve_a)?;
    let from_b = mul_div_floor(amount_b, total_shares, reserve_b)?;
    narrow(core::cmp::min(from_a, from_b))
}

/// Pro-rata slice of one reserve for `shares` out of `total_shares`, floored.
#[inline]
pub fn pro_rata(reserve: u64, shares: u64, total_shares: u64) -> Result<u64, PoolError> {
    // shares <= total_shares keeps the result <= reserve
    narrow(mul_div_floor(reserve, shares, total_shares)?)
}

/// Product of both reserves.
#[inline]
pub fn invariant(reserve_a: u64, reserve_b: u64) -> u128 {
    // u64 * u64 always fits in u128
    (reserve_a as u128) * (reserve_b as u128)
}

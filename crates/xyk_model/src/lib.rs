//! XYK Model - Pure constant product pool state machine (x·y=k)
//!
//! This crate holds the whole transition core of a single two-asset pool:
//! reserve and share accounting, constant product pricing, fee application
//! and slippage protection. Every operation is a deterministic function of
//! the current [`Pool`] record and its parameters.
//!
//! The crate has no notion of accounts, signers or storage. A caller loads a
//! [`Pool`], invokes one transition, and persists the record again. On error
//! the record is left untouched, so the caller may simply drop the attempt.
//!
//! All amounts are `u64`; intermediate products are computed in `u128` and
//! narrowed back with checked conversions. Rounding always favours the pool.

#![no_std]
#![forbid(unsafe_code)]

#[cfg(feature = "std")]
extern crate std;

pub mod instruction;
pub mod layout;
pub mod math;
pub mod pool;

pub use instruction::{PoolInstruction, PoolOutcome};
pub use layout::LayoutError;
pub use pool::{Pool, PoolStatus, SwapDirection, SwapQuote};

/// Basis points scale (10,000 bps = 100%)
pub const BPS_SCALE: u64 = 10_000;

/// Swap fee applied when a pool is created without an explicit fee (0.30%)
pub const DEFAULT_FEE_BPS: u16 = 30;

/// Upper bound for the swap fee fixed at pool creation (10%)
pub const MAX_FEE_BPS: u16 = 1_000;

/// Fixed-point scale for spot prices (1e18)
pub const PRICE_SCALE: u128 = 1_000_000_000_000_000_000;

/// Asset used to denominate shares while the share supply is zero.
///
/// With [`ShareAnchor::AssetA`] the first deposit after creation (or after a
/// full withdrawal) mints exactly `amount_a` shares. That ratio then fixes
/// the share-to-value relation for every later deposit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareAnchor {
    AssetA,
}

/// Share denomination convention in force for this build.
pub const SHARE_ANCHOR: ShareAnchor = ShareAnchor::AssetA;

/// Error types for pool transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolError {
    /// Operation requires an initialized pool
    PoolNotInitialized,
    /// Pool has already been created
    AlreadyInitialized,
    /// Amount is zero or outside the operation's domain
    InvalidAmount,
    /// Fee exceeds MAX_FEE_BPS
    InvalidFee,
    /// A computation left the representable range
    ArithmeticOverflow,
    /// Swap would consume the entire opposing reserve
    InsufficientLiquidity,
    /// Withdrawal requests more shares than exist
    InsufficientShares,
    /// Computed output is below the caller's minimum
    SlippageExceeded,
    /// Pool has no shares or an empty reserve
    EmptyPool,
}

impl PoolError {
    /// Stable numeric code, used at wire boundaries.
    pub const fn code(self) -> u32 {
        match self {
            PoolError::PoolNotInitialized => 0,
            PoolError::AlreadyInitialized => 1,
            PoolError::InvalidAmount => 2,
            PoolError::InvalidFee => 3,
            PoolError::ArithmeticOverflow => 4,
            PoolError::InsufficientLiquidity => 5,
            PoolError::InsufficientShares => 6,
            PoolError::SlippageExceeded => 7,
            PoolError::EmptyPool => 8,
        }
    }
}

impl core::fmt::Display for PoolError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            PoolError::PoolNotInitialized => write!(f, "Pool has not been initialized"),
            PoolError::AlreadyInitialized => write!(f, "Pool is already initialized"),
            PoolError::InvalidAmount => write!(f, "Amount is zero or out of range"),
            PoolError::InvalidFee => write!(f, "Fee exceeds maximum allowed (10%)"),
            PoolError::ArithmeticOverflow => write!(f, "Arithmetic overflow"),
            PoolError::InsufficientLiquidity => {
                write!(f, "Swap would drain the output reserve")
            }
            PoolError::InsufficientShares => write!(f, "Not enough shares outstanding"),
            PoolError::SlippageExceeded => write!(f, "Slippage tolerance exceeded"),
            PoolError::EmptyPool => write!(f, "Pool has no liquidity"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for PoolError {}

//! Fixed 32-byte little-endian record for persisting a [`Pool`]
//!
//! ```text
//! offset  size  field
//!      0     1  status (0 = uninitialized, 1 = initialized)
//!      1     1  layout version
//!      2     2  fee_bps
//!      4     4  reserved, zero
//!      8     8  reserve_a
//!     16     8  reserve_b
//!     24     8  total_shares
//! ```
//!
//! A zero-filled buffer decodes to a fresh uninitialized pool, so a newly
//! allocated account needs no separate setup step.

use crate::pool::{Pool, PoolStatus};
use crate::MAX_FEE_BPS;

/// Current layout version written by [`Pool::pack_into`]
pub const LAYOUT_VERSION: u8 = 1;

const STATUS_UNINITIALIZED: u8 = 0;
const STATUS_INITIALIZED: u8 = 1;

/// Reasons a byte buffer does not hold a valid pool record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutError {
    /// Buffer length differs from [`Pool::LEN`]
    InvalidLength,
    /// Unknown status tag
    InvalidStatus,
    /// Layout version this build cannot read
    UnsupportedVersion,
    /// Stored fee above the allowed maximum
    InvalidFee,
    /// Fields violate the pool invariants
    Inconsistent,
}

impl core::fmt::Display for LayoutError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            LayoutError::InvalidLength => write!(f, "Pool record must be {} bytes", Pool::LEN),
            LayoutError::InvalidStatus => write!(f, "Unknown pool status tag"),
            LayoutError::UnsupportedVersion => write!(f, "Unsupported pool layout version"),
            LayoutError::InvalidFee => write!(f, "Stored fee exceeds maximum"),
            LayoutError::Inconsistent => write!(f, "Pool record fields are inconsistent"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for LayoutError {}

#[inline]
fn read_u64(data: &[u8], offset: usize) -> u64 {
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&data[offset..offset + 8]);
    u64::from_le_bytes(bytes)
}

impl Pool {
    /// Size of the serialized record
    pub const LEN: usize = 32;

    fn write_record(&self, dst: &mut [u8; Self::LEN]) {
        dst[0] = match self.status {
            PoolStatus::Uninitialized => STATUS_UNINITIALIZED,
            PoolStatus::Initialized => STATUS_INITIALIZED,
        };
        dst[1] = LAYOUT_VERSION;
        dst[2..4].copy_from_slice(&self.fee_bps.to_le_bytes());
        dst[4..8].fill(0);
        dst[8..16].copy_from_slice(&self.reserve_a.to_le_bytes());
        dst[16..24].copy_from_slice(&self.reserve_b.to_le_bytes());
        dst[24..32].copy_from_slice(&self.total_shares.to_le_bytes());
    }

    /// Write the record into `dst`, which must be exactly [`Pool::LEN`] bytes.
    pub fn pack_into(&self, dst: &mut [u8]) -> Result<(), LayoutError> {
        let dst: &mut [u8; Self::LEN] = dst.try_into().map_err(|_| LayoutError::InvalidLength)?;
        self.write_record(dst);
        Ok(())
    }

    pub fn to_bytes(&self) -> [u8; Self::LEN] {
        let mut out = [0u8; Self::LEN];
        self.write_record(&mut out);
        out
    }

    /// Decode and validate a record.
    ///
    /// An all-zero buffer is accepted as an uninitialized pool (version 0).
    pub fn unpack(src: &[u8]) -> Result<Pool, LayoutError> {
        if src.len() != Self::LEN {
            return Err(LayoutError::InvalidLength);
        }
        if src.iter().all(|b| *b == 0) {
            return Ok(Pool::new());
        }

        let status = match src[0] {
            STATUS_UNINITIALIZED => PoolStatus::Uninitialized,
            STATUS_INITIALIZED => PoolStatus::Initialized,
            _ => return Err(LayoutError::InvalidStatus),
        };
        if src[1] != LAYOUT_VERSION {
            return Err(LayoutError::UnsupportedVersion);
        }
        let fee_bps = u16::from_le_bytes([src[2], src[3]]);
        if src[4..8].iter().any(|b| *b != 0) {
            return Err(LayoutError::Inconsistent);
        }

        let pool = Pool {
            status,
            fee_bps,
            reserve_a: read_u64(src, 8),
            reserve_b: read_u64(src, 16),
            total_shares: read_u64(src, 24),
        };
        pool.check_consistency()?;
        Ok(pool)
    }

    /// Field-level checks shared by every loader of a stored pool.
    ///
    /// # Errors
    /// - `InvalidFee`: `fee_bps > MAX_FEE_BPS`
    /// - `Inconsistent`: balances on an uninitialized record, or shares
    ///   outstanding against an empty reserve
    pub fn check_consistency(&self) -> Result<(), LayoutError> {
        if self.fee_bps > MAX_FEE_BPS {
            return Err(LayoutError::InvalidFee);
        }
        let consistent = match self.status {
            PoolStatus::Uninitialized => {
                self.fee_bps == 0
                    && self.reserve_a == 0
                    && self.reserve_b == 0
                    && self.total_shares == 0
            }
            PoolStatus::Initialized => {
                self.total_shares == 0 || (self.reserve_a > 0 && self.reserve_b > 0)
            }
        };
        if consistent {
            Ok(())
        } else {
            Err(LayoutError::Inconsistent)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SwapDirection;

    #[test]
    fn test_zeroed_buffer_is_fresh_pool() {
        let pool = Pool::unpack(&[0u8; Pool::LEN]).unwrap();
        assert_eq!(pool, Pool::new());
    }

    #[test]
    fn test_pack_unpack_live_pool() {
        let mut pool = Pool::new();
        pool.initialize_with_fee(1000, 500, 25).unwrap();
        pool.add_liquidity(200, 100).unwrap();
        pool.swap(50, 0, SwapDirection::AToB).unwrap();

        let bytes = pool.to_bytes();

        assert_eq!(bytes[0], 1);
        assert_eq!(bytes[1], LAYOUT_VERSION);
        assert_eq!(&bytes[2..4], &25u16.to_le_bytes());
        assert_eq!(&bytes[24..32], &200u64.to_le_bytes());
        assert_eq!(Pool::unpack(&bytes).unwrap(), pool);
    }

    #[test]
    fn test_unpack_rejects_wrong_length() {
        assert_eq!(Pool::unpack(&[0u8; 31]), Err(LayoutError::InvalidLength));
        let mut big = [0u8; 40];
        assert_eq!(Pool::new().pack_into(&mut big), Err(LayoutError::InvalidLength));
    }

    #[test]
    fn test_unpack_rejects_bad_header() {
        let mut pool = Pool::new();
        pool.initialize(10, 10).unwrap();
        let good = pool.to_bytes();

        let mut bad = good;
        bad[0] = 7;
        assert_eq!(Pool::unpack(&bad), Err(LayoutError::InvalidStatus));

        let mut bad = good;
        bad[1] = 2;
        assert_eq!(Pool::unpack(&bad), Err(LayoutError::UnsupportedVersion));

        let mut bad = good;
        bad[2..4].copy_from_slice(&(MAX_FEE_BPS + 1).to_le_bytes());
        assert_eq!(Pool::unpack(&bad), Err(LayoutError::InvalidFee));

        let mut bad = good;
        bad[5] = 1;
        assert_eq!(Pool::unpack(&bad), Err(LayoutError::Inconsistent));
    }

    #[test]
    fn test_unpack_rejects_inconsistent_balances() {
        // Uninitialized with a reserve
        let mut bytes = [0u8; Pool::LEN];
        bytes[1] = LAYOUT_VERSION;
        bytes[8] = 5;
        assert_eq!(Pool::unpack(&bytes), Err(LayoutError::Inconsistent));

        // Shares outstanding against an empty reserve
        let mut bytes = [0u8; Pool::LEN];
        bytes[0] = 1;
        bytes[1] = LAYOUT_VERSION;
        bytes[8] = 5;
        bytes[24] = 1;
        assert_eq!(Pool::unpack(&bytes), Err(LayoutError::Inconsistent));
    }

    #[test]
    fn test_check_consistency_on_decoded_fields() {
        let mut pool = Pool::new();
        pool.initialize(1000, 500).unwrap();
        pool.add_liquidity(200, 100).unwrap();
        assert_eq!(pool.check_consistency(), Ok(()));

        let mut high_fee = pool;
        high_fee.fee_bps = MAX_FEE_BPS + 1;
        assert_eq!(high_fee.check_consistency(), Err(LayoutError::InvalidFee));
        assert_eq!(Pool::unpack(&high_fee.to_bytes()), Err(LayoutError::InvalidFee));

        let mut drained_a = pool;
        drained_a.reserve_a = 0;
        assert_eq!(drained_a.check_consistency(), Err(LayoutError::Inconsistent));
    }
}

//! Holder share ledger
//!
//! The pool only tracks `total_shares`. Who owns them lives here, and the
//! balances must always sum to the pool's supply.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("Holder {holder} has {held} shares, cannot burn {requested}")]
    InsufficientHolderShares {
        holder: String,
        held: u64,
        requested: u64,
    },

    #[error("Share balance overflow for holder {0}")]
    Overflow(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ledger {
    balances: BTreeMap<String, u64>,
}

impl Ledger {
    pub fn balance(&self, holder: &str) -> u64 {
        self.balances.get(holder).copied().unwrap_or(0)
    }

    /// Sum of all balances, widened so a corrupt file cannot overflow it
    pub fn total(&self) -> u128 {
        self.balances.values().map(|v| *v as u128).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &u64)> {
        self.balances.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }

    pub fn credit(&mut self, holder: &str, shares: u64) -> Result<(), LedgerError> {
        let current = self.balance(holder);
        let updated = current
            .checked_add(shares)
            .ok_or_else(|| LedgerError::Overflow(holder.to_string()))?;
        self.balances.insert(holder.to_string(), updated);
        Ok(())
    }

    /// Fails if `holder` cannot cover a burn of `shares`.
    pub fn check(&self, holder: &str, shares: u64) -> Result<(), LedgerError> {
        let held = self.balance(holder);
        if held < shares {
            return Err(LedgerError::InsufficientHolderShares {
                holder: holder.to_string(),
                held,
                requested: shares,
            });
        }
        Ok(())
    }

    /// Debit after a successful burn. Empty balances are dropped.
    pub fn debit(&mut self, holder: &str, shares: u64) -> Result<(), LedgerError> {
        self.check(holder, shares)?;
        let remaining = self.balance(holder) - shares;
        if remaining == 0 {
            self.balances.remove(holder);
        } else {
            self.balances.insert(holder.to_string(), remaining);
        }
        Ok(())
    }
}

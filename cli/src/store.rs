//! JSON state file: pool record plus holder ledger, saved together

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use xyk_model::{LayoutError, Pool};

use crate::ledger::Ledger;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Persist(#[from] tempfile::PersistError),

    #[error("Invalid pool record: {0}")]
    InvalidPool(#[from] LayoutError),

    #[error("Holder balances sum to {held} but pool has {total_shares} shares")]
    LedgerMismatch { held: u128, total_shares: u64 },

    #[error("State file {0} holds balances for a pool that was never initialized")]
    Uninitialized(PathBuf),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolState {
    pub pool: Pool,
    #[serde(default)]
    pub holders: Ledger,
}

impl PoolState {
    fn validate(&self, path: &Path) -> Result<(), StoreError> {
        if !self.pool.is_initialized() && (self.pool.reserve_a != 0 || self.pool.reserve_b != 0) {
            return Err(StoreError::Uninitialized(path.to_path_buf()));
        }
        self.pool.check_consistency()?;

        let held = self.holders.total();
        if held != self.pool.total_shares as u128 {
            return Err(StoreError::LedgerMismatch {
                held,
                total_shares: self.pool.total_shares,
            });
        }
        Ok(())
    }
}

/// Load state from `path`. A missing file is a pool that does not exist yet.
pub fn load(path: &Path) -> Result<PoolState, StoreError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            log::debug!("No state at {}, starting fresh", path.display());
            return Ok(PoolState::default());
        }
        Err(e) => return Err(e.into()),
    };
    let state: PoolState = serde_json::from_str(&raw)?;
    state.validate(path)?;
    log::debug!("Loaded state from {}: {:?}", path.display(), state.pool);
    Ok(state)
}

/// Write state atomically: sibling temp file, then rename over `path`.
pub fn save(path: &Path, state: &PoolState) -> Result<(), StoreError> {
    state.validate(path)?;
    let serialized = serde_json::to_vec_pretty(state)?;

    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp_file = NamedTempFile::new_in(parent)?;
    tmp_file.write_all(&serialized)?;
    tmp_file.flush()?;
    tmp_file.persist(path)?;
    log::debug!("Saved state to {}", path.display());
    Ok(())
}

//! Durable per-round allocation state
//!
//! Each round's full allocation outcome is persisted before the next
//! round may begin; a crash between persist and the next draw loses
//! nothing. Writes go through a temp file plus rename so readers never
//! observe a partially written state. Concurrent rounds are serialized by
//! round number; there is exactly one writer per round file.

use crate::{
    allocation::TicketPool,
    error::{Error, Result},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fs, io::Write, path::Path};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundState {
    pub round: u64,
    pub winners_count: usize,
    /// Seed the round was drawn with; absent for the bootstrap round.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_hash: Option<String>,
    /// Awarded ids in display-rank order.
    pub awarded: Vec<u64>,
    /// Candidate pool after the partial shuffle, for re-verification.
    pub shuffled: Vec<u64>,
    pub remaining: Vec<u64>,
    pub last_issued_id: u64,
    pub updated_at: DateTime<Utc>,
}

impl RoundState {
    /// Bootstrap state for round 0, supplied externally rather than drawn.
    pub fn bootstrap(round: u64, pool: TicketPool) -> Self {
        Self {
            round,
            winners_count: 0,
            block_hash: None,
            awarded: vec![],
            shuffled: vec![],
            last_issued_id: pool.last_issued_id,
            remaining: pool.remaining,
            updated_at: Utc::now(),
        }
    }

    /// The pool this round hands to its successor.
    pub fn pool(&self) -> TicketPool {
        TicketPool {
            remaining: self.remaining.clone(),
            last_issued_id: self.last_issued_id,
        }
    }

    /// Load the persisted state for `round`; a missing file is fatal, the
    /// chain of rounds must be unbroken.
    pub fn load(path: &Path, round: u64) -> Result<Self> {
        if !path.exists() {
            return Err(Error::MissingPriorRoundState(round));
        }
        debug!(?path, round, "loading allocation state");
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Persist atomically: write to a temp file, fsync, then rename over
    /// the final path.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(self)?;
        let temp_path = path.with_extension("json.tmp");
        {
            let mut temp_file = fs::OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)?;
            temp_file.write_all(contents.as_bytes())?;
            temp_file.sync_all()?;
        }
        fs::rename(&temp_path, path)?;

        debug!(?path, round = self.round, "saved allocation state");
        Ok(())
    }
}

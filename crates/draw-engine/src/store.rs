//! On-disk layout of round data
//!
//! Everything for round N lives under `<rounds_dir>/<N>/`:
//! `round.json` (seed + coefficient), `players.json` (the roster),
//! `winners.json` and `audit.json` (outputs of the draw), and
//! `allocation.json` (sequential allocation state). Outputs are written
//! atomically, and audit files are append-only: once a round has closed
//! the store refuses to overwrite them unless explicitly forced.

use crate::{
    player::Player,
    selection::{
        Selection,
        audit::{AuditRecord, WinnerRecord},
    },
};
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};
use tracing::info;

/// Per-round draw configuration, the `round.json` file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundConfig {
    pub round: u64,
    /// Hex-encoded scaled coefficient, e.g. `0x28A2587C9E58000`.
    pub coefficient: String,
    /// Bitcoin block hash the round commits to.
    pub block_hash: String,
}

#[derive(Debug, Clone)]
pub struct RoundStore {
    root: PathBuf,
}

impl RoundStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn round_dir(&self, round: u64) -> PathBuf {
        self.root.join(round.to_string())
    }

    pub fn allocation_path(&self, round: u64) -> PathBuf {
        self.round_dir(round).join("allocation.json")
    }

    pub fn load_round_config(&self, round: u64) -> Result<RoundConfig> {
        let path = self.round_dir(round).join("round.json");
        let config: RoundConfig = read_json(&path)?;
        if config.round != round {
            bail!(
                "round config at {} is for round {}, expected {}",
                path.display(),
                config.round,
                round
            );
        }
        Ok(config)
    }

    pub fn load_players(&self, round: u64) -> Result<Vec<Player>> {
        let path = self.round_dir(round).join("players.json");
        let players: Vec<Player> = read_json(&path)?;
        info!(round, players = players.len(), "loaded roster");
        Ok(players)
    }

    pub fn load_winners(&self, round: u64) -> Result<Vec<WinnerRecord>> {
        read_json(&self.round_dir(round).join("winners.json"))
    }

    pub fn load_audit(&self, round: u64) -> Result<AuditRecord> {
        read_json(&self.round_dir(round).join("audit.json"))
    }

    /// Persist a round's draw outputs. The audit is append-only: if one
    /// already exists for this round, the write is refused unless forced.
    pub fn write_selection(&self, round: u64, selection: &Selection, force: bool) -> Result<()> {
        let dir = self.round_dir(round);
        let audit_path = dir.join("audit.json");
        if audit_path.exists() && !force {
            bail!(
                "audit for round {round} already exists at {}; refusing to overwrite a closed round (use --force)",
                audit_path.display()
            );
        }

        write_json_atomic(&dir.join("winners.json"), &selection.winners)?;
        write_json_atomic(&audit_path, &selection.audit)?;
        info!(round, winners = selection.winners.len(), "wrote draw outputs");
        Ok(())
    }

    /// Rewrite the winner list, e.g. after ticket ids were attached.
    pub fn rewrite_winners(&self, round: u64, winners: &[WinnerRecord]) -> Result<()> {
        write_json_atomic(&self.round_dir(round).join("winners.json"), &winners)
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("failed to parse {}", path.display()))
}

/// Temp file + fsync + rename, so a crash never leaves a torn file.
fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }
    let contents = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    let temp_path = path.with_extension("json.tmp");
    {
        let mut temp_file = fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)
            .with_context(|| format!("failed to create temp file {}", temp_path.display()))?;
        temp_file
            .write_all(contents.as_bytes())
            .with_context(|| format!("failed to write {}", temp_path.display()))?;
        temp_file
            .sync_all()
            .with_context(|| format!("failed to sync {}", temp_path.display()))?;
    }
    fs::rename(&temp_path, path)
        .with_context(|| format!("failed to move temp file into {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        seed::Seed,
        selection::{self, Strategy, threshold::Coefficient},
    };
    use tempfile::TempDir;

    fn sample_selection() -> Selection {
        let players = vec![
            Player::new(1, "4vJ9JU1bJJE96FWSJKvHsmmFADCg4gpZQff4P3bkLKi"),
            Player::new(2, "8qbHbw2BbbTHBW1sbeqakYXVKRQM8Ne7pLK7m6CVfeR"),
        ];
        let seed = Seed::parse(&"0".repeat(64)).unwrap();
        let coefficient = Coefficient::from_hex("0x1", 0).unwrap();
        selection::select(&players, &seed, &coefficient, Strategy::AddressKeyed).unwrap()
    }

    #[test]
    fn selection_round_trips_through_disk() {
        let dir = TempDir::new().unwrap();
        let store = RoundStore::new(dir.path());
        let selection = sample_selection();

        store.write_selection(3, &selection, false).unwrap();
        assert_eq!(store.load_audit(3).unwrap(), selection.audit);
        assert_eq!(store.load_winners(3).unwrap(), selection.winners);
    }

    #[test]
    fn audit_is_append_only() {
        let dir = TempDir::new().unwrap();
        let store = RoundStore::new(dir.path());
        let selection = sample_selection();

        store.write_selection(1, &selection, false).unwrap();
        let refused = store.write_selection(1, &selection, false);
        assert!(refused.is_err());
        // forced rewrite is allowed
        store.write_selection(1, &selection, true).unwrap();
    }

    #[test]
    fn round_config_must_match_directory() {
        let dir = TempDir::new().unwrap();
        let store = RoundStore::new(dir.path());
        let config = RoundConfig {
            round: 7,
            coefficient: "0xB7".into(),
            block_hash: "0".repeat(64),
        };
        fs::create_dir_all(store.round_dir(2)).unwrap();
        fs::write(
            store.round_dir(2).join("round.json"),
            serde_json::to_string(&config).unwrap(),
        )
        .unwrap();

        assert!(store.load_round_config(2).is_err());
    }

    #[test]
    fn missing_roster_is_an_error() {
        let dir = TempDir::new().unwrap();
        let store = RoundStore::new(dir.path());
        assert!(store.load_players(1).is_err());
    }
}

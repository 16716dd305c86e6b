//! Winner selection engine
//!
//! Runs one round's draw: derive a 256-bit value per player from the
//! seed, mark winners against the threshold, and emit the full audit
//! record. Two strategies exist in production and both stay supported;
//! they do NOT produce the same winner set for the same inputs, so the
//! strategy is an explicit configuration choice, never inferred.

pub mod audit;
pub mod threshold;

use crate::{
    error::{Error, Result},
    player::Player,
    rng::{shuffle, stream},
    seed::Seed,
};
use audit::{AuditEntry, AuditRecord, WinnerRecord};
use clap::ValueEnum;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, fmt};
use threshold::{Coefficient, WinThreshold, format_u256, percent_string};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// One value per player, keyed by their own address bytes. The winner
    /// count is a random variable whose expectation is the coefficient.
    /// Per-player tests are independent and run in parallel.
    #[value(name = "address-keyed")]
    AddressKeyed,
    /// Shuffle the roster first, then draw one value per position from
    /// the index stream and read winners off through the permutation.
    #[value(name = "shuffled-index")]
    ShuffledIndex,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AddressKeyed => write!(f, "address-keyed"),
            Self::ShuffledIndex => write!(f, "shuffled-index"),
        }
    }
}

/// One round's full selection output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// Winners sorted by player number.
    pub winners: Vec<WinnerRecord>,
    pub audit: AuditRecord,
}

/// Run the draw for one round.
///
/// Deterministic: for fixed `(players, seed, coefficient, strategy)` the
/// output is byte-identical on every invocation.
pub fn select(
    players: &[Player],
    seed: &Seed,
    coefficient: &Coefficient,
    strategy: Strategy,
) -> Result<Selection> {
    if players.is_empty() {
        return Err(Error::EmptyPlayerList);
    }
    reject_duplicates(players)?;

    let threshold = WinThreshold::compute(coefficient, players.len());
    info!(
        total_players = players.len(),
        coefficient = %coefficient.decimal(),
        threshold = %format_u256(&threshold.value()),
        %strategy,
        "running draw"
    );

    let mut entries = match strategy {
        Strategy::AddressKeyed => address_keyed_entries(players, seed, &threshold)?,
        Strategy::ShuffledIndex => shuffled_index_entries(players, seed, &threshold),
    };
    entries.sort_by_key(|entry| entry.number);

    let winners: Vec<WinnerRecord> = entries
        .iter()
        .filter(|entry| entry.is_winner)
        .map(|entry| WinnerRecord {
            number: entry.number,
            address: entry.player.clone(),
            random_value: entry.random_value.clone(),
            nft_number: None,
        })
        .collect();
    info!(winners = winners.len(), "draw complete");

    let audit = AuditRecord {
        block_hash: seed.as_hex().to_string(),
        threshold: format_u256(&threshold.value()),
        threshold_percent: format!("{}%", percent_string(coefficient, players.len())),
        total_players: players.len(),
        coefficient: coefficient.decimal(),
        coefficient_hex: coefficient.hex(),
        clamped: threshold.clamped(),
        winners_count: winners.len(),
        random_numbers: entries,
    };

    Ok(Selection { winners, audit })
}

/// Per-address keying silently misattributes wins if two players share an
/// address, so a duplicated roster is rejected outright.
fn reject_duplicates(players: &[Player]) -> Result<()> {
    let mut seen = HashSet::with_capacity(players.len());
    for player in players {
        if !seen.insert(player.address.as_str()) {
            return Err(Error::DuplicatePlayerAddress(player.address.clone()));
        }
    }
    Ok(())
}

fn address_keyed_entries(
    players: &[Player],
    seed: &Seed,
    threshold: &WinThreshold,
) -> Result<Vec<AuditEntry>> {
    players
        .par_iter()
        .map(|player| {
            let value = stream::derive_for_address(seed, &player.address)?;
            Ok(AuditEntry {
                number: player.number,
                random_index: None,
                player: player.address.clone(),
                random_value: format_u256(&value),
                is_winner: threshold.is_winner(&value),
            })
        })
        .collect()
}

fn shuffled_index_entries(
    players: &[Player],
    seed: &Seed,
    threshold: &WinThreshold,
) -> Vec<AuditEntry> {
    let shuffled = shuffle::shuffle(players, seed);
    let values = stream::derive_many(seed, shuffled.len() as u32);
    shuffled
        .iter()
        .zip(values)
        .enumerate()
        .map(|(position, (player, value))| {
            AuditEntry {
                number: player.number,
                random_index: Some(position as u32),
                player: player.address.clone(),
                random_value: format_u256(&value),
                is_winner: threshold.is_winner(&value),
            }
        })
        .collect()
}

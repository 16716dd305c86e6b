//! Sequential ticket allocation across rounds
//!
//! Winners of each round receive numeric ticket ids drawn from a pool
//! that carries over between rounds: ids not awarded in round N stay in
//! the pool for round N+1, and freshly minted sequential ids are appended
//! for each new winner slot. Ids are never reused or skipped.
//!
//! The per-step index derivation here is a deliberately simpler, non-HMAC
//! construction than the roster shuffle and is kept separate from it; the
//! two are not interchangeable and published round states depend on this
//! exact scheme.

pub mod state;

use crate::{
    error::{Error, Result},
    seed::Seed,
};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;

/// Carried-over pool of not-yet-awarded ticket ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketPool {
    /// Ordered ids still available for future rounds.
    pub remaining: Vec<u64>,
    /// Highest ticket id ever issued.
    pub last_issued_id: u64,
}

impl TicketPool {
    /// Bootstrap pool holding ids `1..=size`.
    pub fn seeded(size: u64) -> Self {
        Self {
            remaining: (1..=size).collect(),
            last_issued_id: size,
        }
    }
}

/// Outcome of one allocation round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Allocation {
    /// Awarded ids in display-rank order: the most recently placed winner
    /// slot is read off first.
    pub awarded: Vec<u64>,
    /// Full candidate pool after the partial shuffle; persisted so the
    /// round can be re-verified slot by slot.
    pub shuffled: Vec<u64>,
    /// Pool to carry into the next round.
    pub pool: TicketPool,
}

/// Allocate `new_winner_count` ticket ids for one round.
///
/// Extends the carried pool with freshly minted sequential ids, then runs
/// the partial shuffle over the combined candidate pool.
pub fn allocate(previous: &TicketPool, new_winner_count: usize, seed: &Seed) -> Result<Allocation> {
    let mut candidates = previous.remaining.clone();
    let first_new = previous.last_issued_id + 1;
    candidates.extend(first_new..first_new + new_winner_count as u64);
    let last_issued_id = previous.last_issued_id + new_winner_count as u64;
    allocate_from_candidates(candidates, new_winner_count, seed, last_issued_id)
}

/// Partial Fisher-Yates over an explicit candidate pool: step `i` swaps a
/// drawn index in `[0, len - i)` into slot `len - 1 - i`, then the last
/// `new_winner_count` slots are read off in reverse placement order. The
/// swap loop is inherently sequential and must not be parallelized.
pub fn allocate_from_candidates(
    mut candidates: Vec<u64>,
    new_winner_count: usize,
    seed: &Seed,
    last_issued_id: u64,
) -> Result<Allocation> {
    let total = candidates.len();
    if new_winner_count > total {
        return Err(Error::InsufficientPool {
            requested: new_winner_count,
            available: total,
        });
    }

    for i in 0..new_winner_count {
        let drawn = draw_index(seed, i as u32, total - i);
        let slot = total - 1 - i;
        debug!(step = i, drawn, slot, "placing winner ticket");
        candidates.swap(drawn, slot);
    }

    let awarded: Vec<u64> = candidates[total - new_winner_count..]
        .iter()
        .rev()
        .copied()
        .collect();
    let remaining = candidates[..total - new_winner_count].to_vec();

    Ok(Allocation {
        awarded,
        shuffled: candidates,
        pool: TicketPool {
            remaining,
            last_issued_id,
        },
    })
}

/// Index draw for step `step`: first 4 bytes of
/// `SHA256("{seed_hex}-{step}")` as a big-endian u32, mod `bound`.
fn draw_index(seed: &Seed, step: u32, bound: usize) -> usize {
    let digest = Sha256::digest(format!("{}-{}", seed.as_hex(), step).as_bytes());
    let value = u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]]);
    value as usize % bound
}

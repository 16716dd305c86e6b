//! Player roster for a single round
//!
//! Players enter a round as raw addresses extracted upstream from
//! transaction logs. Within a round the roster is sorted, deduplicated
//! and numbered 1..N, and is immutable from then on; player numbers are
//! the stable public identifiers in winner lists and audit records.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub number: u32,
    // Wire name kept for interop with published rosters and audits.
    #[serde(rename = "player")]
    pub address: String,
}

impl Player {
    pub fn new(number: u32, address: impl Into<String>) -> Self {
        Self {
            number,
            address: address.into(),
        }
    }
}

/// Build a numbered roster from raw addresses: sort lexicographically
/// ascending, drop duplicates, then number 1..N.
pub fn normalize(addresses: impl IntoIterator<Item = String>) -> Vec<Player> {
    let mut addresses: Vec<String> = addresses.into_iter().collect();
    addresses.sort();
    addresses.dedup();
    addresses
        .into_iter()
        .enumerate()
        .map(|(i, address)| Player {
            number: i as u32 + 1,
            address,
        })
        .collect()
}

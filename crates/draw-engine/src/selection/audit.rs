//! Audit record for one round's selection
//!
//! The audit discloses every player's derived value and win/lose flag,
//! not just the winners: anyone holding the round's seed and roster can
//! recompute the whole outcome instead of trusting the winner list.
//! Records are append-only once a round closes; the wire shape below is
//! frozen for interop with already-published audit files.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditRecord {
    pub block_hash: String,
    /// Winning cutoff, `0x` + 64 lowercase hex chars.
    pub threshold: String,
    /// Win chance as a percentage string, e.g. `"15.4691462383770076%"`.
    pub threshold_percent: String,
    pub total_players: usize,
    /// Coefficient in decimal display form.
    pub coefficient: String,
    pub coefficient_hex: String,
    /// True when the requested win chance exceeded 1 and was clamped.
    #[serde(default)]
    pub clamped: bool,
    pub winners_count: usize,
    /// One entry per player, sorted by player number.
    pub random_numbers: Vec<AuditEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    pub number: u32,
    /// Stream position the value was drawn from; present only for the
    /// shuffled-index strategy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub random_index: Option<u32>,
    pub player: String,
    /// Derived 256-bit value, `0x` + 64 lowercase hex chars.
    pub random_value: String,
    pub is_winner: bool,
}

/// Winner list entry as published alongside the audit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WinnerRecord {
    pub number: u32,
    #[serde(rename = "player")]
    pub address: String,
    pub random_value: String,
    /// Ticket id attached after sequential allocation, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nft_number: Option<u64>,
}

//! Multi-round allocation flow with durable state between rounds.

use chrono::Utc;
use lottery_draw::{
    allocation::{self, TicketPool, state::RoundState},
    error::Error,
    seed::Seed,
    store::RoundStore,
};
use std::collections::BTreeSet;
use tempfile::TempDir;

const BLOCK_HASH: &str = "81d68e36cc1ba5d895b9af7d7acdd8031030f02dceacac30ff3546bb8611b5cc";

#[test]
fn rounds_chain_through_persisted_state() {
    let dir = TempDir::new().unwrap();
    let store = RoundStore::new(dir.path());
    let seed = Seed::parse(BLOCK_HASH).unwrap();

    // Round 0 is bootstrapped, not drawn.
    let bootstrap = RoundState::bootstrap(0, TicketPool::seeded(120));
    bootstrap.save(&store.allocation_path(0)).unwrap();

    let mut all_awarded: BTreeSet<u64> = BTreeSet::new();
    for round in 1..=5u64 {
        let previous = RoundState::load(&store.allocation_path(round - 1), round - 1).unwrap();
        let count = 10 + round as usize;
        let allocation = allocation::allocate(&previous.pool(), count, &seed).unwrap();

        // conservation within the round
        assert_eq!(
            allocation.awarded.len() + allocation.pool.remaining.len(),
            previous.remaining.len() + count
        );
        for id in &allocation.awarded {
            assert!(all_awarded.insert(*id), "ticket {id} awarded twice");
        }

        let state = RoundState {
            round,
            winners_count: count,
            block_hash: Some(seed.as_hex().to_string()),
            awarded: allocation.awarded,
            shuffled: allocation.shuffled,
            remaining: allocation.pool.remaining,
            last_issued_id: allocation.pool.last_issued_id,
            updated_at: Utc::now(),
        };
        state.save(&store.allocation_path(round)).unwrap();
    }

    // Every id ever issued is either awarded in exactly one round or
    // still in the final pool.
    let last = RoundState::load(&store.allocation_path(5), 5).unwrap();
    let mut seen = all_awarded;
    for id in &last.remaining {
        assert!(seen.insert(*id), "ticket {id} both awarded and remaining");
    }
    assert_eq!(seen, (1..=last.last_issued_id).collect::<BTreeSet<u64>>());
}

#[test]
fn reloaded_state_allocates_identically() {
    let dir = TempDir::new().unwrap();
    let store = RoundStore::new(dir.path());
    let seed = Seed::parse(BLOCK_HASH).unwrap();

    let state = RoundState::bootstrap(0, TicketPool::seeded(64));
    state.save(&store.allocation_path(0)).unwrap();
    let reloaded = RoundState::load(&store.allocation_path(0), 0).unwrap();

    assert_eq!(
        allocation::allocate(&state.pool(), 9, &seed).unwrap(),
        allocation::allocate(&reloaded.pool(), 9, &seed).unwrap()
    );
}

#[test]
fn broken_round_chain_is_fatal() {
    let dir = TempDir::new().unwrap();
    let store = RoundStore::new(dir.path());

    // round 2 was never persisted
    let missing = RoundState::load(&store.allocation_path(2), 2);
    assert!(matches!(missing, Err(Error::MissingPriorRoundState(2))));
}

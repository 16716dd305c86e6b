use anyhow::{Context, Result, bail};
use chrono::Utc;
use lottery_draw::{
    allocation::{self, TicketPool, state::RoundState},
    seed::Seed,
    settings::Settings,
    store::RoundStore,
};
use tracing::info;

/// Run one sequential allocation round.
///
/// Loads the immediately preceding round's persisted pool, draws this
/// round's ticket ids, attaches them to the round's winner list when one
/// exists, and persists the new state before returning.
pub fn handle(
    settings: &Settings,
    round: u64,
    winners_count: Option<usize>,
    force: bool,
) -> Result<()> {
    if round == 0 {
        bail!("round 0 is the bootstrap round; create it with init-pool");
    }

    let store = RoundStore::new(&settings.rounds_dir);
    let state_path = store.allocation_path(round);
    if state_path.exists() && !force {
        bail!(
            "allocation state for round {round} already exists at {}; refusing to redo a closed round (use --force)",
            state_path.display()
        );
    }

    let previous = RoundState::load(&store.allocation_path(round - 1), round - 1)?;
    let config = store.load_round_config(round)?;
    let seed = Seed::parse(&config.block_hash)?;

    let mut winners = match winners_count {
        Some(_) => None,
        None => Some(
            store
                .load_winners(round)
                .context("no --winners-count given and no winners.json for this round")?,
        ),
    };
    let count = winners_count.unwrap_or_else(|| winners.as_ref().map_or(0, Vec::len));
    info!(
        round,
        count,
        carried = previous.remaining.len(),
        "allocating ticket ids"
    );

    let allocation = allocation::allocate(&previous.pool(), count, &seed)?;

    // Attach ticket ids to the winner list in display-rank order.
    if let Some(winners) = winners.as_mut() {
        for (winner, ticket) in winners.iter_mut().zip(allocation.awarded.iter()) {
            winner.nft_number = Some(*ticket);
        }
        store.rewrite_winners(round, winners)?;
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
    state.save(&state_path)?;

    info!(
        round,
        awarded = state.awarded.len(),
        remaining = state.remaining.len(),
        last_issued_id = state.last_issued_id,
        "allocation round persisted"
    );
    Ok(())
}

/// Bootstrap the ticket pool for round 0 from externally supplied data.
pub fn handle_init(settings: &Settings, round: u64, tickets: u64, force: bool) -> Result<()> {
    let store = RoundStore::new(&settings.rounds_dir);
    let state_path = store.allocation_path(round);
    if state_path.exists() && !force {
        bail!(
            "allocation state for round {round} already exists at {}; use --force to re-bootstrap",
            state_path.display()
        );
    }

    let state = RoundState::bootstrap(round, TicketPool::seeded(tickets));
    state.save(&state_path)?;
    info!(round, tickets, "bootstrapped ticket pool");
    Ok(())
}

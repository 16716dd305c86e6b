use anyhow::{Result, bail};
use lottery_draw::{
    seed::Seed,
    selection::{self, Strategy, threshold::Coefficient},
    settings::Settings,
    store::RoundStore,
};
use tracing::info;

/// Recompute a published audit from its own inputs and compare.
///
/// The strategy is read off the audit itself: rows carrying a
/// `randomIndex` were produced by the shuffled-index strategy.
pub fn handle(settings: &Settings, round: u64, strategy: Option<Strategy>) -> Result<()> {
    let store = RoundStore::new(&settings.rounds_dir);
    let published = store.load_audit(round)?;
    let players = store.load_players(round)?;

    let seed = Seed::parse(&published.block_hash)?;
    let coefficient =
        Coefficient::from_hex(&published.coefficient_hex, settings.coefficient_scale)?;
    let strategy = strategy.unwrap_or_else(|| infer_strategy(&published));
    info!(round, %strategy, "re-running published draw");

    let recomputed = selection::select(&players, &seed, &coefficient, strategy)?;
    if recomputed.audit != published {
        bail!(
            "audit mismatch for round {round}: recomputed draw disagrees with the published record"
        );
    }

    let winners = store.load_winners(round)?;
    let expected: Vec<u32> = recomputed.winners.iter().map(|w| w.number).collect();
    let found: Vec<u32> = winners.iter().map(|w| w.number).collect();
    if expected != found {
        bail!("winner list mismatch for round {round}: expected players {expected:?}, file has {found:?}");
    }

    info!(
        round,
        winners = winners.len(),
        "audit verified: published outcome reproduces exactly"
    );
    Ok(())
}

fn infer_strategy(audit: &lottery_draw::selection::audit::AuditRecord) -> Strategy {
    let indexed = audit
        .random_numbers
        .first()
        .is_some_and(|entry| entry.random_index.is_some());
    if indexed {
        Strategy::ShuffledIndex
    } else {
        Strategy::AddressKeyed
    }
}

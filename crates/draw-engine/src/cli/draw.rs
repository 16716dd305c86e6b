use anyhow::Result;
use lottery_draw::{
    seed::Seed,
    selection::{self, Strategy, threshold::Coefficient},
    settings::Settings,
    store::RoundStore,
};
use tracing::info;

/// Run the draw for one round and persist winners + audit.
pub fn handle(
    settings: &Settings,
    round: u64,
    strategy: Option<Strategy>,
    force: bool,
) -> Result<()> {
    let store = RoundStore::new(&settings.rounds_dir);
    let config = store.load_round_config(round)?;
    let players = store.load_players(round)?;

    let seed = Seed::parse(&config.block_hash)?;
    let coefficient = Coefficient::from_hex(&config.coefficient, settings.coefficient_scale)?;
    let strategy = strategy.unwrap_or(settings.strategy);
    info!(round, seed = %seed, %strategy, "drawing round");

    let selection = selection::select(&players, &seed, &coefficient, strategy)?;
    store.write_selection(round, &selection, force)?;

    info!(
        round,
        winners = selection.winners.len(),
        threshold = %selection.audit.threshold_percent,
        "round closed"
    );
    Ok(())
}

mod cli;

use anyhow::Result;
use clap::{Parser, Subcommand};
use lottery_draw::{selection::Strategy, settings::Settings};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(
    name = "lottery-draw",
    about = "Deterministic, auditable winner selection seeded from Bitcoin block hashes",
    version,
    after_help = r#"Configuration:
    Configuration can be provided via:
    1. Environment variables with DRAW__ prefix (e.g., DRAW__ROUNDS_DIR)
    2. .env file in the current directory
    3. Config file with -c option

Examples:
    # Draw round 3 with the per-address strategy
    lottery-draw draw --round 3 --strategy address-keyed

    # Re-verify a published round against its audit file
    lottery-draw verify --round 3

    # Bootstrap the ticket pool, then allocate ticket ids round by round
    lottery-draw init-pool --round 0 --tickets 1500
    lottery-draw allocate --round 1"#
)]
pub struct Cli {
    /// Path to the configuration file (TOML format)
    ///
    /// If not provided, will attempt to load from environment variables
    #[clap(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the winner draw for one round and write winners + audit
    Draw {
        /// Round number (reads <rounds_dir>/<N>/round.json + players.json)
        #[arg(short, long, value_name = "ROUND")]
        round: u64,

        /// Selection strategy; defaults to the configured one
        #[arg(short, long, value_enum)]
        strategy: Option<Strategy>,

        /// Overwrite an already-closed round's outputs
        #[arg(long)]
        force: bool,
    },
    /// Recompute a published audit record and verify it reproduces
    Verify {
        #[arg(short, long, value_name = "ROUND")]
        round: u64,

        /// Strategy override; inferred from the audit rows if omitted
        #[arg(short, long, value_enum)]
        strategy: Option<Strategy>,
    },
    /// Bootstrap the sequential-allocation ticket pool
    InitPool {
        /// Round to bootstrap (normally 0)
        #[arg(short, long, value_name = "ROUND", default_value_t = 0)]
        round: u64,

        /// Number of ticket ids to seed the pool with (ids 1..=N)
        #[arg(short, long, value_name = "COUNT")]
        tickets: u64,

        /// Re-bootstrap over an existing state file
        #[arg(long)]
        force: bool,
    },
    /// Allocate ticket ids for one round from the carried-over pool
    Allocate {
        #[arg(short, long, value_name = "ROUND")]
        round: u64,

        /// Winner slots to fill; defaults to the round's winners.json length
        #[arg(short, long, value_name = "COUNT")]
        winners_count: Option<usize>,

        /// Redo an already-persisted allocation round
        #[arg(long)]
        force: bool,
    },
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let settings = if let Some(config_path) = &self.config {
            Settings::from_path(config_path)?
        } else {
            Settings::from_env()?
        };
        init_logging(&settings.log_level)?;

        match self.command {
            Commands::Draw {
                round,
                strategy,
                force,
            } => cli::draw::handle(&settings, round, strategy, force),
            Commands::Verify { round, strategy } => cli::verify::handle(&settings, round, strategy),
            Commands::InitPool {
                round,
                tickets,
                force,
            } => cli::allocate::handle_init(&settings, round, tickets, force),
            Commands::Allocate {
                round,
                winners_count,
                force,
            } => cli::allocate::handle(&settings, round, winners_count, force),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.run()
}

fn init_logging(log_level: &str) -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_thread_names(false),
        )
        .init();

    Ok(())
}

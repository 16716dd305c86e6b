pub mod validation;

use crate::selection::Strategy;
use anyhow::{Context, Result};
use config::{Config as ConfigBuilder, Environment, File};
use serde::{Deserialize, Serialize};
use std::{fmt, path::Path};
use validation::validate_config;

/// Main settings for the draw engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Log level for application logging (e.g., "info", "debug", "warn")
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Directory holding per-round data (`<rounds_dir>/<N>/...`)
    #[serde(default = "default_rounds_dir")]
    pub rounds_dir: String,
    /// Decimal fixed-point scale of round coefficients (10^scale)
    #[serde(default = "default_coefficient_scale")]
    pub coefficient_scale: u32,
    /// Selection strategy used when a command does not name one
    #[serde(default = "default_strategy")]
    pub strategy: Strategy,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_rounds_dir() -> String {
    "rounds".to_string()
}

fn default_coefficient_scale() -> u32 {
    15
}

fn default_strategy() -> Strategy {
    Strategy::AddressKeyed
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            rounds_dir: default_rounds_dir(),
            coefficient_scale: default_coefficient_scale(),
            strategy: default_strategy(),
        }
    }
}

impl Settings {
    /// Load configuration from a specific config file path
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        // Env vars take priority over the file
        let settings = ConfigBuilder::builder()
            .add_source(File::with_name(&path.as_ref().to_string_lossy()))
            .add_source(
                Environment::with_prefix("DRAW")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to build configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        validate_config(&settings)?;

        Ok(settings)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Result<Self> {
        // NOTE: It's ok if this fails (file might not exist)
        let _ = dotenvy::dotenv();

        let settings: Settings = ConfigBuilder::builder()
            .add_source(
                Environment::with_prefix("DRAW")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to build configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        validate_config(&settings)?;

        Ok(settings)
    }
}

impl fmt::Display for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Settings {{\n\
             \tLog Level: {}\n\
             \tRounds Dir: {}\n\
             \tCoefficient Scale: 10^{}\n\
             \tStrategy: {}\n\
             }}",
            self.log_level, self.rounds_dir, self.coefficient_scale, self.strategy,
        )
    }
}

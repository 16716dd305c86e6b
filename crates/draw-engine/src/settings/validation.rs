use crate::settings::Settings;
use anyhow::{Result, bail};

/// Validate the configuration values
pub fn validate_config(settings: &Settings) -> Result<()> {
    let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_log_levels.contains(&settings.log_level.to_lowercase().as_str()) {
        bail!(
            "Invalid log level '{}'. Valid options are: {:?}",
            settings.log_level,
            valid_log_levels
        );
    }

    if settings.rounds_dir.is_empty() {
        bail!("Rounds directory cannot be empty");
    }

    // Coefficients are parsed into 256-bit integers; scales beyond this
    // cannot round-trip through the percent math.
    if settings.coefficient_scale > 30 {
        bail!(
            "Coefficient scale must be at most 30, got {}",
            settings.coefficient_scale
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unknown_log_level() {
        let settings = Settings {
            log_level: "loud".into(),
            ..Settings::default()
        };
        assert!(validate_config(&settings).is_err());
    }

    #[test]
    fn rejects_empty_rounds_dir() {
        let settings = Settings {
            rounds_dir: String::new(),
            ..Settings::default()
        };
        assert!(validate_config(&settings).is_err());
    }

    #[test]
    fn rejects_oversized_scale() {
        let settings = Settings {
            coefficient_scale: 31,
            ..Settings::default()
        };
        assert!(validate_config(&settings).is_err());
    }
}

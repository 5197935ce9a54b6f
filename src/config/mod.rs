mod schema;

pub use schema::Config;

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;
use tracing::debug;

use crate::handicap::{validate_tiers, TierTable};
use crate::scorecard::DEFAULT_RECENT_ROUNDS;

/// Get the config directory path (~/.config/handicap-index/)
pub fn get_config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("handicap-index"))
}

/// Get the default config file path (~/.config/handicap-index/config.yaml)
pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join("config.yaml"))
}

/// Load configuration from a YAML file
///
/// # Arguments
///
/// * `path` - Optional path to config file. If None, uses the default path
///   and falls back to defaults when that file does not exist.
///
/// # Errors
///
/// Returns an error if:
/// - An explicitly given config file does not exist
/// - The config file cannot be read
/// - The YAML cannot be parsed
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let explicit = path.is_some();
    let config_path = match path {
        Some(p) => p,
        None => get_config_path()?,
    };

    if !config_path.exists() {
        if explicit {
            anyhow::bail!("Config file not found at {}", config_path.display());
        }
        debug!("no config at {}, using defaults", config_path.display());
        return Ok(Config::default());
    }

    let config_content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

    let config: Config = serde_saphyr::from_str(&config_content).with_context(|| {
        format!("Failed to parse config: invalid YAML in {}", config_path.display())
    })?;

    Ok(config)
}

/// Validate configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if config.recent_rounds == Some(0) {
        errors.push("recent_rounds: must be at least 1".to_string());
    }

    if let Some(ref tiers) = config.tiers {
        if let Err(tier_errors) = validate_tiers(tiers) {
            errors.extend(tier_errors);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

impl Config {
    pub fn recent_rounds(&self) -> usize {
        self.recent_rounds.unwrap_or(DEFAULT_RECENT_ROUNDS)
    }

    /// Configured tier table, or the standard one.
    pub fn tier_table(&self) -> Result<TierTable> {
        match self.tiers {
            Some(ref buckets) => TierTable::from_buckets(buckets).context("Invalid tier table"),
            None => Ok(TierTable::canonical()),
        }
    }

    /// Scorecard path from config, with `~/` expanded, falling back to
    /// ~/.config/handicap-index/scorecards.yaml
    pub fn scorecards_path(&self) -> Result<PathBuf> {
        match self.scorecards.as_deref() {
            Some(path) => match path.strip_prefix("~/") {
                Some(rest) => Ok(dirs::home_dir()
                    .context("Could not determine home directory")?
                    .join(rest)),
                None => Ok(PathBuf::from(path)),
            },
            None => Ok(get_config_dir()?.join("scorecards.yaml")),
        }
    }
}

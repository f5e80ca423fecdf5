//! Subcommand implementations and shared setup

pub mod catalog;
pub mod interactive;
pub mod questions;
pub mod recommend;
pub mod render;

use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use option_strategy_selector::{Config, LabelSet, Labels, Locale, StrategySelector};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

/// Trimmed, upper-cased underlying symbol; blank symbols are rejected
pub fn normalize_symbol(symbol: &str) -> Result<String> {
    let symbol = symbol.trim();
    if symbol.is_empty() {
        bail!("Symbol must not be empty");
    }
    Ok(symbol.to_uppercase())
}

/// Everything a command needs, loaded once at startup
pub struct AppContext {
    pub config: Config,
    pub selector: StrategySelector,
    pub labels: LabelSet,
}

impl AppContext {
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let config = match config_path {
            Some(path) => {
                let config = Config::from_file(path)?;
                info!("Loaded configuration from: {}", path);
                config
            }
            None => Config::from_env(),
        };
        debug!(?config, "Effective configuration");

        let selector =
            StrategySelector::from_config(&config).context("Failed to load strategy data")?;
        let labels = match &config.data.labels_path {
            Some(path) => LabelSet::from_file(path),
            None => LabelSet::builtin(),
        }
        .context("Failed to load labels")?;

        Ok(Self {
            config,
            selector,
            labels,
        })
    }

    /// Locale from the command line, else from configuration
    pub fn locale(&self, arg: Option<&str>) -> Result<Locale> {
        match arg {
            Some(value) => Ok(value.parse::<Locale>()?),
            None => Ok(self.config.locale),
        }
    }

    pub fn labels(&self, locale: Locale) -> Result<&Labels> {
        self.labels
            .get(locale)
            .with_context(|| format!("No labels for locale '{}'", locale))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_symbol() {
        assert_eq!(normalize_symbol(" nvda ").unwrap(), "NVDA");
        assert!(normalize_symbol("").is_err());
        assert!(normalize_symbol("   ").is_err());
    }
}

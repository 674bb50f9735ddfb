use serde::Deserialize;
use std::path::Path;
use tracing::Level;
use url::Url;

use crate::chains::{ChainRegistry, ChainsError};

/// Settings deserialized from the TOML config file. Everything is
/// optional; an empty file yields the built-in chain table and info
/// logging.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    log_level: Option<LogLevel>,
    default_chain: Option<u64>,
    #[serde(default)]
    chains: Vec<ChainEndpoint>,
}

/// One `[[chains]]` entry: an endpoint override or addition.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ChainEndpoint {
    chain_id: u64,
    rpc_url: Url,
}

impl Config {
    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml(&raw)
    }

    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    pub fn log_level(&self) -> LogLevel {
        self.log_level.clone().unwrap_or(LogLevel::Info)
    }

    /// Built-in chain table extended with the configured endpoints and
    /// default-chain override.
    pub fn registry(&self) -> Result<ChainRegistry, ConfigError> {
        let overrides = self
            .chains
            .iter()
            .map(|entry| (entry.chain_id, entry.rpc_url.clone()));
        let registry = ChainRegistry::with_defaults()?.extended(self.default_chain, overrides)?;
        Ok(registry)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for Level {
    fn from(log_level: LogLevel) -> Self {
        match log_level {
            LogLevel::Trace => Self::TRACE,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Info => Self::INFO,
            LogLevel::Warn => Self::WARN,
            LogLevel::Error => Self::ERROR,
        }
    }
}

impl From<&LogLevel> for Level {
    fn from(log_level: &LogLevel) -> Self {
        match log_level {
            LogLevel::Trace => Self::TRACE,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Info => Self::INFO,
            LogLevel::Warn => Self::WARN,
            LogLevel::Error => Self::ERROR,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    #[error("failed to parse TOML")]
    Toml(#[from] toml::de::Error),
    #[error(transparent)]
    Chains(#[from] ChainsError),
}

pub fn setup_tracing(log_level: &LogLevel) {
    let level: Level = log_level.into();
    let default_filter = format!("ichi_vault_indexer={level}");

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_level_converts_to_tracing_level() {
        let level: Level = LogLevel::Trace.into();
        assert_eq!(level, Level::TRACE);
        let level: Level = LogLevel::Warn.into();
        assert_eq!(level, Level::WARN);
        let level: Level = (&LogLevel::Error).into();
        assert_eq!(level, Level::ERROR);
    }

    #[test]
    fn empty_toml_yields_builtin_registry() {
        let config = Config::from_toml("").unwrap();

        let registry = config.registry().unwrap();

        assert_eq!(registry.default_chain(), 1);
        assert!(registry.contains(137));
        assert!(registry.contains(42161));
        assert!(matches!(config.log_level(), LogLevel::Info));
    }

    #[test]
    fn chain_entries_override_and_extend_the_table() {
        let config = Config::from_toml(
            r#"
log_level = "warn"
default_chain = 137

[[chains]]
chain_id = 137
rpc_url = "https://polygon.example.com/rpc"

[[chains]]
chain_id = 43114
rpc_url = "https://avalanche.example.com/rpc"
"#,
        )
        .unwrap();

        let registry = config.registry().unwrap();

        assert_eq!(registry.default_chain(), 137);
        assert!(registry.contains(43114));
        assert_eq!(
            registry.endpoint(137).as_str(),
            "https://polygon.example.com/rpc"
        );
        assert!(matches!(config.log_level(), LogLevel::Warn));
    }

    #[test]
    fn unknown_chain_entry_fields_are_rejected() {
        let result = Config::from_toml(
            r#"
[[chains]]
chain_id = 1
rpc_url = "https://eth.example.com"
ws_url = "wss://eth.example.com"
"#,
        );

        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn misspelled_top_level_keys_are_rejected() {
        let result = Config::from_toml("log_levl = \"debug\"");

        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn default_chain_without_endpoint_is_rejected() {
        let config = Config::from_toml("default_chain = 99999").unwrap();

        let result = config.registry();

        assert!(matches!(
            result,
            Err(ConfigError::Chains(ChainsError::MissingDefaultEndpoint(
                99999
            )))
        ));
    }
}

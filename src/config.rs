use std::net::SocketAddr;
use std::time::Duration;

use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use config::builder::DefaultState;
use serde::Deserialize;

use crate::index_config::AnalyzerConfig;

const ENV_PREFIX: &str = "PRODUCT_SEARCH";

#[derive(Debug, Clone, Deserialize)]
pub struct Api {
    pub listen: SocketAddr,
    /// Time in-flight requests get to finish once a shutdown signal arrives
    pub shutdown_grace_secs: u64,
    pub workers: Option<usize>,
}

impl Api {
    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Search {
    pub result_limit: usize,
    pub indexer_heap_size: usize,
    pub indexer_num_threads: Option<usize>,
    #[serde(default)]
    pub analyzer: AnalyzerConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Dataset {
    pub product_count: usize,
    /// Fixed seed for the generator; the wall clock is used when unset
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub api: Api,
    pub search: Search,
    pub dataset: Dataset,
}

impl AppConfig {
    /// Defaults, then `config/default.*` if present, then `PRODUCT_SEARCH_*` variables.
    pub fn new() -> Result<Self, ConfigError> {
        defaults()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    #[cfg(test)]
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        defaults()?
            .add_source(File::from_str(toml, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
    }
}

fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("api.listen", "0.0.0.0:8080")?
        .set_default("api.shutdown_grace_secs", 5u64)?
        .set_default("search.result_limit", 50u64)?
        .set_default("search.indexer_heap_size", 200_000_000u64)?
        .set_default("dataset.product_count", 1_000_000u64)
}

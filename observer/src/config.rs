//! Relayer module configuration with TOML file support.

use relay_types::chain_params::DEFAULT_MIN_OBSERVER_DELEGATION;
use relay_types::params::DEFAULT_BALLOT_MATURITY_BLOCKS;
use relay_types::{ChainParams, ChainParamsList, Params};
use relay_utils::LogFormat;
use serde::{Deserialize, Serialize};

use crate::ObserverError;

/// Configuration for the relayer module.
///
/// Can be loaded from a TOML file via [`RelayerConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayerConfig {
    /// Blocks after creation at which a ballot counts as matured.
    #[serde(default = "default_ballot_maturity_blocks")]
    pub ballot_maturity_blocks: u64,

    /// Minimum self-delegation an observer's validator must keep.
    #[serde(default = "default_min_observer_delegation")]
    pub min_observer_delegation: u128,

    /// Chain params written at genesis.
    #[serde(default = "default_chain_params")]
    pub chain_params: Vec<ChainParams>,

    /// Log format: "human" or "json".
    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_ballot_maturity_blocks() -> u64 {
    DEFAULT_BALLOT_MATURITY_BLOCKS
}

fn default_min_observer_delegation() -> u128 {
    DEFAULT_MIN_OBSERVER_DELEGATION
}

fn default_chain_params() -> Vec<ChainParams> {
    ChainParamsList::default_localnet().chain_params
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl RelayerConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &str) -> Result<Self, ObserverError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ObserverError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ObserverError> {
        toml::from_str(s).map_err(|e| ObserverError::Config(e.to_string()))
    }

    pub fn params(&self) -> Params {
        Params {
            ballot_maturity_blocks: self.ballot_maturity_blocks,
            min_observer_delegation: self.min_observer_delegation,
        }
    }

    pub fn chain_params_list(&self) -> ChainParamsList {
        ChainParamsList {
            chain_params: self.chain_params.clone(),
        }
    }

    pub fn validate(&self) -> Result<(), ObserverError> {
        if self.ballot_maturity_blocks == 0 {
            return Err(ObserverError::Config(
                "ballot_maturity_blocks must be positive".into(),
            ));
        }
        self.chain_params_list()
            .validate()
            .map_err(ObserverError::InvalidChainParams)
    }
}

impl Default for RelayerConfig {
    fn default() -> Self {
        Self {
            ballot_maturity_blocks: default_ballot_maturity_blocks(),
            min_observer_delegation: default_min_observer_delegation(),
            chain_params: default_chain_params(),
            log_format: LogFormat::default(),
            log_level: default_log_level(),
        }
    }
}

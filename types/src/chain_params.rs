//! Per-chain observation parameters and their validation.

use crate::chain::{chain_by_id, well_known, ChainId};
use crate::error::TypesError;
use crate::threshold::Threshold;
use serde::{Deserialize, Serialize};

/// Default minimum self-delegation for an observer (10^18 base units).
pub const DEFAULT_MIN_OBSERVER_DELEGATION: u128 = 1_000_000_000_000_000_000;

/// Configuration for observing one external chain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainParams {
    pub chain_id: ChainId,
    /// Whether votes for this chain are accepted at all.
    pub is_supported: bool,
    pub ballot_threshold: Threshold,
    pub confirmation_count: u64,
    pub min_observer_delegation: u128,
    /// Polling cadence in seconds for inbound scanning.
    pub in_tx_ticker: u64,
    /// Polling cadence in seconds for outbound scanning.
    pub out_tx_ticker: u64,
    pub gas_price_ticker: u64,
    /// Blocks between outbound scheduling passes.
    pub outbound_schedule_interval: u64,
    /// Maximum number of outbound messages scheduled per pass.
    pub outbound_schedule_lookahead: u64,
    pub gas_limit: u64,
}

impl ChainParams {
    /// Per-entry checks. Home-chain entries are only checked for a known id.
    pub fn validate(&self) -> Result<(), TypesError> {
        let chain = chain_by_id(self.chain_id).ok_or(TypesError::UnknownChain(self.chain_id))?;
        if self.ballot_threshold > Threshold::UNANIMOUS {
            return Err(TypesError::InvalidThreshold(format!(
                "chain {} ballot_threshold {} exceeds 1",
                self.chain_id, self.ballot_threshold
            )));
        }
        if chain.is_pell_chain() {
            return Ok(());
        }

        let invalid = |reason: String| TypesError::InvalidChainParams {
            chain_id: self.chain_id,
            reason,
        };
        if self.confirmation_count == 0 {
            return Err(invalid("confirmation_count must be greater than 0".into()));
        }
        for (name, value) in [
            ("gas_price_ticker", self.gas_price_ticker),
            ("in_tx_ticker", self.in_tx_ticker),
            ("out_tx_ticker", self.out_tx_ticker),
        ] {
            if value == 0 || value > 300 {
                return Err(invalid(format!("{name} {value} out of range")));
            }
        }
        if self.outbound_schedule_interval == 0 || self.outbound_schedule_interval > 100 {
            return Err(invalid(format!(
                "outbound_schedule_interval {} out of range",
                self.outbound_schedule_interval
            )));
        }
        if self.outbound_schedule_lookahead == 0 || self.outbound_schedule_lookahead > 500 {
            return Err(invalid(format!(
                "outbound_schedule_lookahead {} out of range",
                self.outbound_schedule_lookahead
            )));
        }
        Ok(())
    }
}

/// The singleton list of chain params held by the module.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainParamsList {
    pub chain_params: Vec<ChainParams>,
}

impl ChainParamsList {
    /// Every entry must validate, reference a known chain, and appear once.
    pub fn validate(&self) -> Result<(), TypesError> {
        let mut seen = std::collections::BTreeSet::new();
        for params in &self.chain_params {
            params.validate()?;
            if !seen.insert(params.chain_id) {
                return Err(TypesError::DuplicateChain(params.chain_id));
            }
        }
        Ok(())
    }

    pub fn get(&self, chain_id: ChainId) -> Option<&ChainParams> {
        self.chain_params.iter().find(|p| p.chain_id == chain_id)
    }

    /// Replace the entry for the same chain, or append a new one.
    pub fn upsert(&mut self, params: ChainParams) {
        match self.chain_params.iter_mut().find(|p| p.chain_id == params.chain_id) {
            Some(existing) => *existing = params,
            None => self.chain_params.push(params),
        }
    }

    /// Drop the entry for `chain_id`. Returns whether anything was removed.
    pub fn remove(&mut self, chain_id: ChainId) -> bool {
        let before = self.chain_params.len();
        self.chain_params.retain(|p| p.chain_id != chain_id);
        self.chain_params.len() != before
    }

    /// The default local development set: a local EVM chain and the home privnet.
    pub fn default_localnet() -> Self {
        Self {
            chain_params: vec![
                default_goerli_localnet_chain_params(),
                default_pell_privnet_chain_params(),
            ],
        }
    }
}

pub fn default_goerli_localnet_chain_params() -> ChainParams {
    ChainParams {
        chain_id: well_known::GOERLI_LOCALNET.id,
        is_supported: true,
        ballot_threshold: Threshold::DEFAULT,
        confirmation_count: 1,
        min_observer_delegation: DEFAULT_MIN_OBSERVER_DELEGATION,
        in_tx_ticker: 2,
        out_tx_ticker: 1,
        gas_price_ticker: 5,
        outbound_schedule_interval: 1,
        outbound_schedule_lookahead: 50,
        gas_limit: 2_000_000,
    }
}

pub fn default_pell_privnet_chain_params() -> ChainParams {
    ChainParams {
        chain_id: well_known::PELL_PRIVNET.id,
        is_supported: true,
        ballot_threshold: Threshold::DEFAULT,
        confirmation_count: 1,
        min_observer_delegation: DEFAULT_MIN_OBSERVER_DELEGATION,
        in_tx_ticker: 2,
        out_tx_ticker: 2,
        gas_price_ticker: 5,
        outbound_schedule_interval: 0,
        outbound_schedule_lookahead: 0,
        gas_limit: 200_000,
    }
}

//! Module-wide parameters and small singleton records.

use crate::chain_params::DEFAULT_MIN_OBSERVER_DELEGATION;
use serde::{Deserialize, Serialize};

/// Blocks after creation at which a ballot is considered matured.
pub const DEFAULT_BALLOT_MATURITY_BLOCKS: u64 = 100;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Params {
    pub ballot_maturity_blocks: u64,
    /// Minimum self-delegation a validator must keep to stay an observer.
    pub min_observer_delegation: u128,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            ballot_maturity_blocks: DEFAULT_BALLOT_MATURITY_BLOCKS,
            min_observer_delegation: DEFAULT_MIN_OBSERVER_DELEGATION,
        }
    }
}

/// Roster size as of its last change; checked against the live roster.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastObserverCount {
    pub count: u64,
    pub last_change_height: u64,
}

/// Global switches for cross-chain processing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrosschainFlags {
    pub is_inbound_enabled: bool,
    pub is_outbound_enabled: bool,
}

impl Default for CrosschainFlags {
    fn default() -> Self {
        Self {
            is_inbound_enabled: true,
            is_outbound_enabled: true,
        }
    }
}

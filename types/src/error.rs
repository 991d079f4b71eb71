//! Error type for record construction and validation.

use crate::chain::ChainId;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypesError {
    #[error("invalid ballot threshold: {0}")]
    InvalidThreshold(String),

    #[error("chain id {0} not found in chain list")]
    UnknownChain(ChainId),

    #[error("duplicated chain id {0} found")]
    DuplicateChain(ChainId),

    #[error("invalid chain params for chain {chain_id}: {reason}")]
    InvalidChainParams { chain_id: ChainId, reason: String },

    #[error("invalid nonce range: low {low}, high {high}")]
    InvalidNonceRange { low: u64, high: u64 },

    #[error("invalid address: {0}")]
    InvalidAddress(String),
}

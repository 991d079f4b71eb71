//! Outbound nonce bookkeeping records.

use crate::chain::ChainId;
use serde::{Deserialize, Serialize};

/// Next nonce to assign for a chain.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainNonces {
    pub chain_id: ChainId,
    pub nonce: u64,
}

/// Window of nonces in flight for a signing key on a chain, bounded by
/// `nonce_low` and `nonce_high`.
///
/// `nonce_high` is always the next nonce to assign, so an empty window has
/// `nonce_low == nonce_high`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingNonces {
    pub chain_id: ChainId,
    pub tss: String,
    pub nonce_low: u64,
    pub nonce_high: u64,
}

impl PendingNonces {
    /// Inclusive on both ends: `nonce_low <= nonce <= nonce_high`.
    pub fn contains(&self, nonce: u64) -> bool {
        self.nonce_low <= nonce && nonce <= self.nonce_high
    }
}

/// Reverse index from an assigned nonce to the outbound message that consumed it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NonceToMessage {
    pub tss: String,
    pub chain_id: ChainId,
    pub nonce: u64,
    pub message_index: String,
}

impl NonceToMessage {
    pub fn key(&self) -> String {
        nonce_to_message_key(&self.tss, self.chain_id, self.nonce)
    }
}

pub fn nonce_to_message_key(tss: &str, chain_id: ChainId, nonce: u64) -> String {
    format!("{tss}-{chain_id}-{nonce}")
}

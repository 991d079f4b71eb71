//! Blame attestations for failed signing rounds.

use crate::chain::ChainId;
use serde::{Deserialize, Serialize};

/// A committee member accused in a blame record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlameNode {
    pub pubkey: String,
    pub blame_data: Vec<u8>,
    pub blame_signature: Vec<u8>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlameRecord {
    pub index: String,
    pub failure_reason: String,
    pub nodes: Vec<BlameNode>,
}

/// `"{chain}-{nonce}-{digest}-{height}"`.
pub fn blame_index(chain_id: ChainId, nonce: u64, digest: &str, height: u64) -> String {
    format!("{chain_id}-{nonce}-{digest}-{height}")
}

/// Prefix shared by every blame index for one outbound nonce.
///
/// The trailing separator keeps nonce 1 from matching nonce 10.
pub fn blame_prefix(chain_id: ChainId, nonce: u64) -> String {
    format!("{chain_id}-{nonce}-")
}

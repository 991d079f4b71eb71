//! Node accounts: the signing-committee roster used by keygen ballots.

use crate::address::Address;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeStatus {
    Active,
    Inactive,
}

/// A committee member: the operator that votes and the grantee key that signs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeAccount {
    pub operator: Address,
    pub grantee_address: Address,
    /// Public key the grantee contributes to key generation.
    pub grantee_pubkey: String,
    pub status: NodeStatus,
}

//! Key-generation ceremony state and the signing keys it produces.

use crate::address::Address;
use serde::{Deserialize, Serialize};

/// Keygen block value that disables any scheduled ceremony.
pub const KEYGEN_BLOCK_DISABLED: u64 = u64::MAX;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeygenStatus {
    Pending,
    Success,
    Failed,
}

/// The singleton keygen record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keygen {
    pub status: KeygenStatus,
    /// Public keys expected to take part in the ceremony.
    pub grantee_pubkeys: Vec<String>,
    /// Height at which the ceremony is scheduled to run.
    pub block_number: u64,
}

impl Keygen {
    /// A keygen that will not run until rescheduled.
    pub fn disabled() -> Self {
        Self {
            status: KeygenStatus::Pending,
            grantee_pubkeys: Vec::new(),
            block_number: KEYGEN_BLOCK_DISABLED,
        }
    }
}

/// A threshold signing key agreed by a successful keygen ballot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tss {
    pub tss_pubkey: String,
    /// Grantee public keys that took part in generation.
    pub participant_list: Vec<String>,
    /// Operators who voted on the keygen ballot.
    pub operator_address_list: Vec<Address>,
    pub finalized_height: u64,
    pub keygen_height: u64,
}

//! Capabilities the host ledger provides to this module.
//!
//! Each collaborator is injected at construction as a trait object so tests
//! can substitute deterministic in-memory versions.

use crate::address::Address;
use crate::chain::ChainId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Permission class an admin message requires.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PolicyType {
    /// Fast, restrictive actions such as disabling processing.
    Emergency,
    /// Routine operational changes.
    Operational,
    /// Changes to the signing key or the committee itself.
    Admin,
}

/// Validator state as reported by the staking provider.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validator {
    pub operator: Address,
    pub tokens: u128,
    pub delegator_shares: u128,
    pub jailed: bool,
    pub bonded: bool,
}

impl Validator {
    /// Convert delegation shares to tokens, rounding down.
    pub fn tokens_from_shares(&self, shares: u128) -> u128 {
        if self.delegator_shares == 0 {
            return 0;
        }
        mul_div_floor(shares, self.tokens, self.delegator_shares)
    }
}

/// `floor(a * b / d)` with a 256-bit intermediate product. Saturates at `u128::MAX`.
fn mul_div_floor(a: u128, b: u128, d: u128) -> u128 {
    const MASK: u128 = u64::MAX as u128;
    let (a1, a0) = (a >> 64, a & MASK);
    let (b1, b0) = (b >> 64, b & MASK);
    let p00 = a0 * b0;
    let p01 = a0 * b1;
    let p10 = a1 * b0;
    let p11 = a1 * b1;
    let mid = (p00 >> 64) + (p01 & MASK) + (p10 & MASK);
    let lo = (p00 & MASK) | (mid << 64);
    let hi = p11 + (p01 >> 64) + (p10 >> 64) + (mid >> 64);
    if hi == 0 {
        return lo / d;
    }

    let mut rem: u128 = 0;
    let mut quotient: u128 = 0;
    for i in (0..256u32).rev() {
        let bit = if i >= 128 { (hi >> (i - 128)) & 1 } else { (lo >> i) & 1 };
        let carry = rem >> 127;
        rem = (rem << 1) | bit;
        if carry == 1 || rem >= d {
            rem = rem.wrapping_sub(d);
            if i >= 128 {
                return u128::MAX;
            }
            quotient |= 1 << i;
        }
    }
    quotient
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delegation {
    pub delegator: Address,
    pub validator: Address,
    pub shares: u128,
}

pub trait StakingProvider {
    fn validator(&self, operator: &Address) -> Option<Validator>;
    fn delegation(&self, delegator: &Address, validator: &Address) -> Option<Delegation>;
}

pub trait SlashingProvider {
    /// Whether the validator run by `operator` is permanently barred.
    fn is_tombstoned(&self, operator: &Address) -> bool;
}

pub trait AuthorityProvider {
    fn is_authorized(&self, signer: &Address, policy: PolicyType) -> bool;
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct HeaderError(pub String);

/// Header verification for inbound-block ballots.
pub trait LightClient {
    /// Check a header before it is voted on. Returns the parent hash.
    fn check_new_block_header(
        &self,
        chain_id: ChainId,
        block_hash: &[u8],
        height: u64,
        header: &[u8],
    ) -> Result<Vec<u8>, HeaderError>;

    fn add_block_header(
        &self,
        chain_id: ChainId,
        block_hash: &[u8],
        height: u64,
        parent_hash: &[u8],
    ) -> Result<(), HeaderError>;
}

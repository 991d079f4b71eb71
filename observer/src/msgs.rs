//! Vote and admin messages accepted by the keeper.
//!
//! Vote messages are content-addressed: every observer that saw the same
//! event produces the same [`digest`](MsgVoteOnInbound::digest), which is the
//! id of the ballot they vote on. The signer never takes part in the digest.

use crate::error::ObserverError;
use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use relay_types::{Address, BlameRecord, ChainId, ChainParams, VoteOutcome};
use serde::{Deserialize, Serialize};

type Blake2b256 = Blake2b<U32>;

/// Ballot id prefix for gas-token recharge votes.
pub const GAS_RECHARGE_BALLOT_PREFIX: &str = "AddGasTokenBallot-";

/// Hex-encoded Blake2b-256 of the bincode encoding of `msg`.
fn content_digest<T: Serialize>(msg: &T) -> Result<String, ObserverError> {
    let bytes = bincode::serialize(msg)
        .map_err(|e| ObserverError::InvalidMessage(format!("cannot encode message: {e}")))?;
    let mut hasher = Blake2b256::new();
    hasher.update(&bytes);
    Ok(hex::encode(hasher.finalize()))
}

fn require_signer(signer: &Address) -> Result<(), ObserverError> {
    if !signer.is_valid() {
        return Err(ObserverError::InvalidMessage(format!(
            "invalid signer address {signer:?}"
        )));
    }
    Ok(())
}

/// Status an observer reports for an external transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReceiveStatus {
    /// Placeholder; never a valid vote.
    Created,
    Success,
    Failed,
}

impl ReceiveStatus {
    /// Map a reported status to a ballot outcome. `Created` is not a vote.
    pub fn to_outcome(self) -> Result<VoteOutcome, ObserverError> {
        match self {
            Self::Success => Ok(VoteOutcome::Success),
            Self::Failed => Ok(VoteOutcome::Failure),
            Self::Created => Err(ObserverError::InvalidOutcome(
                "status must be Success or Failed".into(),
            )),
        }
    }
}

// ── Vote messages ───────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgVoteOnInbound {
    pub signer: Address,
    pub sender: String,
    pub sender_chain_id: ChainId,
    pub tx_origin: String,
    pub receiver: String,
    pub receiver_chain_id: ChainId,
    pub in_tx_hash: String,
    pub in_block_height: u64,
    pub event_index: u64,
    pub gas_limit: u64,
    pub payload: Vec<u8>,
}

impl MsgVoteOnInbound {
    pub fn digest(&self) -> Result<String, ObserverError> {
        let mut m = self.clone();
        m.signer = Address::new("");
        content_digest(&m)
    }

    pub fn validate_basic(&self) -> Result<(), ObserverError> {
        require_signer(&self.signer)?;
        if self.in_tx_hash.is_empty() {
            return Err(ObserverError::InvalidMessage("empty inbound tx hash".into()));
        }
        Ok(())
    }
}

/// A vote that a block on an external chain contains relevant events.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgVoteInboundBlock {
    pub signer: Address,
    pub chain_id: ChainId,
    pub block_hash: String,
    pub block_height: u64,
}

impl MsgVoteInboundBlock {
    pub fn digest(&self) -> Result<String, ObserverError> {
        let mut m = self.clone();
        m.signer = Address::new("");
        content_digest(&m)
    }

    pub fn validate_basic(&self) -> Result<(), ObserverError> {
        require_signer(&self.signer)?;
        if self.block_hash.is_empty() {
            return Err(ObserverError::InvalidMessage("empty block hash".into()));
        }
        Ok(())
    }
}

/// A vote to add a verified external block header to the light client.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgVoteBlockHeader {
    pub signer: Address,
    pub chain_id: ChainId,
    pub block_hash: Vec<u8>,
    pub height: u64,
    pub header: Vec<u8>,
}

impl MsgVoteBlockHeader {
    pub fn digest(&self) -> Result<String, ObserverError> {
        let mut m = self.clone();
        m.signer = Address::new("");
        content_digest(&m)
    }

    pub fn validate_basic(&self) -> Result<(), ObserverError> {
        require_signer(&self.signer)?;
        if self.block_hash.len() != 32 {
            return Err(ObserverError::InvalidMessage(format!(
                "block hash must be 32 bytes, got {}",
                self.block_hash.len()
            )));
        }
        if self.header.is_empty() {
            return Err(ObserverError::InvalidMessage("empty header".into()));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgVoteOnOutbound {
    pub signer: Address,
    pub message_index: String,
    pub outbound_hash: String,
    pub observed_block_height: u64,
    pub gas_used: u64,
    pub chain_id: ChainId,
    pub nonce: u64,
    pub status: ReceiveStatus,
}

impl MsgVoteOnOutbound {
    /// Success and failure reports for the same outbound share one ballot.
    pub fn digest(&self) -> Result<String, ObserverError> {
        let mut m = self.clone();
        m.signer = Address::new("");
        m.status = ReceiveStatus::Created;
        content_digest(&m)
    }

    pub fn validate_basic(&self) -> Result<(), ObserverError> {
        require_signer(&self.signer)?;
        self.status.to_outcome()?;
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgVoteGasRecharge {
    pub signer: Address,
    pub chain_id: ChainId,
    /// Monotonic recharge counter maintained by observers.
    pub vote_index: u64,
}

impl MsgVoteGasRecharge {
    pub fn digest(&self) -> String {
        format!("{GAS_RECHARGE_BALLOT_PREFIX}{}", self.vote_index)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgVoteTss {
    pub signer: Address,
    pub tss_pubkey: String,
    pub keygen_height: u64,
    pub status: ReceiveStatus,
}

impl MsgVoteTss {
    /// One keygen ballot per keygen height.
    pub fn digest(&self) -> String {
        format!("{}-tss-keygen", self.keygen_height)
    }

    pub fn validate_basic(&self) -> Result<(), ObserverError> {
        require_signer(&self.signer)?;
        self.status.to_outcome()?;
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgAddBlameVote {
    pub signer: Address,
    pub chain_id: ChainId,
    pub blame: BlameRecord,
}

impl MsgAddBlameVote {
    pub fn digest(&self) -> Result<String, ObserverError> {
        let mut m = self.clone();
        m.signer = Address::new("");
        content_digest(&m)
    }

    pub fn validate_basic(&self) -> Result<(), ObserverError> {
        require_signer(&self.signer)?;
        if self.blame.index.is_empty() {
            return Err(ObserverError::InvalidMessage("empty blame index".into()));
        }
        Ok(())
    }
}

// ── Admin messages ──────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgAddObserver {
    pub signer: Address,
    pub observer_address: Address,
    pub grantee_address: Address,
    pub grantee_pubkey: String,
    /// Register the committee member without adding it to the voter roster.
    pub add_node_account_only: bool,
}

impl MsgAddObserver {
    pub fn validate_basic(&self) -> Result<(), ObserverError> {
        require_signer(&self.signer)?;
        if !self.observer_address.is_valid() {
            return Err(ObserverError::InvalidMessage(format!(
                "invalid observer address {:?}",
                self.observer_address
            )));
        }
        if self.grantee_pubkey.is_empty() {
            return Err(ObserverError::InvalidMessage("empty grantee pubkey".into()));
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObserverUpdateReason {
    /// The old observer was tombstoned and moves itself to a new address.
    Tombstoned,
    AdminUpdate,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgUpdateObserver {
    pub signer: Address,
    pub old_observer_address: Address,
    pub new_observer_address: Address,
    pub update_reason: ObserverUpdateReason,
}

impl MsgUpdateObserver {
    pub fn validate_basic(&self) -> Result<(), ObserverError> {
        require_signer(&self.signer)?;
        if !self.old_observer_address.is_valid() || !self.new_observer_address.is_valid() {
            return Err(ObserverError::InvalidMessage("invalid observer address".into()));
        }
        if self.update_reason == ObserverUpdateReason::Tombstoned
            && self.signer != self.old_observer_address
        {
            return Err(ObserverError::InvalidMessage(
                "a tombstone update must be signed by the old observer".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgUpsertChainParams {
    pub signer: Address,
    pub chain_params: ChainParams,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgRemoveChainParams {
    pub signer: Address,
    pub chain_id: ChainId,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgUpsertCrosschainFlags {
    pub signer: Address,
    pub is_inbound_enabled: bool,
    pub is_outbound_enabled: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgUpdateKeygen {
    pub signer: Address,
    pub block: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgUpdateTss {
    pub signer: Address,
    pub tss_pubkey: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgResetChainNonces {
    pub signer: Address,
    pub chain_id: ChainId,
    pub nonce_low: u64,
    pub nonce_high: u64,
}

impl MsgResetChainNonces {
    pub fn validate_basic(&self) -> Result<(), ObserverError> {
        require_signer(&self.signer)?;
        if self.nonce_low > self.nonce_high {
            return Err(ObserverError::InvalidNonceRange {
                low: self.nonce_low,
                high: self.nonce_high,
            });
        }
        Ok(())
    }
}

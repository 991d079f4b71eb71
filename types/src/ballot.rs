//! Ballot: one round of threshold voting over a single observation digest.
//!
//! A ballot freezes its voter roster at creation. Each voter owns exactly one
//! slot, so the voter list and the vote list can never drift apart.
//! Finalization is evaluated against the full frozen roster, failure first.

use crate::address::Address;
use crate::threshold::Threshold;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// What kind of observation a ballot decides.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObservationKind {
    InboundTx,
    OutboundTx,
    InboundBlock,
    TssKeygen,
    /// Blame attestation for a failed keysign.
    TssKeysign,
    GasTokenRecharge,
}

impl ObservationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InboundTx => "in_bound_tx",
            Self::OutboundTx => "out_bound_tx",
            Self::InboundBlock => "in_bound_block",
            Self::TssKeygen => "tss_key_gen",
            Self::TssKeysign => "tss_key_sign",
            Self::GasTokenRecharge => "gas_token_recharge",
        }
    }
}

impl fmt::Display for ObservationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single voter's recorded outcome.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VoteOutcome {
    NotYetVoted,
    Success,
    Failure,
}

/// Lifecycle status of a ballot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BallotStatus {
    InProgress,
    FinalizedSuccess,
    FinalizedFailure,
}

impl BallotStatus {
    pub fn is_finalized(&self) -> bool {
        !matches!(self, Self::InProgress)
    }
}

/// A voter's position in the frozen roster together with their outcome.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteSlot {
    pub voter: Address,
    pub outcome: VoteOutcome,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum VoteError {
    #[error("voter {voter} has already voted on ballot {ballot}")]
    AlreadyVoted { voter: Address, ballot: String },

    #[error("voter {voter} is not in the voter list of ballot {ballot}")]
    NotInVoterList { voter: Address, ballot: String },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ballot {
    /// Content-addressed ballot identifier.
    pub id: String,
    /// Frozen roster, in snapshot order.
    slots: Vec<VoteSlot>,
    pub kind: ObservationKind,
    pub threshold: Threshold,
    pub status: BallotStatus,
    pub creation_height: u64,
}

impl Ballot {
    /// Open a ballot over a roster snapshot. Every voter starts as `NotYetVoted`.
    ///
    /// Duplicate addresses in the snapshot keep only their first position.
    pub fn new(
        id: impl Into<String>,
        voters: impl IntoIterator<Item = Address>,
        kind: ObservationKind,
        threshold: Threshold,
        creation_height: u64,
    ) -> Self {
        let mut slots: Vec<VoteSlot> = Vec::new();
        for voter in voters {
            if slots.iter().any(|s| s.voter == voter) {
                continue;
            }
            slots.push(VoteSlot {
                voter,
                outcome: VoteOutcome::NotYetVoted,
            });
        }
        Self {
            id: id.into(),
            slots,
            kind,
            threshold,
            status: BallotStatus::InProgress,
            creation_height,
        }
    }

    /// The frozen voter roster, in snapshot order.
    pub fn voter_list(&self) -> Vec<Address> {
        self.slots.iter().map(|s| s.voter.clone()).collect()
    }

    /// Outcomes parallel to [`Ballot::voter_list`].
    pub fn votes(&self) -> Vec<VoteOutcome> {
        self.slots.iter().map(|s| s.outcome).collect()
    }

    pub fn slots(&self) -> &[VoteSlot] {
        &self.slots
    }

    pub fn voter_count(&self) -> usize {
        self.slots.len()
    }

    fn slot(&self, voter: &Address) -> Option<&VoteSlot> {
        self.slots.iter().find(|s| &s.voter == voter)
    }

    /// The outcome recorded for `voter`, if they are on the roster.
    pub fn vote_of(&self, voter: &Address) -> Option<VoteOutcome> {
        self.slot(voter).map(|s| s.outcome)
    }

    pub fn has_voted(&self, voter: &Address) -> bool {
        matches!(
            self.vote_of(voter),
            Some(VoteOutcome::Success | VoteOutcome::Failure)
        )
    }

    /// Record `outcome` for `voter`.
    ///
    /// Fails if the voter already voted or is absent from the frozen roster.
    /// The ballot status is not consulted: a vote cast after finalization is
    /// still recorded, it just never re-finalizes the ballot.
    pub fn add_vote(&mut self, voter: &Address, outcome: VoteOutcome) -> Result<(), VoteError> {
        let ballot = self.id.clone();
        let slot = self
            .slots
            .iter_mut()
            .find(|s| &s.voter == voter)
            .ok_or_else(|| VoteError::NotInVoterList {
                voter: voter.clone(),
                ballot: ballot.clone(),
            })?;
        if slot.outcome != VoteOutcome::NotYetVoted {
            return Err(VoteError::AlreadyVoted {
                voter: voter.clone(),
                ballot,
            });
        }
        slot.outcome = outcome;
        Ok(())
    }

    pub fn count(&self, outcome: VoteOutcome) -> usize {
        self.slots.iter().filter(|s| s.outcome == outcome).count()
    }

    /// Move the ballot to a final status if enough votes are in.
    ///
    /// Returns `true` only on the transition out of `InProgress`. Failure is
    /// checked before success, so a tie resolves to `FinalizedFailure`.
    pub fn check_finalization(&mut self) -> bool {
        if self.status != BallotStatus::InProgress {
            return false;
        }
        let total = self.voter_count();
        if self.threshold.is_met(self.count(VoteOutcome::Failure), total) {
            self.status = BallotStatus::FinalizedFailure;
            return true;
        }
        if self.threshold.is_met(self.count(VoteOutcome::Success), total) {
            self.status = BallotStatus::FinalizedSuccess;
            return true;
        }
        false
    }

    /// Credit voters who sided with the final outcome and debit the rest.
    ///
    /// Returns the number of reward units handed out. An in-progress ballot
    /// distributes nothing.
    pub fn rewards_distribution(&self, rewards: &mut BTreeMap<Address, i64>) -> i64 {
        let winning = match self.status {
            BallotStatus::InProgress => return 0,
            BallotStatus::FinalizedSuccess => VoteOutcome::Success,
            BallotStatus::FinalizedFailure => VoteOutcome::Failure,
        };
        let mut units = 0;
        for slot in &self.slots {
            let entry = rewards.entry(slot.voter.clone()).or_insert(0);
            if slot.outcome == winning {
                *entry += 1;
                units += 1;
            } else {
                *entry -= 1;
            }
        }
        units
    }
}

/// Secondary index: ballots created at a given height.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BallotListForHeight {
    pub height: u64,
    pub ballot_ids: Vec<String>,
}

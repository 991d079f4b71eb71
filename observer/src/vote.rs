//! Voting entry points for chain observations.
//!
//! Each entry point checks chain support and voter eligibility, finds or
//! opens the ballot for the message digest, records the vote, and reports
//! whether this vote finalized the ballot.

use crate::events::RelayerEvent;
use crate::msgs::{
    MsgVoteBlockHeader, MsgVoteGasRecharge, MsgVoteInboundBlock, MsgVoteOnInbound,
    MsgVoteOnOutbound,
};
use crate::{ObserverError, RelayerKeeper};
use relay_types::{Address, Ballot, Chain, ObservationKind, VoteOutcome};

pub const EVENT_SOURCE_VOTE_INBOUND: &str = "vote_inbound";
pub const EVENT_SOURCE_VOTE_INBOUND_BLOCK: &str = "vote_inbound_block";
pub const EVENT_SOURCE_VOTE_BLOCK_HEADER: &str = "vote_block_header";
pub const EVENT_SOURCE_GAS_RECHARGE: &str = "vote_gas_token_recharge";
pub const EVENT_SOURCE_BLAME: &str = "add_blame_vote";

/// Outcome of a single vote.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VoteResult {
    /// This vote moved the ballot out of `InProgress`.
    pub is_finalized: bool,
    /// This vote opened the ballot.
    pub is_new: bool,
}

/// Outcome of an outbound vote, with what the caller needs to advance nonces.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutboundVoteResult {
    pub is_finalized: bool,
    pub is_new: bool,
    pub ballot: Ballot,
    pub observation_chain: String,
}

impl RelayerKeeper {
    /// Find or open the ballot, record `voter`'s vote, and check finalization.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn cast_vote(
        &self,
        index: &str,
        chain: &Chain,
        kind: ObservationKind,
        voter: &Address,
        outcome: VoteOutcome,
        height: u64,
        created: Option<(&str, &'static str)>,
    ) -> Result<(Ballot, VoteResult), ObserverError> {
        let (mut ballot, is_new) = self.find_or_create_ballot(index, chain, kind, height)?;
        if is_new {
            if let Some((observation_hash, source)) = created {
                self.emit(RelayerEvent::BallotCreated {
                    ballot_id: ballot.id.clone(),
                    kind,
                    observation_hash: observation_hash.to_string(),
                    observation_chain: chain.name(),
                    source,
                });
            }
        }
        self.add_vote_to_ballot(&mut ballot, voter, outcome)?;
        let is_finalized = self.check_finalization(&mut ballot)?;
        Ok((ballot, VoteResult { is_finalized, is_new }))
    }

    fn require_inbound_enabled(&self) -> Result<(), ObserverError> {
        if !self.is_inbound_enabled()? {
            return Err(ObserverError::InboundDisabled);
        }
        Ok(())
    }

    /// Vote that an inbound cross-chain transaction was observed.
    ///
    /// Both the sender and the receiver chain must be supported.
    pub fn vote_on_inbound(
        &self,
        msg: &MsgVoteOnInbound,
        height: u64,
    ) -> Result<VoteResult, ObserverError> {
        msg.validate_basic()?;
        self.require_inbound_enabled()?;
        let sender_chain = self.require_supported_chain(msg.sender_chain_id)?;
        self.require_eligible_observer(&msg.signer)?;
        self.require_supported_chain(msg.receiver_chain_id)?;

        let index = msg.digest()?;
        let (_, result) = self.cast_vote(
            &index,
            &sender_chain,
            ObservationKind::InboundTx,
            &msg.signer,
            VoteOutcome::Success,
            height,
            Some((&msg.in_tx_hash, EVENT_SOURCE_VOTE_INBOUND)),
        )?;
        Ok(result)
    }

    /// Vote that an external block holds events relevant to this module.
    pub fn vote_on_inbound_block(
        &self,
        msg: &MsgVoteInboundBlock,
        height: u64,
    ) -> Result<VoteResult, ObserverError> {
        msg.validate_basic()?;
        self.require_inbound_enabled()?;
        let chain = self.require_supported_chain(msg.chain_id)?;
        self.require_eligible_observer(&msg.signer)?;

        let index = msg.digest()?;
        let (_, result) = self.cast_vote(
            &index,
            &chain,
            ObservationKind::InboundBlock,
            &msg.signer,
            VoteOutcome::Success,
            height,
            Some((&msg.block_hash, EVENT_SOURCE_VOTE_INBOUND_BLOCK)),
        )?;
        Ok(result)
    }

    /// Vote to add an external block header to the light client.
    ///
    /// The header is checked before voting; on finalization it is handed to
    /// the light client together with its parent hash.
    pub fn vote_block_header(
        &self,
        msg: &MsgVoteBlockHeader,
        height: u64,
    ) -> Result<VoteResult, ObserverError> {
        msg.validate_basic()?;
        let chain = self.require_supported_chain(msg.chain_id)?;
        self.require_eligible_observer(&msg.signer)?;

        let parent_hash = self
            .light_client
            .check_new_block_header(msg.chain_id, &msg.block_hash, msg.height, &msg.header)
            .map_err(|e| ObserverError::InvalidBlockHeader(e.to_string()))?;

        let index = msg.digest()?;
        let (_, result) = self.cast_vote(
            &index,
            &chain,
            ObservationKind::InboundBlock,
            &msg.signer,
            VoteOutcome::Success,
            height,
            Some((&hex::encode(&msg.block_hash), EVENT_SOURCE_VOTE_BLOCK_HEADER)),
        )?;
        if result.is_finalized {
            self.light_client
                .add_block_header(msg.chain_id, &msg.block_hash, msg.height, &parent_hash)
                .map_err(|e| ObserverError::InvalidBlockHeader(e.to_string()))?;
            tracing::info!(chain = %chain, height = msg.height, "block header added");
        }
        Ok(result)
    }

    /// Vote on the result of an outbound transaction.
    ///
    /// The reported status becomes the vote: `Success` or `Failure`.
    pub fn vote_on_outbound(
        &self,
        msg: &MsgVoteOnOutbound,
        height: u64,
    ) -> Result<OutboundVoteResult, ObserverError> {
        msg.validate_basic()?;
        let chain = self.require_supported_chain(msg.chain_id)?;
        let outcome = msg.status.to_outcome()?;
        self.require_eligible_observer(&msg.signer)?;

        let index = msg.digest()?;
        let (ballot, result) = self.cast_vote(
            &index,
            &chain,
            ObservationKind::OutboundTx,
            &msg.signer,
            outcome,
            height,
            None,
        )?;
        Ok(OutboundVoteResult {
            is_finalized: result.is_finalized,
            is_new: result.is_new,
            ballot,
            observation_chain: chain.name(),
        })
    }

    /// Vote that the gas-token balance on a chain needs recharging.
    pub fn vote_on_gas_recharge(
        &self,
        msg: &MsgVoteGasRecharge,
        height: u64,
    ) -> Result<VoteResult, ObserverError> {
        let chain = self.require_supported_chain(msg.chain_id)?;
        self.require_eligible_observer(&msg.signer)?;

        let (_, result) = self.cast_vote(
            &msg.digest(),
            &chain,
            ObservationKind::GasTokenRecharge,
            &msg.signer,
            VoteOutcome::Success,
            height,
            Some(("", EVENT_SOURCE_GAS_RECHARGE)),
        )?;
        tracing::debug!(
            vote_index = msg.vote_index,
            finalized = result.is_finalized,
            "gas recharge vote processed"
        );
        Ok(result)
    }
}

//! Blame attestations for failed signing rounds.

use crate::msgs::MsgAddBlameVote;
use crate::vote::{VoteResult, EVENT_SOURCE_BLAME};
use crate::{ObserverError, RelayerKeeper};
use relay_types::{blame_prefix, BlameRecord, ChainId, ObservationKind, VoteOutcome};

impl RelayerKeeper {
    /// Vote that a signing round failed through the fault of `msg.blame.nodes`.
    ///
    /// The record is stored verbatim once the ballot finalizes; votes only gate it.
    pub fn add_blame_vote(
        &self,
        msg: &MsgAddBlameVote,
        height: u64,
    ) -> Result<VoteResult, ObserverError> {
        msg.validate_basic()?;
        let chain = self.require_supported_chain(msg.chain_id)?;
        self.require_eligible_observer(&msg.signer)?;

        let index = msg.digest()?;
        let (_, result) = self.cast_vote(
            &index,
            &chain,
            ObservationKind::TssKeysign,
            &msg.signer,
            VoteOutcome::Success,
            height,
            Some((&msg.blame.index, EVENT_SOURCE_BLAME)),
        )?;
        if result.is_finalized {
            self.store.put_blame(&msg.blame)?;
            tracing::info!(
                blame = %msg.blame.index,
                nodes = msg.blame.nodes.len(),
                "blame recorded"
            );
        }
        Ok(result)
    }

    pub fn get_blame(&self, index: &str) -> Result<Option<BlameRecord>, ObserverError> {
        Ok(self.store.get_blame(index)?)
    }

    pub fn get_all_blame(&self) -> Result<Vec<BlameRecord>, ObserverError> {
        Ok(self.store.iter_blame()?)
    }

    /// Every record filed against one outbound nonce.
    pub fn get_blames_by_chain_and_nonce(
        &self,
        chain_id: ChainId,
        nonce: u64,
    ) -> Result<Vec<BlameRecord>, ObserverError> {
        Ok(self.store.iter_blame_by_prefix(&blame_prefix(chain_id, nonce))?)
    }
}

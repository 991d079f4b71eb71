//! Ballot registry: creation, voting, finalization and maturity lookups.

use crate::events::RelayerEvent;
use crate::{ObserverError, RelayerKeeper};
use relay_types::{
    Address, Ballot, BallotListForHeight, Chain, ObservationKind, Threshold, VoteOutcome,
};
use std::collections::BTreeMap;

impl RelayerKeeper {
    /// Return the ballot stored under `index`, or open a new one.
    ///
    /// A new ballot snapshots the current observer roster, takes its
    /// threshold from the chain params, and is indexed under `height`.
    pub fn find_or_create_ballot(
        &self,
        index: &str,
        chain: &Chain,
        kind: ObservationKind,
        height: u64,
    ) -> Result<(Ballot, bool), ObserverError> {
        let params = self
            .get_supported_chain_params(chain.id)?
            .ok_or(ObserverError::UnsupportedChain(chain.id))?;
        if let Some(ballot) = self.store.get_ballot(index)? {
            return Ok((ballot, false));
        }
        let voters = self.store.get_observer_set()?.unwrap_or_default();
        let ballot = self.open_ballot(index, voters, kind, params.ballot_threshold, height)?;
        Ok((ballot, true))
    }

    /// Persist a fresh ballot over `voters` and index it by creation height.
    pub(crate) fn open_ballot(
        &self,
        index: &str,
        voters: Vec<Address>,
        kind: ObservationKind,
        threshold: Threshold,
        height: u64,
    ) -> Result<Ballot, ObserverError> {
        let ballot = Ballot::new(index, voters, kind, threshold, height);
        self.store.put_ballot(&ballot)?;
        self.add_ballot_to_list(height, index)?;
        tracing::info!(
            ballot = %index,
            %kind,
            voters = ballot.voter_count(),
            %threshold,
            height,
            "ballot created"
        );
        Ok(ballot)
    }

    fn add_ballot_to_list(&self, height: u64, index: &str) -> Result<(), ObserverError> {
        let mut list = self
            .store
            .get_ballot_list(height)?
            .unwrap_or_else(|| BallotListForHeight {
                height,
                ballot_ids: Vec::new(),
            });
        list.ballot_ids.push(index.to_string());
        self.store.put_ballot_list(&list)?;
        Ok(())
    }

    /// Record one vote and persist the ballot. See [`Ballot::add_vote`].
    pub fn add_vote_to_ballot(
        &self,
        ballot: &mut Ballot,
        voter: &Address,
        outcome: VoteOutcome,
    ) -> Result<(), ObserverError> {
        ballot.add_vote(voter, outcome)?;
        self.store.put_ballot(ballot)?;
        tracing::info!(ballot = %ballot.id, %voter, ?outcome, "vote added");
        Ok(())
    }

    /// Finalize `ballot` if its threshold is met; persists only on transition.
    pub fn check_finalization(&self, ballot: &mut Ballot) -> Result<bool, ObserverError> {
        if !ballot.check_finalization() {
            return Ok(false);
        }
        self.store.put_ballot(ballot)?;
        tracing::info!(ballot = %ballot.id, status = ?ballot.status, "ballot finalized");
        self.emit(RelayerEvent::BallotFinalized {
            ballot_id: ballot.id.clone(),
            status: ballot.status,
        });
        Ok(true)
    }

    pub fn get_ballot(&self, index: &str) -> Result<Option<Ballot>, ObserverError> {
        Ok(self.store.get_ballot(index)?)
    }

    pub fn get_all_ballots(&self) -> Result<Vec<Ballot>, ObserverError> {
        Ok(self.store.iter_ballots()?)
    }

    /// Ids of ballots created exactly `maturity_blocks` before `height`.
    pub fn matured_ballot_ids(
        &self,
        height: u64,
        maturity_blocks: u64,
    ) -> Result<Vec<String>, ObserverError> {
        let Some(matured_height) = height.checked_sub(maturity_blocks) else {
            return Ok(Vec::new());
        };
        Ok(self
            .store
            .get_ballot_list(matured_height)?
            .map(|list| list.ballot_ids)
            .unwrap_or_default())
    }

    /// Matured ballot ids using the module's `ballot_maturity_blocks`.
    pub fn get_matured_ballots(&self, height: u64) -> Result<Vec<String>, ObserverError> {
        let maturity = self.params()?.ballot_maturity_blocks;
        self.matured_ballot_ids(height, maturity)
    }

    /// Reward units per voter over the ballots maturing at `height`.
    ///
    /// Returns the per-voter balance and the total positive units handed out.
    pub fn matured_rewards_distribution(
        &self,
        height: u64,
    ) -> Result<(BTreeMap<Address, i64>, i64), ObserverError> {
        let mut rewards = BTreeMap::new();
        let mut total = 0;
        for id in self.get_matured_ballots(height)? {
            match self.store.get_ballot(&id)? {
                Some(ballot) => total += ballot.rewards_distribution(&mut rewards),
                None => tracing::error!(ballot = %id, height, "indexed ballot missing from store"),
            }
        }
        Ok((rewards, total))
    }
}

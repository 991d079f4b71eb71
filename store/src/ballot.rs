//! Ballot storage trait.

use crate::StoreError;
use relay_types::{Ballot, BallotListForHeight};

/// Ballots keyed by id, plus the per-height creation index.
pub trait BallotStore {
    /// Insert or overwrite a ballot.
    fn put_ballot(&self, ballot: &Ballot) -> Result<(), StoreError>;

    fn get_ballot(&self, id: &str) -> Result<Option<Ballot>, StoreError>;

    /// All ballots, ordered by id.
    fn iter_ballots(&self) -> Result<Vec<Ballot>, StoreError>;

    fn get_ballot_list(&self, height: u64) -> Result<Option<BallotListForHeight>, StoreError>;

    fn put_ballot_list(&self, list: &BallotListForHeight) -> Result<(), StoreError>;
}

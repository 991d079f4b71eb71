//! Blame record storage trait.

use crate::StoreError;
use relay_types::BlameRecord;

pub trait BlameStore {
    fn put_blame(&self, blame: &BlameRecord) -> Result<(), StoreError>;

    fn get_blame(&self, index: &str) -> Result<Option<BlameRecord>, StoreError>;

    /// All records, ordered by index.
    fn iter_blame(&self) -> Result<Vec<BlameRecord>, StoreError>;

    /// Records whose index starts with `prefix`.
    fn iter_blame_by_prefix(&self, prefix: &str) -> Result<Vec<BlameRecord>, StoreError>;
}

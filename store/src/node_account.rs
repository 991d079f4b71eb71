//! Node account storage trait.

use crate::StoreError;
use relay_types::{Address, NodeAccount};

/// Node accounts keyed by operator address.
pub trait NodeAccountStore {
    fn put_node_account(&self, account: &NodeAccount) -> Result<(), StoreError>;

    fn get_node_account(&self, operator: &Address) -> Result<Option<NodeAccount>, StoreError>;

    fn remove_node_account(&self, operator: &Address) -> Result<(), StoreError>;

    /// All node accounts, ordered by operator address.
    fn iter_node_accounts(&self) -> Result<Vec<NodeAccount>, StoreError>;
}

//! Outbound nonce storage trait.

use crate::StoreError;
use relay_types::{ChainId, ChainNonces, NonceToMessage, PendingNonces};

pub trait NonceStore {
    fn get_chain_nonces(&self, chain_id: ChainId) -> Result<Option<ChainNonces>, StoreError>;

    fn put_chain_nonces(&self, nonces: &ChainNonces) -> Result<(), StoreError>;

    fn iter_chain_nonces(&self) -> Result<Vec<ChainNonces>, StoreError>;

    /// Pending window keyed by signing key and chain.
    fn get_pending_nonces(
        &self,
        tss: &str,
        chain_id: ChainId,
    ) -> Result<Option<PendingNonces>, StoreError>;

    fn put_pending_nonces(&self, pending: &PendingNonces) -> Result<(), StoreError>;

    fn iter_pending_nonces(&self) -> Result<Vec<PendingNonces>, StoreError>;

    fn get_nonce_to_message(
        &self,
        tss: &str,
        chain_id: ChainId,
        nonce: u64,
    ) -> Result<Option<NonceToMessage>, StoreError>;

    fn put_nonce_to_message(&self, entry: &NonceToMessage) -> Result<(), StoreError>;

    fn remove_nonce_to_message(
        &self,
        tss: &str,
        chain_id: ChainId,
        nonce: u64,
    ) -> Result<(), StoreError>;

    fn iter_nonce_to_message(&self) -> Result<Vec<NonceToMessage>, StoreError>;
}

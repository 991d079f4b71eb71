//! Nullable light client: accepts headers and records what was added.

use relay_types::{ChainId, HeaderError, LightClient};
use std::sync::Mutex;

/// A header accepted through [`LightClient::add_block_header`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AddedHeader {
    pub chain_id: ChainId,
    pub block_hash: Vec<u8>,
    pub height: u64,
    pub parent_hash: Vec<u8>,
}

/// Treats the first 32 bytes of a header as its parent hash.
pub struct NullLightClient {
    reject: Mutex<bool>,
    added: Mutex<Vec<AddedHeader>>,
}

impl NullLightClient {
    pub fn new() -> Self {
        Self {
            reject: Mutex::new(false),
            added: Mutex::new(Vec::new()),
        }
    }

    /// Make header checks fail.
    pub fn reject_headers(&self, reject: bool) {
        *self.reject.lock().unwrap() = reject;
    }

    pub fn added_headers(&self) -> Vec<AddedHeader> {
        self.added.lock().unwrap().clone()
    }
}

impl Default for NullLightClient {
    fn default() -> Self {
        Self::new()
    }
}

impl LightClient for NullLightClient {
    fn check_new_block_header(
        &self,
        _chain_id: ChainId,
        _block_hash: &[u8],
        _height: u64,
        header: &[u8],
    ) -> Result<Vec<u8>, HeaderError> {
        if *self.reject.lock().unwrap() {
            return Err(HeaderError("header rejected".into()));
        }
        Ok(header.iter().take(32).copied().collect())
    }

    fn add_block_header(
        &self,
        chain_id: ChainId,
        block_hash: &[u8],
        height: u64,
        parent_hash: &[u8],
    ) -> Result<(), HeaderError> {
        self.added.lock().unwrap().push(AddedHeader {
            chain_id,
            block_hash: block_hash.to_vec(),
            height,
            parent_hash: parent_hash.to_vec(),
        });
        Ok(())
    }
}

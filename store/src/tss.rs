//! Keygen and signing-key storage trait.

use crate::StoreError;
use relay_types::{Keygen, Tss};

pub trait TssStore {
    fn get_keygen(&self) -> Result<Option<Keygen>, StoreError>;

    fn put_keygen(&self, keygen: &Keygen) -> Result<(), StoreError>;

    /// The current signing key, if one has ever been set.
    fn get_tss(&self) -> Result<Option<Tss>, StoreError>;

    fn put_tss(&self, tss: &Tss) -> Result<(), StoreError>;

    /// Append to (or overwrite within) the history, keyed by public key.
    fn put_tss_history(&self, tss: &Tss) -> Result<(), StoreError>;

    fn get_tss_history(&self, pubkey: &str) -> Result<Option<Tss>, StoreError>;

    /// Every key ever generated, ordered by public key.
    fn iter_tss_history(&self) -> Result<Vec<Tss>, StoreError>;
}

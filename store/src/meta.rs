//! Module parameter and flag storage trait.

use crate::StoreError;
use relay_types::{CrosschainFlags, Params};

pub trait MetaStore {
    fn get_params(&self) -> Result<Option<Params>, StoreError>;

    fn put_params(&self, params: &Params) -> Result<(), StoreError>;

    fn get_crosschain_flags(&self) -> Result<Option<CrosschainFlags>, StoreError>;

    fn put_crosschain_flags(&self, flags: &CrosschainFlags) -> Result<(), StoreError>;
}

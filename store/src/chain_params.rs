//! Chain params storage trait.

use crate::StoreError;
use relay_types::ChainParamsList;

pub trait ChainParamsStore {
    fn get_chain_params_list(&self) -> Result<Option<ChainParamsList>, StoreError>;

    fn put_chain_params_list(&self, list: &ChainParamsList) -> Result<(), StoreError>;
}

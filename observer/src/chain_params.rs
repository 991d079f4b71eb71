//! Chain param registry: which chains are observed, and with what threshold.

use crate::msgs::{MsgRemoveChainParams, MsgUpsertChainParams};
use crate::{ObserverError, RelayerKeeper};
use relay_types::{chain_by_id, Chain, ChainId, ChainParams, ChainParamsList, PolicyType};

impl RelayerKeeper {
    /// The stored list, or an empty one before genesis.
    pub fn get_chain_params_list(&self) -> Result<ChainParamsList, ObserverError> {
        Ok(self.store.get_chain_params_list()?.unwrap_or_default())
    }

    /// Replace the whole list after validating it.
    pub fn set_chain_params_list(&self, list: &ChainParamsList) -> Result<(), ObserverError> {
        list.validate().map_err(ObserverError::InvalidChainParams)?;
        self.store.put_chain_params_list(list)?;
        Ok(())
    }

    pub fn get_chain_params(
        &self,
        chain_id: ChainId,
    ) -> Result<Option<ChainParams>, ObserverError> {
        Ok(self.get_chain_params_list()?.get(chain_id).cloned())
    }

    /// Params for `chain_id`, only if the chain is marked supported.
    pub fn get_supported_chain_params(
        &self,
        chain_id: ChainId,
    ) -> Result<Option<ChainParams>, ObserverError> {
        Ok(self.get_chain_params(chain_id)?.filter(|p| p.is_supported))
    }

    /// Resolve a chain id to a known chain, only if it is supported.
    pub fn get_supported_chain(&self, chain_id: ChainId) -> Result<Option<Chain>, ObserverError> {
        Ok(self
            .get_supported_chain_params(chain_id)?
            .and_then(|p| chain_by_id(p.chain_id)))
    }

    /// Like [`get_supported_chain`](Self::get_supported_chain) but fails with `UnsupportedChain`.
    pub(crate) fn require_supported_chain(
        &self,
        chain_id: ChainId,
    ) -> Result<Chain, ObserverError> {
        self.get_supported_chain(chain_id)?
            .ok_or(ObserverError::UnsupportedChain(chain_id))
    }

    /// Every supported chain, in chain-params order.
    pub fn get_supported_chains(&self) -> Result<Vec<Chain>, ObserverError> {
        Ok(self
            .get_chain_params_list()?
            .chain_params
            .iter()
            .filter(|p| p.is_supported)
            .filter_map(|p| chain_by_id(p.chain_id))
            .collect())
    }

    /// Supported chains other than the home chain.
    pub fn get_supported_foreign_chains(&self) -> Result<Vec<Chain>, ObserverError> {
        Ok(self
            .get_supported_chains()?
            .into_iter()
            .filter(|c| !c.is_pell_chain())
            .collect())
    }

    /// Insert or replace the params for one chain. Requires the Operational policy.
    pub fn upsert_chain_params(&self, msg: &MsgUpsertChainParams) -> Result<(), ObserverError> {
        self.require_policy(&msg.signer, PolicyType::Operational)?;
        let mut list = self.get_chain_params_list()?;
        list.upsert(msg.chain_params.clone());
        self.set_chain_params_list(&list)?;
        tracing::info!(
            chain_id = msg.chain_params.chain_id,
            supported = msg.chain_params.is_supported,
            threshold = %msg.chain_params.ballot_threshold,
            "chain params upserted"
        );
        Ok(())
    }

    /// Drop the params for one chain. Requires the Operational policy.
    pub fn remove_chain_params(&self, msg: &MsgRemoveChainParams) -> Result<(), ObserverError> {
        self.require_policy(&msg.signer, PolicyType::Operational)?;
        let mut list = self.get_chain_params_list()?;
        if !list.remove(msg.chain_id) {
            return Err(ObserverError::UnsupportedChain(msg.chain_id));
        }
        self.set_chain_params_list(&list)?;
        tracing::info!(chain_id = msg.chain_id, "chain params removed");
        Ok(())
    }
}

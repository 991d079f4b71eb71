//! The relayer keeper, owner of the stores and host collaborators.
//!
//! Every state transition is a method on [`RelayerKeeper`] taking the current
//! block height explicitly. Transitions validate before they write; the host
//! ledger wraps each call in its own atomic commit.

use crate::events::{EventBus, RelayerEvent};
use crate::ObserverError;
use relay_store::RelayerStore;
use relay_types::{
    Address, AuthorityProvider, CrosschainFlags, LightClient, Params, PolicyType,
    SlashingProvider, StakingProvider,
};
use std::sync::Arc;

pub struct RelayerKeeper {
    pub(crate) store: Arc<dyn RelayerStore + Send + Sync>,
    pub(crate) staking: Arc<dyn StakingProvider + Send + Sync>,
    pub(crate) slashing: Arc<dyn SlashingProvider + Send + Sync>,
    pub(crate) authority: Arc<dyn AuthorityProvider + Send + Sync>,
    pub(crate) light_client: Arc<dyn LightClient + Send + Sync>,
    events: EventBus,
}

impl RelayerKeeper {
    pub fn new(
        store: Arc<dyn RelayerStore + Send + Sync>,
        staking: Arc<dyn StakingProvider + Send + Sync>,
        slashing: Arc<dyn SlashingProvider + Send + Sync>,
        authority: Arc<dyn AuthorityProvider + Send + Sync>,
        light_client: Arc<dyn LightClient + Send + Sync>,
    ) -> Self {
        Self {
            store,
            staking,
            slashing,
            authority,
            light_client,
            events: EventBus::new(),
        }
    }

    pub fn store(&self) -> &Arc<dyn RelayerStore + Send + Sync> {
        &self.store
    }

    pub fn subscribe(&mut self, listener: Box<dyn Fn(&RelayerEvent) + Send + Sync>) {
        self.events.subscribe(listener);
    }

    pub(crate) fn emit(&self, event: RelayerEvent) {
        self.events.emit(&event);
    }

    /// Fail unless `signer` holds `policy`.
    pub(crate) fn require_policy(
        &self,
        signer: &Address,
        policy: PolicyType,
    ) -> Result<(), ObserverError> {
        if !self.authority.is_authorized(signer, policy) {
            tracing::warn!(%signer, ?policy, "admin message rejected");
            return Err(ObserverError::Unauthorized {
                signer: signer.clone(),
                policy,
            });
        }
        Ok(())
    }

    /// Module params, falling back to defaults before genesis writes them.
    pub fn params(&self) -> Result<Params, ObserverError> {
        Ok(self.store.get_params()?.unwrap_or_default())
    }

    pub fn set_params(&self, params: &Params) -> Result<(), ObserverError> {
        self.store.put_params(params)?;
        Ok(())
    }

    /// Crosschain flags, enabled by default.
    pub fn crosschain_flags(&self) -> Result<CrosschainFlags, ObserverError> {
        Ok(self.store.get_crosschain_flags()?.unwrap_or_default())
    }

    pub fn is_inbound_enabled(&self) -> Result<bool, ObserverError> {
        Ok(self.crosschain_flags()?.is_inbound_enabled)
    }

    pub fn is_outbound_enabled(&self) -> Result<bool, ObserverError> {
        Ok(self.crosschain_flags()?.is_outbound_enabled)
    }
}

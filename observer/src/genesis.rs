//! Genesis import and export.
//!
//! Export walks every namespace in store order, so exporting the same state
//! twice yields the same bytes.

use crate::{ObserverError, RelayerKeeper};
use relay_types::{
    Address, Ballot, BallotListForHeight, BlameRecord, ChainNonces, ChainParamsList,
    CrosschainFlags, Keygen, LastObserverCount, NodeAccount, NonceToMessage, Params,
    PendingNonces, Tss,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisState {
    pub ballots: Vec<Ballot>,
    pub observers: Option<Vec<Address>>,
    pub chain_params_list: Option<ChainParamsList>,
    pub params: Option<Params>,
    pub node_accounts: Vec<NodeAccount>,
    pub crosschain_flags: Option<CrosschainFlags>,
    pub keygen: Option<Keygen>,
    pub last_observer_count: Option<LastObserverCount>,
    pub tss: Option<Tss>,
    pub tss_history: Vec<Tss>,
    pub pending_nonces: Vec<PendingNonces>,
    pub chain_nonces: Vec<ChainNonces>,
    pub nonce_to_message: Vec<NonceToMessage>,
    pub blame: Vec<BlameRecord>,
}

impl GenesisState {
    pub fn from_json(s: &str) -> Result<Self, ObserverError> {
        serde_json::from_str(s).map_err(|e| ObserverError::Genesis(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String, ObserverError> {
        serde_json::to_string_pretty(self).map_err(|e| ObserverError::Genesis(e.to_string()))
    }

    /// Reject duplicate keys and an invalid chain params list.
    pub fn validate(&self) -> Result<(), ObserverError> {
        if let Some(list) = &self.chain_params_list {
            list.validate().map_err(ObserverError::InvalidChainParams)?;
        }
        let mut ids = BTreeSet::new();
        for ballot in &self.ballots {
            if !ids.insert(ballot.id.as_str()) {
                return Err(ObserverError::Genesis(format!(
                    "duplicate ballot {}",
                    ballot.id
                )));
            }
        }
        let mut operators = BTreeSet::new();
        for account in &self.node_accounts {
            if !operators.insert(&account.operator) {
                return Err(ObserverError::Genesis(format!(
                    "duplicate node account {}",
                    account.operator
                )));
            }
        }
        Ok(())
    }
}

impl RelayerKeeper {
    /// Load `state` into an empty store.
    ///
    /// The per-height ballot index is rebuilt from each ballot's creation height.
    pub fn init_genesis(&self, state: &GenesisState) -> Result<(), ObserverError> {
        state.validate()?;

        let mut lists: BTreeMap<u64, Vec<String>> = BTreeMap::new();
        for ballot in &state.ballots {
            self.store.put_ballot(ballot)?;
            lists
                .entry(ballot.creation_height)
                .or_default()
                .push(ballot.id.clone());
        }
        for (height, ballot_ids) in lists {
            self.store
                .put_ballot_list(&BallotListForHeight { height, ballot_ids })?;
        }

        if let Some(observers) = &state.observers {
            self.store.put_observer_set(observers)?;
        }
        if let Some(list) = &state.chain_params_list {
            self.store.put_chain_params_list(list)?;
        }
        if let Some(params) = &state.params {
            self.store.put_params(params)?;
        }
        for account in &state.node_accounts {
            self.store.put_node_account(account)?;
        }
        if let Some(flags) = &state.crosschain_flags {
            self.store.put_crosschain_flags(flags)?;
        }
        if let Some(keygen) = &state.keygen {
            self.store.put_keygen(keygen)?;
        }
        if let Some(count) = &state.last_observer_count {
            self.store.put_last_observer_count(count)?;
        }
        if let Some(tss) = &state.tss {
            self.store.put_tss(tss)?;
        }
        for tss in &state.tss_history {
            self.store.put_tss_history(tss)?;
        }
        for pending in &state.pending_nonces {
            self.store.put_pending_nonces(pending)?;
        }
        for nonces in &state.chain_nonces {
            self.store.put_chain_nonces(nonces)?;
        }
        for entry in &state.nonce_to_message {
            self.store.put_nonce_to_message(entry)?;
        }
        for blame in &state.blame {
            self.store.put_blame(blame)?;
        }

        tracing::info!(
            ballots = state.ballots.len(),
            node_accounts = state.node_accounts.len(),
            tss_history = state.tss_history.len(),
            "genesis imported"
        );
        Ok(())
    }

    pub fn export_genesis(&self) -> Result<GenesisState, ObserverError> {
        Ok(GenesisState {
            ballots: self.store.iter_ballots()?,
            observers: self.store.get_observer_set()?,
            chain_params_list: self.store.get_chain_params_list()?,
            params: self.store.get_params()?,
            node_accounts: self.store.iter_node_accounts()?,
            crosschain_flags: self.store.get_crosschain_flags()?,
            keygen: self.store.get_keygen()?,
            last_observer_count: self.store.get_last_observer_count()?,
            tss: self.store.get_tss()?,
            tss_history: self.store.iter_tss_history()?,
            pending_nonces: self.store.iter_pending_nonces()?,
            chain_nonces: self.store.iter_chain_nonces()?,
            nonce_to_message: self.store.iter_nonce_to_message()?,
            blame: self.store.iter_blame()?,
        })
    }
}

//! Nullable store: thread-safe in-memory storage for testing.
//!
//! Every namespace is a `BTreeMap`, so iteration order is deterministic and
//! genesis exports taken from it are reproducible byte for byte.

use relay_store::{
    BallotStore, BlameStore, ChainParamsStore, MetaStore, NodeAccountStore, NonceStore,
    ObserverStore, StoreError, TssStore,
};
use relay_types::{
    nonce_to_message_key, Address, Ballot, BallotListForHeight, BlameRecord, ChainId,
    ChainNonces, ChainParamsList, CrosschainFlags, Keygen, LastObserverCount, NodeAccount,
    NonceToMessage, Params, PendingNonces, Tss,
};
use std::collections::BTreeMap;
use std::sync::Mutex;

/// An in-memory implementation of every relay store namespace.
pub struct NullStore {
    ballots: Mutex<BTreeMap<String, Ballot>>,
    ballot_lists: Mutex<BTreeMap<u64, BallotListForHeight>>,
    observer_set: Mutex<Option<Vec<Address>>>,
    last_observer_count: Mutex<Option<LastObserverCount>>,
    chain_params: Mutex<Option<ChainParamsList>>,
    node_accounts: Mutex<BTreeMap<Address, NodeAccount>>,
    keygen: Mutex<Option<Keygen>>,
    tss: Mutex<Option<Tss>>,
    tss_history: Mutex<BTreeMap<String, Tss>>,
    chain_nonces: Mutex<BTreeMap<ChainId, ChainNonces>>,
    pending_nonces: Mutex<BTreeMap<(String, ChainId), PendingNonces>>,
    nonce_to_message: Mutex<BTreeMap<String, NonceToMessage>>,
    blame: Mutex<BTreeMap<String, BlameRecord>>,
    params: Mutex<Option<Params>>,
    flags: Mutex<Option<CrosschainFlags>>,
    fail_writes: Mutex<bool>,
}

impl NullStore {
    pub fn new() -> Self {
        Self {
            ballots: Mutex::new(BTreeMap::new()),
            ballot_lists: Mutex::new(BTreeMap::new()),
            observer_set: Mutex::new(None),
            last_observer_count: Mutex::new(None),
            chain_params: Mutex::new(None),
            node_accounts: Mutex::new(BTreeMap::new()),
            keygen: Mutex::new(None),
            tss: Mutex::new(None),
            tss_history: Mutex::new(BTreeMap::new()),
            chain_nonces: Mutex::new(BTreeMap::new()),
            pending_nonces: Mutex::new(BTreeMap::new()),
            nonce_to_message: Mutex::new(BTreeMap::new()),
            blame: Mutex::new(BTreeMap::new()),
            params: Mutex::new(None),
            flags: Mutex::new(None),
            fail_writes: Mutex::new(false),
        }
    }

    /// Make every subsequent write fail with a backend error.
    pub fn fail_writes(&self, fail: bool) {
        *self.fail_writes.lock().unwrap() = fail;
    }

    fn check_writable(&self) -> Result<(), StoreError> {
        if *self.fail_writes.lock().unwrap() {
            return Err(StoreError::Backend("writes disabled".into()));
        }
        Ok(())
    }
}

impl Default for NullStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BallotStore for NullStore {
    fn put_ballot(&self, ballot: &Ballot) -> Result<(), StoreError> {
        self.check_writable()?;
        self.ballots
            .lock()
            .unwrap()
            .insert(ballot.id.clone(), ballot.clone());
        Ok(())
    }

    fn get_ballot(&self, id: &str) -> Result<Option<Ballot>, StoreError> {
        Ok(self.ballots.lock().unwrap().get(id).cloned())
    }

    fn iter_ballots(&self) -> Result<Vec<Ballot>, StoreError> {
        Ok(self.ballots.lock().unwrap().values().cloned().collect())
    }

    fn get_ballot_list(&self, height: u64) -> Result<Option<BallotListForHeight>, StoreError> {
        Ok(self.ballot_lists.lock().unwrap().get(&height).cloned())
    }

    fn put_ballot_list(&self, list: &BallotListForHeight) -> Result<(), StoreError> {
        self.check_writable()?;
        self.ballot_lists
            .lock()
            .unwrap()
            .insert(list.height, list.clone());
        Ok(())
    }
}

impl ObserverStore for NullStore {
    fn get_observer_set(&self) -> Result<Option<Vec<Address>>, StoreError> {
        Ok(self.observer_set.lock().unwrap().clone())
    }

    fn put_observer_set(&self, observers: &[Address]) -> Result<(), StoreError> {
        self.check_writable()?;
        *self.observer_set.lock().unwrap() = Some(observers.to_vec());
        Ok(())
    }

    fn get_last_observer_count(&self) -> Result<Option<LastObserverCount>, StoreError> {
        Ok(self.last_observer_count.lock().unwrap().clone())
    }

    fn put_last_observer_count(&self, count: &LastObserverCount) -> Result<(), StoreError> {
        self.check_writable()?;
        *self.last_observer_count.lock().unwrap() = Some(count.clone());
        Ok(())
    }
}

impl ChainParamsStore for NullStore {
    fn get_chain_params_list(&self) -> Result<Option<ChainParamsList>, StoreError> {
        Ok(self.chain_params.lock().unwrap().clone())
    }

    fn put_chain_params_list(&self, list: &ChainParamsList) -> Result<(), StoreError> {
        self.check_writable()?;
        *self.chain_params.lock().unwrap() = Some(list.clone());
        Ok(())
    }
}

impl NodeAccountStore for NullStore {
    fn put_node_account(&self, account: &NodeAccount) -> Result<(), StoreError> {
        self.check_writable()?;
        self.node_accounts
            .lock()
            .unwrap()
            .insert(account.operator.clone(), account.clone());
        Ok(())
    }

    fn get_node_account(&self, operator: &Address) -> Result<Option<NodeAccount>, StoreError> {
        Ok(self.node_accounts.lock().unwrap().get(operator).cloned())
    }

    fn remove_node_account(&self, operator: &Address) -> Result<(), StoreError> {
        self.check_writable()?;
        self.node_accounts.lock().unwrap().remove(operator);
        Ok(())
    }

    fn iter_node_accounts(&self) -> Result<Vec<NodeAccount>, StoreError> {
        Ok(self.node_accounts.lock().unwrap().values().cloned().collect())
    }
}

impl TssStore for NullStore {
    fn get_keygen(&self) -> Result<Option<Keygen>, StoreError> {
        Ok(self.keygen.lock().unwrap().clone())
    }

    fn put_keygen(&self, keygen: &Keygen) -> Result<(), StoreError> {
        self.check_writable()?;
        *self.keygen.lock().unwrap() = Some(keygen.clone());
        Ok(())
    }

    fn get_tss(&self) -> Result<Option<Tss>, StoreError> {
        Ok(self.tss.lock().unwrap().clone())
    }

    fn put_tss(&self, tss: &Tss) -> Result<(), StoreError> {
        self.check_writable()?;
        *self.tss.lock().unwrap() = Some(tss.clone());
        Ok(())
    }

    fn put_tss_history(&self, tss: &Tss) -> Result<(), StoreError> {
        self.check_writable()?;
        self.tss_history
            .lock()
            .unwrap()
            .insert(tss.tss_pubkey.clone(), tss.clone());
        Ok(())
    }

    fn get_tss_history(&self, pubkey: &str) -> Result<Option<Tss>, StoreError> {
        Ok(self.tss_history.lock().unwrap().get(pubkey).cloned())
    }

    fn iter_tss_history(&self) -> Result<Vec<Tss>, StoreError> {
        Ok(self.tss_history.lock().unwrap().values().cloned().collect())
    }
}

impl NonceStore for NullStore {
    fn get_chain_nonces(&self, chain_id: ChainId) -> Result<Option<ChainNonces>, StoreError> {
        Ok(self.chain_nonces.lock().unwrap().get(&chain_id).cloned())
    }

    fn put_chain_nonces(&self, nonces: &ChainNonces) -> Result<(), StoreError> {
        self.check_writable()?;
        self.chain_nonces
            .lock()
            .unwrap()
            .insert(nonces.chain_id, nonces.clone());
        Ok(())
    }

    fn iter_chain_nonces(&self) -> Result<Vec<ChainNonces>, StoreError> {
        Ok(self.chain_nonces.lock().unwrap().values().cloned().collect())
    }

    fn get_pending_nonces(
        &self,
        tss: &str,
        chain_id: ChainId,
    ) -> Result<Option<PendingNonces>, StoreError> {
        Ok(self
            .pending_nonces
            .lock()
            .unwrap()
            .get(&(tss.to_string(), chain_id))
            .cloned())
    }

    fn put_pending_nonces(&self, pending: &PendingNonces) -> Result<(), StoreError> {
        self.check_writable()?;
        self.pending_nonces
            .lock()
            .unwrap()
            .insert((pending.tss.clone(), pending.chain_id), pending.clone());
        Ok(())
    }

    fn iter_pending_nonces(&self) -> Result<Vec<PendingNonces>, StoreError> {
        Ok(self.pending_nonces.lock().unwrap().values().cloned().collect())
    }

    fn get_nonce_to_message(
        &self,
        tss: &str,
        chain_id: ChainId,
        nonce: u64,
    ) -> Result<Option<NonceToMessage>, StoreError> {
        Ok(self
            .nonce_to_message
            .lock()
            .unwrap()
            .get(&nonce_to_message_key(tss, chain_id, nonce))
            .cloned())
    }

    fn put_nonce_to_message(&self, entry: &NonceToMessage) -> Result<(), StoreError> {
        self.check_writable()?;
        self.nonce_to_message
            .lock()
            .unwrap()
            .insert(entry.key(), entry.clone());
        Ok(())
    }

    fn remove_nonce_to_message(
        &self,
        tss: &str,
        chain_id: ChainId,
        nonce: u64,
    ) -> Result<(), StoreError> {
        self.check_writable()?;
        self.nonce_to_message
            .lock()
            .unwrap()
            .remove(&nonce_to_message_key(tss, chain_id, nonce));
        Ok(())
    }

    fn iter_nonce_to_message(&self) -> Result<Vec<NonceToMessage>, StoreError> {
        Ok(self.nonce_to_message.lock().unwrap().values().cloned().collect())
    }
}

impl BlameStore for NullStore {
    fn put_blame(&self, blame: &BlameRecord) -> Result<(), StoreError> {
        self.check_writable()?;
        self.blame
            .lock()
            .unwrap()
            .insert(blame.index.clone(), blame.clone());
        Ok(())
    }

    fn get_blame(&self, index: &str) -> Result<Option<BlameRecord>, StoreError> {
        Ok(self.blame.lock().unwrap().get(index).cloned())
    }

    fn iter_blame(&self) -> Result<Vec<BlameRecord>, StoreError> {
        Ok(self.blame.lock().unwrap().values().cloned().collect())
    }

    fn iter_blame_by_prefix(&self, prefix: &str) -> Result<Vec<BlameRecord>, StoreError> {
        Ok(self
            .blame
            .lock()
            .unwrap()
            .range(prefix.to_string()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(_, v)| v.clone())
            .collect())
    }
}

impl MetaStore for NullStore {
    fn get_params(&self) -> Result<Option<Params>, StoreError> {
        Ok(self.params.lock().unwrap().clone())
    }

    fn put_params(&self, params: &Params) -> Result<(), StoreError> {
        self.check_writable()?;
        *self.params.lock().unwrap() = Some(params.clone());
        Ok(())
    }

    fn get_crosschain_flags(&self) -> Result<Option<CrosschainFlags>, StoreError> {
        Ok(self.flags.lock().unwrap().clone())
    }

    fn put_crosschain_flags(&self, flags: &CrosschainFlags) -> Result<(), StoreError> {
        self.check_writable()?;
        *self.flags.lock().unwrap() = Some(flags.clone());
        Ok(())
    }
}

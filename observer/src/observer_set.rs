//! Observer roster, node accounts, and voter eligibility.

use crate::events::RelayerEvent;
use crate::msgs::{MsgAddObserver, MsgUpdateObserver, ObserverUpdateReason};
use crate::{ObserverError, RelayerKeeper};
use relay_types::{Address, Keygen, LastObserverCount, NodeAccount, NodeStatus, PolicyType};

impl RelayerKeeper {
    /// The roster, or `None` before it was ever written.
    pub fn get_observer_set(&self) -> Result<Option<Vec<Address>>, ObserverError> {
        Ok(self.store.get_observer_set()?)
    }

    pub fn set_observer_set(&self, observers: &[Address]) -> Result<(), ObserverError> {
        self.store.put_observer_set(observers)?;
        Ok(())
    }

    pub fn is_observer(&self, address: &Address) -> Result<bool, ObserverError> {
        Ok(self
            .store
            .get_observer_set()?
            .is_some_and(|set| set.contains(address)))
    }

    /// A voter must be on the roster, run a known validator, and not be tombstoned.
    pub fn is_eligible_observer(&self, address: &Address) -> Result<bool, ObserverError> {
        if !self.is_observer(address)? {
            return Ok(false);
        }
        if self.staking.validator(address).is_none() {
            return Ok(false);
        }
        Ok(!self.slashing.is_tombstoned(address))
    }

    pub(crate) fn require_eligible_observer(&self, address: &Address) -> Result<(), ObserverError> {
        if !self.is_eligible_observer(address)? {
            tracing::warn!(voter = %address, "vote from ineligible observer rejected");
            return Err(ObserverError::NotAuthorizedVoter(address.clone()));
        }
        Ok(())
    }

    /// Append `address` to the roster. Adding a present address is a no-op.
    pub fn add_observer_to_set(&self, address: &Address) -> Result<(), ObserverError> {
        let mut set = self.store.get_observer_set()?.unwrap_or_default();
        if set.contains(address) {
            return Ok(());
        }
        set.push(address.clone());
        self.store.put_observer_set(&set)?;
        Ok(())
    }

    /// Remove `address` from the roster. Removing an absent address is a no-op.
    pub fn remove_observer_from_set(&self, address: &Address) -> Result<(), ObserverError> {
        let Some(mut set) = self.store.get_observer_set()? else {
            return Ok(());
        };
        let Some(pos) = set.iter().position(|a| a == address) else {
            return Ok(());
        };
        set.remove(pos);
        self.store.put_observer_set(&set)?;
        tracing::info!(observer = %address, remaining = set.len(), "observer removed from roster");
        Ok(())
    }

    pub fn get_last_observer_count(&self) -> Result<Option<LastObserverCount>, ObserverError> {
        Ok(self.store.get_last_observer_count()?)
    }

    pub fn set_last_observer_count(&self, count: &LastObserverCount) -> Result<(), ObserverError> {
        self.store.put_last_observer_count(count)?;
        Ok(())
    }

    pub fn get_node_account(
        &self,
        operator: &Address,
    ) -> Result<Option<NodeAccount>, ObserverError> {
        Ok(self.store.get_node_account(operator)?)
    }

    pub fn set_node_account(&self, account: &NodeAccount) -> Result<(), ObserverError> {
        self.store.put_node_account(account)?;
        Ok(())
    }

    pub fn get_all_node_accounts(&self) -> Result<Vec<NodeAccount>, ObserverError> {
        Ok(self.store.iter_node_accounts()?)
    }

    /// Turn off inbound processing, leaving outbound untouched.
    pub fn disable_inbound_only(&self) -> Result<(), ObserverError> {
        let mut flags = self.crosschain_flags()?;
        flags.is_inbound_enabled = false;
        self.store.put_crosschain_flags(&flags)?;
        Ok(())
    }

    /// Register a committee member or a roster observer. Requires the Operational policy.
    ///
    /// Inbound processing is disabled either way and must be re-enabled by an admin.
    pub fn add_observer(&self, msg: &MsgAddObserver, height: u64) -> Result<(), ObserverError> {
        self.require_policy(&msg.signer, PolicyType::Operational)?;
        msg.validate_basic()?;

        self.disable_inbound_only()?;

        if msg.add_node_account_only {
            self.set_node_account(&NodeAccount {
                operator: msg.observer_address.clone(),
                grantee_address: msg.grantee_address.clone(),
                grantee_pubkey: msg.grantee_pubkey.clone(),
                status: NodeStatus::Active,
            })?;
            self.store.put_keygen(&Keygen::disabled())?;
            tracing::info!(operator = %msg.observer_address, "node account added");
            return Ok(());
        }

        self.add_observer_to_set(&msg.observer_address)?;
        let count = self.store.get_observer_set()?.map_or(0, |s| s.len() as u64);
        self.set_last_observer_count(&LastObserverCount {
            count,
            last_change_height: height,
        })?;
        tracing::info!(observer = %msg.observer_address, count, "observer added");
        self.emit(RelayerEvent::ObserverAdded {
            observer: msg.observer_address.clone(),
            observer_count: count,
        });
        Ok(())
    }

    /// Move an observer to a new address, in the roster and its node account.
    ///
    /// Allowed for the tombstoned observer itself, or for an Admin signer.
    pub fn update_observer(&self, msg: &MsgUpdateObserver) -> Result<(), ObserverError> {
        msg.validate_basic()?;
        match msg.update_reason {
            ObserverUpdateReason::Tombstoned => {
                if self.staking.validator(&msg.signer).is_none() {
                    return Err(ObserverError::NotValidator(msg.signer.clone()));
                }
                if !self.slashing.is_tombstoned(&msg.signer) {
                    return Err(ObserverError::UpdateObserver(format!(
                        "{} is not tombstoned",
                        msg.signer
                    )));
                }
            }
            ObserverUpdateReason::AdminUpdate => {
                self.require_policy(&msg.signer, PolicyType::Admin)?;
            }
        }

        if !self.is_observer(&msg.old_observer_address)? {
            return Err(ObserverError::NotAuthorizedVoter(msg.old_observer_address.clone()));
        }

        match self.staking.validator(&msg.new_observer_address) {
            Some(v) if v.bonded && !v.jailed => {}
            Some(_) => {
                return Err(ObserverError::UpdateObserver(format!(
                    "{} is jailed or not bonded",
                    msg.new_observer_address
                )))
            }
            None => return Err(ObserverError::NotValidator(msg.new_observer_address.clone())),
        }

        let mut set = self
            .store
            .get_observer_set()?
            .ok_or_else(|| self.roster_missing("observer set"))?;
        let last_count = self
            .store
            .get_last_observer_count()?
            .ok_or_else(|| self.roster_missing("last observer count"))?;
        if last_count.count != set.len() as u64 {
            tracing::error!(
                recorded = last_count.count,
                actual = set.len(),
                "observer count drifted from roster"
            );
            return Err(ObserverError::UpdateObserver("observer count mismatch".into()));
        }

        let mut node_account = self
            .store
            .get_node_account(&msg.old_observer_address)?
            .ok_or_else(|| ObserverError::NodeAccountNotFound(msg.old_observer_address.clone()))?;

        for entry in set.iter_mut() {
            if *entry == msg.old_observer_address {
                *entry = msg.new_observer_address.clone();
            }
        }
        self.store.put_observer_set(&set)?;

        node_account.operator = msg.new_observer_address.clone();
        self.store.remove_node_account(&msg.old_observer_address)?;
        self.store.put_node_account(&node_account)?;

        tracing::info!(
            old = %msg.old_observer_address,
            new = %msg.new_observer_address,
            reason = ?msg.update_reason,
            "observer address updated"
        );
        Ok(())
    }

    /// Per-block roster bookkeeping.
    ///
    /// When the roster size differs from the recorded count, the pending
    /// keygen is disabled, inbound processing is switched off, and the new
    /// count is recorded at `height`.
    pub fn begin_block(&self, height: u64) -> Result<(), ObserverError> {
        let Some(last_count) = self.store.get_last_observer_count()? else {
            return Ok(());
        };
        let Some(set) = self.store.get_observer_set()? else {
            return Ok(());
        };
        let count = set.len() as u64;
        if count == last_count.count {
            return Ok(());
        }

        tracing::info!(
            previous = last_count.count,
            current = count,
            height,
            "observer count changed, disabling inbound and pending keygen"
        );
        self.store.put_keygen(&Keygen::disabled())?;
        self.disable_inbound_only()?;
        self.set_last_observer_count(&LastObserverCount {
            count,
            last_change_height: height,
        })
    }

    /// Log and build the consistency-canary error.
    pub(crate) fn roster_missing(&self, what: &str) -> ObserverError {
        tracing::error!(record = what, "bookkeeping record missing");
        ObserverError::RosterOrCounterMissing(what.to_string())
    }
}

//! Nullable staking and slashing providers with scriptable validator state.

use relay_types::{Address, Delegation, SlashingProvider, StakingProvider, Validator};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;

/// In-memory validator and delegation registry.
pub struct NullStaking {
    validators: Mutex<BTreeMap<Address, Validator>>,
    delegations: Mutex<BTreeMap<(Address, Address), Delegation>>,
}

impl NullStaking {
    pub fn new() -> Self {
        Self {
            validators: Mutex::new(BTreeMap::new()),
            delegations: Mutex::new(BTreeMap::new()),
        }
    }

    /// Register a bonded, unjailed validator whose whole stake is self-delegated.
    pub fn add_bonded_validator(&self, operator: &Address, tokens: u128) {
        self.set_validator(Validator {
            operator: operator.clone(),
            tokens,
            delegator_shares: tokens,
            jailed: false,
            bonded: true,
        });
        self.set_delegation(Delegation {
            delegator: operator.clone(),
            validator: operator.clone(),
            shares: tokens,
        });
    }

    pub fn set_validator(&self, validator: Validator) {
        self.validators
            .lock()
            .unwrap()
            .insert(validator.operator.clone(), validator);
    }

    pub fn remove_validator(&self, operator: &Address) {
        self.validators.lock().unwrap().remove(operator);
    }

    pub fn set_delegation(&self, delegation: Delegation) {
        self.delegations.lock().unwrap().insert(
            (delegation.delegator.clone(), delegation.validator.clone()),
            delegation,
        );
    }

    pub fn remove_delegation(&self, delegator: &Address, validator: &Address) {
        self.delegations
            .lock()
            .unwrap()
            .remove(&(delegator.clone(), validator.clone()));
    }
}

impl Default for NullStaking {
    fn default() -> Self {
        Self::new()
    }
}

impl StakingProvider for NullStaking {
    fn validator(&self, operator: &Address) -> Option<Validator> {
        self.validators.lock().unwrap().get(operator).cloned()
    }

    fn delegation(&self, delegator: &Address, validator: &Address) -> Option<Delegation> {
        self.delegations
            .lock()
            .unwrap()
            .get(&(delegator.clone(), validator.clone()))
            .cloned()
    }
}

/// In-memory tombstone list.
pub struct NullSlashing {
    tombstoned: Mutex<BTreeSet<Address>>,
}

impl NullSlashing {
    pub fn new() -> Self {
        Self {
            tombstoned: Mutex::new(BTreeSet::new()),
        }
    }

    pub fn tombstone(&self, operator: &Address) {
        self.tombstoned.lock().unwrap().insert(operator.clone());
    }
}

impl Default for NullSlashing {
    fn default() -> Self {
        Self::new()
    }
}

impl SlashingProvider for NullSlashing {
    fn is_tombstoned(&self, operator: &Address) -> bool {
        self.tombstoned.lock().unwrap().contains(operator)
    }
}

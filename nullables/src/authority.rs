//! Nullable authority provider: grants policies to named signers.

use relay_types::{Address, AuthorityProvider, PolicyType};
use std::collections::BTreeSet;
use std::sync::Mutex;

pub struct NullAuthority {
    grants: Mutex<BTreeSet<(Address, PolicyType)>>,
}

impl NullAuthority {
    pub fn new() -> Self {
        Self {
            grants: Mutex::new(BTreeSet::new()),
        }
    }

    pub fn grant(&self, signer: &Address, policy: PolicyType) {
        self.grants
            .lock()
            .unwrap()
            .insert((signer.clone(), policy));
    }

    /// Grant every policy to `signer`.
    pub fn grant_all(&self, signer: &Address) {
        for policy in [PolicyType::Emergency, PolicyType::Operational, PolicyType::Admin] {
            self.grant(signer, policy);
        }
    }
}

impl Default for NullAuthority {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthorityProvider for NullAuthority {
    fn is_authorized(&self, signer: &Address, policy: PolicyType) -> bool {
        self.grants
            .lock()
            .unwrap()
            .contains(&(signer.clone(), policy))
    }
}

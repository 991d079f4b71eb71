//! Roster eviction driven by validator lifecycle events.
//!
//! The host's staking component calls these hooks; each one removes the
//! affected observer when it no longer qualifies. Removal is idempotent.

use crate::{ObserverError, RelayerKeeper};
use relay_types::threshold::BPS_DENOMINATOR;
use relay_types::Address;

/// Callbacks the staking component invokes on validator lifecycle changes.
pub trait StakingHooks {
    fn after_validator_removed(&self, operator: &Address) -> Result<(), ObserverError>;

    fn after_validator_begin_unbonding(&self, operator: &Address) -> Result<(), ObserverError>;

    fn after_delegation_modified(
        &self,
        delegator: &Address,
        validator: &Address,
    ) -> Result<(), ObserverError>;

    /// `fraction_bps` is the slashed share of the validator's tokens.
    fn before_validator_slashed(
        &self,
        operator: &Address,
        fraction_bps: u32,
    ) -> Result<(), ObserverError>;
}

impl RelayerKeeper {
    /// Re-check an observer against current staking state and evict it if it
    /// no longer qualifies. Returns whether it was evicted.
    pub fn check_observer_eligibility(&self, operator: &Address) -> Result<bool, ObserverError> {
        if !self.is_observer(operator)? {
            return Ok(false);
        }
        let min = self.params()?.min_observer_delegation;
        let qualifies = match self.staking.validator(operator) {
            None => false,
            Some(v) if !v.bonded || v.jailed => false,
            Some(v) => {
                let self_bond = self
                    .staking
                    .delegation(operator, operator)
                    .map_or(0, |d| v.tokens_from_shares(d.shares));
                self_bond >= min && !self.slashing.is_tombstoned(operator)
            }
        };
        if qualifies {
            return Ok(false);
        }
        self.remove_observer_from_set(operator)?;
        Ok(true)
    }
}

impl StakingHooks for RelayerKeeper {
    fn after_validator_removed(&self, operator: &Address) -> Result<(), ObserverError> {
        self.remove_observer_from_set(operator)
    }

    fn after_validator_begin_unbonding(&self, operator: &Address) -> Result<(), ObserverError> {
        self.remove_observer_from_set(operator)
    }

    fn after_delegation_modified(
        &self,
        delegator: &Address,
        validator: &Address,
    ) -> Result<(), ObserverError> {
        // Only the validator's own stake decides its observer seat.
        if delegator != validator {
            return Ok(());
        }
        let v = self
            .staking
            .validator(validator)
            .ok_or_else(|| ObserverError::NotValidator(validator.clone()))?;
        let Some(delegation) = self.staking.delegation(delegator, validator) else {
            return self.remove_observer_from_set(validator);
        };
        let tokens = v.tokens_from_shares(delegation.shares);
        let min = self.params()?.min_observer_delegation;
        if tokens < min {
            tracing::info!(observer = %validator, tokens, min, "self delegation below minimum");
            self.remove_observer_from_set(validator)?;
        }
        Ok(())
    }

    fn before_validator_slashed(
        &self,
        operator: &Address,
        fraction_bps: u32,
    ) -> Result<(), ObserverError> {
        let v = self
            .staking
            .validator(operator)
            .ok_or_else(|| ObserverError::NotValidator(operator.clone()))?;
        if self.store.get_observer_set()?.is_none() {
            return Ok(());
        }

        let denom = u128::from(BPS_DENOMINATOR);
        let fraction = u128::from(fraction_bps.min(BPS_DENOMINATOR));
        let slashed = v.tokens.saturating_mul(fraction).div_ceil(denom);
        let remaining = v.tokens.saturating_sub(slashed);
        let min = self.params()?.min_observer_delegation;
        if remaining < min {
            tracing::info!(
                observer = %operator,
                remaining,
                min,
                "slash leaves stake below minimum"
            );
            self.remove_observer_from_set(operator)?;
        }
        Ok(())
    }
}

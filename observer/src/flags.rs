use crate::events::RelayerEvent;
use crate::msgs::MsgUpsertCrosschainFlags;
use crate::{ObserverError, RelayerKeeper};
use relay_types::{CrosschainFlags, PolicyType};

impl RelayerKeeper {
    /// Set both crosschain flags.
    ///
    /// Enabling anything needs the Operational policy; disabling only needs Emergency.
    pub fn upsert_crosschain_flags(
        &self,
        msg: &MsgUpsertCrosschainFlags,
    ) -> Result<(), ObserverError> {
        let policy = if msg.is_inbound_enabled || msg.is_outbound_enabled {
            PolicyType::Operational
        } else {
            PolicyType::Emergency
        };
        self.require_policy(&msg.signer, policy)?;

        self.store.put_crosschain_flags(&CrosschainFlags {
            is_inbound_enabled: msg.is_inbound_enabled,
            is_outbound_enabled: msg.is_outbound_enabled,
        })?;
        tracing::info!(
            inbound = msg.is_inbound_enabled,
            outbound = msg.is_outbound_enabled,
            signer = %msg.signer,
            "crosschain flags updated"
        );
        self.emit(RelayerEvent::CrosschainFlagsUpdated {
            is_inbound_enabled: msg.is_inbound_enabled,
            is_outbound_enabled: msg.is_outbound_enabled,
            signer: msg.signer.clone(),
        });
        Ok(())
    }
}

//! Outbound nonce sequencer.
//!
//! Each supported chain has a next-nonce counter and, per signing key, a
//! window of nonces in flight. Assigning a nonce extends the window at the
//! top; completing an outbound shrinks it from the bottom.

use crate::events::RelayerEvent;
use crate::msgs::MsgResetChainNonces;
use crate::{ObserverError, RelayerKeeper};
use relay_types::{ChainId, ChainNonces, NonceToMessage, PendingNonces, PolicyType, Tss};

impl RelayerKeeper {
    fn require_tss(&self) -> Result<Tss, ObserverError> {
        self.store.get_tss()?.ok_or(ObserverError::TssNotFound)
    }

    pub fn get_chain_nonces(
        &self,
        chain_id: ChainId,
    ) -> Result<Option<ChainNonces>, ObserverError> {
        Ok(self.store.get_chain_nonces(chain_id)?)
    }

    pub fn get_all_chain_nonces(&self) -> Result<Vec<ChainNonces>, ObserverError> {
        Ok(self.store.iter_chain_nonces()?)
    }

    pub fn get_pending_nonces(
        &self,
        tss: &str,
        chain_id: ChainId,
    ) -> Result<Option<PendingNonces>, ObserverError> {
        Ok(self.store.get_pending_nonces(tss, chain_id)?)
    }

    pub fn get_all_pending_nonces(&self) -> Result<Vec<PendingNonces>, ObserverError> {
        Ok(self.store.iter_pending_nonces()?)
    }

    /// The outbound message that consumed `nonce`, if any.
    pub fn get_nonce_to_message(
        &self,
        tss: &str,
        chain_id: ChainId,
        nonce: u64,
    ) -> Result<Option<NonceToMessage>, ObserverError> {
        Ok(self.store.get_nonce_to_message(tss, chain_id, nonce)?)
    }

    /// Overwrite a chain's nonce state under the current key. Requires the Operational policy.
    ///
    /// The chain nonce becomes `nonce_high` and the pending window `[low, high]`.
    pub fn reset_chain_nonces(&self, msg: &MsgResetChainNonces) -> Result<(), ObserverError> {
        self.require_policy(&msg.signer, PolicyType::Operational)?;
        msg.validate_basic()?;
        let tss = self.require_tss()?;
        let chain = self.require_supported_chain(msg.chain_id)?;

        self.store.put_chain_nonces(&ChainNonces {
            chain_id: chain.id,
            nonce: msg.nonce_high,
        })?;
        self.store.put_pending_nonces(&PendingNonces {
            chain_id: chain.id,
            tss: tss.tss_pubkey,
            nonce_low: msg.nonce_low,
            nonce_high: msg.nonce_high,
        })?;

        tracing::info!(
            chain = %chain,
            low = msg.nonce_low,
            high = msg.nonce_high,
            "chain nonces reset"
        );
        self.emit(RelayerEvent::ChainNoncesReset {
            chain_id: chain.id,
            nonce_low: msg.nonce_low,
            nonce_high: msg.nonce_high,
        });
        Ok(())
    }

    /// Hand the next nonce on `chain_id` to the outbound message `message_index`.
    pub fn assign_outbound_nonce(
        &self,
        chain_id: ChainId,
        message_index: &str,
    ) -> Result<u64, ObserverError> {
        let tss = self.require_tss()?;
        let mut chain_nonces = self
            .store
            .get_chain_nonces(chain_id)?
            .ok_or_else(|| self.roster_missing("chain nonces"))?;
        let mut pending = self
            .store
            .get_pending_nonces(&tss.tss_pubkey, chain_id)?
            .ok_or_else(|| self.roster_missing("pending nonces"))?;
        if pending.nonce_high != chain_nonces.nonce {
            tracing::error!(
                chain_id,
                pending_high = pending.nonce_high,
                chain_nonce = chain_nonces.nonce,
                "pending window out of step with chain nonce"
            );
            return Err(ObserverError::NonceMismatch {
                chain_id,
                pending_high: pending.nonce_high,
                chain_nonce: chain_nonces.nonce,
            });
        }

        let nonce = chain_nonces.nonce;
        self.store.put_nonce_to_message(&NonceToMessage {
            tss: tss.tss_pubkey,
            chain_id,
            nonce,
            message_index: message_index.to_string(),
        })?;
        chain_nonces.nonce += 1;
        pending.nonce_high += 1;
        self.store.put_chain_nonces(&chain_nonces)?;
        self.store.put_pending_nonces(&pending)?;

        tracing::debug!(chain_id, nonce, message = %message_index, "outbound nonce assigned");
        Ok(nonce)
    }

    /// Drop `nonce` and everything below it from the pending window.
    ///
    /// A nonce outside the window leaves it unchanged.
    pub fn remove_from_pending_nonces(
        &self,
        tss: &str,
        chain_id: ChainId,
        nonce: u64,
    ) -> Result<(), ObserverError> {
        let Some(mut pending) = self.store.get_pending_nonces(tss, chain_id)? else {
            return Ok(());
        };
        if pending.contains(nonce) {
            pending.nonce_low = nonce.saturating_add(1);
            self.store.put_pending_nonces(&pending)?;
        }
        Ok(())
    }

    /// Retire an outbound whose result was finalized by vote.
    pub fn complete_outbound(
        &self,
        tss: &str,
        chain_id: ChainId,
        nonce: u64,
    ) -> Result<(), ObserverError> {
        self.remove_from_pending_nonces(tss, chain_id, nonce)?;
        self.store.remove_nonce_to_message(tss, chain_id, nonce)?;
        tracing::debug!(chain_id, nonce, "outbound completed");
        Ok(())
    }
}

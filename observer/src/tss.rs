//! Keygen ballots, signing-key records, and signing-key rotation.

use crate::events::RelayerEvent;
use crate::msgs::{MsgUpdateKeygen, MsgUpdateTss, MsgVoteTss};
use crate::{ObserverError, RelayerKeeper};
use relay_types::tss::KEYGEN_BLOCK_DISABLED;
use relay_types::{
    BallotStatus, ChainNonces, Keygen, KeygenStatus, ObservationKind, PendingNonces, PolicyType,
    Threshold, Tss,
};

/// A keygen may not be scheduled sooner than this many blocks ahead.
pub const KEYGEN_MIN_LEAD_BLOCKS: u64 = 10;

/// Source tag for keygen ballot events; keygen ballots span every chain.
const KEYGEN_OBSERVATION_CHAIN: &str = "common-tss-for-all-chains";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VoteTssResult {
    pub is_finalized: bool,
    pub is_new: bool,
    /// The ballot finalized with success and produced a signing key.
    pub keygen_success: bool,
}

impl RelayerKeeper {
    pub fn get_keygen(&self) -> Result<Option<Keygen>, ObserverError> {
        Ok(self.store.get_keygen()?)
    }

    pub fn set_keygen(&self, keygen: &Keygen) -> Result<(), ObserverError> {
        self.store.put_keygen(keygen)?;
        Ok(())
    }

    /// The current signing key.
    pub fn get_tss(&self) -> Result<Option<Tss>, ObserverError> {
        Ok(self.store.get_tss()?)
    }

    /// Every signing key ever generated, ordered by public key.
    pub fn get_tss_history(&self) -> Result<Vec<Tss>, ObserverError> {
        Ok(self.store.iter_tss_history()?)
    }

    /// The key finalized at exactly `height`, if any.
    pub fn get_tss_by_finalized_height(&self, height: u64) -> Result<Option<Tss>, ObserverError> {
        Ok(self
            .store
            .iter_tss_history()?
            .into_iter()
            .find(|t| t.finalized_height == height))
    }

    /// Vote on the outcome of the keygen ceremony at `msg.keygen_height`.
    ///
    /// Voters are the node-account operators and the vote must be unanimous.
    /// The first key ever generated becomes current; later keys only join
    /// the history until promoted with [`update_tss`](Self::update_tss).
    pub fn vote_tss(&self, msg: &MsgVoteTss, height: u64) -> Result<VoteTssResult, ObserverError> {
        msg.validate_basic()?;
        if self.store.get_node_account(&msg.signer)?.is_none() {
            tracing::warn!(signer = %msg.signer, "keygen vote from signer without node account");
            return Err(ObserverError::NotAuthorizedVoter(msg.signer.clone()));
        }
        let outcome = msg.status.to_outcome()?;
        let mut keygen = self.store.get_keygen()?.ok_or(ObserverError::KeygenNotFound)?;
        if keygen.status == KeygenStatus::Success {
            return Err(ObserverError::KeygenAlreadyCompleted);
        }

        let index = msg.digest();
        let (mut ballot, is_new) = match self.store.get_ballot(&index)? {
            Some(ballot) => (ballot, false),
            None => {
                let voters = self
                    .store
                    .iter_node_accounts()?
                    .into_iter()
                    .map(|n| n.operator)
                    .collect();
                let ballot = self.open_ballot(
                    &index,
                    voters,
                    ObservationKind::TssKeygen,
                    Threshold::UNANIMOUS,
                    height,
                )?;
                self.emit(RelayerEvent::BallotCreated {
                    ballot_id: ballot.id.clone(),
                    kind: ObservationKind::TssKeygen,
                    observation_hash: msg.tss_pubkey.clone(),
                    observation_chain: KEYGEN_OBSERVATION_CHAIN.to_string(),
                    source: "vote_tss",
                });
                (ballot, true)
            }
        };

        self.add_vote_to_ballot(&mut ballot, &msg.signer, outcome)?;
        if !self.check_finalization(&mut ballot)? {
            return Ok(VoteTssResult {
                is_finalized: false,
                is_new,
                keygen_success: false,
            });
        }

        let keygen_success = ballot.status == BallotStatus::FinalizedSuccess;
        if keygen_success {
            let tss = Tss {
                tss_pubkey: msg.tss_pubkey.clone(),
                participant_list: keygen.grantee_pubkeys.clone(),
                operator_address_list: ballot.voter_list(),
                finalized_height: height,
                keygen_height: msg.keygen_height,
            };
            if self.store.iter_tss_history()?.is_empty() {
                self.set_tss_and_update_nonce(&tss)?;
            }
            self.store.put_tss_history(&tss)?;
            keygen.status = KeygenStatus::Success;
            keygen.block_number = height;
            tracing::info!(pubkey = %tss.tss_pubkey, height, "keygen succeeded");
        } else {
            keygen.status = KeygenStatus::Failed;
            keygen.block_number = KEYGEN_BLOCK_DISABLED;
            tracing::warn!(keygen_height = msg.keygen_height, "keygen failed");
        }
        self.store.put_keygen(&keygen)?;

        Ok(VoteTssResult {
            is_finalized: true,
            is_new,
            keygen_success,
        })
    }

    /// Make `tss` current and restart every supported chain's nonces at zero.
    pub fn set_tss_and_update_nonce(&self, tss: &Tss) -> Result<(), ObserverError> {
        self.store.put_tss(tss)?;
        for chain in self.get_supported_chains()? {
            self.store.put_chain_nonces(&ChainNonces {
                chain_id: chain.id,
                nonce: 0,
            })?;
            self.store.put_pending_nonces(&PendingNonces {
                chain_id: chain.id,
                tss: tss.tss_pubkey.clone(),
                nonce_low: 0,
                nonce_high: 0,
            })?;
        }
        tracing::info!(pubkey = %tss.tss_pubkey, "current tss set, nonces reset");
        Ok(())
    }

    /// Reschedule the keygen ceremony. Requires the Emergency policy.
    pub fn update_keygen(&self, msg: &MsgUpdateKeygen, height: u64) -> Result<(), ObserverError> {
        self.require_policy(&msg.signer, PolicyType::Emergency)?;
        let mut keygen = self.store.get_keygen()?.ok_or(ObserverError::KeygenNotFound)?;
        let minimum = height.saturating_add(KEYGEN_MIN_LEAD_BLOCKS);
        if msg.block < minimum {
            return Err(ObserverError::KeygenBlockTooLow {
                requested: msg.block,
                minimum,
            });
        }

        keygen.grantee_pubkeys = self
            .store
            .iter_node_accounts()?
            .into_iter()
            .map(|n| n.grantee_pubkey)
            .collect();
        keygen.block_number = msg.block;
        keygen.status = KeygenStatus::Pending;
        self.store.put_keygen(&keygen)?;

        tracing::info!(
            block = msg.block,
            participants = keygen.grantee_pubkeys.len(),
            "keygen rescheduled"
        );
        self.emit(RelayerEvent::KeygenBlockUpdated {
            block_number: keygen.block_number,
            grantee_pubkeys: keygen.grantee_pubkeys,
        });
        Ok(())
    }

    /// Promote a previously generated key to current. Requires the Admin policy.
    pub fn update_tss(&self, msg: &MsgUpdateTss) -> Result<(), ObserverError> {
        self.require_policy(&msg.signer, PolicyType::Admin)?;
        let current = self
            .store
            .get_tss()?
            .ok_or_else(|| ObserverError::UnableToUpdateTss("cannot find current tss".into()))?;
        if current.tss_pubkey == msg.tss_pubkey {
            return Err(ObserverError::UnableToUpdateTss(
                "no new tss has been generated".into(),
            ));
        }
        let tss = self.store.get_tss_history(&msg.tss_pubkey)?.ok_or_else(|| {
            ObserverError::UnableToUpdateTss("tss pubkey has not been generated".into())
        })?;
        self.set_tss_and_update_nonce(&tss)
    }
}

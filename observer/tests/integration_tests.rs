//! Integration tests driving the keeper end to end against nullable
//! collaborators: votes → ballots → finalization side effects → queries.

use relay_nullables::{NullAuthority, NullLightClient, NullSlashing, NullStaking, NullStore};
use relay_observer::{
    GenesisState, MsgAddBlameVote, MsgAddObserver, MsgRemoveChainParams, MsgResetChainNonces,
    MsgUpdateKeygen, MsgUpdateObserver, MsgUpdateTss, MsgUpsertChainParams,
    MsgUpsertCrosschainFlags, MsgVoteBlockHeader, MsgVoteGasRecharge, MsgVoteInboundBlock,
    MsgVoteOnInbound, MsgVoteOnOutbound, MsgVoteTss, ObserverError, ObserverUpdateReason,
    ReceiveStatus, RelayerEvent, RelayerKeeper, StakingHooks, VoteTssResult,
};
use relay_store::{NodeAccountStore, NonceStore, ObserverStore};
use relay_types::chain::well_known::{GOERLI_LOCALNET, PELL_PRIVNET};
use relay_types::chain_params::default_goerli_localnet_chain_params;
use relay_types::tss::KEYGEN_BLOCK_DISABLED;
use relay_types::{
    blame_index, Address, BallotStatus, BlameNode, BlameRecord, ChainNonces, ChainParamsList,
    KeygenStatus, LastObserverCount, NodeAccount, NodeStatus, ObservationKind, Params, PolicyType,
    Tss, VoteError,
};
use std::sync::{Arc, Mutex};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const STAKE: u128 = 2_000_000_000_000_000_000;
const LOCAL: i64 = 1337;

struct Harness {
    keeper: RelayerKeeper,
    store: Arc<NullStore>,
    staking: Arc<NullStaking>,
    slashing: Arc<NullSlashing>,
    authority: Arc<NullAuthority>,
    light_client: Arc<NullLightClient>,
    events: Arc<Mutex<Vec<RelayerEvent>>>,
    observers: Vec<Address>,
}

impl Harness {
    fn events(&self) -> Vec<RelayerEvent> {
        self.events.lock().unwrap().clone()
    }
}

fn observer(i: usize) -> Address {
    Address::new(format!("pell1observer{i:02}"))
}

fn admin() -> Address {
    Address::new("pell1admin")
}

/// Keeper with `n` bonded observers on the roster and the local chain params.
fn harness(n: usize) -> Harness {
    let store = Arc::new(NullStore::new());
    let staking = Arc::new(NullStaking::new());
    let slashing = Arc::new(NullSlashing::new());
    let authority = Arc::new(NullAuthority::new());
    let light_client = Arc::new(NullLightClient::new());
    let mut keeper = RelayerKeeper::new(
        store.clone(),
        staking.clone(),
        slashing.clone(),
        authority.clone(),
        light_client.clone(),
    );
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();
    keeper.subscribe(Box::new(move |e| sink.lock().unwrap().push(e.clone())));

    keeper.set_params(&Params::default()).unwrap();
    keeper
        .set_chain_params_list(&ChainParamsList::default_localnet())
        .unwrap();
    let observers: Vec<Address> = (0..n).map(observer).collect();
    keeper.set_observer_set(&observers).unwrap();
    keeper
        .set_last_observer_count(&LastObserverCount {
            count: n as u64,
            last_change_height: 1,
        })
        .unwrap();
    for o in &observers {
        staking.add_bonded_validator(o, STAKE);
    }
    authority.grant_all(&admin());

    Harness {
        keeper,
        store,
        staking,
        slashing,
        authority,
        light_client,
        events,
        observers,
    }
}

fn inbound(signer: &Address, hash: &str) -> MsgVoteOnInbound {
    MsgVoteOnInbound {
        signer: signer.clone(),
        sender: "0xsender".into(),
        sender_chain_id: LOCAL,
        tx_origin: "0xorigin".into(),
        receiver: "pell1receiver".into(),
        receiver_chain_id: PELL_PRIVNET.id,
        in_tx_hash: hash.into(),
        in_block_height: 1_000,
        event_index: 0,
        gas_limit: 250_000,
        payload: vec![1, 2, 3],
    }
}

fn outbound(signer: &Address, nonce: u64, status: ReceiveStatus) -> MsgVoteOnOutbound {
    MsgVoteOnOutbound {
        signer: signer.clone(),
        message_index: "0xmessage".into(),
        outbound_hash: "0xoutbound".into(),
        observed_block_height: 2_000,
        gas_used: 21_000,
        chain_id: LOCAL,
        nonce,
        status,
    }
}

fn add_node_account(h: &Harness, operator: &Address) {
    h.keeper
        .add_observer(
            &MsgAddObserver {
                signer: admin(),
                observer_address: operator.clone(),
                grantee_address: Address::new(format!("{operator}-grantee")),
                grantee_pubkey: format!("{operator}-pubkey"),
                add_node_account_only: true,
            },
            5,
        )
        .unwrap();
}

fn vote_tss(
    h: &Harness,
    signer: &Address,
    pubkey: &str,
    keygen_height: u64,
    height: u64,
) -> VoteTssResult {
    h.keeper
        .vote_tss(
            &MsgVoteTss {
                signer: signer.clone(),
                tss_pubkey: pubkey.into(),
                keygen_height,
                status: ReceiveStatus::Success,
            },
            height,
        )
        .unwrap()
}

/// Three node accounts and a scheduled keygen.
fn keygen_harness() -> Harness {
    let h = harness(3);
    for o in h.observers.clone() {
        add_node_account(&h, &o);
    }
    h.keeper
        .update_keygen(&MsgUpdateKeygen { signer: admin(), block: 20 }, 10)
        .unwrap();
    h
}

fn seed_tss(h: &Harness, pubkey: &str) {
    h.keeper
        .set_tss_and_update_nonce(&Tss {
            tss_pubkey: pubkey.into(),
            participant_list: vec![],
            operator_address_list: vec![],
            finalized_height: 1,
            keygen_height: 1,
        })
        .unwrap();
}

// ---------------------------------------------------------------------------
// 1. Ballot finalization
// ---------------------------------------------------------------------------

#[test]
fn failure_threshold_finalizes_on_eighth_of_twelve() {
    let h = harness(12);
    for i in 0..7 {
        let r = h
            .keeper
            .vote_on_outbound(&outbound(&observer(i), 3, ReceiveStatus::Failed), 10)
            .unwrap();
        assert!(!r.is_finalized);
        assert_eq!(r.is_new, i == 0);
    }
    let r = h
        .keeper
        .vote_on_outbound(&outbound(&observer(7), 3, ReceiveStatus::Failed), 10)
        .unwrap();
    assert!(r.is_finalized);
    assert_eq!(r.ballot.status, BallotStatus::FinalizedFailure);
    assert_eq!(r.observation_chain, "eth-privnet-1337");

    // Later votes are recorded but never change the outcome.
    for i in 8..12 {
        let r = h
            .keeper
            .vote_on_outbound(&outbound(&observer(i), 3, ReceiveStatus::Success), 11)
            .unwrap();
        assert!(!r.is_finalized);
        assert_eq!(r.ballot.status, BallotStatus::FinalizedFailure);
    }
    let ballot = h.keeper.get_ballot(&r.ballot.id).unwrap().unwrap();
    assert_eq!(ballot.votes().len(), ballot.voter_list().len());
    assert!(ballot.voter_list().iter().all(|v| ballot.has_voted(v)));
}

#[test]
fn three_of_four_inbound_votes_finalize() {
    let h = harness(4);
    let hash = "0xinbound";
    assert!(h.keeper.vote_on_inbound(&inbound(&observer(0), hash), 10).unwrap().is_new);
    assert!(!h.keeper.vote_on_inbound(&inbound(&observer(1), hash), 10).unwrap().is_finalized);
    let third = h.keeper.vote_on_inbound(&inbound(&observer(2), hash), 10).unwrap();
    assert!(third.is_finalized);
    assert!(!third.is_new);
    let fourth = h.keeper.vote_on_inbound(&inbound(&observer(3), hash), 10).unwrap();
    assert!(!fourth.is_finalized);

    let index = inbound(&observer(0), hash).digest().unwrap();
    let ballot = h.keeper.get_ballot(&index).unwrap().unwrap();
    assert_eq!(ballot.status, BallotStatus::FinalizedSuccess);
    assert_eq!(ballot.kind, ObservationKind::InboundTx);

    let events = h.events();
    let created: Vec<_> = events
        .iter()
        .filter(|e| matches!(e, RelayerEvent::BallotCreated { .. }))
        .collect();
    assert_eq!(created.len(), 1);
    assert!(matches!(
        created[0],
        RelayerEvent::BallotCreated { source: "vote_inbound", observation_hash, .. }
            if observation_hash == hash
    ));
    let finalized = events
        .iter()
        .filter(|e| matches!(e, RelayerEvent::BallotFinalized { .. }))
        .count();
    assert_eq!(finalized, 1);
}

#[test]
fn signer_does_not_change_ballot_index() {
    let a = inbound(&observer(0), "0xsame").digest().unwrap();
    let b = inbound(&observer(1), "0xsame").digest().unwrap();
    let c = inbound(&observer(0), "0xother").digest().unwrap();
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn find_or_create_is_idempotent() {
    let h = harness(4);
    let (first, is_new) = h
        .keeper
        .find_or_create_ballot("ballot-1", &GOERLI_LOCALNET, ObservationKind::InboundTx, 10)
        .unwrap();
    assert!(is_new);
    let (second, is_new) = h
        .keeper
        .find_or_create_ballot("ballot-1", &GOERLI_LOCALNET, ObservationKind::InboundTx, 11)
        .unwrap();
    assert!(!is_new);
    assert_eq!(first, second);
    assert_eq!(second.creation_height, 10);
    assert_eq!(h.keeper.matured_ballot_ids(110, 100).unwrap(), vec!["ballot-1"]);
    assert!(h.keeper.matured_ballot_ids(50, 100).unwrap().is_empty());
}

#[test]
fn duplicate_vote_is_rejected() {
    let h = harness(4);
    h.keeper.vote_on_inbound(&inbound(&observer(0), "0xdup"), 10).unwrap();
    let err = h
        .keeper
        .vote_on_inbound(&inbound(&observer(0), "0xdup"), 10)
        .unwrap_err();
    assert!(matches!(
        err,
        ObserverError::UnableToAddVote(VoteError::AlreadyVoted { .. })
    ));
}

#[test]
fn late_joiner_cannot_vote_on_existing_ballot() {
    let h = harness(4);
    h.keeper
        .vote_on_outbound(&outbound(&observer(0), 1, ReceiveStatus::Success), 10)
        .unwrap();

    let late = observer(9);
    h.staking.add_bonded_validator(&late, STAKE);
    h.keeper
        .add_observer(
            &MsgAddObserver {
                signer: admin(),
                observer_address: late.clone(),
                grantee_address: Address::new("pell1grantee"),
                grantee_pubkey: "pubkey".into(),
                add_node_account_only: false,
            },
            11,
        )
        .unwrap();
    assert!(h.keeper.is_eligible_observer(&late).unwrap());

    let err = h
        .keeper
        .vote_on_outbound(&outbound(&late, 1, ReceiveStatus::Success), 12)
        .unwrap_err();
    assert!(matches!(
        err,
        ObserverError::UnableToAddVote(VoteError::NotInVoterList { .. })
    ));
}

#[test]
fn matured_rewards_credit_matching_voters() {
    let h = harness(4);
    for i in 0..3 {
        h.keeper.vote_on_inbound(&inbound(&observer(i), "0xreward"), 10).unwrap();
    }
    let (rewards, total) = h.keeper.matured_rewards_distribution(110).unwrap();
    assert_eq!(total, 3);
    assert_eq!(rewards[&observer(0)], 1);
    assert_eq!(rewards[&observer(3)], -1);

    let (rewards, total) = h.keeper.matured_rewards_distribution(111).unwrap();
    assert!(rewards.is_empty());
    assert_eq!(total, 0);
}

// ---------------------------------------------------------------------------
// 2. Voting preconditions
// ---------------------------------------------------------------------------

#[test]
fn unsupported_chain_is_rejected() {
    let h = harness(4);
    let mut msg = inbound(&observer(0), "0xeth");
    msg.sender_chain_id = 1;
    let err = h.keeper.vote_on_inbound(&msg, 10).unwrap_err();
    assert!(matches!(err, ObserverError::UnsupportedChain(1)));

    let mut msg = inbound(&observer(0), "0xeth");
    msg.receiver_chain_id = 56;
    let err = h.keeper.vote_on_inbound(&msg, 10).unwrap_err();
    assert!(matches!(err, ObserverError::UnsupportedChain(56)));
}

#[test]
fn unsupported_flag_blocks_voting() {
    let h = harness(4);
    let mut params = default_goerli_localnet_chain_params();
    params.is_supported = false;
    h.keeper
        .upsert_chain_params(&MsgUpsertChainParams {
            signer: admin(),
            chain_params: params,
        })
        .unwrap();
    let err = h
        .keeper
        .vote_on_outbound(&outbound(&observer(0), 1, ReceiveStatus::Success), 10)
        .unwrap_err();
    assert!(matches!(err, ObserverError::UnsupportedChain(LOCAL)));
}

#[test]
fn ineligible_voters_are_rejected() {
    let h = harness(4);
    let stranger = Address::new("pell1stranger");
    h.staking.add_bonded_validator(&stranger, STAKE);
    let err = h
        .keeper
        .vote_on_inbound(&inbound(&stranger, "0xa"), 10)
        .unwrap_err();
    assert!(matches!(err, ObserverError::NotAuthorizedVoter(_)));

    h.slashing.tombstone(&observer(1));
    let err = h
        .keeper
        .vote_on_inbound(&inbound(&observer(1), "0xa"), 10)
        .unwrap_err();
    assert!(matches!(err, ObserverError::NotAuthorizedVoter(_)));
}

#[test]
fn created_status_is_not_a_vote() {
    let h = harness(4);
    let err = h
        .keeper
        .vote_on_outbound(&outbound(&observer(0), 1, ReceiveStatus::Created), 10)
        .unwrap_err();
    assert!(matches!(err, ObserverError::InvalidOutcome(_)));
    assert!(h.keeper.get_all_ballots().unwrap().is_empty());
}

#[test]
fn disabled_inbound_blocks_inbound_votes_only() {
    let h = harness(4);
    h.keeper
        .upsert_crosschain_flags(&MsgUpsertCrosschainFlags {
            signer: admin(),
            is_inbound_enabled: false,
            is_outbound_enabled: true,
        })
        .unwrap();

    let err = h
        .keeper
        .vote_on_inbound(&inbound(&observer(0), "0xa"), 10)
        .unwrap_err();
    assert!(matches!(err, ObserverError::InboundDisabled));
    let block = MsgVoteInboundBlock {
        signer: observer(0),
        chain_id: LOCAL,
        block_hash: "0xblock".into(),
        block_height: 77,
    };
    assert!(matches!(
        h.keeper.vote_on_inbound_block(&block, 10).unwrap_err(),
        ObserverError::InboundDisabled
    ));
    h.keeper
        .vote_on_outbound(&outbound(&observer(0), 1, ReceiveStatus::Success), 10)
        .unwrap();

    assert!(h.events().iter().any(|e| matches!(
        e,
        RelayerEvent::CrosschainFlagsUpdated {
            is_inbound_enabled: false,
            is_outbound_enabled: true,
            ..
        }
    )));
}

// ---------------------------------------------------------------------------
// 3. Other observation kinds
// ---------------------------------------------------------------------------

#[test]
fn inbound_block_votes_finalize() {
    let h = harness(4);
    let msg = |i| MsgVoteInboundBlock {
        signer: observer(i),
        chain_id: LOCAL,
        block_hash: "0xblock".into(),
        block_height: 77,
    };
    assert!(!h.keeper.vote_on_inbound_block(&msg(0), 10).unwrap().is_finalized);
    assert!(!h.keeper.vote_on_inbound_block(&msg(1), 10).unwrap().is_finalized);
    assert!(h.keeper.vote_on_inbound_block(&msg(2), 10).unwrap().is_finalized);
}

#[test]
fn block_header_is_added_once_finalized() {
    let h = harness(4);
    let header: Vec<u8> = (0u8..64).collect();
    let msg = |i| MsgVoteBlockHeader {
        signer: observer(i),
        chain_id: LOCAL,
        block_hash: vec![0xab; 32],
        height: 500,
        header: header.clone(),
    };
    h.keeper.vote_block_header(&msg(0), 10).unwrap();
    h.keeper.vote_block_header(&msg(1), 10).unwrap();
    assert!(h.light_client.added_headers().is_empty());
    assert!(h.keeper.vote_block_header(&msg(2), 10).unwrap().is_finalized);
    h.keeper.vote_block_header(&msg(3), 10).unwrap();

    let added = h.light_client.added_headers();
    assert_eq!(added.len(), 1);
    assert_eq!(added[0].height, 500);
    assert_eq!(added[0].parent_hash, header[..32].to_vec());
}

#[test]
fn rejected_header_records_no_vote() {
    let h = harness(4);
    h.light_client.reject_headers(true);
    let msg = MsgVoteBlockHeader {
        signer: observer(0),
        chain_id: LOCAL,
        block_hash: vec![1; 32],
        height: 500,
        header: vec![2; 64],
    };
    let err = h.keeper.vote_block_header(&msg, 10).unwrap_err();
    assert!(matches!(err, ObserverError::InvalidBlockHeader(_)));
    assert!(h.keeper.get_all_ballots().unwrap().is_empty());
}

#[test]
fn gas_recharge_uses_counter_index() {
    let h = harness(4);
    let msg = |i| MsgVoteGasRecharge {
        signer: observer(i),
        chain_id: LOCAL,
        vote_index: 7,
    };
    for i in 0..2 {
        assert!(!h.keeper.vote_on_gas_recharge(&msg(i), 10).unwrap().is_finalized);
    }
    assert!(h.keeper.vote_on_gas_recharge(&msg(2), 10).unwrap().is_finalized);
    let ballot = h.keeper.get_ballot("AddGasTokenBallot-7").unwrap().unwrap();
    assert_eq!(ballot.kind, ObservationKind::GasTokenRecharge);
}

#[test]
fn blame_is_stored_on_finalization() {
    let h = harness(4);
    let index = blame_index(LOCAL, 12, "digest", 300);
    let blame = BlameRecord {
        index: index.clone(),
        failure_reason: "party timeout".into(),
        nodes: vec![BlameNode {
            pubkey: "pk-bad".into(),
            blame_data: vec![9],
            blame_signature: vec![8],
        }],
    };
    let msg = |i| MsgAddBlameVote {
        signer: observer(i),
        chain_id: LOCAL,
        blame: blame.clone(),
    };
    h.keeper.add_blame_vote(&msg(0), 10).unwrap();
    h.keeper.add_blame_vote(&msg(1), 10).unwrap();
    assert!(h.keeper.get_blame(&index).unwrap().is_none());
    assert!(h.keeper.add_blame_vote(&msg(2), 10).unwrap().is_finalized);

    assert_eq!(h.keeper.get_blame(&index).unwrap(), Some(blame.clone()));
    assert_eq!(h.keeper.get_blames_by_chain_and_nonce(LOCAL, 12).unwrap(), vec![blame.clone()]);
    assert!(h.keeper.get_blames_by_chain_and_nonce(LOCAL, 1).unwrap().is_empty());
    assert_eq!(h.keeper.get_all_blame().unwrap().len(), 1);

    let ballot = h.keeper.get_ballot(&msg(0).digest().unwrap()).unwrap().unwrap();
    assert_eq!(ballot.kind, ObservationKind::TssKeysign);
}

// ---------------------------------------------------------------------------
// 4. Keygen and signing keys
// ---------------------------------------------------------------------------

#[test]
fn keygen_needs_every_node_account() {
    let h = keygen_harness();
    let first = vote_tss(&h, &observer(0), "pk-one", 20, 25);
    assert!(first.is_new);
    assert!(!vote_tss(&h, &observer(1), "pk-one", 20, 25).is_finalized);

    let ballot = h.keeper.get_ballot("20-tss-keygen").unwrap().unwrap();
    assert_eq!(ballot.status, BallotStatus::InProgress);
    assert_eq!(ballot.kind, ObservationKind::TssKeygen);
    assert!(h.keeper.get_tss().unwrap().is_none());

    let last = vote_tss(&h, &observer(2), "pk-one", 20, 26);
    assert!(last.is_finalized);
    assert!(last.keygen_success);

    let tss = h.keeper.get_tss().unwrap().unwrap();
    assert_eq!(tss.tss_pubkey, "pk-one");
    assert_eq!(tss.finalized_height, 26);
    assert_eq!(tss.keygen_height, 20);
    assert_eq!(tss.operator_address_list, h.observers);
    assert_eq!(tss.participant_list.len(), 3);
    assert_eq!(h.keeper.get_tss_history().unwrap(), vec![tss.clone()]);
    assert_eq!(h.keeper.get_tss_by_finalized_height(26).unwrap(), Some(tss));

    let keygen = h.keeper.get_keygen().unwrap().unwrap();
    assert_eq!(keygen.status, KeygenStatus::Success);
    assert_eq!(keygen.block_number, 26);

    // The first key seeds nonces on every supported chain.
    assert_eq!(
        h.keeper.get_chain_nonces(LOCAL).unwrap(),
        Some(ChainNonces { chain_id: LOCAL, nonce: 0 })
    );
    let pending = h.keeper.get_pending_nonces("pk-one", PELL_PRIVNET.id).unwrap().unwrap();
    assert_eq!((pending.nonce_low, pending.nonce_high), (0, 0));

    let err = h
        .keeper
        .vote_tss(
            &MsgVoteTss {
                signer: observer(0),
                tss_pubkey: "pk-one".into(),
                keygen_height: 20,
                status: ReceiveStatus::Success,
            },
            27,
        )
        .unwrap_err();
    assert!(matches!(err, ObserverError::KeygenAlreadyCompleted));
}

#[test]
fn unanimous_failure_disables_keygen() {
    let h = keygen_harness();
    let mut last = None;
    for o in h.observers.clone() {
        last = Some(
            h.keeper
                .vote_tss(
                    &MsgVoteTss {
                        signer: o,
                        tss_pubkey: String::new(),
                        keygen_height: 20,
                        status: ReceiveStatus::Failed,
                    },
                    25,
                )
                .unwrap(),
        );
    }
    let last = last.unwrap();
    assert!(last.is_finalized);
    assert!(!last.keygen_success);

    let keygen = h.keeper.get_keygen().unwrap().unwrap();
    assert_eq!(keygen.status, KeygenStatus::Failed);
    assert_eq!(keygen.block_number, KEYGEN_BLOCK_DISABLED);
    assert!(h.keeper.get_tss().unwrap().is_none());
}

#[test]
fn keygen_vote_preconditions() {
    let h = harness(3);
    let msg = MsgVoteTss {
        signer: observer(0),
        tss_pubkey: "pk".into(),
        keygen_height: 20,
        status: ReceiveStatus::Success,
    };
    // No node account yet.
    assert!(matches!(
        h.keeper.vote_tss(&msg, 25).unwrap_err(),
        ObserverError::NotAuthorizedVoter(_)
    ));

    // A node account without any keygen record.
    h.store
        .put_node_account(&NodeAccount {
            operator: observer(0),
            grantee_address: Address::new("pell1grantee"),
            grantee_pubkey: "pk".into(),
            status: NodeStatus::Active,
        })
        .unwrap();
    assert!(matches!(
        h.keeper.vote_tss(&msg, 25).unwrap_err(),
        ObserverError::KeygenNotFound
    ));
}

#[test]
fn later_keygen_goes_to_history_until_promoted() {
    let h = keygen_harness();
    for o in h.observers.clone() {
        vote_tss(&h, &o, "pk-one", 20, 26);
    }
    h.keeper.assign_outbound_nonce(LOCAL, "0xfirst").unwrap();

    h.keeper
        .update_keygen(&MsgUpdateKeygen { signer: admin(), block: 60 }, 40)
        .unwrap();
    for o in h.observers.clone() {
        vote_tss(&h, &o, "pk-two", 60, 61);
    }
    assert_eq!(h.keeper.get_tss().unwrap().unwrap().tss_pubkey, "pk-one");
    assert_eq!(h.keeper.get_tss_history().unwrap().len(), 2);
    assert_eq!(h.keeper.get_chain_nonces(LOCAL).unwrap().unwrap().nonce, 1);

    let err = h
        .keeper
        .update_tss(&MsgUpdateTss { signer: admin(), tss_pubkey: "pk-one".into() })
        .unwrap_err();
    assert!(matches!(err, ObserverError::UnableToUpdateTss(_)));
    let err = h
        .keeper
        .update_tss(&MsgUpdateTss { signer: admin(), tss_pubkey: "pk-never".into() })
        .unwrap_err();
    assert!(matches!(err, ObserverError::UnableToUpdateTss(_)));

    h.keeper
        .update_tss(&MsgUpdateTss { signer: admin(), tss_pubkey: "pk-two".into() })
        .unwrap();
    assert_eq!(h.keeper.get_tss().unwrap().unwrap().tss_pubkey, "pk-two");
    assert_eq!(h.keeper.get_chain_nonces(LOCAL).unwrap().unwrap().nonce, 0);
    assert!(h.keeper.get_pending_nonces("pk-two", LOCAL).unwrap().is_some());
}

#[test]
fn update_tss_without_current_key_fails() {
    let h = harness(1);
    let err = h
        .keeper
        .update_tss(&MsgUpdateTss { signer: admin(), tss_pubkey: "pk".into() })
        .unwrap_err();
    assert!(matches!(err, ObserverError::UnableToUpdateTss(_)));
}

#[test]
fn update_keygen_rules() {
    let h = keygen_harness();
    let err = h
        .keeper
        .update_keygen(&MsgUpdateKeygen { signer: admin(), block: 105 }, 100)
        .unwrap_err();
    assert!(matches!(
        err,
        ObserverError::KeygenBlockTooLow { requested: 105, minimum: 110 }
    ));

    let operator = Address::new("pell1operator");
    h.authority.grant(&operator, PolicyType::Operational);
    let err = h
        .keeper
        .update_keygen(&MsgUpdateKeygen { signer: operator, block: 500 }, 100)
        .unwrap_err();
    assert!(matches!(
        err,
        ObserverError::Unauthorized { policy: PolicyType::Emergency, .. }
    ));

    h.keeper
        .update_keygen(&MsgUpdateKeygen { signer: admin(), block: 110 }, 100)
        .unwrap();
    let keygen = h.keeper.get_keygen().unwrap().unwrap();
    assert_eq!(keygen.status, KeygenStatus::Pending);
    assert_eq!(keygen.block_number, 110);
    assert_eq!(keygen.grantee_pubkeys.len(), 3);
    assert!(h.events().iter().any(|e| matches!(
        e,
        RelayerEvent::KeygenBlockUpdated { block_number: 110, .. }
    )));
}

// ---------------------------------------------------------------------------
// 5. Nonce sequencer
// ---------------------------------------------------------------------------

fn reset(low: u64, high: u64) -> MsgResetChainNonces {
    MsgResetChainNonces {
        signer: admin(),
        chain_id: LOCAL,
        nonce_low: low,
        nonce_high: high,
    }
}

#[test]
fn reset_overwrites_both_records() {
    let h = harness(1);
    seed_tss(&h, "pk");
    h.keeper.reset_chain_nonces(&reset(1, 5)).unwrap();
    assert_eq!(h.keeper.get_chain_nonces(LOCAL).unwrap().unwrap().nonce, 5);
    let pending = h.keeper.get_pending_nonces("pk", LOCAL).unwrap().unwrap();
    assert_eq!((pending.nonce_low, pending.nonce_high), (1, 5));

    h.keeper.reset_chain_nonces(&reset(0, 0)).unwrap();
    assert_eq!(h.keeper.get_chain_nonces(LOCAL).unwrap().unwrap().nonce, 0);
    let pending = h.keeper.get_pending_nonces("pk", LOCAL).unwrap().unwrap();
    assert_eq!((pending.nonce_low, pending.nonce_high), (0, 0));
}

#[test]
fn reset_preconditions() {
    let h = harness(1);
    assert!(matches!(
        h.keeper.reset_chain_nonces(&reset(0, 1)).unwrap_err(),
        ObserverError::TssNotFound
    ));
    seed_tss(&h, "pk");
    assert!(matches!(
        h.keeper.reset_chain_nonces(&reset(5, 1)).unwrap_err(),
        ObserverError::InvalidNonceRange { low: 5, high: 1 }
    ));
    let mut msg = reset(0, 1);
    msg.chain_id = 1;
    assert!(matches!(
        h.keeper.reset_chain_nonces(&msg).unwrap_err(),
        ObserverError::UnsupportedChain(1)
    ));
    msg = reset(0, 1);
    msg.signer = Address::new("pell1nobody");
    assert!(matches!(
        h.keeper.reset_chain_nonces(&msg).unwrap_err(),
        ObserverError::Unauthorized { .. }
    ));
}

#[test]
fn assign_and_complete_outbound_nonces() {
    let h = harness(1);
    seed_tss(&h, "pk");
    assert_eq!(h.keeper.assign_outbound_nonce(LOCAL, "0xa").unwrap(), 0);
    assert_eq!(h.keeper.assign_outbound_nonce(LOCAL, "0xb").unwrap(), 1);
    assert_eq!(h.keeper.get_chain_nonces(LOCAL).unwrap().unwrap().nonce, 2);
    let pending = h.keeper.get_pending_nonces("pk", LOCAL).unwrap().unwrap();
    assert_eq!((pending.nonce_low, pending.nonce_high), (0, 2));
    assert_eq!(
        h.keeper.get_nonce_to_message("pk", LOCAL, 1).unwrap().unwrap().message_index,
        "0xb"
    );

    h.keeper.complete_outbound("pk", LOCAL, 0).unwrap();
    let pending = h.keeper.get_pending_nonces("pk", LOCAL).unwrap().unwrap();
    assert_eq!((pending.nonce_low, pending.nonce_high), (1, 2));
    assert!(h.keeper.get_nonce_to_message("pk", LOCAL, 0).unwrap().is_none());

    // Outside the window: nothing moves.
    h.keeper.remove_from_pending_nonces("pk", LOCAL, 9).unwrap();
    let pending = h.keeper.get_pending_nonces("pk", LOCAL).unwrap().unwrap();
    assert_eq!(pending.nonce_low, 1);
}

#[test]
fn assign_detects_window_drift() {
    let h = harness(1);
    seed_tss(&h, "pk");
    h.store
        .put_chain_nonces(&ChainNonces { chain_id: LOCAL, nonce: 7 })
        .unwrap();
    let err = h.keeper.assign_outbound_nonce(LOCAL, "0xa").unwrap_err();
    assert!(matches!(
        err,
        ObserverError::NonceMismatch { pending_high: 0, chain_nonce: 7, .. }
    ));
}

#[test]
fn assign_without_tss_fails() {
    let h = harness(1);
    assert!(matches!(
        h.keeper.assign_outbound_nonce(LOCAL, "0xa").unwrap_err(),
        ObserverError::TssNotFound
    ));
}

// ---------------------------------------------------------------------------
// 6. Admin messages and roster
// ---------------------------------------------------------------------------

#[test]
fn chain_params_upsert_and_remove_validate() {
    let h = harness(1);
    let mut unknown = default_goerli_localnet_chain_params();
    unknown.chain_id = 999_999;
    let err = h
        .keeper
        .upsert_chain_params(&MsgUpsertChainParams { signer: admin(), chain_params: unknown })
        .unwrap_err();
    assert!(matches!(err, ObserverError::InvalidChainParams(_)));

    let mut bad = default_goerli_localnet_chain_params();
    bad.confirmation_count = 0;
    assert!(h
        .keeper
        .upsert_chain_params(&MsgUpsertChainParams { signer: admin(), chain_params: bad })
        .is_err());

    let mut dup = ChainParamsList::default_localnet();
    dup.chain_params.push(default_goerli_localnet_chain_params());
    assert!(matches!(
        h.keeper.set_chain_params_list(&dup).unwrap_err(),
        ObserverError::InvalidChainParams(_)
    ));

    h.keeper
        .remove_chain_params(&MsgRemoveChainParams { signer: admin(), chain_id: LOCAL })
        .unwrap();
    assert!(h.keeper.get_chain_params(LOCAL).unwrap().is_none());
    assert!(matches!(
        h.keeper
            .remove_chain_params(&MsgRemoveChainParams { signer: admin(), chain_id: LOCAL })
            .unwrap_err(),
        ObserverError::UnsupportedChain(LOCAL)
    ));
    assert_eq!(h.keeper.get_supported_chains().unwrap(), vec![PELL_PRIVNET]);
    assert!(h.keeper.get_supported_foreign_chains().unwrap().is_empty());
}

#[test]
fn flag_policy_depends_on_direction() {
    let h = harness(1);
    let emergency = Address::new("pell1emergency");
    h.authority.grant(&emergency, PolicyType::Emergency);
    let disable = MsgUpsertCrosschainFlags {
        signer: emergency.clone(),
        is_inbound_enabled: false,
        is_outbound_enabled: false,
    };
    h.keeper.upsert_crosschain_flags(&disable).unwrap();
    assert!(!h.keeper.is_outbound_enabled().unwrap());

    let enable = MsgUpsertCrosschainFlags {
        is_inbound_enabled: true,
        ..disable
    };
    assert!(matches!(
        h.keeper.upsert_crosschain_flags(&enable).unwrap_err(),
        ObserverError::Unauthorized { policy: PolicyType::Operational, .. }
    ));
}

#[test]
fn adding_observer_disables_inbound() {
    let h = harness(2);
    let new = observer(5);
    h.keeper
        .add_observer(
            &MsgAddObserver {
                signer: admin(),
                observer_address: new.clone(),
                grantee_address: Address::new("pell1grantee5"),
                grantee_pubkey: "pk5".into(),
                add_node_account_only: false,
            },
            40,
        )
        .unwrap();
    assert!(h.keeper.is_observer(&new).unwrap());
    assert!(!h.keeper.is_inbound_enabled().unwrap());
    assert!(h.keeper.is_outbound_enabled().unwrap());
    assert_eq!(
        h.keeper.get_last_observer_count().unwrap(),
        Some(LastObserverCount { count: 3, last_change_height: 40 })
    );
    assert!(h.events().iter().any(|e| matches!(
        e,
        RelayerEvent::ObserverAdded { observer_count: 3, .. }
    )));
}

#[test]
fn tombstoned_observer_moves_itself() {
    let h = harness(3);
    let old = observer(0);
    let new = Address::new("pell1fresh");
    add_node_account(&h, &old);
    h.staking.add_bonded_validator(&new, STAKE);
    h.slashing.tombstone(&old);

    h.keeper
        .update_observer(&MsgUpdateObserver {
            signer: old.clone(),
            old_observer_address: old.clone(),
            new_observer_address: new.clone(),
            update_reason: ObserverUpdateReason::Tombstoned,
        })
        .unwrap();
    let roster = h.keeper.get_observer_set().unwrap().unwrap();
    assert_eq!(roster[0], new);
    assert!(!roster.contains(&old));
    assert!(h.keeper.get_node_account(&old).unwrap().is_none());
    assert_eq!(h.keeper.get_node_account(&new).unwrap().unwrap().operator, new);
}

#[test]
fn update_observer_needs_consistent_counter() {
    let h = harness(3);
    add_node_account(&h, &observer(0));
    let new = Address::new("pell1fresh");
    h.staking.add_bonded_validator(&new, STAKE);
    h.store
        .put_last_observer_count(&LastObserverCount { count: 9, last_change_height: 1 })
        .unwrap();
    let msg = MsgUpdateObserver {
        signer: admin(),
        old_observer_address: observer(0),
        new_observer_address: new,
        update_reason: ObserverUpdateReason::AdminUpdate,
    };
    assert!(matches!(
        h.keeper.update_observer(&msg).unwrap_err(),
        ObserverError::UpdateObserver(_)
    ));
}

#[test]
fn update_observer_without_counter_is_a_consistency_error() {
    let store = Arc::new(NullStore::new());
    let staking = Arc::new(NullStaking::new());
    let authority = Arc::new(NullAuthority::new());
    let keeper = RelayerKeeper::new(
        store,
        staking.clone(),
        Arc::new(NullSlashing::new()),
        authority.clone(),
        Arc::new(NullLightClient::new()),
    );
    authority.grant_all(&admin());
    let new = Address::new("pell1fresh");
    staking.add_bonded_validator(&new, STAKE);
    keeper.set_observer_set(&[observer(0)]).unwrap();

    let err = keeper
        .update_observer(&MsgUpdateObserver {
            signer: admin(),
            old_observer_address: observer(0),
            new_observer_address: new,
            update_reason: ObserverUpdateReason::AdminUpdate,
        })
        .unwrap_err();
    assert!(matches!(err, ObserverError::RosterOrCounterMissing(_)));
}

#[test]
fn roster_change_disables_keygen_at_begin_block() {
    let h = keygen_harness();
    h.keeper.begin_block(30).unwrap();
    let keygen = h.keeper.get_keygen().unwrap().unwrap();
    assert_eq!(keygen.block_number, 20);

    h.keeper.after_validator_removed(&observer(1)).unwrap();
    h.keeper.begin_block(31).unwrap();
    let keygen = h.keeper.get_keygen().unwrap().unwrap();
    assert_eq!(keygen.block_number, KEYGEN_BLOCK_DISABLED);
    assert_eq!(
        h.keeper.get_last_observer_count().unwrap(),
        Some(LastObserverCount { count: 2, last_change_height: 31 })
    );
}

#[test]
fn evicted_observer_cannot_vote() {
    let h = harness(4);
    h.staking.remove_validator(&observer(2));
    assert!(h.keeper.check_observer_eligibility(&observer(2)).unwrap());
    let err = h
        .keeper
        .vote_on_inbound(&inbound(&observer(2), "0xa"), 10)
        .unwrap_err();
    assert!(matches!(err, ObserverError::NotAuthorizedVoter(_)));
}

// ---------------------------------------------------------------------------
// 7. Genesis
// ---------------------------------------------------------------------------

#[test]
fn genesis_round_trip_is_byte_identical() {
    let h = keygen_harness();
    h.keeper
        .upsert_crosschain_flags(&MsgUpsertCrosschainFlags {
            signer: admin(),
            is_inbound_enabled: true,
            is_outbound_enabled: true,
        })
        .unwrap();
    for o in h.observers.clone() {
        vote_tss(&h, &o, "pk-one", 20, 26);
    }
    h.keeper.vote_on_inbound(&inbound(&observer(0), "0xg"), 30).unwrap();
    h.keeper
        .vote_on_outbound(&outbound(&observer(1), 0, ReceiveStatus::Success), 31)
        .unwrap();
    h.keeper.assign_outbound_nonce(LOCAL, "0xmsg").unwrap();
    let blame = BlameRecord {
        index: blame_index(LOCAL, 0, "d", 31),
        failure_reason: "timeout".into(),
        nodes: vec![],
    };
    for i in 0..3 {
        h.keeper
            .add_blame_vote(
                &MsgAddBlameVote { signer: observer(i), chain_id: LOCAL, blame: blame.clone() },
                31,
            )
            .unwrap();
    }

    let exported = h.keeper.export_genesis().unwrap();
    assert!(exported.tss.is_some());
    assert_eq!(exported.blame.len(), 1);
    let bytes = bincode::serialize(&exported).unwrap();

    let fresh = RelayerKeeper::new(
        Arc::new(NullStore::new()),
        Arc::new(NullStaking::new()),
        Arc::new(NullSlashing::new()),
        Arc::new(NullAuthority::new()),
        Arc::new(NullLightClient::new()),
    );
    let decoded: GenesisState = bincode::deserialize(&bytes).unwrap();
    fresh.init_genesis(&decoded).unwrap();
    let again = bincode::serialize(&fresh.export_genesis().unwrap()).unwrap();
    assert_eq!(bytes, again);

    // The height index is rebuilt from creation heights.
    let matured = fresh.matured_ballot_ids(130, 100).unwrap();
    assert_eq!(matured, vec![inbound(&observer(0), "0xg").digest().unwrap()]);
}

#[test]
fn genesis_json_round_trip() {
    let h = harness(2);
    seed_tss(&h, "pk");
    let state = h.keeper.export_genesis().unwrap();
    let json = state.to_json().unwrap();
    assert_eq!(GenesisState::from_json(&json).unwrap(), state);
}

#[test]
fn genesis_rejects_duplicates() {
    let h = harness(2);
    h.keeper.vote_on_inbound(&inbound(&observer(0), "0xd"), 10).unwrap();
    let mut state = h.keeper.export_genesis().unwrap();
    let ballot = state.ballots[0].clone();
    state.ballots.push(ballot);
    assert!(matches!(state.validate(), Err(ObserverError::Genesis(_))));
}

#[test]
fn genesis_with_threshold_above_one_does_not_load() {
    let h = harness(3);
    let json = h.keeper.export_genesis().unwrap().to_json().unwrap();
    assert!(json.contains(r#""ballot_threshold": "0.6600""#));
    let tampered = json.replacen(
        r#""ballot_threshold": "0.6600""#,
        r#""ballot_threshold": "2.0""#,
        1,
    );
    assert!(matches!(
        GenesisState::from_json(&tampered),
        Err(ObserverError::Genesis(_))
    ));
}

// ---------------------------------------------------------------------------
// 8. Message validation
// ---------------------------------------------------------------------------

#[test]
fn inbound_vote_without_tx_hash_is_rejected() {
    let h = harness(4);
    let err = h.keeper.vote_on_inbound(&inbound(&observer(0), ""), 10).unwrap_err();
    assert!(matches!(err, ObserverError::InvalidMessage(_)));
    assert!(h.keeper.get_all_ballots().unwrap().is_empty());
}

#[test]
fn inbound_block_vote_without_hash_is_rejected() {
    let h = harness(4);
    let msg = MsgVoteInboundBlock {
        signer: observer(0),
        chain_id: LOCAL,
        block_hash: String::new(),
        block_height: 77,
    };
    assert!(matches!(
        h.keeper.vote_on_inbound_block(&msg, 10).unwrap_err(),
        ObserverError::InvalidMessage(_)
    ));
}

#[test]
fn short_block_header_hash_is_rejected() {
    let h = harness(4);
    let msg = MsgVoteBlockHeader {
        signer: observer(0),
        chain_id: LOCAL,
        block_hash: vec![1, 2, 3],
        height: 500,
        header: vec![2; 64],
    };
    assert!(matches!(
        h.keeper.vote_block_header(&msg, 10).unwrap_err(),
        ObserverError::InvalidMessage(_)
    ));
    assert!(h.light_client.added_headers().is_empty());
}

#[test]
fn keygen_vote_with_created_status_is_rejected() {
    let h = keygen_harness();
    let msg = MsgVoteTss {
        signer: observer(0),
        tss_pubkey: "pk-one".into(),
        keygen_height: 20,
        status: ReceiveStatus::Created,
    };
    assert!(matches!(
        h.keeper.vote_tss(&msg, 25).unwrap_err(),
        ObserverError::InvalidOutcome(_)
    ));
    assert!(h.keeper.get_ballot(&msg.digest()).unwrap().is_none());
}

#[test]
fn blame_vote_without_index_is_rejected() {
    let h = harness(4);
    let msg = |i| MsgAddBlameVote {
        signer: observer(i),
        chain_id: LOCAL,
        blame: BlameRecord {
            index: String::new(),
            failure_reason: "party timeout".into(),
            nodes: Vec::new(),
        },
    };
    for i in 0..3 {
        assert!(matches!(
            h.keeper.add_blame_vote(&msg(i), 10).unwrap_err(),
            ObserverError::InvalidMessage(_)
        ));
    }
    assert!(h.keeper.get_all_blame().unwrap().is_empty());
    assert!(h.keeper.get_blame("").unwrap().is_none());
}

#[test]
fn tombstone_update_signed_by_someone_else_is_rejected() {
    let h = harness(3);
    let old = observer(0);
    let new = Address::new("pell1fresh");
    add_node_account(&h, &old);
    h.staking.add_bonded_validator(&new, STAKE);
    h.slashing.tombstone(&old);

    let err = h
        .keeper
        .update_observer(&MsgUpdateObserver {
            signer: observer(1),
            old_observer_address: old.clone(),
            new_observer_address: new,
            update_reason: ObserverUpdateReason::Tombstoned,
        })
        .unwrap_err();
    assert!(matches!(err, ObserverError::InvalidMessage(_)));
    assert!(h.keeper.get_observer_set().unwrap().unwrap().contains(&old));
}

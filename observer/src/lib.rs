//! Observer relay keeper.
//!
//! Turns independent observer reports about external chains into finalized
//! facts through threshold-voting ballots. The same ballots decide keygen
//! ceremonies and blame attestations, and their outcomes drive the outbound
//! nonce sequencer.

pub mod ballot;
pub mod blame;
pub mod chain_params;
pub mod config;
pub mod error;
pub mod events;
pub mod flags;
pub mod genesis;
pub mod hooks;
pub mod keeper;
pub mod msgs;
pub mod nonces;
pub mod observer_set;
pub mod tss;
pub mod vote;

pub use config::RelayerConfig;
pub use error::ObserverError;
pub use events::{EventBus, RelayerEvent};
pub use genesis::GenesisState;
pub use hooks::StakingHooks;
pub use keeper::RelayerKeeper;
pub use msgs::{
    MsgAddBlameVote, MsgAddObserver, MsgRemoveChainParams, MsgResetChainNonces,
    MsgUpdateKeygen, MsgUpdateObserver, MsgUpdateTss, MsgUpsertChainParams,
    MsgUpsertCrosschainFlags, MsgVoteBlockHeader, MsgVoteGasRecharge, MsgVoteInboundBlock,
    MsgVoteOnInbound, MsgVoteOnOutbound, MsgVoteTss, ObserverUpdateReason, ReceiveStatus,
};
pub use tss::VoteTssResult;
pub use vote::{OutboundVoteResult, VoteResult};

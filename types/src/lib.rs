//! Records and primitives for the observer relay module.
//!
//! This crate defines the types shared across the workspace: addresses, the
//! known-chain registry, ballot thresholds, the ballot itself, every persisted
//! record, and the capability traits of the host ledger's collaborators.

pub mod address;
pub mod ballot;
pub mod blame;
pub mod chain;
pub mod chain_params;
pub mod error;
pub mod external;
pub mod node_account;
pub mod nonces;
pub mod params;
pub mod threshold;
pub mod tss;

pub use address::Address;
pub use ballot::{
    Ballot, BallotListForHeight, BallotStatus, ObservationKind, VoteError, VoteOutcome, VoteSlot,
};
pub use blame::{blame_index, blame_prefix, BlameNode, BlameRecord};
pub use chain::{chain_by_id, chains_list, Chain, ChainId, Network, NetworkType};
pub use chain_params::{ChainParams, ChainParamsList};
pub use error::TypesError;
pub use external::{
    AuthorityProvider, Delegation, HeaderError, LightClient, PolicyType, SlashingProvider,
    StakingProvider, Validator,
};
pub use node_account::{NodeAccount, NodeStatus};
pub use nonces::{nonce_to_message_key, ChainNonces, NonceToMessage, PendingNonces};
pub use params::{CrosschainFlags, LastObserverCount, Params};
pub use threshold::Threshold;
pub use tss::{Keygen, KeygenStatus, Tss};

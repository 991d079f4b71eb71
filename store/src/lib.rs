//! Abstract storage traits for the observer relay module.
//!
//! The host ledger's key-value store implements these traits, one per
//! namespace. The keeper depends only on the traits; atomicity of a whole
//! state transition is the host's responsibility.

pub mod ballot;
pub mod blame;
pub mod chain_params;
pub mod error;
pub mod meta;
pub mod node_account;
pub mod nonce;
pub mod observer;
pub mod tss;

pub use ballot::BallotStore;
pub use blame::BlameStore;
pub use chain_params::ChainParamsStore;
pub use error::StoreError;
pub use meta::MetaStore;
pub use node_account::NodeAccountStore;
pub use nonce::NonceStore;
pub use observer::ObserverStore;
pub use tss::TssStore;

/// Every namespace the keeper touches, as a single object-safe bound.
pub trait RelayerStore:
    BallotStore
    + BlameStore
    + ChainParamsStore
    + MetaStore
    + NodeAccountStore
    + NonceStore
    + ObserverStore
    + TssStore
{
}

impl<T> RelayerStore for T where
    T: BallotStore
        + BlameStore
        + ChainParamsStore
        + MetaStore
        + NodeAccountStore
        + NonceStore
        + ObserverStore
        + TssStore
{
}

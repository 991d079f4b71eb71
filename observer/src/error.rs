use relay_types::{Address, ChainId, PolicyType, TypesError, VoteError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ObserverError {
    #[error("chain {0} is not supported")]
    UnsupportedChain(ChainId),

    #[error("{0} is not an authorized voter")]
    NotAuthorizedVoter(Address),

    #[error("unable to add vote: {0}")]
    UnableToAddVote(#[from] VoteError),

    #[error("keygen not found")]
    KeygenNotFound,

    #[error("keygen already completed")]
    KeygenAlreadyCompleted,

    #[error("invalid vote outcome: {0}")]
    InvalidOutcome(String),

    /// A bookkeeping record that must exist after initialisation is gone.
    #[error("observer roster or counter missing: {0}")]
    RosterOrCounterMissing(String),

    #[error("{signer} lacks the {policy:?} policy")]
    Unauthorized { signer: Address, policy: PolicyType },

    #[error("inbound processing is disabled")]
    InboundDisabled,

    #[error("invalid chain params: {0}")]
    InvalidChainParams(#[source] TypesError),

    #[error("invalid nonce range: low {low}, high {high}")]
    InvalidNonceRange { low: u64, high: u64 },

    #[error("tss not found")]
    TssNotFound,

    #[error("unable to update tss: {0}")]
    UnableToUpdateTss(String),

    #[error("node account not found: {0}")]
    NodeAccountNotFound(Address),

    #[error("keygen block {requested} must be at least {minimum}")]
    KeygenBlockTooLow { requested: u64, minimum: u64 },

    #[error("unable to update observer: {0}")]
    UpdateObserver(String),

    #[error("invalid block header: {0}")]
    InvalidBlockHeader(String),

    #[error("{0} is not a validator")]
    NotValidator(Address),

    #[error("nonce mismatch on chain {chain_id}: pending {pending_high}, chain {chain_nonce}")]
    NonceMismatch {
        chain_id: ChainId,
        pending_high: u64,
        chain_nonce: u64,
    },

    #[error("invalid message: {0}")]
    InvalidMessage(String),

    #[error("store error: {0}")]
    Store(#[from] relay_store::StoreError),

    #[error("config error: {0}")]
    Config(String),

    #[error("genesis error: {0}")]
    Genesis(String),
}

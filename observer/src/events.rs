//! Events emitted on ballot creation, finalization and admin actions.

use relay_types::{Address, BallotStatus, ChainId, ObservationKind};

/// Module-level events that downstream indexers can subscribe to via the [`EventBus`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RelayerEvent {
    /// The first vote for an observation opened a new ballot.
    BallotCreated {
        ballot_id: String,
        kind: ObservationKind,
        /// Hash of the observed transaction or block on the source chain.
        observation_hash: String,
        observation_chain: String,
        /// Which entry point opened the ballot.
        source: &'static str,
    },
    /// A ballot left `InProgress`.
    BallotFinalized {
        ballot_id: String,
        status: BallotStatus,
    },
    KeygenBlockUpdated {
        block_number: u64,
        grantee_pubkeys: Vec<String>,
    },
    ObserverAdded {
        observer: Address,
        observer_count: u64,
    },
    CrosschainFlagsUpdated {
        is_inbound_enabled: bool,
        is_outbound_enabled: bool,
        signer: Address,
    },
    /// Informational: the per-chain nonce window was reset by an admin.
    ChainNoncesReset {
        chain_id: ChainId,
        nonce_low: u64,
        nonce_high: u64,
    },
}

/// Synchronous fan-out event bus for relayer events.
///
/// Listeners are invoked inline on the emitting thread; keep handlers fast to
/// avoid stalling vote processing.
pub struct EventBus {
    listeners: Vec<Box<dyn Fn(&RelayerEvent) + Send + Sync>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: Box<dyn Fn(&RelayerEvent) + Send + Sync>) {
        self.listeners.push(listener);
    }

    pub fn emit(&self, event: &RelayerEvent) {
        for listener in &self.listeners {
            listener(event);
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

//! Registry of the external chains this module knows how to observe.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Numeric chain id (EIP-155 style).
pub type ChainId = i64;

/// The network family a chain belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Network {
    Pell,
    Eth,
    Bsc,
    Polygon,
    Base,
    Mantle,
    Core,
    Arbitrum,
}

/// Deployment tier of a chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NetworkType {
    Mainnet,
    Testnet,
    Privnet,
    Devnet,
}

impl Network {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pell => "pell",
            Self::Eth => "eth",
            Self::Bsc => "bsc",
            Self::Polygon => "polygon",
            Self::Base => "base",
            Self::Mantle => "mantle",
            Self::Core => "core",
            Self::Arbitrum => "arbitrum",
        }
    }
}

impl NetworkType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mainnet => "mainnet",
            Self::Testnet => "testnet",
            Self::Privnet => "privnet",
            Self::Devnet => "devnet",
        }
    }
}

/// A known chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Chain {
    pub id: ChainId,
    pub network: Network,
    pub network_type: NetworkType,
}

impl Chain {
    const fn new(id: ChainId, network: Network, network_type: NetworkType) -> Self {
        Self {
            id,
            network,
            network_type,
        }
    }

    /// Stable name used in events and logs, e.g. `eth-mainnet-1`.
    pub fn name(&self) -> String {
        format!(
            "{}-{}-{}",
            self.network.as_str(),
            self.network_type.as_str(),
            self.id
        )
    }

    /// The home chain of the module (as opposed to an external chain).
    pub fn is_pell_chain(&self) -> bool {
        self.network == Network::Pell
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

const KNOWN_CHAINS: &[Chain] = &[
    Chain::new(86, Network::Pell, NetworkType::Mainnet),
    Chain::new(87, Network::Pell, NetworkType::Testnet),
    Chain::new(860, Network::Pell, NetworkType::Privnet),
    Chain::new(186, Network::Pell, NetworkType::Privnet),
    Chain::new(1, Network::Eth, NetworkType::Mainnet),
    Chain::new(56, Network::Bsc, NetworkType::Mainnet),
    Chain::new(137, Network::Polygon, NetworkType::Mainnet),
    Chain::new(8453, Network::Base, NetworkType::Mainnet),
    Chain::new(11155111, Network::Eth, NetworkType::Testnet),
    Chain::new(5, Network::Eth, NetworkType::Testnet),
    Chain::new(97, Network::Bsc, NetworkType::Testnet),
    Chain::new(80001, Network::Polygon, NetworkType::Testnet),
    Chain::new(80002, Network::Polygon, NetworkType::Testnet),
    Chain::new(84532, Network::Base, NetworkType::Testnet),
    Chain::new(1337, Network::Eth, NetworkType::Privnet),
    Chain::new(5003, Network::Mantle, NetworkType::Testnet),
    Chain::new(5000, Network::Mantle, NetworkType::Mainnet),
    Chain::new(1115, Network::Core, NetworkType::Testnet),
    Chain::new(1116, Network::Core, NetworkType::Mainnet),
    Chain::new(42161, Network::Arbitrum, NetworkType::Mainnet),
    Chain::new(421614, Network::Arbitrum, NetworkType::Testnet),
];

/// Every chain the registry knows about.
pub fn chains_list() -> &'static [Chain] {
    KNOWN_CHAINS
}

/// Look up a known chain by id.
pub fn chain_by_id(id: ChainId) -> Option<Chain> {
    KNOWN_CHAINS.iter().copied().find(|c| c.id == id)
}

/// Well-known chains referenced by defaults and tests.
pub mod well_known {
    use super::*;

    pub const ETH_MAINNET: Chain = Chain::new(1, Network::Eth, NetworkType::Mainnet);
    pub const BSC_MAINNET: Chain = Chain::new(56, Network::Bsc, NetworkType::Mainnet);
    pub const BSC_TESTNET: Chain = Chain::new(97, Network::Bsc, NetworkType::Testnet);
    pub const GOERLI_LOCALNET: Chain = Chain::new(1337, Network::Eth, NetworkType::Privnet);
    pub const PELL_PRIVNET: Chain = Chain::new(186, Network::Pell, NetworkType::Privnet);
}

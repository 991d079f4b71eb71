//! Nullable infrastructure for deterministic testing.
//!
//! Inspired by the "A-frame architecture" pattern from RsNano.
//! Every host collaborator (storage, staking, slashing, authority, light
//! client) is abstracted behind a trait. This crate provides test-friendly
//! implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically
//! - Never touch the filesystem or network
//!
//! Usage: swap real implementations for nullables in tests.

pub mod authority;
pub mod light_client;
pub mod staking;
pub mod store;

pub use authority::NullAuthority;
pub use light_client::{AddedHeader, NullLightClient};
pub use staking::{NullSlashing, NullStaking};
pub use store::NullStore;

//! Shared utilities for the observer relay workspace.

pub mod logging;

pub use logging::{init_logging, LogFormat};

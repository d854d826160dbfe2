//! Common types shared by every hostbridge crate.
//!
//! - `Lookup<T>`: the absent / present-null / present-value result contract
//! - `BridgeError`: failures reported at the call boundary
//! - `BridgeOptions`: per-environment configuration
//! - Centralized limits and thresholds

pub mod error;
pub use error::{BridgeError, HostError, Result};

pub mod lookup;
pub use lookup::Lookup;

pub mod options;
pub use options::{BridgeOptions, DiscoveryOrder};

// Centralized limits and thresholds
pub mod limits;

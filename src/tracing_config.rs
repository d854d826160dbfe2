//! Subscriber setup for bridge diagnostics.
//!
//! The bridge logs its cold paths (descriptor creation, member discovery,
//! hierarchy merges, overload resolution misses, mapping construction)
//! through `tracing`. Nothing is printed unless an embedder installs a
//! subscriber; `init_tracing` installs one from environment variables:
//!
//! ```bash
//! # Indented span tree
//! HOSTBRIDGE_LOG=debug HOSTBRIDGE_LOG_FORMAT=tree my-embedder
//!
//! # One JSON object per event
//! HOSTBRIDGE_LOG=trace HOSTBRIDGE_LOG_FORMAT=json my-embedder
//!
//! # Only dispatch decisions
//! HOSTBRIDGE_LOG="hostbridge_members::slot=debug" my-embedder
//! ```
//!
//! `RUST_LOG` is honored when `HOSTBRIDGE_LOG` is unset.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt};

const LOG_VAR: &str = "HOSTBRIDGE_LOG";
const FORMAT_VAR: &str = "HOSTBRIDGE_LOG_FORMAT";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Flat text lines (default).
    Text,
    /// Hierarchical output via `tracing-tree`.
    Tree,
    /// Newline-delimited JSON.
    Json,
}

impl LogFormat {
    /// Unknown values fall back to `Text`.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "tree" => Self::Tree,
            "json" => Self::Json,
            _ => Self::Text,
        }
    }

    fn from_env() -> Self {
        Self::parse(&std::env::var(FORMAT_VAR).unwrap_or_default())
    }
}

fn build_filter() -> EnvFilter {
    match std::env::var(LOG_VAR) {
        Ok(directives) => EnvFilter::builder().parse_lossy(directives),
        Err(_) => EnvFilter::from_default_env(),
    }
}

/// Install the global subscriber if logging was requested.
///
/// Returns `true` when a subscriber was installed by this call. Output goes
/// to stderr. Calling it again, or after the embedder installed its own
/// subscriber, is a no-op.
pub fn init_tracing() -> bool {
    if std::env::var_os(LOG_VAR).is_none() && std::env::var_os("RUST_LOG").is_none() {
        return false;
    }

    let filter = build_filter();
    match LogFormat::from_env() {
        LogFormat::Tree => {
            let tree = tracing_tree::HierarchicalLayer::default()
                .with_indent_amount(2)
                .with_indent_lines(true)
                .with_targets(true);
            Registry::default().with(filter).with(tree).try_init().is_ok()
        }
        LogFormat::Json => {
            let json = fmt::layer().json().with_writer(std::io::stderr);
            Registry::default().with(filter).with(json).try_init().is_ok()
        }
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init()
            .is_ok(),
    }
}

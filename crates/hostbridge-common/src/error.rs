//! Failures reported at the member call boundary.
//!
//! Absent members and null values are not errors; they are `Lookup` states.
//! The variants here are the outcomes the dynamic-dispatch layer must surface
//! as explicit failures.

use std::sync::Arc;
use thiserror::Error;

/// An error raised by the host while running a field accessor, method, or
/// constructor.
pub type HostError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum BridgeError {
    /// Write to a final field or to a property without a setter.
    #[error("cannot assign to read-only member `{member}` of `{owner}`")]
    ImmutableWrite { owner: Arc<str>, member: Arc<str> },

    /// No overload accepts the call-site argument shape.
    #[error("no overload of `{owner}.{member}` is applicable to {signature}")]
    NotApplicable {
        owner: Arc<str>,
        member: Arc<str>,
        signature: String,
    },

    /// The underlying host call raised.
    #[error("host call `{owner}.{member}` failed: {cause}")]
    Invocation {
        owner: Arc<str>,
        member: Arc<str>,
        #[source]
        cause: HostError,
    },
}

impl BridgeError {
    pub fn invocation(owner: &Arc<str>, member: &Arc<str>, cause: HostError) -> Self {
        BridgeError::Invocation {
            owner: Arc::clone(owner),
            member: Arc::clone(member),
            cause,
        }
    }

    /// Name of the member the failure is scoped to.
    pub fn member(&self) -> &str {
        match self {
            BridgeError::ImmutableWrite { member, .. }
            | BridgeError::NotApplicable { member, .. }
            | BridgeError::Invocation { member, .. } => member,
        }
    }

    pub const fn is_immutable_write(&self) -> bool {
        matches!(self, BridgeError::ImmutableWrite { .. })
    }

    pub const fn is_not_applicable(&self) -> bool {
        matches!(self, BridgeError::NotApplicable { .. })
    }
}

pub type Result<T, E = BridgeError> = std::result::Result<T, E>;

#[cfg(test)]
#[path = "../tests/error_tests.rs"]
mod tests;

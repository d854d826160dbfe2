//! Argument-shape compatibility seam.
//!
//! Overload resolution only proposes candidates; whether a candidate accepts
//! a call-site shape is decided by the embedding runtime's coercion rules.

use crate::signature::Signature;

pub trait SignatureMatcher: Send + Sync {
    /// Whether a callable declared with `candidate` accepts arguments of
    /// shape `requested`.
    fn matches(&self, candidate: &Signature, requested: &Signature) -> bool;
}

impl<F> SignatureMatcher for F
where
    F: Fn(&Signature, &Signature) -> bool + Send + Sync,
{
    fn matches(&self, candidate: &Signature, requested: &Signature) -> bool {
        self(candidate, requested)
    }
}

/// Accepts only identical shapes. Used when no coercion layer is attached.
#[derive(Clone, Copy, Debug, Default)]
pub struct ExactMatcher;

impl SignatureMatcher for ExactMatcher {
    fn matches(&self, candidate: &Signature, requested: &Signature) -> bool {
        candidate == requested
    }
}

//! Per-environment state.
//!
//! Everything whose result depends on naming or coercion (descriptors,
//! mappings, interned signatures) hangs off one `Environment`. Nothing here is
//! process-wide, so two environments with different renamers never observe
//! each other's names.

use crate::matcher::{ExactMatcher, SignatureMatcher};
use crate::signature::SignatureInterner;
use hostbridge_common::BridgeOptions;
use hostbridge_types::{
    ClassId, ConsolidationMapping, HostReflector, MappingCache, NoRenamer, Renamer,
};
use std::sync::Arc;

pub struct Environment {
    reflector: Arc<dyn HostReflector>,
    renamer: Arc<dyn Renamer>,
    matcher: Arc<dyn SignatureMatcher>,
    signatures: SignatureInterner,
    mappings: MappingCache,
    options: BridgeOptions,
}

impl Environment {
    /// An environment with raw names, exact-match dispatch, and default
    /// options.
    pub fn new(reflector: Arc<dyn HostReflector>) -> Self {
        let options = BridgeOptions::default();
        Environment {
            reflector,
            renamer: Arc::new(NoRenamer),
            matcher: Arc::new(ExactMatcher),
            signatures: SignatureInterner::new(),
            mappings: MappingCache::new(options.max_consolidation_depth),
            options,
        }
    }

    pub fn with_renamer(mut self, renamer: Arc<dyn Renamer>) -> Self {
        self.renamer = renamer;
        self
    }

    pub fn with_matcher(mut self, matcher: Arc<dyn SignatureMatcher>) -> Self {
        self.matcher = matcher;
        self
    }

    pub fn with_options(mut self, options: BridgeOptions) -> Self {
        self.mappings = MappingCache::new(options.max_consolidation_depth);
        self.options = options;
        self
    }

    #[inline]
    pub fn reflector(&self) -> &dyn HostReflector {
        &*self.reflector
    }

    #[inline]
    pub fn renamer(&self) -> &dyn Renamer {
        &*self.renamer
    }

    #[inline]
    pub fn matcher(&self) -> &dyn SignatureMatcher {
        &*self.matcher
    }

    #[inline]
    pub fn signatures(&self) -> &SignatureInterner {
        &self.signatures
    }

    #[inline]
    pub fn options(&self) -> &BridgeOptions {
        &self.options
    }

    /// The consolidation mapping for `class`, built on first request.
    pub fn mapping_for(&self, class: ClassId) -> Arc<ConsolidationMapping> {
        self.mappings.mapping_for(&*self.reflector, class)
    }
}

//! hostbridge: a dynamic-to-static bridge over host object models.
//!
//! A dynamic scripting runtime asks for members by name; this crate answers
//! with cached, merged, overload-aware descriptors built from the host's
//! introspection layer.
//!
//! # Architecture
//!
//! ```text
//! HostReflector ─► DescriptorCache ─► TypeDescriptor ─► MemberSlot
//!  (types crate)     (per environment)  (own / merged)     (read / write / invoke)
//! ```
//!
//! The work is split across workspace crates and re-exported here:
//! - [`hostbridge_common`]: `Lookup`, `BridgeError`, `BridgeOptions`, limits
//! - [`hostbridge_types`]: host type model, `TypeRegistry`, generic consolidation
//! - [`hostbridge_members`]: signatures, slots, descriptors, the cache

pub mod tracing_config;
pub use tracing_config::{LogFormat, init_tracing};

pub use hostbridge_common as common;
pub use hostbridge_members as members;
pub use hostbridge_types as types;

pub use hostbridge_common::{BridgeError, BridgeOptions, DiscoveryOrder, HostError, Lookup};
pub use hostbridge_members::{
    CallableBinding, DescriptorCache, Environment, ExactMatcher, FieldBinding, MemberSlot,
    Signature, SignatureMatcher, TypeDescriptor,
};
pub use hostbridge_types::{
    ClassId, ConsolidationMapping, Executable, FieldDecl, HostObject, HostReflector, Renamer,
    TypeInfo, TypeRegistry,
};

//! Member discovery and dispatch for hostbridge.
//!
//! This crate turns host declarations into the surface a dynamic runtime
//! talks to:
//! - `DescriptorCache` hands out one `TypeDescriptor` per host type
//! - `TypeDescriptor` discovers own members, merges the hierarchy, and
//!   resolves constructors
//! - `MemberSlot` reads, writes, and invokes one visible name
//! - `Signature` keys overload sets and call-site shapes

pub mod signature;
pub use signature::{Signature, SignatureInterner};

pub mod binding;
pub use binding::{CallableBinding, FieldBinding};

pub mod matcher;
pub use matcher::{ExactMatcher, SignatureMatcher};

pub mod slot;
pub use slot::MemberSlot;

pub mod env;
pub use env::Environment;

pub mod descriptor;
pub use descriptor::{MemberMap, TypeDescriptor, empty_members};

pub mod cache;
pub use cache::DescriptorCache;

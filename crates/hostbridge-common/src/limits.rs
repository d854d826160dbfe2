//! Centralized limits and thresholds.
//!
//! Keeping these in one place prevents duplicate definitions drifting apart
//! between crates.

/// Maximum nesting depth for generic consolidation.
///
/// Consolidation recurses through array components and type arguments. Host
/// type graphs are finite, but a mapping that points a variable at a type
/// containing the same variable could otherwise recurse without bound. When
/// the depth is exceeded the type is returned unchanged.
///
/// ```text
/// class Node<T> extends Base<List<Node<T>>> { }
/// // Base's variable maps to List<Node<T>>; consolidating that under Node's
/// // own mapping must stop somewhere.
/// ```
pub const MAX_CONSOLIDATION_DEPTH: u32 = 50;

/// Number of parameter types a signature stores inline before spilling to
/// the heap. Covers nearly every host method.
pub const SIGNATURE_INLINE_PARAMS: usize = 4;

/// Initial capacity of a descriptor cache's type map.
pub const INITIAL_DESCRIPTOR_CAPACITY: usize = 256;

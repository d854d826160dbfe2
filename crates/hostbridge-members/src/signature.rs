//! Dispatch signatures.
//!
//! A `Signature` is the ordered list of erased parameter types of a callable
//! or of a call site. Equality is element-wise; the hash is computed once at
//! construction so map lookups never rehash the parameter list.
//!
//! The shapes almost every call uses (no arguments, and one argument of a
//! primitive, `Object`, `String`, `Object[]` or `String[]`) are shared
//! singletons: `Signature::of` never allocates for them and equal singletons
//! compare by pointer. Longer shapes are equal by value; a
//! `SignatureInterner` additionally makes them pointer-equal.

use dashmap::DashMap;
use hostbridge_common::limits::SIGNATURE_INLINE_PARAMS;
use hostbridge_types::{ClassId, HostReflector};
use once_cell::sync::Lazy;
use rustc_hash::{FxBuildHasher, FxHasher};
use smallvec::SmallVec;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use tracing::trace;

type Params = SmallVec<[ClassId; SIGNATURE_INLINE_PARAMS]>;

struct SignatureData {
    hash: u64,
    types: Params,
}

#[derive(Clone)]
pub struct Signature(Arc<SignatureData>);

/// Single-argument classes that get a preallocated signature.
const SINGLETON_CLASSES: &[ClassId] = &[
    ClassId::OBJECT,
    ClassId::STRING,
    ClassId::BOOLEAN,
    ClassId::BYTE,
    ClassId::SHORT,
    ClassId::INT,
    ClassId::LONG,
    ClassId::FLOAT,
    ClassId::DOUBLE,
    ClassId::CHAR,
    ClassId::OBJECT_ARRAY,
    ClassId::STRING_ARRAY,
];

static EMPTY: Lazy<Signature> = Lazy::new(|| Signature::build(Params::new()));

static SINGLE: Lazy<[Option<Signature>; ClassId::FIRST_USER as usize]> = Lazy::new(|| {
    std::array::from_fn(|index| {
        let class = ClassId(index as u32);
        SINGLETON_CLASSES
            .contains(&class)
            .then(|| Signature::build(smallvec::smallvec![class]))
    })
});

impl Signature {
    fn build(types: Params) -> Signature {
        let mut hasher = FxHasher::default();
        types.hash(&mut hasher);
        Signature(Arc::new(SignatureData {
            hash: hasher.finish(),
            types,
        }))
    }

    /// The zero-argument signature.
    pub fn empty() -> Signature {
        EMPTY.clone()
    }

    /// The shared single-argument signature for `class`, if it has one.
    pub fn single(class: ClassId) -> Option<Signature> {
        SINGLE.get(class.index() as usize).and_then(Option::clone)
    }

    /// Signature for `types`, reusing a shared singleton when one exists.
    pub fn of(types: &[ClassId]) -> Signature {
        match types {
            [] => Self::empty(),
            [only] => Self::single(*only).unwrap_or_else(|| Self::build(Params::from_slice(types))),
            _ => Self::build(Params::from_slice(types)),
        }
    }

    #[inline]
    pub fn types(&self) -> &[ClassId] {
        &self.0.types
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.types.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.types.is_empty()
    }

    /// True when both handles share one allocation.
    #[inline]
    pub fn ptr_eq(&self, other: &Signature) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// True for the preallocated shapes.
    pub fn is_shared(&self) -> bool {
        match self.types() {
            [] => true,
            [only] => Self::single(*only).is_some(),
            _ => false,
        }
    }

    /// Render with host names, e.g. `(String, int)`.
    pub fn display<'a>(&'a self, reflector: &'a dyn HostReflector) -> impl fmt::Display + 'a {
        DisplaySignature {
            signature: self,
            reflector,
        }
    }
}

impl PartialEq for Signature {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || (self.0.hash == other.0.hash && self.0.types == other.0.types)
    }
}

impl Eq for Signature {}

impl Hash for Signature {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.0.hash);
    }
}

impl PartialOrd for Signature {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Signature {
    fn cmp(&self, other: &Self) -> Ordering {
        self.types().cmp(other.types())
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, class) in self.types().iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "#{}", class.0)?;
        }
        f.write_str(")")
    }
}

struct DisplaySignature<'a> {
    signature: &'a Signature,
    reflector: &'a dyn HostReflector,
}

impl fmt::Display for DisplaySignature<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, class) in self.signature.types().iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", self.reflector.name(*class))?;
        }
        f.write_str(")")
    }
}

/// Per-environment intern table for signatures.
///
/// Interning makes value-equal signatures share one allocation, so the
/// equality check in overload maps stops at the pointer comparison.
#[derive(Default)]
pub struct SignatureInterner {
    signatures: DashMap<Signature, (), FxBuildHasher>,
}

impl SignatureInterner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intern(&self, signature: Signature) -> Signature {
        if signature.is_shared() {
            return signature;
        }
        if let Some(existing) = self.signatures.get(&signature) {
            return existing.key().clone();
        }
        trace!(?signature, "interning signature");
        self.signatures.entry(signature).or_insert(()).key().clone()
    }

    pub fn of(&self, types: &[ClassId]) -> Signature {
        self.intern(Signature::of(types))
    }

    /// Number of interned non-shared signatures.
    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }
}

#[cfg(test)]
#[path = "../tests/signature_tests.rs"]
mod tests;

//! Generic consolidation.
//!
//! A concrete type fixes the type variables of its generic ancestors:
//!
//! ```text
//! class A<Ta> { }
//! interface B<Tb> { }
//! class C<Tc> extends A<Tc> { }
//! class D<Td> extends C<Td> implements B<A<Td>> { }
//! ```
//!
//! D's mapping is `Tc -> Td`, `Tb -> A<Td>`, and, flattened from C's own
//! mapping `Ta -> Tc`, `Ta -> Td`. Every ancestor variable points straight at
//! a type expressed in D's terms, so a declared type is consolidated with a
//! single pass.
//!
//! Mappings are built once per concrete type and cached per environment.

use crate::ids::{ClassId, TypeVar};
use crate::reflector::HostReflector;
use crate::type_info::{TypeData, TypeInfo};
use dashmap::DashMap;
use hostbridge_common::limits::MAX_CONSOLIDATION_DEPTH;
use once_cell::sync::Lazy;
use rustc_hash::{FxBuildHasher, FxHashMap};
use std::sync::Arc;
use tracing::{debug, warn};

/// Anything that can answer "what does this variable stand for".
pub trait Substitution {
    fn lookup(&self, var: TypeVar) -> Option<&TypeInfo>;
}

impl Substitution for FxHashMap<TypeVar, TypeInfo> {
    fn lookup(&self, var: TypeVar) -> Option<&TypeInfo> {
        self.get(&var)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Repr {
    Empty,
    Single(TypeVar, TypeInfo),
    Many(FxHashMap<TypeVar, TypeInfo>),
}

/// Storage class of a mapping. Behavior does not depend on it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MappingStorage {
    Empty,
    Single,
    Many,
}

/// Type-variable to concrete-type mapping for one concrete type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConsolidationMapping(Repr);

static EMPTY_MAPPING: Lazy<Arc<ConsolidationMapping>> =
    Lazy::new(|| Arc::new(ConsolidationMapping(Repr::Empty)));

impl ConsolidationMapping {
    /// The shared empty mapping.
    pub fn empty() -> Arc<ConsolidationMapping> {
        EMPTY_MAPPING.clone()
    }

    /// Pick the smallest storage for `map`.
    pub fn from_map(map: FxHashMap<TypeVar, TypeInfo>) -> ConsolidationMapping {
        match map.len() {
            0 => ConsolidationMapping(Repr::Empty),
            1 => match map.into_iter().next() {
                Some((var, ty)) => ConsolidationMapping(Repr::Single(var, ty)),
                None => ConsolidationMapping(Repr::Empty),
            },
            _ => ConsolidationMapping(Repr::Many(map)),
        }
    }

    pub fn get(&self, var: TypeVar) -> Option<&TypeInfo> {
        match &self.0 {
            Repr::Empty => None,
            Repr::Single(key, ty) => (*key == var).then_some(ty),
            Repr::Many(map) => map.get(&var),
        }
    }

    pub fn len(&self) -> usize {
        match &self.0 {
            Repr::Empty => 0,
            Repr::Single(..) => 1,
            Repr::Many(map) => map.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.0, Repr::Empty)
    }

    pub fn storage(&self) -> MappingStorage {
        match self.0 {
            Repr::Empty => MappingStorage::Empty,
            Repr::Single(..) => MappingStorage::Single,
            Repr::Many(_) => MappingStorage::Many,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (TypeVar, &TypeInfo)> {
        let (single, many) = match &self.0 {
            Repr::Empty => (None, None),
            Repr::Single(var, ty) => (Some((*var, ty)), None),
            Repr::Many(map) => (None, Some(map.iter().map(|(var, ty)| (*var, ty)))),
        };
        single.into_iter().chain(many.into_iter().flatten())
    }
}

impl Substitution for ConsolidationMapping {
    fn lookup(&self, var: TypeVar) -> Option<&TypeInfo> {
        self.get(var)
    }
}

/// Replace mapped variables inside `ty`.
///
/// Returns `ty` itself (same allocation) when nothing was substituted.
pub fn consolidate(ty: &TypeInfo, mapping: &dyn Substitution) -> TypeInfo {
    consolidate_with_limit(ty, mapping, MAX_CONSOLIDATION_DEPTH)
}

pub fn consolidate_with_limit(ty: &TypeInfo, mapping: &dyn Substitution, max_depth: u32) -> TypeInfo {
    consolidate_inner(ty, mapping, 0, max_depth)
}

fn consolidate_inner(
    ty: &TypeInfo,
    mapping: &dyn Substitution,
    depth: u32,
    max_depth: u32,
) -> TypeInfo {
    if depth > max_depth {
        warn!(?ty, max_depth, "consolidation depth exceeded, leaving type unresolved");
        return ty.clone();
    }

    match ty.data() {
        TypeData::None | TypeData::Class(_) => ty.clone(),
        TypeData::Variable(var) => match mapping.lookup(*var) {
            Some(target) => target.clone(),
            None => ty.clone(),
        },
        TypeData::Array(component) => {
            let consolidated = consolidate_inner(component, mapping, depth + 1, max_depth);
            if TypeInfo::same(&consolidated, component) {
                ty.clone()
            } else {
                TypeInfo::array(consolidated)
            }
        }
        TypeData::Parameterized { raw, params } => {
            let consolidated = consolidate_list(params, mapping, depth + 1, max_depth);
            if Arc::ptr_eq(&consolidated, params) {
                ty.clone()
            } else {
                TypeInfo::parameterized(*raw, consolidated)
            }
        }
    }
}

/// Consolidate every entry of a type list.
///
/// Returns the original list (same allocation) when nothing changed; copying
/// starts only at the first changed entry.
pub fn consolidate_all(list: &Arc<[TypeInfo]>, mapping: &dyn Substitution) -> Arc<[TypeInfo]> {
    consolidate_all_with_limit(list, mapping, MAX_CONSOLIDATION_DEPTH)
}

pub fn consolidate_all_with_limit(
    list: &Arc<[TypeInfo]>,
    mapping: &dyn Substitution,
    max_depth: u32,
) -> Arc<[TypeInfo]> {
    consolidate_list(list, mapping, 0, max_depth)
}

fn consolidate_list(
    list: &Arc<[TypeInfo]>,
    mapping: &dyn Substitution,
    depth: u32,
    max_depth: u32,
) -> Arc<[TypeInfo]> {
    let mut changed: Option<Vec<TypeInfo>> = None;

    for (i, ty) in list.iter().enumerate() {
        let consolidated = consolidate_inner(ty, mapping, depth, max_depth);
        match &mut changed {
            Some(out) => out.push(consolidated),
            None if !TypeInfo::same(&consolidated, ty) => {
                let mut out = Vec::with_capacity(list.len());
                out.extend_from_slice(&list[..i]);
                out.push(consolidated);
                changed = Some(out);
            }
            None => {}
        }
    }

    match changed {
        Some(out) => Arc::from(out),
        None => Arc::clone(list),
    }
}

/// Per-environment cache of consolidation mappings.
pub struct MappingCache {
    mappings: DashMap<ClassId, Arc<ConsolidationMapping>, FxBuildHasher>,
    max_depth: u32,
}

impl Default for MappingCache {
    fn default() -> Self {
        Self::new(MAX_CONSOLIDATION_DEPTH)
    }
}

impl MappingCache {
    pub fn new(max_depth: u32) -> Self {
        MappingCache {
            mappings: DashMap::with_hasher(FxBuildHasher),
            max_depth,
        }
    }

    #[inline]
    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// The flattened mapping for `class`, built on first request.
    pub fn mapping_for(
        &self,
        reflector: &dyn HostReflector,
        class: ClassId,
    ) -> Arc<ConsolidationMapping> {
        if class == ClassId::OBJECT || class.is_primitive() || reflector.is_array(class) {
            return ConsolidationMapping::empty();
        }

        if let Some(found) = self.mappings.get(&class) {
            return Arc::clone(found.value());
        }

        // Built outside the map lock: collection recurses into ancestors.
        let collected = self.collect(reflector, class);
        let mapping = if collected.is_empty() {
            ConsolidationMapping::empty()
        } else {
            Arc::new(collected)
        };

        Arc::clone(self.mappings.entry(class).or_insert(mapping).value())
    }

    fn collect(&self, reflector: &dyn HostReflector, class: ClassId) -> ConsolidationMapping {
        let mut direct: FxHashMap<TypeVar, TypeInfo> = FxHashMap::default();
        if let Some(superclass) = reflector.generic_superclass(class) {
            extract_direct(reflector, &superclass, &mut direct);
        }
        for interface in reflector.generic_interfaces(class).iter() {
            extract_direct(reflector, interface, &mut direct);
        }

        let mut merged: FxHashMap<TypeVar, TypeInfo> = FxHashMap::default();
        // Interfaces first so the superclass chain wins ties; this level wins over both.
        for &interface in reflector.interfaces(class).iter() {
            self.flatten_into(reflector, interface, &direct, &mut merged);
        }
        if let Some(parent) = reflector.superclass(class) {
            self.flatten_into(reflector, parent, &direct, &mut merged);
        }
        merged.extend(direct);

        debug!(
            class = class.0,
            name = %reflector.name(class),
            entries = merged.len(),
            "collected consolidation mapping"
        );
        ConsolidationMapping::from_map(merged)
    }

    fn flatten_into(
        &self,
        reflector: &dyn HostReflector,
        ancestor: ClassId,
        direct: &FxHashMap<TypeVar, TypeInfo>,
        merged: &mut FxHashMap<TypeVar, TypeInfo>,
    ) {
        let inherited = self.mapping_for(reflector, ancestor);
        for (var, target) in inherited.iter() {
            merged.insert(var, consolidate_with_limit(target, direct, self.max_depth));
        }
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }
}

/// Record `declared param -> actual argument` for one generic supertype.
fn extract_direct(
    reflector: &dyn HostReflector,
    supertype: &TypeInfo,
    out: &mut FxHashMap<TypeVar, TypeInfo>,
) {
    if let TypeData::Parameterized { raw, params } = supertype.data() {
        let declared = reflector.type_params(*raw);
        for (index, arg) in params.iter().enumerate().take(declared.len()) {
            out.insert(TypeVar::new(*raw, index as u16), arg.clone());
        }
    }
}

#[cfg(test)]
#[path = "../tests/generics_tests.rs"]
mod tests;

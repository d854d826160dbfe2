//! Externally visible member names.
//!
//! A `Renamer` may override the name a field or method is exposed under
//! (e.g. to undo obfuscation). Returning `None` or a blank string means "no
//! override". Without any override, a class-level remap prefix is stripped
//! from the raw name.

use crate::decl::{Executable, FieldDecl};
use crate::ids::ClassId;
use crate::reflector::HostReflector;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::sync::Arc;

pub trait Renamer: Send + Sync {
    fn mapped_field_name(&self, _class: ClassId, _field: &FieldDecl) -> Option<Arc<str>> {
        None
    }

    fn mapped_method_name(&self, _class: ClassId, _method: &Executable) -> Option<Arc<str>> {
        None
    }
}

/// Never overrides anything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoRenamer;

impl Renamer for NoRenamer {}

/// Resolve the name a field is exposed under.
///
/// A rename hint on the declaration wins, then the renamer, then the first
/// matching entry of `prefixes` stripped from the raw name, then the raw name.
pub fn visible_field_name(
    renamer: &dyn Renamer,
    class: ClassId,
    prefixes: &[Arc<str>],
    field: &FieldDecl,
) -> Arc<str> {
    non_empty(field.rename.as_deref())
        .or_else(|| non_empty(renamer.mapped_field_name(class, field).as_deref()))
        .or_else(|| strip_prefix(prefixes, &field.name))
        .unwrap_or_else(|| Arc::clone(&field.name))
}

/// Resolve the name a method is exposed under.
pub fn visible_method_name(
    renamer: &dyn Renamer,
    class: ClassId,
    prefixes: &[Arc<str>],
    method: &Executable,
) -> Arc<str> {
    non_empty(method.rename.as_deref())
        .or_else(|| non_empty(renamer.mapped_method_name(class, method).as_deref()))
        .or_else(|| strip_prefix(prefixes, &method.name))
        .unwrap_or_else(|| Arc::clone(&method.name))
}

fn non_empty(name: Option<&str>) -> Option<Arc<str>> {
    let trimmed = name?.trim();
    (!trimmed.is_empty()).then(|| Arc::from(trimmed))
}

fn strip_prefix(prefixes: &[Arc<str>], raw: &str) -> Option<Arc<str>> {
    prefixes
        .iter()
        .find_map(|prefix| raw.strip_prefix(&**prefix))
        .and_then(|rest| non_empty(Some(rest)))
}

type MethodKey = (ClassId, Arc<str>, SmallVec<[ClassId; 4]>);

/// Table-driven renamer.
///
/// Mappings are keyed by the class that declares them. A lookup that misses
/// on the queried class walks its superclass chain and then its interfaces,
/// so a mapping registered on an interface also names the implementing
/// override.
pub struct MappingRenamer {
    reflector: Arc<dyn HostReflector>,
    fields: FxHashMap<(ClassId, Arc<str>), Arc<str>>,
    methods: FxHashMap<MethodKey, Arc<str>>,
}

impl MappingRenamer {
    pub fn new(reflector: Arc<dyn HostReflector>) -> Self {
        MappingRenamer {
            reflector,
            fields: FxHashMap::default(),
            methods: FxHashMap::default(),
        }
    }

    pub fn map_field(&mut self, class: ClassId, raw: &str, mapped: &str) -> &mut Self {
        self.fields.insert((class, Arc::from(raw)), Arc::from(mapped));
        self
    }

    /// Map one overload, identified by its erased parameter types.
    pub fn map_method(
        &mut self,
        class: ClassId,
        raw: &str,
        params: &[ClassId],
        mapped: &str,
    ) -> &mut Self {
        self.methods.insert(
            (class, Arc::from(raw), SmallVec::from_slice(params)),
            Arc::from(mapped),
        );
        self
    }

    fn walk(&self, class: ClassId, find: &dyn Fn(ClassId) -> Option<Arc<str>>) -> Option<Arc<str>> {
        if class == ClassId::OBJECT {
            return None;
        }
        if let Some(found) = find(class) {
            return Some(found);
        }
        if let Some(parent) = self.reflector.superclass(class) {
            if let Some(found) = self.walk(parent, find) {
                return Some(found);
            }
        }
        self.reflector
            .interfaces(class)
            .iter()
            .find_map(|&iface| self.walk(iface, find))
    }
}

impl Renamer for MappingRenamer {
    fn mapped_field_name(&self, class: ClassId, field: &FieldDecl) -> Option<Arc<str>> {
        if self.fields.is_empty() {
            return None;
        }
        let find = |c: ClassId| self.fields.get(&(c, Arc::clone(&field.name))).cloned();
        self.walk(class, &find)
    }

    fn mapped_method_name(&self, class: ClassId, method: &Executable) -> Option<Arc<str>> {
        if self.methods.is_empty() {
            return None;
        }
        let find = |c: ClassId| {
            self.methods
                .get(&(c, Arc::clone(&method.name), method.params.clone()))
                .cloned()
        };
        self.walk(class, &find)
    }
}

#[cfg(test)]
#[path = "../tests/renamer_tests.rs"]
mod tests;

//! Host introspection seam.
//!
//! Everything the bridge knows about host types comes through
//! `HostReflector`. A runtime with reflection can answer these queries
//! directly; a runtime without one can answer them from a generated table
//! (see `TypeRegistry`).

use crate::decl::{Executable, FieldDecl, TypeParam};
use crate::ids::{ClassId, ClassKind};
use crate::type_info::TypeInfo;
use std::sync::Arc;

/// Read-only view of host types.
///
/// Implementations must report the well-known types under the reserved
/// `ClassId` constants and must answer consistently for the lifetime of any
/// environment built on them.
pub trait HostReflector: Send + Sync {
    fn kind(&self, class: ClassId) -> ClassKind;

    /// Fully qualified name, for diagnostics.
    fn name(&self, class: ClassId) -> Arc<str>;

    /// Direct superclass; `None` for the base type, interfaces, and primitives.
    fn superclass(&self, class: ClassId) -> Option<ClassId>;

    /// Directly declared interfaces, in declaration order.
    fn interfaces(&self, class: ClassId) -> Arc<[ClassId]>;

    fn type_params(&self, class: ClassId) -> Arc<[TypeParam]>;

    /// Superclass as written in the declaration, with type arguments.
    fn generic_superclass(&self, class: ClassId) -> Option<TypeInfo>;

    /// Interfaces as written in the declaration, with type arguments.
    fn generic_interfaces(&self, class: ClassId) -> Arc<[TypeInfo]>;

    fn declared_fields(&self, class: ClassId) -> Arc<[Arc<FieldDecl>]>;

    fn declared_methods(&self, class: ClassId) -> Arc<[Arc<Executable>]>;

    fn declared_constructors(&self, class: ClassId) -> Arc<[Arc<Executable>]>;

    /// Raw-name prefixes stripped from this class's own members when no
    /// explicit rename applies (e.g. `mixin$size` exposed as `size`).
    fn remap_prefixes(&self, _class: ClassId) -> Arc<[Arc<str>]> {
        Arc::from(Vec::new())
    }

    /// The array class with the given component.
    ///
    /// Hosts that do not track per-component array classes may collapse all
    /// arrays to `Object[]`.
    fn array_class(&self, component: ClassId) -> ClassId {
        match component {
            ClassId::STRING => ClassId::STRING_ARRAY,
            _ => ClassId::OBJECT_ARRAY,
        }
    }

    #[inline]
    fn is_array(&self, class: ClassId) -> bool {
        self.kind(class).is_array()
    }
}

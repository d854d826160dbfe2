//! Host type model for hostbridge.
//!
//! This crate describes host types the way the bridge sees them:
//! - Type identities (`ClassId`, `TypeVar`, `ClassKind`)
//! - Declared generic types (`TypeInfo`)
//! - Member declarations and their host handles (`FieldDecl`, `Executable`)
//! - The introspection seam (`HostReflector`) and a table-driven
//!   implementation (`TypeRegistry`)
//! - Name remapping (`Renamer`)
//! - Generic consolidation (`ConsolidationMapping`, `MappingCache`)

pub mod ids;
pub use ids::{ClassId, ClassKind, TypeVar};

pub mod type_info;
pub use type_info::{TypeData, TypeInfo};

pub mod decl;
pub use decl::{
    CONSTRUCTOR_NAME, Executable, ExecutableKind, FieldDecl, FnFieldAccess, HostFieldAccess,
    HostInvoke, HostObject, HostResult, Modifiers, TypeParam,
};

pub mod reflector;
pub use reflector::HostReflector;

pub mod registry;
pub use registry::{ClassBuilder, TypeRegistry};

pub mod renamer;
pub use renamer::{MappingRenamer, NoRenamer, Renamer, visible_field_name, visible_method_name};

pub mod generics;
pub use generics::{
    ConsolidationMapping, MappingCache, MappingStorage, Substitution, consolidate,
    consolidate_all, consolidate_all_with_limit, consolidate_with_limit,
};

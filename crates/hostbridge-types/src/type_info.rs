//! Generic type expressions.
//!
//! `TypeInfo` describes a declared type as the host reports it, before any
//! substitution: a raw class, an array, a parameterized application, or an
//! unresolved type variable. Values are reference counted so that
//! consolidation can hand back the very same instance when nothing changed;
//! `TypeInfo::same` observes that identity.

use crate::ids::{ClassId, TypeVar};
use crate::reflector::HostReflector;
use once_cell::sync::Lazy;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

#[derive(Debug, PartialEq, Eq, Hash)]
pub enum TypeData {
    /// Unknown or unbounded (e.g. `?`).
    None,
    Class(ClassId),
    Array(TypeInfo),
    Parameterized {
        raw: ClassId,
        params: Arc<[TypeInfo]>,
    },
    Variable(TypeVar),
}

#[derive(Clone)]
pub struct TypeInfo(Arc<TypeData>);

static NONE: Lazy<TypeInfo> = Lazy::new(|| TypeInfo(Arc::new(TypeData::None)));
static OBJECT: Lazy<TypeInfo> = Lazy::new(|| TypeInfo(Arc::new(TypeData::Class(ClassId::OBJECT))));
static EMPTY_LIST: Lazy<Arc<[TypeInfo]>> = Lazy::new(|| Arc::from(Vec::new()));

impl TypeInfo {
    pub fn none() -> TypeInfo {
        NONE.clone()
    }

    pub fn object() -> TypeInfo {
        OBJECT.clone()
    }

    /// The shared empty type list.
    pub fn empty_list() -> Arc<[TypeInfo]> {
        EMPTY_LIST.clone()
    }

    pub fn class(class: ClassId) -> TypeInfo {
        if class == ClassId::OBJECT {
            return Self::object();
        }
        TypeInfo(Arc::new(TypeData::Class(class)))
    }

    pub fn array(component: TypeInfo) -> TypeInfo {
        TypeInfo(Arc::new(TypeData::Array(component)))
    }

    /// `raw<params...>`; with no params this is just the raw class.
    pub fn parameterized(raw: ClassId, params: impl Into<Arc<[TypeInfo]>>) -> TypeInfo {
        let params = params.into();
        if params.is_empty() {
            return Self::class(raw);
        }
        TypeInfo(Arc::new(TypeData::Parameterized { raw, params }))
    }

    pub fn variable(var: TypeVar) -> TypeInfo {
        TypeInfo(Arc::new(TypeData::Variable(var)))
    }

    #[inline]
    pub fn data(&self) -> &TypeData {
        &self.0
    }

    /// Pointer identity. Consolidation preserves it for unchanged inputs.
    #[inline]
    pub fn same(a: &TypeInfo, b: &TypeInfo) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }

    #[inline]
    pub fn is_none(&self) -> bool {
        matches!(*self.0, TypeData::None)
    }

    #[inline]
    pub fn as_variable(&self) -> Option<TypeVar> {
        match *self.0 {
            TypeData::Variable(var) => Some(var),
            _ => None,
        }
    }

    /// The raw class of a class or parameterized type.
    pub fn raw_class(&self) -> Option<ClassId> {
        match *self.0 {
            TypeData::Class(class) => Some(class),
            TypeData::Parameterized { raw, .. } => Some(raw),
            _ => None,
        }
    }

    pub fn component(&self) -> Option<&TypeInfo> {
        match &*self.0 {
            TypeData::Array(component) => Some(component),
            _ => None,
        }
    }

    /// Type argument `index`, or `None` when absent.
    pub fn param(&self, index: usize) -> TypeInfo {
        match &*self.0 {
            TypeData::Parameterized { params, .. } => {
                params.get(index).cloned().unwrap_or_else(Self::none)
            }
            _ => Self::none(),
        }
    }

    /// True when an unresolved variable occurs anywhere inside.
    pub fn has_variables(&self) -> bool {
        match &*self.0 {
            TypeData::Variable(_) => true,
            TypeData::Array(component) => component.has_variables(),
            TypeData::Parameterized { params, .. } => params.iter().any(TypeInfo::has_variables),
            TypeData::None | TypeData::Class(_) => false,
        }
    }

    /// The raw host class this type erases to.
    ///
    /// A variable erases to its first bound; arrays erase through the
    /// reflector's array class for the erased component.
    pub fn erasure(&self, reflector: &dyn HostReflector) -> ClassId {
        match &*self.0 {
            TypeData::None => ClassId::OBJECT,
            TypeData::Class(class) => *class,
            TypeData::Parameterized { raw, .. } => *raw,
            TypeData::Array(component) => reflector.array_class(component.erasure(reflector)),
            TypeData::Variable(var) => reflector
                .type_params(var.owner)
                .get(var.index as usize)
                .map(|param| param.bound.erasure(reflector))
                .unwrap_or(ClassId::OBJECT),
        }
    }

    /// Render with host names, e.g. `demo.Box<String>[]`.
    pub fn display<'a>(&'a self, reflector: &'a dyn HostReflector) -> impl fmt::Display + 'a {
        DisplayType {
            ty: self,
            reflector,
        }
    }
}

impl PartialEq for TypeInfo {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.0 == other.0
    }
}

impl Eq for TypeInfo {}

impl Hash for TypeInfo {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl fmt::Debug for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.0 {
            TypeData::None => write!(f, "?"),
            TypeData::Class(class) => write!(f, "#{}", class.0),
            TypeData::Array(component) => write!(f, "{component:?}[]"),
            TypeData::Parameterized { raw, params } => {
                write!(f, "#{}<", raw.0)?;
                for (i, param) in params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{param:?}")?;
                }
                write!(f, ">")
            }
            TypeData::Variable(var) => write!(f, "#{}:T{}", var.owner.0, var.index),
        }
    }
}

impl From<ClassId> for TypeInfo {
    fn from(class: ClassId) -> Self {
        TypeInfo::class(class)
    }
}

struct DisplayType<'a> {
    ty: &'a TypeInfo,
    reflector: &'a dyn HostReflector,
}

impl fmt::Display for DisplayType<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.ty.data() {
            TypeData::None => write!(f, "?"),
            TypeData::Class(class) => write!(f, "{}", self.reflector.name(*class)),
            TypeData::Array(component) => {
                write!(f, "{}[]", component.display(self.reflector))
            }
            TypeData::Parameterized { raw, params } => {
                write!(f, "{}<", self.reflector.name(*raw))?;
                for (i, param) in params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", param.display(self.reflector))?;
                }
                write!(f, ">")
            }
            TypeData::Variable(var) => {
                match self.reflector.type_params(var.owner).get(var.index as usize) {
                    Some(param) => write!(f, "{}", param.name),
                    None => write!(f, "T{}", var.index),
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "../tests/type_info_tests.rs"]
mod tests;

//! Member declarations reported by host introspection.
//!
//! A declaration is what the host says exists: name, modifiers, declared
//! types, metadata hints, and the handle used to actually touch it. Nothing
//! here decides visibility; that is the job of member discovery.

use crate::ids::ClassId;
use crate::type_info::TypeInfo;
use bitflags::bitflags;
use hostbridge_common::HostError;
use smallvec::SmallVec;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// An opaque host value. `None` in argument and result positions is null.
pub type HostObject = Arc<dyn Any + Send + Sync>;

pub type HostResult<T> = Result<T, HostError>;

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u16 {
        const PUBLIC = 1 << 0;
        const PROTECTED = 1 << 1;
        const PRIVATE = 1 << 2;
        const STATIC = 1 << 3;
        const FINAL = 1 << 4;
        const TRANSIENT = 1 << 5;
        const NATIVE = 1 << 6;
        const ABSTRACT = 1 << 7;
        const VOLATILE = 1 << 8;
    }
}

/// Calls a method or constructor on the host.
///
/// Constructors receive `None` as the receiver and return the new instance.
pub trait HostInvoke: Send + Sync {
    fn invoke(
        &self,
        receiver: Option<&HostObject>,
        args: &[Option<HostObject>],
    ) -> HostResult<Option<HostObject>>;
}

impl<F> HostInvoke for F
where
    F: Fn(Option<&HostObject>, &[Option<HostObject>]) -> HostResult<Option<HostObject>>
        + Send
        + Sync,
{
    fn invoke(
        &self,
        receiver: Option<&HostObject>,
        args: &[Option<HostObject>],
    ) -> HostResult<Option<HostObject>> {
        self(receiver, args)
    }
}

/// Reads and writes a field on the host.
pub trait HostFieldAccess: Send + Sync {
    fn get(&self, receiver: Option<&HostObject>) -> HostResult<Option<HostObject>>;

    fn set(&self, receiver: Option<&HostObject>, value: Option<HostObject>) -> HostResult<()>;
}

/// Field accessor assembled from a getter and a setter closure.
pub struct FnFieldAccess<G, S> {
    getter: G,
    setter: S,
}

impl<G, S> FnFieldAccess<G, S>
where
    G: Fn(Option<&HostObject>) -> HostResult<Option<HostObject>> + Send + Sync,
    S: Fn(Option<&HostObject>, Option<HostObject>) -> HostResult<()> + Send + Sync,
{
    pub fn new(getter: G, setter: S) -> Self {
        FnFieldAccess { getter, setter }
    }
}

impl<G, S> HostFieldAccess for FnFieldAccess<G, S>
where
    G: Fn(Option<&HostObject>) -> HostResult<Option<HostObject>> + Send + Sync,
    S: Fn(Option<&HostObject>, Option<HostObject>) -> HostResult<()> + Send + Sync,
{
    fn get(&self, receiver: Option<&HostObject>) -> HostResult<Option<HostObject>> {
        (self.getter)(receiver)
    }

    fn set(&self, receiver: Option<&HostObject>, value: Option<HostObject>) -> HostResult<()> {
        (self.setter)(receiver, value)
    }
}

/// A declared field.
#[derive(Clone)]
pub struct FieldDecl {
    pub declaring: ClassId,
    pub name: Arc<str>,
    pub modifiers: Modifiers,
    pub field_type: ClassId,
    pub generic_type: TypeInfo,
    /// Excluded from the dynamic surface.
    pub hidden: bool,
    /// Externally visible name override from a declaration hint.
    pub rename: Option<Arc<str>>,
    pub access: Arc<dyn HostFieldAccess>,
}

impl FieldDecl {
    /// A public field of `field_type`. The declaring class is filled in on
    /// registration.
    pub fn new(name: &str, field_type: TypeInfo, access: impl HostFieldAccess + 'static) -> Self {
        FieldDecl {
            declaring: ClassId::OBJECT,
            name: Arc::from(name),
            modifiers: Modifiers::PUBLIC,
            field_type: field_type.raw_class().unwrap_or(ClassId::OBJECT),
            generic_type: field_type,
            hidden: false,
            rename: None,
            access: Arc::new(access),
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn renamed(mut self, name: &str) -> Self {
        self.rename = Some(Arc::from(name));
        self
    }

    #[inline]
    pub fn is_public(&self) -> bool {
        self.modifiers.contains(Modifiers::PUBLIC)
    }

    #[inline]
    pub fn is_protected(&self) -> bool {
        self.modifiers.contains(Modifiers::PROTECTED)
    }

    #[inline]
    pub fn is_final(&self) -> bool {
        self.modifiers.contains(Modifiers::FINAL)
    }

    #[inline]
    pub fn is_transient(&self) -> bool {
        self.modifiers.contains(Modifiers::TRANSIENT)
    }
}

impl fmt::Debug for FieldDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDecl")
            .field("declaring", &self.declaring)
            .field("name", &self.name)
            .field("modifiers", &self.modifiers)
            .field("generic_type", &self.generic_type)
            .field("hidden", &self.hidden)
            .finish_non_exhaustive()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ExecutableKind {
    Method,
    Constructor,
}

/// Name reported for constructors.
pub const CONSTRUCTOR_NAME: &str = "<init>";

/// A declared method or constructor.
#[derive(Clone)]
pub struct Executable {
    pub declaring: ClassId,
    pub kind: ExecutableKind,
    pub name: Arc<str>,
    pub modifiers: Modifiers,
    /// Erased parameter types; these form the dispatch signature.
    pub params: SmallVec<[ClassId; 4]>,
    pub generic_params: Arc<[TypeInfo]>,
    pub return_type: ClassId,
    pub generic_return: TypeInfo,
    pub hidden: bool,
    pub rename: Option<Arc<str>>,
    pub target: Arc<dyn HostInvoke>,
}

impl Executable {
    /// A public method. Parameter and return erasures are computed on
    /// registration; until then only the raw classes are recorded.
    pub fn method(
        name: &str,
        params: impl IntoIterator<Item = TypeInfo>,
        returns: TypeInfo,
        target: impl Fn(Option<&HostObject>, &[Option<HostObject>]) -> HostResult<Option<HostObject>>
        + Send
        + Sync
        + 'static,
    ) -> Self {
        let generic_params: Arc<[TypeInfo]> = params.into_iter().collect();
        Executable {
            declaring: ClassId::OBJECT,
            kind: ExecutableKind::Method,
            name: Arc::from(name),
            modifiers: Modifiers::PUBLIC,
            params: generic_params
                .iter()
                .map(|p| p.raw_class().unwrap_or(ClassId::OBJECT))
                .collect(),
            generic_params,
            return_type: returns.raw_class().unwrap_or(ClassId::OBJECT),
            generic_return: returns,
            hidden: false,
            rename: None,
            target: Arc::new(target),
        }
    }

    /// A public constructor.
    pub fn constructor(
        params: impl IntoIterator<Item = TypeInfo>,
        target: impl Fn(Option<&HostObject>, &[Option<HostObject>]) -> HostResult<Option<HostObject>>
        + Send
        + Sync
        + 'static,
    ) -> Self {
        let mut ctor = Self::method(CONSTRUCTOR_NAME, params, TypeInfo::none(), target);
        ctor.kind = ExecutableKind::Constructor;
        ctor
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Replace the invocation handle.
    pub fn with_target(mut self, target: Arc<dyn HostInvoke>) -> Self {
        self.target = target;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn renamed(mut self, name: &str) -> Self {
        self.rename = Some(Arc::from(name));
        self
    }

    #[inline]
    pub fn is_public(&self) -> bool {
        self.modifiers.contains(Modifiers::PUBLIC)
    }

    #[inline]
    pub fn is_protected(&self) -> bool {
        self.modifiers.contains(Modifiers::PROTECTED)
    }

    #[inline]
    pub fn is_native(&self) -> bool {
        self.modifiers.contains(Modifiers::NATIVE)
    }

    #[inline]
    pub fn is_static(&self) -> bool {
        self.modifiers.contains(Modifiers::STATIC)
    }

    #[inline]
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    pub fn invoke(
        &self,
        receiver: Option<&HostObject>,
        args: &[Option<HostObject>],
    ) -> HostResult<Option<HostObject>> {
        self.target.invoke(receiver, args)
    }
}

impl fmt::Debug for Executable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Executable")
            .field("declaring", &self.declaring)
            .field("kind", &self.kind)
            .field("name", &self.name)
            .field("params", &self.params)
            .field("return_type", &self.return_type)
            .field("hidden", &self.hidden)
            .finish_non_exhaustive()
    }
}

/// A type parameter declared by a generic host type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeParam {
    pub name: Arc<str>,
    /// First declared upper bound; `Object` when unbounded.
    pub bound: TypeInfo,
}

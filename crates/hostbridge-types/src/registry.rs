//! Table-driven host reflector.
//!
//! `TypeRegistry` answers `HostReflector` queries from declarations that were
//! registered up front, which is how a host without runtime reflection plugs
//! into the bridge. The well-known types are registered at their reserved ids
//! on construction; array classes are interned on first request.
//!
//! ```
//! use hostbridge_types::{ClassId, Executable, TypeInfo, TypeRegistry};
//!
//! let registry = TypeRegistry::new();
//! let mut base = registry.class("demo.Base");
//! let t = base.type_param("T");
//! base.method(Executable::method("get", [], t, |_, _| Ok(None)));
//! let base = base.build();
//!
//! let mut sub = registry.class("demo.Sub");
//! sub.extends(TypeInfo::parameterized(base, vec![TypeInfo::class(ClassId::STRING)]));
//! let sub = sub.build();
//! assert_eq!(registry.lookup("demo.Sub"), Some(sub));
//! ```

use crate::decl::{Executable, FieldDecl, TypeParam};
use crate::ids::{ClassId, ClassKind, TypeVar};
use crate::reflector::HostReflector;
use crate::type_info::{TypeData, TypeInfo};
use dashmap::DashMap;
use rustc_hash::FxBuildHasher;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use tracing::trace;

struct ClassEntry {
    name: Arc<str>,
    kind: ClassKind,
    superclass: Option<ClassId>,
    interfaces: Arc<[ClassId]>,
    type_params: Arc<[TypeParam]>,
    generic_superclass: Option<TypeInfo>,
    generic_interfaces: Arc<[TypeInfo]>,
    fields: Arc<[Arc<FieldDecl>]>,
    methods: Arc<[Arc<Executable>]>,
    constructors: Arc<[Arc<Executable>]>,
    remap_prefixes: Arc<[Arc<str>]>,
}

impl ClassEntry {
    fn bare(name: &str, kind: ClassKind, superclass: Option<ClassId>) -> Self {
        ClassEntry {
            name: Arc::from(name),
            kind,
            superclass,
            interfaces: Arc::from(Vec::new()),
            type_params: Arc::from(Vec::new()),
            generic_superclass: superclass.map(TypeInfo::class),
            generic_interfaces: TypeInfo::empty_list(),
            fields: Arc::from(Vec::new()),
            methods: Arc::from(Vec::new()),
            constructors: Arc::from(Vec::new()),
            remap_prefixes: Arc::from(Vec::new()),
        }
    }
}

const BUILTINS: &[(ClassId, &str, ClassKind)] = &[
    (ClassId::OBJECT, "Object", ClassKind::Class),
    (ClassId::CLASS, "Class", ClassKind::Class),
    (ClassId::STRING, "String", ClassKind::Class),
    (ClassId::VOID, "void", ClassKind::Primitive),
    (ClassId::BOOLEAN, "boolean", ClassKind::Primitive),
    (ClassId::BYTE, "byte", ClassKind::Primitive),
    (ClassId::SHORT, "short", ClassKind::Primitive),
    (ClassId::INT, "int", ClassKind::Primitive),
    (ClassId::LONG, "long", ClassKind::Primitive),
    (ClassId::FLOAT, "float", ClassKind::Primitive),
    (ClassId::DOUBLE, "double", ClassKind::Primitive),
    (ClassId::CHAR, "char", ClassKind::Primitive),
    (ClassId::BOXED_VOID, "Void", ClassKind::Class),
    (ClassId::BOXED_BOOLEAN, "Boolean", ClassKind::Class),
    (
        ClassId::OBJECT_ARRAY,
        "Object[]",
        ClassKind::Array {
            component: ClassId::OBJECT,
        },
    ),
    (
        ClassId::STRING_ARRAY,
        "String[]",
        ClassKind::Array {
            component: ClassId::STRING,
        },
    ),
];

/// Host reflector backed by registered declarations.
pub struct TypeRegistry {
    classes: DashMap<ClassId, Arc<ClassEntry>, FxBuildHasher>,
    by_name: DashMap<Arc<str>, ClassId, FxBuildHasher>,
    arrays: DashMap<ClassId, ClassId, FxBuildHasher>,
    next_id: AtomicU32,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    pub fn new() -> Self {
        let registry = TypeRegistry {
            classes: DashMap::with_hasher(FxBuildHasher),
            by_name: DashMap::with_hasher(FxBuildHasher),
            arrays: DashMap::with_hasher(FxBuildHasher),
            next_id: AtomicU32::new(ClassId::FIRST_USER),
        };

        for &(id, name, kind) in BUILTINS {
            let superclass = match kind {
                ClassKind::Primitive => None,
                _ if id == ClassId::OBJECT => None,
                _ => Some(ClassId::OBJECT),
            };
            let mut entry = ClassEntry::bare(name, kind, superclass);
            if id == ClassId::CLASS {
                entry.type_params = Arc::from(vec![TypeParam {
                    name: Arc::from("T"),
                    bound: TypeInfo::object(),
                }]);
            }
            registry.insert(id, entry);
            if let ClassKind::Array { component } = kind {
                registry.arrays.insert(component, id);
            }
        }

        registry
    }

    fn insert(&self, id: ClassId, entry: ClassEntry) {
        self.by_name.insert(Arc::clone(&entry.name), id);
        self.classes.insert(id, Arc::new(entry));
    }

    fn entry(&self, class: ClassId) -> Option<Arc<ClassEntry>> {
        self.classes.get(&class).map(|e| Arc::clone(e.value()))
    }

    fn reserve(&self) -> ClassId {
        ClassId(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Start declaring a class.
    pub fn class(&self, name: &str) -> ClassBuilder<'_> {
        ClassBuilder::new(self, name, ClassKind::Class)
    }

    /// Start declaring an interface.
    pub fn interface(&self, name: &str) -> ClassBuilder<'_> {
        ClassBuilder::new(self, name, ClassKind::Interface)
    }

    /// The array class for `component`, created on first request.
    pub fn array_of(&self, component: ClassId) -> ClassId {
        if let Some(id) = self.arrays.get(&component) {
            return *id;
        }

        *self.arrays.entry(component).or_insert_with(|| {
            let id = self.reserve();
            let name = format!("{}[]", self.name(component));
            trace!(component = component.0, array = id.0, "registering array class");
            self.insert(
                id,
                ClassEntry::bare(&name, ClassKind::Array { component }, Some(ClassId::OBJECT)),
            );
            id
        })
    }

    pub fn lookup(&self, name: &str) -> Option<ClassId> {
        self.by_name.get(name).map(|id| *id)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl HostReflector for TypeRegistry {
    fn kind(&self, class: ClassId) -> ClassKind {
        self.entry(class).map(|e| e.kind).unwrap_or(ClassKind::Class)
    }

    fn name(&self, class: ClassId) -> Arc<str> {
        match self.entry(class) {
            Some(e) => Arc::clone(&e.name),
            None => Arc::from(format!("<unregistered #{}>", class.0)),
        }
    }

    fn superclass(&self, class: ClassId) -> Option<ClassId> {
        self.entry(class).and_then(|e| e.superclass)
    }

    fn interfaces(&self, class: ClassId) -> Arc<[ClassId]> {
        self.entry(class)
            .map(|e| Arc::clone(&e.interfaces))
            .unwrap_or_else(|| Arc::from(Vec::new()))
    }

    fn type_params(&self, class: ClassId) -> Arc<[TypeParam]> {
        self.entry(class)
            .map(|e| Arc::clone(&e.type_params))
            .unwrap_or_else(|| Arc::from(Vec::new()))
    }

    fn generic_superclass(&self, class: ClassId) -> Option<TypeInfo> {
        self.entry(class).and_then(|e| e.generic_superclass.clone())
    }

    fn generic_interfaces(&self, class: ClassId) -> Arc<[TypeInfo]> {
        self.entry(class)
            .map(|e| Arc::clone(&e.generic_interfaces))
            .unwrap_or_else(TypeInfo::empty_list)
    }

    fn declared_fields(&self, class: ClassId) -> Arc<[Arc<FieldDecl>]> {
        self.entry(class)
            .map(|e| Arc::clone(&e.fields))
            .unwrap_or_else(|| Arc::from(Vec::new()))
    }

    fn declared_methods(&self, class: ClassId) -> Arc<[Arc<Executable>]> {
        self.entry(class)
            .map(|e| Arc::clone(&e.methods))
            .unwrap_or_else(|| Arc::from(Vec::new()))
    }

    fn declared_constructors(&self, class: ClassId) -> Arc<[Arc<Executable>]> {
        self.entry(class)
            .map(|e| Arc::clone(&e.constructors))
            .unwrap_or_else(|| Arc::from(Vec::new()))
    }

    fn remap_prefixes(&self, class: ClassId) -> Arc<[Arc<str>]> {
        self.entry(class)
            .map(|e| Arc::clone(&e.remap_prefixes))
            .unwrap_or_else(|| Arc::from(Vec::new()))
    }

    fn array_class(&self, component: ClassId) -> ClassId {
        self.array_of(component)
    }
}

/// Declaration of one class, committed with `build`.
///
/// The class id is reserved up front so that declarations can refer to the
/// class's own type variables and to the class itself.
pub struct ClassBuilder<'r> {
    registry: &'r TypeRegistry,
    id: ClassId,
    name: Arc<str>,
    kind: ClassKind,
    superclass: Option<TypeInfo>,
    interfaces: Vec<TypeInfo>,
    type_params: Vec<TypeParam>,
    fields: Vec<FieldDecl>,
    methods: Vec<Executable>,
    constructors: Vec<Executable>,
    remap_prefixes: Vec<Arc<str>>,
}

impl<'r> ClassBuilder<'r> {
    fn new(registry: &'r TypeRegistry, name: &str, kind: ClassKind) -> Self {
        ClassBuilder {
            registry,
            id: registry.reserve(),
            name: Arc::from(name),
            kind,
            superclass: None,
            interfaces: Vec::new(),
            type_params: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            constructors: Vec::new(),
            remap_prefixes: Vec::new(),
        }
    }

    #[inline]
    pub fn id(&self) -> ClassId {
        self.id
    }

    /// Declare an unbounded type parameter and return its variable.
    pub fn type_param(&mut self, name: &str) -> TypeInfo {
        self.bounded_type_param(name, TypeInfo::object())
    }

    pub fn bounded_type_param(&mut self, name: &str, bound: TypeInfo) -> TypeInfo {
        let index = self.type_params.len() as u16;
        self.type_params.push(TypeParam {
            name: Arc::from(name),
            bound,
        });
        TypeInfo::variable(TypeVar::new(self.id, index))
    }

    pub fn extends(&mut self, parent: impl Into<TypeInfo>) -> &mut Self {
        self.superclass = Some(parent.into());
        self
    }

    pub fn implements(&mut self, interface: impl Into<TypeInfo>) -> &mut Self {
        self.interfaces.push(interface.into());
        self
    }

    pub fn field(&mut self, decl: FieldDecl) -> &mut Self {
        self.fields.push(decl);
        self
    }

    pub fn method(&mut self, decl: Executable) -> &mut Self {
        self.methods.push(decl);
        self
    }

    pub fn constructor(&mut self, decl: Executable) -> &mut Self {
        self.constructors.push(decl);
        self
    }

    /// Strip `prefix` from the raw names of this class's own members.
    /// Surrounding whitespace is ignored; a blank prefix is dropped.
    pub fn remap_prefix(&mut self, prefix: &str) -> &mut Self {
        let prefix = prefix.trim();
        if !prefix.is_empty() && !self.remap_prefixes.iter().any(|p| &**p == prefix) {
            self.remap_prefixes.push(Arc::from(prefix));
        }
        self
    }

    fn erase(&self, ty: &TypeInfo) -> ClassId {
        match ty.data() {
            TypeData::Variable(var) if var.owner == self.id => self
                .type_params
                .get(var.index as usize)
                .map(|param| self.erase(&param.bound))
                .unwrap_or(ClassId::OBJECT),
            TypeData::Array(component) => self.registry.array_of(self.erase(component)),
            _ => ty.erasure(self.registry),
        }
    }

    fn finish_executable(&self, mut decl: Executable) -> Arc<Executable> {
        decl.declaring = self.id;
        decl.params = decl.generic_params.iter().map(|p| self.erase(p)).collect();
        if !decl.generic_return.is_none() {
            decl.return_type = self.erase(&decl.generic_return);
        }
        Arc::new(decl)
    }

    /// Commit the declaration and return the class id.
    pub fn build(self) -> ClassId {
        let superclass = match (&self.superclass, self.kind) {
            (Some(ty), _) => Some(self.erase(ty)),
            (None, ClassKind::Class) => Some(ClassId::OBJECT),
            (None, _) => None,
        };
        let interfaces: Vec<ClassId> = self.interfaces.iter().map(|i| self.erase(i)).collect();

        let fields: Vec<Arc<FieldDecl>> = self
            .fields
            .iter()
            .cloned()
            .map(|mut decl| {
                decl.declaring = self.id;
                decl.field_type = self.erase(&decl.generic_type);
                Arc::new(decl)
            })
            .collect();
        let methods: Vec<Arc<Executable>> = self
            .methods
            .iter()
            .cloned()
            .map(|decl| self.finish_executable(decl))
            .collect();
        let constructors: Vec<Arc<Executable>> = self
            .constructors
            .iter()
            .cloned()
            .map(|decl| self.finish_executable(decl))
            .collect();

        trace!(
            class = self.id.0,
            name = %self.name,
            fields = fields.len(),
            methods = methods.len(),
            constructors = constructors.len(),
            "registering class"
        );

        let entry = ClassEntry {
            name: Arc::clone(&self.name),
            kind: self.kind,
            superclass,
            interfaces: Arc::from(interfaces),
            type_params: Arc::from(self.type_params.clone()),
            generic_superclass: self
                .superclass
                .clone()
                .or_else(|| superclass.map(TypeInfo::class)),
            generic_interfaces: Arc::from(self.interfaces.clone()),
            fields: Arc::from(fields),
            methods: Arc::from(methods),
            constructors: Arc::from(constructors),
            remap_prefixes: Arc::from(self.remap_prefixes.clone()),
        };
        self.registry.insert(self.id, entry);
        self.id
    }
}

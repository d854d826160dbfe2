//! Type descriptors.
//!
//! A `TypeDescriptor` is the bridge's view of one host type. It owns three
//! lazily computed tables:
//!
//! - own members: what the type itself declares
//! - merged members: own members folded with every ancestor's
//! - constructors: keyed by exact signature
//!
//! Each table is computed at most once and published whole through a
//! `OnceCell`; a racing reader either waits for the finished table or sees
//! it, never a partial one.
//!
//! ## Hierarchy merge
//!
//! The merge walks the hierarchy breadth first with a FIFO queue seeded with
//! the type itself. Each dequeued node contributes its own members, then
//! enqueues its interfaces (declaration order) followed by its parent.
//! Interfaces reached twice through a diamond are merged twice; re-merging is
//! idempotent.
//!
//! ```text
//! Child ─ implements ─> Named
//!   └─ extends ─> Base ─ implements ─> Named
//!
//! visit order: Child, Named, Base, Named
//! ```

use crate::binding::{CallableBinding, FieldBinding};
use crate::env::Environment;
use crate::signature::Signature;
use crate::slot::{MemberSlot, SlotBuilder};
use hostbridge_common::{BridgeError, DiscoveryOrder, Lookup, Result};
use hostbridge_types::{
    CONSTRUCTOR_NAME, ClassId, ConsolidationMapping, Executable, FieldDecl, HostObject, TypeInfo,
    consolidate_all_with_limit, consolidate_with_limit, visible_field_name, visible_method_name,
};
use once_cell::sync::{Lazy, OnceCell};
use rustc_hash::FxHashMap;
use std::collections::VecDeque;
use std::collections::hash_map::Entry;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

/// Frozen `name -> slot` table.
pub type MemberMap = Arc<FxHashMap<Arc<str>, Arc<MemberSlot>>>;

static EMPTY_MEMBERS: Lazy<MemberMap> = Lazy::new(|| Arc::new(FxHashMap::default()));

/// The shared table every member-less type uses.
pub fn empty_members() -> MemberMap {
    Arc::clone(&EMPTY_MEMBERS)
}

pub struct TypeDescriptor {
    class: ClassId,
    name: Arc<str>,
    parent: Option<Arc<TypeDescriptor>>,
    interfaces: Vec<Arc<TypeDescriptor>>,
    env: Arc<Environment>,
    own: OnceCell<MemberMap>,
    merged: OnceCell<MemberMap>,
    constructors: OnceCell<FxHashMap<Signature, CallableBinding>>,
}

impl TypeDescriptor {
    pub(crate) fn new(
        class: ClassId,
        env: &Arc<Environment>,
        parent: Option<Arc<TypeDescriptor>>,
        interfaces: Vec<Arc<TypeDescriptor>>,
    ) -> Self {
        TypeDescriptor {
            class,
            name: env.reflector().name(class),
            parent,
            interfaces,
            env: Arc::clone(env),
            own: OnceCell::new(),
            merged: OnceCell::new(),
            constructors: OnceCell::new(),
        }
    }

    #[inline]
    pub fn class(&self) -> ClassId {
        self.class
    }

    #[inline]
    pub fn name(&self) -> &Arc<str> {
        &self.name
    }

    /// `None` only for the universal base type and for interfaces.
    #[inline]
    pub fn parent(&self) -> Option<&Arc<TypeDescriptor>> {
        self.parent.as_ref()
    }

    #[inline]
    pub fn interfaces(&self) -> &[Arc<TypeDescriptor>] {
        &self.interfaces
    }

    /// Members declared by this type alone.
    pub fn own_members(&self) -> &MemberMap {
        self.own.get_or_init(|| self.discover_own())
    }

    /// Own and inherited members.
    pub fn merged_members(&self) -> &MemberMap {
        self.merged.get_or_init(|| self.merge_hierarchy())
    }

    /// The slot for a visible name, own or inherited.
    pub fn member(&self, name: &str) -> Option<&Arc<MemberSlot>> {
        self.merged_members().get(name)
    }

    /// Names with something visible behind them, sorted.
    pub fn member_names(&self) -> Vec<Arc<str>> {
        let mut names: Vec<Arc<str>> = self
            .merged_members()
            .values()
            .filter(|slot| slot.is_readable() || slot.is_writable() || slot.has_visible_overloads())
            .map(|slot| Arc::clone(slot.name()))
            .collect();
        names.sort();
        names
    }

    /// The constructor declared with exactly `signature`.
    ///
    /// No compatibility fallback: a constructor taking `Object` is not found
    /// for a `(String)` request.
    pub fn constructor(&self, signature: &Signature) -> Option<&CallableBinding> {
        self.constructors().get(signature)
    }

    pub fn constructors(&self) -> &FxHashMap<Signature, CallableBinding> {
        self.constructors.get_or_init(|| self.discover_constructors())
    }

    /// Create an instance through the exact-signature constructor.
    pub fn construct(
        &self,
        signature: &Signature,
        args: &[Option<HostObject>],
    ) -> Result<Lookup<HostObject>> {
        let Some(ctor) = self.constructor(signature) else {
            return Ok(Lookup::Absent);
        };
        let instance = ctor.invoke(None, args).map_err(|cause| BridgeError::Invocation {
            owner: Arc::clone(&self.name),
            member: Arc::from(CONSTRUCTOR_NAME),
            cause,
        })?;
        Ok(Lookup::present(instance))
    }

    /// This type's consolidation mapping.
    pub fn mapping(&self) -> Arc<ConsolidationMapping> {
        self.env.mapping_for(self.class)
    }

    /// A declared generic type seen from this type.
    pub fn consolidate(&self, ty: &TypeInfo) -> TypeInfo {
        let mapping = self.mapping();
        consolidate_with_limit(ty, &*mapping, self.env.options().max_consolidation_depth)
    }

    /// Return type of `binding` with this type's variable bindings applied.
    pub fn consolidated_return_type(&self, binding: &CallableBinding) -> TypeInfo {
        self.consolidate(&binding.executable().generic_return)
    }

    /// Parameter types of `binding` seen from this type. Shares the declared
    /// list when no parameter mentions a mapped variable.
    pub fn consolidated_param_types(&self, binding: &CallableBinding) -> Arc<[TypeInfo]> {
        let mapping = self.mapping();
        consolidate_all_with_limit(
            &binding.executable().generic_params,
            &*mapping,
            self.env.options().max_consolidation_depth,
        )
    }

    pub fn consolidated_field_type(&self, field: &FieldBinding) -> TypeInfo {
        self.consolidate(&field.field().generic_type)
    }

    fn discover_own(&self) -> MemberMap {
        let options = self.env.options();
        if self.class == ClassId::OBJECT && !options.expose_base_type_members {
            return empty_members();
        }

        let reflector = self.env.reflector();
        let renamer = self.env.renamer();
        let prefixes = reflector.remap_prefixes(self.class);

        let protected = options.include_protected;
        let mut fields: Vec<Arc<FieldDecl>> = reflector
            .declared_fields(self.class)
            .iter()
            .filter(|f| f.is_public() || (protected && f.is_protected()))
            .filter(|f| !f.is_transient() && !f.hidden)
            .cloned()
            .collect();
        let mut methods: Vec<Arc<Executable>> = reflector
            .declared_methods(self.class)
            .iter()
            .filter(|m| (m.is_public() || (protected && m.is_protected())) && !m.is_native())
            .cloned()
            .collect();

        if options.discovery_order == DiscoveryOrder::SortedByName {
            fields.sort_by(|a, b| a.name.cmp(&b.name));
            methods.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.params.cmp(&b.params)));
        }

        let mut slots: FxHashMap<Arc<str>, SlotBuilder> = FxHashMap::default();

        for field in fields {
            let name = visible_field_name(renamer, self.class, &prefixes, &field);
            slot_entry(&mut slots, name).set_field(FieldBinding::new(field));
        }

        for method in methods {
            let name = visible_method_name(renamer, self.class, &prefixes, &method);
            let signature = self.env.signatures().of(&method.params);
            let mut binding = CallableBinding::new(Arc::clone(&method), signature);

            if options.bean_properties && !method.hidden {
                if let Some((accessor, property)) = bean_property(&name, &method) {
                    binding = binding.with_bean(Some(Arc::clone(&property)));
                    let slot = slot_entry(&mut slots, property);
                    match accessor {
                        Accessor::Get => slot.set_bean_get(binding.clone()),
                        Accessor::Set => slot.set_bean_set(binding.clone()),
                    }
                }
            }

            slot_entry(&mut slots, name).add_overload(binding);
        }

        trace!(
            class = self.class.0,
            name = %self.name,
            members = slots.len(),
            "discovered own members"
        );
        self.freeze(slots)
    }

    fn merge_hierarchy(&self) -> MemberMap {
        let mut acc: FxHashMap<Arc<str>, SlotBuilder> = FxHashMap::default();
        let mut queue: VecDeque<&TypeDescriptor> = VecDeque::new();
        queue.push_back(self);
        let mut visited = 0usize;

        while let Some(node) = queue.pop_front() {
            visited += 1;
            for (name, slot) in node.own_members().iter() {
                match acc.entry(Arc::clone(name)) {
                    Entry::Occupied(mut existing) => existing.get_mut().merge(slot),
                    Entry::Vacant(vacant) => {
                        vacant.insert(SlotBuilder::from_slot(slot));
                    }
                }
            }
            queue.extend(node.interfaces.iter().map(|iface| &**iface));
            if let Some(parent) = &node.parent {
                queue.push_back(parent);
            }
        }

        debug!(
            class = self.class.0,
            name = %self.name,
            visited,
            members = acc.len(),
            "merged hierarchy members"
        );
        self.freeze(acc)
    }

    fn discover_constructors(&self) -> FxHashMap<Signature, CallableBinding> {
        let mut constructors = FxHashMap::default();
        for ctor in self.env.reflector().declared_constructors(self.class).iter() {
            if !ctor.is_public() || ctor.hidden {
                continue;
            }
            let signature = self.env.signatures().of(&ctor.params);
            constructors.insert(
                signature.clone(),
                CallableBinding::new(Arc::clone(ctor), signature),
            );
        }
        trace!(
            class = self.class.0,
            name = %self.name,
            constructors = constructors.len(),
            "discovered constructors"
        );
        constructors
    }

    fn freeze(&self, slots: FxHashMap<Arc<str>, SlotBuilder>) -> MemberMap {
        let frozen: FxHashMap<Arc<str>, Arc<MemberSlot>> = slots
            .into_iter()
            .filter(|(_, builder)| !builder.is_empty())
            .map(|(name, builder)| {
                (name, Arc::new(builder.freeze(self.class, &self.name, &self.env)))
            })
            .collect();
        if frozen.is_empty() {
            empty_members()
        } else {
            Arc::new(frozen)
        }
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("class", &self.class)
            .field("name", &self.name)
            .field("parent", &self.parent.as_ref().map(|p| &p.name))
            .field(
                "interfaces",
                &self.interfaces.iter().map(|i| &i.name).collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}

fn slot_entry(slots: &mut FxHashMap<Arc<str>, SlotBuilder>, name: Arc<str>) -> &mut SlotBuilder {
    slots
        .entry(Arc::clone(&name))
        .or_insert_with(|| SlotBuilder::new(name))
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Accessor {
    Get,
    Set,
}

/// Bean property synthesized by a method exposed under `name`, if any.
///
/// - `getXxx()` with a non-void return: getter of `xxx`
/// - `isXxx()` returning `boolean` or `Boolean`: getter of `xxx`
/// - `setXxx(v)`: setter of `xxx`
fn bean_property(name: &str, method: &Executable) -> Option<(Accessor, Arc<str>)> {
    let arity = method.arity();
    if arity == 0
        && name.starts_with("get")
        && uppercase_at(name, 3)
        && !method.return_type.is_void()
    {
        return Some((Accessor::Get, decapitalize(&name[3..])));
    }
    if arity == 1 && name.starts_with("set") && uppercase_at(name, 3) {
        return Some((Accessor::Set, decapitalize(&name[3..])));
    }
    if arity == 0
        && name.starts_with("is")
        && uppercase_at(name, 2)
        && method.return_type.is_boolean()
    {
        return Some((Accessor::Get, decapitalize(&name[2..])));
    }
    None
}

fn uppercase_at(name: &str, index: usize) -> bool {
    name.get(index..)
        .and_then(|rest| rest.chars().next())
        .is_some_and(char::is_uppercase)
}

fn decapitalize(component: &str) -> Arc<str> {
    let mut chars = component.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect::<String>().into(),
        None => Arc::from(component),
    }
}

#[cfg(test)]
#[path = "../tests/descriptor_tests.rs"]
mod tests;

//! Member slots.
//!
//! A `MemberSlot` is everything reachable under one visible name on one type:
//! at most one field, at most one bean getter and setter, and the overload
//! set keyed by signature. Slots are assembled with a `SlotBuilder` during
//! discovery and merge and are frozen before anyone can observe them.
//!
//! Resolution order for a call-site signature:
//! 1. exact signature, non-hidden
//! 2. the first non-hidden overload the environment's matcher accepts, in
//!    overload-set order
//!
//! The result of step 2 (including "nothing matched") is memoized per slot.

use crate::binding::{CallableBinding, FieldBinding};
use crate::env::Environment;
use crate::signature::Signature;
use dashmap::DashMap;
use hostbridge_common::{BridgeError, Lookup, Result};
use hostbridge_types::{ClassId, HostObject};
use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

type Overloads = IndexMap<Signature, CallableBinding, FxBuildHasher>;

pub struct MemberSlot {
    name: Arc<str>,
    owner: ClassId,
    owner_name: Arc<str>,
    field: Option<FieldBinding>,
    bean_get: Option<CallableBinding>,
    bean_set: Option<CallableBinding>,
    overloads: Overloads,
    has_visible: bool,
    dispatch: DashMap<Signature, Option<CallableBinding>, FxBuildHasher>,
    env: Arc<Environment>,
}

impl MemberSlot {
    #[inline]
    pub fn name(&self) -> &Arc<str> {
        &self.name
    }

    /// The type this slot was built for.
    #[inline]
    pub fn owner(&self) -> ClassId {
        self.owner
    }

    #[inline]
    pub fn field(&self) -> Option<&FieldBinding> {
        self.field.as_ref()
    }

    #[inline]
    pub fn bean_get(&self) -> Option<&CallableBinding> {
        self.bean_get.as_ref()
    }

    #[inline]
    pub fn bean_set(&self) -> Option<&CallableBinding> {
        self.bean_set.as_ref()
    }

    /// All overloads, hidden ones included, in dispatch order.
    pub fn overloads(&self) -> impl Iterator<Item = &CallableBinding> {
        self.overloads.values()
    }

    pub fn visible_overloads(&self) -> impl Iterator<Item = &CallableBinding> {
        self.overloads.values().filter(|b| !b.is_hidden())
    }

    /// The overload declared with exactly `signature`, hidden or not.
    pub fn overload(&self, signature: &Signature) -> Option<&CallableBinding> {
        self.overloads.get(signature)
    }

    #[inline]
    pub fn has_visible_overloads(&self) -> bool {
        self.has_visible
    }

    /// Readable through a bean getter or a field.
    pub fn is_readable(&self) -> bool {
        self.bean_get.is_some() || self.field.is_some()
    }

    /// Writable through a bean setter or a non-final field.
    pub fn is_writable(&self) -> bool {
        self.bean_set.is_some() || self.field.as_ref().is_some_and(|f| !f.is_final())
    }

    /// Read the member's value.
    ///
    /// A bean getter wins over a field; a slot with neither is absent.
    pub fn read(&self, receiver: Option<&HostObject>) -> Result<Lookup<HostObject>> {
        if let Some(getter) = &self.bean_get {
            let value = getter
                .invoke(receiver, &[])
                .map_err(|cause| BridgeError::invocation(&self.owner_name, &self.name, cause))?;
            return Ok(Lookup::present(value));
        }
        match &self.field {
            Some(field) => {
                let value = field
                    .get(receiver)
                    .map_err(|cause| BridgeError::invocation(&self.owner_name, &self.name, cause))?;
                Ok(Lookup::present(value))
            }
            None => Ok(Lookup::Absent),
        }
    }

    /// Assign the member's value.
    ///
    /// A bean setter wins over a field. Final fields and getter-only
    /// properties fail with `ImmutableWrite`; a slot that only has overloads
    /// is absent.
    pub fn write(
        &self,
        receiver: Option<&HostObject>,
        value: Option<HostObject>,
    ) -> Result<Lookup<HostObject>> {
        if let Some(setter) = &self.bean_set {
            let result = setter
                .invoke(receiver, &[value])
                .map_err(|cause| BridgeError::invocation(&self.owner_name, &self.name, cause))?;
            return Ok(Lookup::present(result));
        }
        match &self.field {
            Some(field) if !field.is_final() => {
                field
                    .set(receiver, value)
                    .map_err(|cause| BridgeError::invocation(&self.owner_name, &self.name, cause))?;
                Ok(Lookup::Null)
            }
            Some(_) => Err(self.immutable()),
            None if self.bean_get.is_some() => Err(self.immutable()),
            None => Ok(Lookup::Absent),
        }
    }

    /// Call the overload selected for `signature`.
    pub fn invoke(
        &self,
        signature: &Signature,
        receiver: Option<&HostObject>,
        args: &[Option<HostObject>],
    ) -> Result<Lookup<HostObject>> {
        if !self.has_visible_overloads() {
            return Ok(Lookup::Absent);
        }
        let Some(binding) = self.resolve(signature) else {
            return Err(BridgeError::NotApplicable {
                owner: Arc::clone(&self.owner_name),
                member: Arc::clone(&self.name),
                signature: signature.display(self.env.reflector()).to_string(),
            });
        };
        let result = binding
            .invoke(receiver, args)
            .map_err(|cause| BridgeError::invocation(&self.owner_name, &self.name, cause))?;
        Ok(Lookup::present(result))
    }

    /// Select the overload for a call-site signature without calling it.
    pub fn resolve(&self, signature: &Signature) -> Option<CallableBinding> {
        if let Some(exact) = self.overloads.get(signature) {
            if !exact.is_hidden() {
                return Some(exact.clone());
            }
        }

        if let Some(hit) = self.dispatch.get(signature) {
            return hit.value().clone();
        }

        let matcher = self.env.matcher();
        let found = self
            .visible_overloads()
            .find(|candidate| matcher.matches(candidate.signature(), signature))
            .cloned();

        debug!(
            owner = %self.owner_name,
            member = %self.name,
            ?signature,
            resolved = ?found.as_ref().map(CallableBinding::signature),
            "resolved overload"
        );
        self.dispatch
            .entry(signature.clone())
            .or_insert(found)
            .value()
            .clone()
    }

    /// Number of memoized call-site shapes.
    pub fn memoized_shapes(&self) -> usize {
        self.dispatch.len()
    }

    fn immutable(&self) -> BridgeError {
        BridgeError::ImmutableWrite {
            owner: Arc::clone(&self.owner_name),
            member: Arc::clone(&self.name),
        }
    }
}

impl fmt::Debug for MemberSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemberSlot")
            .field("name", &self.name)
            .field("owner", &self.owner_name)
            .field("field", &self.field)
            .field("bean_get", &self.bean_get)
            .field("bean_set", &self.bean_set)
            .field("overloads", &self.overloads.values().collect::<Vec<_>>())
            .finish()
    }
}

/// Mutable slot under construction.
#[derive(Clone)]
pub(crate) struct SlotBuilder {
    name: Arc<str>,
    field: Option<FieldBinding>,
    bean_get: Option<CallableBinding>,
    bean_set: Option<CallableBinding>,
    overloads: Overloads,
}

impl SlotBuilder {
    pub(crate) fn new(name: Arc<str>) -> Self {
        SlotBuilder {
            name,
            field: None,
            bean_get: None,
            bean_set: None,
            overloads: Overloads::default(),
        }
    }

    /// Start a merge accumulator from an already frozen slot.
    pub(crate) fn from_slot(slot: &MemberSlot) -> Self {
        SlotBuilder {
            name: Arc::clone(&slot.name),
            field: slot.field.clone(),
            bean_get: slot.bean_get.clone(),
            bean_set: slot.bean_set.clone(),
            overloads: slot.overloads.clone(),
        }
    }

    pub(crate) fn set_field(&mut self, field: FieldBinding) {
        self.field = Some(field);
    }

    pub(crate) fn set_bean_get(&mut self, binding: CallableBinding) {
        self.bean_get = Some(binding);
    }

    pub(crate) fn set_bean_set(&mut self, binding: CallableBinding) {
        self.bean_set = Some(binding);
    }

    pub(crate) fn add_overload(&mut self, binding: CallableBinding) {
        self.overloads.insert(binding.signature().clone(), binding);
    }

    /// Fold in a slot from a node visited later in the hierarchy walk.
    ///
    /// Field and bean accessors keep whatever is already here. Overloads
    /// with the same signature are replaced by the incoming binding, keeping
    /// the hidden flag and bean name already recorded.
    pub(crate) fn merge(&mut self, incoming: &MemberSlot) {
        if self.field.is_none() {
            self.field = incoming.field.clone();
        }
        if self.bean_get.is_none() {
            self.bean_get = incoming.bean_get.clone();
        }
        if self.bean_set.is_none() {
            self.bean_set = incoming.bean_set.clone();
        }

        for (signature, binding) in &incoming.overloads {
            let merged = match self.overloads.get(signature) {
                Some(existing) => {
                    let bean = existing.bean().or(binding.bean()).cloned();
                    binding
                        .clone()
                        .with_hidden(existing.is_hidden() || binding.is_hidden())
                        .with_bean(bean)
                }
                None => binding.clone(),
            };
            self.overloads.insert(signature.clone(), merged);
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.field.is_none()
            && self.bean_get.is_none()
            && self.bean_set.is_none()
            && self.overloads.is_empty()
    }

    pub(crate) fn freeze(self, owner: ClassId, owner_name: &Arc<str>, env: &Arc<Environment>) -> MemberSlot {
        MemberSlot {
            name: self.name,
            owner,
            owner_name: Arc::clone(owner_name),
            field: self.field,
            bean_get: self.bean_get,
            bean_set: self.bean_set,
            has_visible: self.overloads.values().any(|b| !b.is_hidden()),
            overloads: self.overloads,
            dispatch: DashMap::with_hasher(FxBuildHasher),
            env: Arc::clone(env),
        }
    }
}

#[cfg(test)]
#[path = "../tests/slot_tests.rs"]
mod tests;

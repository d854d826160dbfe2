//! Descriptor cache.
//!
//! One cache per scripting environment. It hands out exactly one
//! `TypeDescriptor` per host type for its whole lifetime, so descriptor
//! equality is pointer equality.
//!
//! Three types never go through the general map:
//! - the universal base type
//! - every array type (one shared descriptor; element behavior lives with the
//!   caller)
//! - the metatype

use crate::descriptor::TypeDescriptor;
use crate::env::Environment;
use dashmap::DashMap;
use hostbridge_common::limits::INITIAL_DESCRIPTOR_CAPACITY;
use hostbridge_types::ClassId;
use once_cell::sync::OnceCell;
use rustc_hash::FxBuildHasher;
use std::sync::Arc;
use tracing::debug;

pub struct DescriptorCache {
    env: Arc<Environment>,
    object: Arc<TypeDescriptor>,
    array: Arc<TypeDescriptor>,
    metatype: OnceCell<Arc<TypeDescriptor>>,
    descriptors: DashMap<ClassId, Arc<TypeDescriptor>, FxBuildHasher>,
}

impl DescriptorCache {
    pub fn new(env: Environment) -> Self {
        let env = Arc::new(env);
        let object = Arc::new(TypeDescriptor::new(ClassId::OBJECT, &env, None, Vec::new()));
        let array = Arc::new(TypeDescriptor::new(
            ClassId::OBJECT_ARRAY,
            &env,
            Some(Arc::clone(&object)),
            Vec::new(),
        ));
        DescriptorCache {
            env,
            object,
            array,
            metatype: OnceCell::new(),
            descriptors: DashMap::with_capacity_and_hasher(
                INITIAL_DESCRIPTOR_CAPACITY,
                FxBuildHasher,
            ),
        }
    }

    #[inline]
    pub fn env(&self) -> &Arc<Environment> {
        &self.env
    }

    /// The descriptor for `class`, created on first request.
    pub fn descriptor_for(&self, class: ClassId) -> Arc<TypeDescriptor> {
        if class == ClassId::OBJECT {
            return Arc::clone(&self.object);
        }
        if class == ClassId::CLASS {
            return Arc::clone(self.metatype.get_or_init(|| self.create(ClassId::CLASS)));
        }
        if self.env.reflector().is_array(class) {
            return Arc::clone(&self.array);
        }

        if let Some(found) = self.descriptors.get(&class) {
            return Arc::clone(found.value());
        }

        // Ancestors are resolved before touching the map so no shard lock is
        // held across the recursion.
        let created = self.create(class);
        Arc::clone(self.descriptors.entry(class).or_insert(created).value())
    }

    /// Descriptor for a possibly-null runtime value's type; null maps to the
    /// universal base type.
    pub fn descriptor_for_value(&self, class: Option<ClassId>) -> Arc<TypeDescriptor> {
        match class {
            Some(class) => self.descriptor_for(class),
            None => Arc::clone(&self.object),
        }
    }

    #[inline]
    pub fn object(&self) -> &Arc<TypeDescriptor> {
        &self.object
    }

    #[inline]
    pub fn array(&self) -> &Arc<TypeDescriptor> {
        &self.array
    }

    /// Number of descriptors in the general map (singletons excluded).
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    fn create(&self, class: ClassId) -> Arc<TypeDescriptor> {
        let reflector = self.env.reflector();
        let parent = reflector
            .superclass(class)
            .map(|parent| self.descriptor_for(parent));
        let interfaces: Vec<Arc<TypeDescriptor>> = reflector
            .interfaces(class)
            .iter()
            .map(|&iface| self.descriptor_for(iface))
            .collect();

        debug!(
            class = class.0,
            name = %reflector.name(class),
            interfaces = interfaces.len(),
            "creating type descriptor"
        );
        Arc::new(TypeDescriptor::new(class, &self.env, parent, interfaces))
    }
}

#[cfg(test)]
#[path = "../tests/cache_tests.rs"]
mod tests;

use super::*;
use hostbridge_types::{Executable, TypeInfo, TypeRegistry};
use std::sync::Barrier;
use std::thread;

fn cache(registry: &Arc<TypeRegistry>) -> DescriptorCache {
    DescriptorCache::new(Environment::new(registry.clone()))
}

#[test]
fn test_descriptor_identity() {
    let registry = Arc::new(TypeRegistry::new());
    let thing = registry.class("demo.Thing").build();
    let cache = cache(&registry);

    let first = cache.descriptor_for(thing);
    let second = cache.descriptor_for(thing);
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first.class(), thing);
    assert_eq!(&**first.name(), "demo.Thing");
}

#[test]
fn test_special_types_are_singletons() {
    let registry = Arc::new(TypeRegistry::new());
    let element = registry.class("demo.Element").build();
    let element_array = registry.array_of(element);
    let cache = cache(&registry);

    assert!(Arc::ptr_eq(&cache.descriptor_for(ClassId::OBJECT), cache.object()));
    assert!(Arc::ptr_eq(&cache.descriptor_for_value(None), cache.object()));
    assert!(Arc::ptr_eq(&cache.descriptor_for(element_array), cache.array()));
    assert!(Arc::ptr_eq(&cache.descriptor_for(ClassId::STRING_ARRAY), cache.array()));
    assert!(Arc::ptr_eq(
        &cache.descriptor_for(ClassId::CLASS),
        &cache.descriptor_for(ClassId::CLASS)
    ));
    assert!(cache.object().parent().is_none());
    assert!(cache.is_empty());
}

#[test]
fn test_ancestors_are_linked() {
    let registry = Arc::new(TypeRegistry::new());
    let named = registry.interface("demo.Named").build();
    let mut base = registry.class("demo.Base");
    base.implements(named);
    let base = base.build();
    let mut leaf = registry.class("demo.Leaf");
    leaf.extends(base);
    let leaf = leaf.build();

    let cache = cache(&registry);
    let leaf_desc = cache.descriptor_for(leaf);
    let base_desc = leaf_desc.parent().expect("parent");

    assert!(Arc::ptr_eq(base_desc, &cache.descriptor_for(base)));
    assert!(Arc::ptr_eq(&base_desc.interfaces()[0], &cache.descriptor_for(named)));
    assert!(Arc::ptr_eq(base_desc.parent().expect("object"), cache.object()));
    assert!(cache.descriptor_for(named).parent().is_none());
    assert_eq!(cache.len(), 3);
}

#[test]
fn test_environments_do_not_share_descriptors() {
    let registry = Arc::new(TypeRegistry::new());
    let thing = registry.class("demo.Thing").build();
    let a = cache(&registry);
    let b = cache(&registry);

    assert!(!Arc::ptr_eq(&a.descriptor_for(thing), &b.descriptor_for(thing)));
}

#[test]
fn test_concurrent_first_access_sees_complete_members() {
    const THREADS: usize = 8;
    const METHODS: usize = 32;

    let registry = Arc::new(TypeRegistry::new());
    let mut base = registry.class("demo.Base");
    for i in 0..METHODS {
        base.method(Executable::method(
            &format!("base{i}"),
            [],
            TypeInfo::class(ClassId::INT),
            |_, _| Ok(None),
        ));
    }
    let base = base.build();
    let mut wide = registry.class("demo.Wide");
    wide.extends(base);
    for i in 0..METHODS {
        wide.method(Executable::method(
            &format!("own{i}"),
            [],
            TypeInfo::class(ClassId::INT),
            |_, _| Ok(None),
        ));
    }
    let wide = wide.build();

    let cache = Arc::new(cache(&registry));
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let cache = Arc::clone(&cache);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                let desc = cache.descriptor_for(wide);
                let size = desc.merged_members().len();
                let found = desc.member("base7").is_some() && desc.member("own31").is_some();
                (Arc::as_ptr(&desc) as usize, Arc::as_ptr(desc.merged_members()) as usize, size, found)
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    for &(desc, members, size, found) in &results {
        assert_eq!(desc, results[0].0, "one descriptor per type");
        assert_eq!(members, results[0].1, "one merged table per descriptor");
        assert_eq!(size, METHODS * 2);
        assert!(found);
    }
}

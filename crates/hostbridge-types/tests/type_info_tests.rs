use super::*;
use crate::registry::TypeRegistry;

#[test]
fn test_shared_singletons_are_reused() {
    assert!(TypeInfo::same(&TypeInfo::object(), &TypeInfo::object()));
    assert!(TypeInfo::same(&TypeInfo::none(), &TypeInfo::none()));
    assert!(TypeInfo::same(&TypeInfo::class(ClassId::OBJECT), &TypeInfo::object()));
    assert!(Arc::ptr_eq(&TypeInfo::empty_list(), &TypeInfo::empty_list()));
}

#[test]
fn test_structural_equality_without_identity() {
    let a = TypeInfo::class(ClassId::STRING);
    let b = TypeInfo::class(ClassId::STRING);

    assert_eq!(a, b);
    assert!(!TypeInfo::same(&a, &b));
}

#[test]
fn test_parameterized_without_params_is_raw_class() {
    let ty = TypeInfo::parameterized(ClassId::CLASS, Vec::new());
    assert_eq!(ty.data(), &TypeData::Class(ClassId::CLASS));
    assert_eq!(ty.raw_class(), Some(ClassId::CLASS));
}

#[test]
fn test_param_out_of_range_is_none() {
    let ty = TypeInfo::parameterized(ClassId::CLASS, vec![TypeInfo::class(ClassId::STRING)]);

    assert_eq!(ty.param(0), TypeInfo::class(ClassId::STRING));
    assert!(ty.param(1).is_none());
    assert!(TypeInfo::class(ClassId::STRING).param(0).is_none());
}

#[test]
fn test_has_variables_looks_inside() {
    let var = TypeInfo::variable(TypeVar::new(ClassId(40), 0));
    let nested = TypeInfo::array(TypeInfo::parameterized(ClassId::CLASS, vec![var.clone()]));

    assert!(var.has_variables());
    assert!(nested.has_variables());
    assert!(!TypeInfo::class(ClassId::STRING).has_variables());
    assert_eq!(var.as_variable(), Some(TypeVar::new(ClassId(40), 0)));
}

#[test]
fn test_erasure_uses_bound_and_array_class() {
    let registry = TypeRegistry::new();
    let mut holder = registry.class("demo.Holder");
    let t = holder.bounded_type_param("T", TypeInfo::class(ClassId::STRING));
    let u = holder.type_param("U");
    holder.build();

    assert_eq!(t.erasure(&registry), ClassId::STRING);
    assert_eq!(u.erasure(&registry), ClassId::OBJECT);
    assert_eq!(TypeInfo::array(t).erasure(&registry), ClassId::STRING_ARRAY);
    assert_eq!(TypeInfo::none().erasure(&registry), ClassId::OBJECT);
}

#[test]
fn test_display_uses_host_names() {
    let registry = TypeRegistry::new();
    let mut boxed = registry.class("demo.Box");
    let t = boxed.type_param("T");
    let boxed = boxed.build();

    let applied = TypeInfo::parameterized(boxed, vec![TypeInfo::class(ClassId::STRING)]);
    assert_eq!(applied.display(&registry).to_string(), "demo.Box<String>");
    assert_eq!(
        TypeInfo::array(applied).display(&registry).to_string(),
        "demo.Box<String>[]"
    );
    assert_eq!(t.display(&registry).to_string(), "T");
}

#[test]
fn test_debug_is_compact() {
    let ty = TypeInfo::parameterized(ClassId(20), vec![TypeInfo::variable(TypeVar::new(ClassId(20), 1))]);
    assert_eq!(format!("{ty:?}"), "#20<#20:T1>");
}

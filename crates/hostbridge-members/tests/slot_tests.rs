use super::*;
use hostbridge_types::{Executable, FieldDecl, FnFieldAccess, Modifiers, TypeInfo, TypeRegistry};
use std::error::Error as _;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

fn env_with(matcher: Option<Arc<dyn crate::matcher::SignatureMatcher>>) -> Arc<Environment> {
    let env = Environment::new(Arc::new(TypeRegistry::new()));
    Arc::new(match matcher {
        Some(matcher) => env.with_matcher(matcher),
        None => env,
    })
}

fn int_object(value: i32) -> HostObject {
    Arc::new(value)
}

fn as_int(lookup: Lookup<HostObject>) -> i32 {
    let value = lookup.into_value().expect("value");
    *value.downcast_ref::<i32>().expect("i32")
}

fn returning(name: &str, params: &[ClassId], value: i32) -> CallableBinding {
    let exec = Executable::method(
        name,
        params.iter().copied().map(TypeInfo::class),
        TypeInfo::class(ClassId::INT),
        move |_, _| Ok(Some(int_object(value))),
    );
    CallableBinding::new(Arc::new(exec), Signature::of(params))
}

fn stored_field(name: &str, modifiers: Modifiers) -> (FieldBinding, Arc<Mutex<Option<HostObject>>>) {
    let cell: Arc<Mutex<Option<HostObject>>> = Arc::new(Mutex::new(None));
    let read = Arc::clone(&cell);
    let write = Arc::clone(&cell);
    let decl = FieldDecl::new(
        name,
        TypeInfo::class(ClassId::INT),
        FnFieldAccess::new(
            move |_| Ok(read.lock().expect("lock").clone()),
            move |_, value| {
                *write.lock().expect("lock") = value;
                Ok(())
            },
        ),
    )
    .with_modifiers(modifiers);
    (FieldBinding::new(Arc::new(decl)), cell)
}

fn freeze(builder: SlotBuilder, env: &Arc<Environment>) -> MemberSlot {
    builder.freeze(ClassId(40), &Arc::from("demo.Thing"), env)
}

#[test]
fn test_read_prefers_bean_getter_over_field() {
    let env = env_with(None);
    let (field, cell) = stored_field("value", Modifiers::PUBLIC);
    *cell.lock().expect("lock") = Some(int_object(1));

    let mut builder = SlotBuilder::new(Arc::from("value"));
    builder.set_field(field);
    builder.set_bean_get(returning("getValue", &[], 2));
    let slot = freeze(builder, &env);

    assert_eq!(as_int(slot.read(None).expect("read")), 2);
}

#[test]
fn test_read_field_distinguishes_null_from_absent() {
    let env = env_with(None);
    let (field, _cell) = stored_field("value", Modifiers::PUBLIC);
    let mut builder = SlotBuilder::new(Arc::from("value"));
    builder.set_field(field);
    let slot = freeze(builder, &env);

    assert!(slot.read(None).expect("read").is_null());

    let mut methods_only = SlotBuilder::new(Arc::from("run"));
    methods_only.add_overload(returning("run", &[], 0));
    let methods_only = freeze(methods_only, &env);
    assert!(methods_only.read(None).expect("read").is_absent());
}

#[test]
fn test_write_mutable_field() {
    let env = env_with(None);
    let (field, cell) = stored_field("value", Modifiers::PUBLIC);
    let mut builder = SlotBuilder::new(Arc::from("value"));
    builder.set_field(field);
    let slot = freeze(builder, &env);

    let result = slot.write(None, Some(int_object(9))).expect("write");
    assert!(result.is_null());
    assert_eq!(as_int(Lookup::present(cell.lock().expect("lock").clone())), 9);
    assert!(slot.is_writable());
}

#[test]
fn test_write_final_field_is_immutable() {
    let env = env_with(None);
    let (field, _cell) = stored_field("LIMIT", Modifiers::PUBLIC | Modifiers::FINAL);
    let mut builder = SlotBuilder::new(Arc::from("LIMIT"));
    builder.set_field(field);
    let slot = freeze(builder, &env);

    let err = slot.write(None, None).expect_err("final");
    assert!(err.is_immutable_write());
    assert_eq!(err.member(), "LIMIT");
    assert!(!slot.is_writable());
}

#[test]
fn test_write_getter_only_property_is_immutable() {
    let env = env_with(None);
    let mut builder = SlotBuilder::new(Arc::from("size"));
    builder.set_bean_get(returning("getSize", &[], 3));
    let slot = freeze(builder, &env);

    assert!(slot.write(None, None).expect_err("read-only").is_immutable_write());
}

#[test]
fn test_write_through_setter() {
    let env = env_with(None);
    let seen = Arc::new(AtomicUsize::new(0));
    let sink = Arc::clone(&seen);
    let setter = Executable::method(
        "setSize",
        [TypeInfo::class(ClassId::INT)],
        TypeInfo::class(ClassId::VOID),
        move |_, args| {
            let value = args[0].as_ref().and_then(|v| v.downcast_ref::<i32>().copied());
            sink.store(value.unwrap_or_default() as usize, Ordering::SeqCst);
            Ok(None)
        },
    );
    let mut builder = SlotBuilder::new(Arc::from("size"));
    builder.set_bean_set(CallableBinding::new(
        Arc::new(setter),
        Signature::of(&[ClassId::INT]),
    ));
    let slot = freeze(builder, &env);

    assert!(slot.write(None, Some(int_object(5))).expect("write").is_null());
    assert_eq!(seen.load(Ordering::SeqCst), 5);
}

#[test]
fn test_write_methods_only_is_absent() {
    let env = env_with(None);
    let mut builder = SlotBuilder::new(Arc::from("run"));
    builder.add_overload(returning("run", &[], 0));
    let slot = freeze(builder, &env);

    assert!(slot.write(None, None).expect("write").is_absent());
}

#[test]
fn test_invoke_exact_overload() {
    let env = env_with(None);
    let mut builder = SlotBuilder::new(Arc::from("pick"));
    builder.add_overload(returning("pick", &[], 0));
    builder.add_overload(returning("pick", &[ClassId::INT], 1));
    builder.add_overload(returning("pick", &[ClassId::STRING], 2));
    let slot = freeze(builder, &env);

    let sig = Signature::of(&[ClassId::STRING]);
    assert_eq!(as_int(slot.invoke(&sig, None, &[None]).expect("invoke")), 2);
    assert_eq!(as_int(slot.invoke(&Signature::empty(), None, &[]).expect("invoke")), 0);
    // Exact hits never touch the memo.
    assert_eq!(slot.memoized_shapes(), 0);
}

#[test]
fn test_invoke_without_candidate_is_not_applicable() {
    let env = env_with(None);
    let mut builder = SlotBuilder::new(Arc::from("pick"));
    builder.add_overload(returning("pick", &[ClassId::INT], 1));
    let slot = freeze(builder, &env);

    let err = slot
        .invoke(&Signature::of(&[ClassId::LONG]), None, &[None])
        .expect_err("no match");
    assert!(err.is_not_applicable());
    assert_eq!(
        err.to_string(),
        "no overload of `demo.Thing.pick` is applicable to (long)"
    );
}

#[test]
fn test_invoke_hidden_only_is_absent() {
    let env = env_with(None);
    let mut builder = SlotBuilder::new(Arc::from("secret"));
    builder.add_overload(returning("secret", &[], 0).with_hidden(true));
    let slot = freeze(builder, &env);

    assert!(slot.invoke(&Signature::empty(), None, &[]).expect("invoke").is_absent());
    assert!(slot.resolve(&Signature::empty()).is_none());
    assert_eq!(slot.overloads().count(), 1);
    assert_eq!(slot.visible_overloads().count(), 0);
}

#[test]
fn test_invocation_failure_keeps_cause() {
    let env = env_with(None);
    let exec = Executable::method("boom", [], TypeInfo::class(ClassId::VOID), |_, _| {
        Err("host exploded".into())
    });
    let mut builder = SlotBuilder::new(Arc::from("boom"));
    builder.add_overload(CallableBinding::new(Arc::new(exec), Signature::empty()));
    let slot = freeze(builder, &env);

    let err = slot.invoke(&Signature::empty(), None, &[]).expect_err("host error");
    assert_eq!(err.source().map(ToString::to_string).as_deref(), Some("host exploded"));
}

#[test]
fn test_compatible_dispatch_is_memoized() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let env = env_with(Some(Arc::new(move |candidate: &Signature, requested: &Signature| {
        counter.fetch_add(1, Ordering::SeqCst);
        candidate.len() == requested.len()
    })));

    let mut builder = SlotBuilder::new(Arc::from("pick"));
    builder.add_overload(returning("pick", &[ClassId::OBJECT], 7));
    let slot = freeze(builder, &env);

    let request = Signature::of(&[ClassId::STRING]);
    assert_eq!(as_int(slot.invoke(&request, None, &[None]).expect("first")), 7);
    let after_first = calls.load(Ordering::SeqCst);
    assert_eq!(as_int(slot.invoke(&request, None, &[None]).expect("second")), 7);

    assert_eq!(calls.load(Ordering::SeqCst), after_first);
    assert_eq!(slot.memoized_shapes(), 1);
}

#[test]
fn test_negative_resolution_is_memoized() {
    let env = env_with(None);
    let mut builder = SlotBuilder::new(Arc::from("pick"));
    builder.add_overload(returning("pick", &[ClassId::INT], 1));
    let slot = freeze(builder, &env);

    let request = Signature::of(&[ClassId::LONG]);
    assert!(slot.resolve(&request).is_none());
    assert!(slot.resolve(&request).is_none());
    assert_eq!(slot.memoized_shapes(), 1);
}

#[test]
fn test_merge_fields_first_wins_overloads_last_wins() {
    let env = env_with(None);
    let (near_field, _) = stored_field("value", Modifiers::PUBLIC | Modifiers::FINAL);
    let (far_field, _) = stored_field("value", Modifiers::PUBLIC);

    let mut near = SlotBuilder::new(Arc::from("value"));
    near.set_field(near_field);
    near.add_overload(returning("value", &[], 1).with_hidden(true));

    let mut far = SlotBuilder::new(Arc::from("value"));
    far.set_field(far_field);
    far.set_bean_get(returning("getValue", &[], 2));
    far.add_overload(returning("value", &[], 3).with_bean(Some(Arc::from("value"))));
    far.add_overload(returning("value", &[ClassId::INT], 4));
    let far = freeze(far, &env);

    let mut acc = SlotBuilder::from_slot(&freeze(near, &env));
    acc.merge(&far);
    let merged = freeze(acc, &env);

    let field = merged.field().expect("field");
    assert!(field.is_final(), "nearer field wins");
    assert!(merged.bean_get().is_some(), "absent accessor is filled in");

    let zero_arg = merged.overload(&Signature::empty()).expect("overload");
    assert!(zero_arg.is_hidden(), "hidden flag is kept");
    assert_eq!(zero_arg.bean_name(), Some("value"));
    assert_eq!(merged.overloads().count(), 2);
    // The later binding replaced the earlier one.
    assert_eq!(as_int(Lookup::present(zero_arg.invoke(None, &[]).expect("call"))), 3);
}

#[test]
fn test_empty_builder() {
    let mut builder = SlotBuilder::new(Arc::from("x"));
    assert!(builder.is_empty());
    builder.add_overload(returning("x", &[], 0));
    assert!(!builder.is_empty());
}

#[test]
fn test_merge_keeps_recorded_bean_name() {
    let env = env_with(None);
    let mut near = SlotBuilder::new(Arc::from("size"));
    near.add_overload(returning("size", &[], 1).with_bean(Some(Arc::from("size"))));

    let mut far = SlotBuilder::new(Arc::from("size"));
    far.add_overload(returning("size", &[], 2).with_bean(Some(Arc::from("length"))));
    let far = freeze(far, &env);

    let mut acc = SlotBuilder::from_slot(&freeze(near, &env));
    acc.merge(&far);
    let merged = freeze(acc, &env);

    let binding = merged.overload(&Signature::empty()).expect("overload");
    assert_eq!(binding.bean_name(), Some("size"));
    assert_eq!(as_int(Lookup::present(binding.invoke(None, &[]).expect("call"))), 2);
}

#[test]
fn test_visibility_is_fixed_at_freeze() {
    let env = env_with(None);
    let mut mixed = SlotBuilder::new(Arc::from("run"));
    mixed.add_overload(returning("run", &[], 1).with_hidden(true));
    mixed.add_overload(returning("run", &[ClassId::INT], 2));
    let mixed = freeze(mixed, &env);
    assert!(mixed.has_visible_overloads());

    let mut hidden = SlotBuilder::new(Arc::from("run"));
    hidden.add_overload(returning("run", &[], 1).with_hidden(true));
    let hidden = freeze(hidden, &env);
    assert!(!hidden.has_visible_overloads());

    // A hidden binding merged over a visible one hides that signature.
    let mut acc = SlotBuilder::from_slot(&mixed);
    let mut later = SlotBuilder::new(Arc::from("run"));
    later.add_overload(returning("run", &[ClassId::INT], 3).with_hidden(true));
    acc.merge(&freeze(later, &env));
    let merged = freeze(acc, &env);
    assert!(!merged.has_visible_overloads());
    assert!(merged.invoke(&Signature::empty(), None, &[]).expect("invoke").is_absent());
}

use super::*;

#[test]
fn test_absent_is_not_null() {
    let absent: Lookup<i32> = Lookup::Absent;
    let null: Lookup<i32> = Lookup::Null;

    assert_ne!(absent, null);
    assert!(absent.is_absent());
    assert!(!absent.is_present());
    assert!(null.is_present());
    assert!(null.is_null());
}

#[test]
fn test_present_wraps_nullable() {
    assert_eq!(Lookup::present(Some(3)), Lookup::Value(3));
    assert_eq!(Lookup::<i32>::present(None), Lookup::Null);
    assert_eq!(Lookup::from(Some("x")), Lookup::Value("x"));
}

#[test]
fn test_into_option_keeps_three_states() {
    assert_eq!(Lookup::<u8>::Absent.into_option(), None);
    assert_eq!(Lookup::<u8>::Null.into_option(), Some(None));
    assert_eq!(Lookup::Value(7u8).into_option(), Some(Some(7)));
}

#[test]
fn test_or_else_only_falls_through_when_absent() {
    let fallback = || Lookup::Value(99);

    assert_eq!(Lookup::Absent.or_else(fallback), Lookup::Value(99));
    assert_eq!(Lookup::Null.or_else(fallback), Lookup::Null);
    assert_eq!(Lookup::Value(1).or_else(fallback), Lookup::Value(1));
}

#[test]
fn test_map_preserves_state() {
    assert_eq!(Lookup::Value(2).map(|v| v * 10), Lookup::Value(20));
    assert_eq!(Lookup::<i32>::Null.map(|v| v * 10), Lookup::Null);
    assert_eq!(Lookup::<i32>::Absent.map(|v| v * 10), Lookup::Absent);
    assert_eq!(Lookup::Value(5).as_ref().value(), Some(&&5));
    assert_eq!(Lookup::Value(5).into_value(), Some(5));
    assert_eq!(Lookup::<i32>::default(), Lookup::Absent);
}

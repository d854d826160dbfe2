use super::*;

#[test]
fn test_defaults() {
    let options = BridgeOptions::default();

    assert_eq!(options.discovery_order, DiscoveryOrder::SortedByName);
    assert!(options.bean_properties);
    assert!(!options.expose_base_type_members);
    assert!(!options.include_protected);
    assert_eq!(options.max_consolidation_depth, limits::MAX_CONSOLIDATION_DEPTH);
}

#[test]
fn test_partial_json_fills_defaults() {
    let options: BridgeOptions =
        serde_json::from_str(r#"{ "discoveryOrder": "declared", "beanProperties": false }"#)
            .expect("valid options");

    assert_eq!(options.discovery_order, DiscoveryOrder::Declared);
    assert!(!options.bean_properties);
    assert_eq!(options.max_consolidation_depth, limits::MAX_CONSOLIDATION_DEPTH);
}

#[test]
fn test_json_round_trip() {
    let options = BridgeOptions::default()
        .with_discovery_order(DiscoveryOrder::Declared)
        .with_bean_properties(false);

    let json = serde_json::to_string(&options).expect("serializable");
    assert!(json.contains("\"discoveryOrder\":\"declared\""));

    let back: BridgeOptions = serde_json::from_str(&json).expect("deserializable");
    assert_eq!(back, options);
}

#[test]
fn test_include_protected_from_json() {
    let options: BridgeOptions =
        serde_json::from_str(r#"{ "includeProtected": true }"#).expect("valid options");

    assert!(options.include_protected);
    assert_eq!(options, BridgeOptions::default().with_include_protected(true));
}

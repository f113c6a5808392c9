//! Parsing of captured access rule responses.

use fmc_core::Envelope;
use fmc_policy::{AccessRule, RuleAction, UpdateAccessRuleRequest};
use std::fs;
use std::path::PathBuf;

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

fn load_rules() -> Envelope<AccessRule> {
    let fixture_path = fixtures_dir().join("access_rules.json");
    let json_data = fs::read_to_string(&fixture_path).unwrap_or_else(|e| {
        panic!(
            "Failed to read fixture at {}: {}",
            fixture_path.display(),
            e
        )
    });
    serde_json::from_str(&json_data)
        .unwrap_or_else(|e| panic!("Failed to deserialize rules: {}\nJSON: {}", e, json_data))
}

#[test]
fn test_deserialize_access_rules() {
    let page = load_rules();
    assert_eq!(page.items.len(), 2);

    let web = &page.items[0];
    assert_eq!(web.action, RuleAction::Allow.as_str());
    assert!(web.send_events_to_fmc);
    let sources = web.source_networks.as_ref().unwrap();
    assert_eq!(sources.objects[0].name.as_deref(), Some("infra"));
    assert_eq!(sources.literals[0]["value"], "10.20.0.0/16");
    assert!(web.extra.contains_key("variableSet"));

    let legacy = &page.items[1];
    assert_eq!(legacy.action, RuleAction::BlockReset.as_str());
    assert!(!legacy.enabled);
    assert!(legacy.source_zones.is_none());
}

#[test]
fn test_rule_update_keeps_literals_and_drops_names() {
    let page = load_rules();
    let update = UpdateAccessRuleRequest::from(&page.items[0]);
    let value = serde_json::to_value(&update).unwrap();

    assert_eq!(
        value["destinationPorts"]["objects"],
        serde_json::json!([{ "id": "1834bd00-38bb-11e2-86aa-62f0c593a59a", "type": "ProtocolPortObject" }])
    );
    assert_eq!(value["destinationPorts"]["literals"][0]["port"], "8443");
    assert!(value.get("variableSet").is_none());
    assert!(value.get("metadata").is_none());
}

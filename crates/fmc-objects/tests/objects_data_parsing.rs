//! Parsing of captured object responses.

use fmc_core::{Envelope, Reference};
use fmc_objects::{NetworkGroup, SecurityZone, UpdateNetworkGroupRequest, UpdateSecurityZoneRequest};
use std::fs;
use std::path::PathBuf;

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

fn load_fixture(name: &str) -> String {
    let fixture_path = fixtures_dir().join(name);
    fs::read_to_string(&fixture_path).unwrap_or_else(|e| {
        panic!(
            "Failed to read fixture at {}: {}",
            fixture_path.display(),
            e
        )
    })
}

#[test]
fn test_deserialize_network_groups() {
    let json_data = load_fixture("network_groups.json");
    let page: Envelope<NetworkGroup> = serde_json::from_str(&json_data)
        .unwrap_or_else(|e| panic!("Failed to deserialize groups: {}\nJSON: {}", e, json_data));

    assert_eq!(page.items.len(), 2);

    let infra = &page.items[0];
    assert_eq!(infra.name, "infra");
    assert_eq!(infra.member_count(), 3);
    assert_eq!(infra.literals[0].value, "198.51.100.7");
    let metadata = infra.metadata.as_ref().unwrap();
    assert_eq!(metadata.last_user.as_ref().unwrap().name, "admin");
    assert!(metadata.timestamp.is_some());

    let system = &page.items[1];
    assert!(system.metadata.as_ref().unwrap().is_read_only());
}

#[test]
fn test_network_group_update_has_bare_members() {
    let json_data = load_fixture("network_groups.json");
    let page: Envelope<NetworkGroup> = serde_json::from_str(&json_data).unwrap();

    let update = UpdateNetworkGroupRequest::from(&page.items[0]);
    assert_eq!(
        update.settings.objects,
        vec![
            Reference::new("0050568A-1A2B-0ed3-0000-004294967801", "Host"),
            Reference::new("0050568A-1A2B-0ed3-0000-004294967802", "Network"),
        ]
    );

    let value = serde_json::to_value(&update).unwrap();
    assert!(value.get("links").is_none());
    assert!(value.get("metadata").is_none());
    assert_eq!(value["description"], "Shared infrastructure");
}

#[test]
fn test_deserialize_security_zones() {
    let json_data = load_fixture("security_zones.json");
    let page: Envelope<SecurityZone> = serde_json::from_str(&json_data).unwrap();

    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[0].interfaces.len(), 1);
    assert_eq!(page.items[1].interface_mode, "INLINE");
    assert!(page.items[1].interfaces.is_empty());

    let update = UpdateSecurityZoneRequest::from(&page.items[0]);
    let value = serde_json::to_value(&update).unwrap();
    assert!(value.get("interfaces").is_none());
    assert_eq!(value["interfaceMode"], "ROUTED");
}

//! Security zones.

use fmc_core::ids::ZoneId;
use fmc_core::{Metadata, Reference};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A security zone.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SecurityZone {
    /// Zone id.
    pub id: ZoneId,
    /// Zone name.
    pub name: String,
    /// Record type, `SecurityZone`.
    #[serde(rename = "type", default)]
    pub object_type: String,
    /// `ROUTED`, `SWITCHED`, `INLINE`, `PASSIVE` or `ASA`.
    #[serde(default)]
    pub interface_mode: String,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Member interfaces, as returned with `groupByDevice`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interfaces: Vec<Value>,
    /// Server bookkeeping.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    /// Attributes not modelled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SecurityZone {
    /// Reference usable in interface and rule payloads.
    #[must_use]
    pub fn reference(&self) -> Reference {
        let object_type = if self.object_type.is_empty() {
            "SecurityZone"
        } else {
            self.object_type.as_str()
        };
        Reference::new(self.id.as_str(), object_type).with_name(self.name.clone())
    }
}

/// Payload creating a security zone.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreateSecurityZoneRequest {
    /// Zone name.
    pub name: String,
    /// Record type.
    #[serde(rename = "type")]
    pub object_type: String,
    /// Interface mode of the members.
    pub interface_mode: String,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CreateSecurityZoneRequest {
    /// A zone for interfaces in `interface_mode`, e.g. `ROUTED`.
    #[must_use]
    pub fn new(name: impl Into<String>, interface_mode: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            object_type: "SecurityZone".to_string(),
            interface_mode: interface_mode.into(),
            description: None,
        }
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Payload modifying a security zone.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateSecurityZoneRequest {
    /// Zone id.
    pub id: ZoneId,
    /// Writable attributes.
    #[serde(flatten)]
    pub settings: CreateSecurityZoneRequest,
}

impl From<&SecurityZone> for UpdateSecurityZoneRequest {
    fn from(zone: &SecurityZone) -> Self {
        Self {
            id: zone.id.clone(),
            settings: CreateSecurityZoneRequest {
                name: zone.name.clone(),
                object_type: "SecurityZone".to_string(),
                interface_mode: zone.interface_mode.clone(),
                description: zone.description.clone(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn create_request_shape() {
        let request = CreateSecurityZoneRequest::new("outside-zone", "ROUTED");
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({ "name": "outside-zone", "type": "SecurityZone", "interfaceMode": "ROUTED" })
        );
    }

    #[test]
    fn zone_reference_carries_name() {
        let zone: SecurityZone = serde_json::from_value(json!({
            "id": "zone-1",
            "name": "inside-zone",
            "type": "SecurityZone",
            "interfaceMode": "ROUTED"
        }))
        .unwrap();

        let reference = zone.reference();
        assert_eq!(reference.name.as_deref(), Some("inside-zone"));
        assert_eq!(reference.bare(), Reference::new("zone-1", "SecurityZone"));
    }
}

//! Network and host objects, and variable sets.

use fmc_core::ids::{ObjectId, VariableSetId};
use fmc_core::Metadata;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The two address object collections. Both share one record shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressKind {
    /// `object/networks`, a prefix such as `10.0.0.0/24`.
    Network,
    /// `object/hosts`, a single address.
    Host,
}

impl AddressKind {
    /// Collection path below the domain.
    #[must_use]
    pub const fn collection(self) -> &'static str {
        match self {
            Self::Network => "object/networks",
            Self::Host => "object/hosts",
        }
    }

    /// Value of the `type` attribute.
    #[must_use]
    pub const fn type_name(self) -> &'static str {
        match self {
            Self::Network => "Network",
            Self::Host => "Host",
        }
    }
}

/// A network or host object.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AddressObject {
    /// Object id.
    pub id: ObjectId,
    /// Object name.
    pub name: String,
    /// `Network` or `Host`.
    #[serde(rename = "type", default)]
    pub object_type: String,
    /// Address or prefix.
    #[serde(default)]
    pub value: String,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether devices may override the value.
    #[serde(default)]
    pub overridable: bool,
    /// Server bookkeeping.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    /// Attributes not modelled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AddressObject {
    /// The collection this object belongs to, from its `type`.
    #[must_use]
    pub fn kind(&self) -> Option<AddressKind> {
        match self.object_type.as_str() {
            "Network" => Some(AddressKind::Network),
            "Host" => Some(AddressKind::Host),
            _ => None,
        }
    }
}

/// Payload creating a network or host object.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateAddressRequest {
    /// Object name.
    pub name: String,
    /// Address or prefix.
    pub value: String,
    /// `Network` or `Host`.
    #[serde(rename = "type")]
    pub object_type: String,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether devices may override the value.
    #[serde(default)]
    pub overridable: bool,
}

impl CreateAddressRequest {
    /// A network object for `prefix`.
    #[must_use]
    pub fn network(name: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self::of_kind(AddressKind::Network, name, prefix)
    }

    /// A host object for `address`.
    #[must_use]
    pub fn host(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self::of_kind(AddressKind::Host, name, address)
    }

    /// An object of the given kind.
    #[must_use]
    pub fn of_kind(kind: AddressKind, name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            object_type: kind.type_name().to_string(),
            description: None,
            overridable: false,
        }
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Allow per-device overrides.
    #[must_use]
    pub const fn overridable(mut self) -> Self {
        self.overridable = true;
        self
    }
}

/// Payload modifying a network or host object.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateAddressRequest {
    /// Object id.
    pub id: ObjectId,
    /// Writable attributes.
    #[serde(flatten)]
    pub settings: CreateAddressRequest,
}

impl From<&AddressObject> for UpdateAddressRequest {
    fn from(object: &AddressObject) -> Self {
        Self {
            id: object.id.clone(),
            settings: CreateAddressRequest {
                name: object.name.clone(),
                value: object.value.clone(),
                object_type: object.object_type.clone(),
                description: object.description.clone(),
                overridable: object.overridable,
            },
        }
    }
}

/// A variable set used by intrusion policies.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VariableSet {
    /// Variable set id.
    pub id: VariableSetId,
    /// Name, e.g. `Default-Set`.
    pub name: String,
    /// Record type, `VariableSet`.
    #[serde(rename = "type", default)]
    pub object_type: String,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Variables, passed through as returned.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub variables: Vec<Value>,
    /// Server bookkeeping.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    /// Attributes not modelled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn network_request_shape() {
        let request = CreateAddressRequest::network("net10", "10.0.0.0/24").with_description("lab");
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "name": "net10",
                "value": "10.0.0.0/24",
                "type": "Network",
                "description": "lab",
                "overridable": false
            })
        );
    }

    #[test]
    fn update_request_drops_links_and_metadata() {
        let object: AddressObject = serde_json::from_value(json!({
            "id": "00505686-7E83-0ed3-0000-000000001234",
            "name": "dns-1",
            "type": "Host",
            "value": "192.0.2.53",
            "overridable": true,
            "links": { "self": "https://fmc/x" },
            "metadata": { "readOnly": { "state": false } }
        }))
        .unwrap();

        assert_eq!(object.kind(), Some(AddressKind::Host));
        let value = serde_json::to_value(UpdateAddressRequest::from(&object)).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "00505686-7E83-0ed3-0000-000000001234",
                "name": "dns-1",
                "value": "192.0.2.53",
                "type": "Host",
                "overridable": true
            })
        );
    }

    #[test]
    fn kind_paths() {
        assert_eq!(AddressKind::Network.collection(), "object/networks");
        assert_eq!(AddressKind::Host.type_name(), "Host");
    }
}

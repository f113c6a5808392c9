//! Device record and chassis models.

use fmc_core::ids::DeviceId;
use fmc_core::{Metadata, Reference};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A managed device (FTD) as returned by `devices/devicerecords`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    /// Device record id.
    pub id: DeviceId,
    /// Display name.
    pub name: String,
    /// Record type, `Device`.
    #[serde(rename = "type", default)]
    pub object_type: String,
    /// Management address the FMC reaches the device on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_name: Option<String>,
    /// Hardware model, e.g. `Cisco Firepower Threat Defense for VMware`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Software version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sw_version: Option<String>,
    /// Health summary, e.g. `green`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_status: Option<String>,
    /// Assigned access control policy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_policy: Option<Reference>,
    /// Whether the device may send packet data to the FMC.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prohibit_packet_transfer: Option<bool>,
    /// Server bookkeeping.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    /// Attributes not modelled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Payload registering a new device.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateDeviceRequest {
    /// Display name.
    pub name: String,
    /// Management address of the device.
    pub host_name: String,
    /// Registration key configured on the device.
    pub reg_key: String,
    /// NAT id, when the device sits behind NAT.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nat_id: Option<String>,
    /// Access control policy to deploy.
    pub access_policy: Reference,
    /// Feature licenses, e.g. `BASE`, `THREAT`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub license_caps: Vec<String>,
    /// Performance tier for virtual devices, e.g. `FTDv30`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub performance_tier: Option<String>,
    /// Record type.
    #[serde(rename = "type")]
    pub object_type: String,
}

impl CreateDeviceRequest {
    /// Minimal registration payload.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        host_name: impl Into<String>,
        reg_key: impl Into<String>,
        access_policy: Reference,
    ) -> Self {
        Self {
            name: name.into(),
            host_name: host_name.into(),
            reg_key: reg_key.into(),
            nat_id: None,
            access_policy: access_policy.bare(),
            license_caps: Vec::new(),
            performance_tier: None,
            object_type: "Device".to_string(),
        }
    }
}

/// Payload modifying a device record. Only these attributes are writable.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDeviceRequest {
    /// Device record id.
    pub id: DeviceId,
    /// Display name.
    pub name: String,
    /// Record type.
    #[serde(rename = "type")]
    pub object_type: String,
    /// Management address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_name: Option<String>,
    /// Whether the device may send packet data to the FMC.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prohibit_packet_transfer: Option<bool>,
}

impl From<&Device> for UpdateDeviceRequest {
    fn from(device: &Device) -> Self {
        Self {
            id: device.id.clone(),
            name: device.name.clone(),
            object_type: if device.object_type.is_empty() {
                "Device".to_string()
            } else {
                device.object_type.clone()
            },
            host_name: device.host_name.clone(),
            prohibit_packet_transfer: device.prohibit_packet_transfer,
        }
    }
}

/// A chassis managed by the FMC (multi-instance hardware).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Chassis {
    /// Chassis id.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Record type.
    #[serde(rename = "type", default)]
    pub object_type: String,
    /// Chassis model.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Attributes not modelled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

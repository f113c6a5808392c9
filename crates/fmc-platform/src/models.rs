//! Platform information models.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A domain as listed by `info/domain`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DomainInfo {
    /// Domain UUID.
    #[serde(alias = "uuid")]
    pub id: String,
    /// Full domain name, e.g. `Global/Tenant-A`.
    pub name: String,
    /// Record type, `Domain`.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub object_type: Option<String>,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Attributes not modelled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DomainInfo {
    /// Returns the last path component of the name (`Tenant-A` for
    /// `Global/Tenant-A`).
    #[must_use]
    pub fn leaf_name(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }
}

/// Software versions reported by `info/serverversion`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ServerVersion {
    /// Record id, when the server includes one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// FMC software version, e.g. `7.2.5 (build 208)`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_version: Option<String>,
    /// Geolocation database version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geo_version: Option<String>,
    /// Vulnerability database version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vdb_version: Option<String>,
    /// Intrusion rule update version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sru_version: Option<String>,
    /// Security intelligence feed version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lsp_version: Option<String>,
    /// Attributes not modelled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

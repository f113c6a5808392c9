//! Shared types used across the FMC resource crates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reference to another object by id and type.
///
/// This is how the controller links records together: zones on interfaces,
/// members of groups, networks and gateways of static routes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reference {
    /// Object id.
    pub id: String,
    /// Object type, e.g. `Network`, `Host`, `SecurityZone`.
    #[serde(rename = "type")]
    pub object_type: String,
    /// Object name, when the server includes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Reference {
    /// Creates a reference without a name.
    #[must_use]
    pub fn new(id: impl Into<String>, object_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            object_type: object_type.into(),
            name: None,
        }
    }

    /// Returns the same reference with only `id` and `type` kept.
    #[must_use]
    pub fn bare(&self) -> Self {
        Self::new(self.id.clone(), self.object_type.clone())
    }

    /// Sets the name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Server-maintained bookkeeping attached to every record.
///
/// Read-only: request types never carry it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    /// Last modification time.
    #[serde(
        default,
        with = "chrono::serde::ts_milliseconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub timestamp: Option<DateTime<Utc>>,
    /// User who last modified the record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_user: Option<LastUser>,
    /// Domain owning the record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<DomainRef>,
    /// Set when the record cannot be modified.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_only: Option<ReadOnly>,
}

impl Metadata {
    /// Returns true when the record is marked read-only.
    #[must_use]
    pub fn is_read_only(&self) -> bool {
        self.read_only.as_ref().is_some_and(|ro| ro.state)
    }
}

/// Last modifying user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastUser {
    /// Login name.
    pub name: String,
}

/// Domain a record belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainRef {
    /// Domain name, e.g. `Global`.
    #[serde(default)]
    pub name: String,
    /// Domain UUID.
    #[serde(default)]
    pub id: String,
}

/// Read-only marker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadOnly {
    /// Whether the record is read-only.
    pub state: bool,
    /// Reason, e.g. `SYSTEM`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

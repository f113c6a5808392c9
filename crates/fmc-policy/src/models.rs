//! Access control policy models.

use fmc_core::ids::PolicyId;
use fmc_core::{Metadata, Reference};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Action applied to traffic no rule matched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DefaultAction {
    /// Id of the default action record. Present on read, required on update.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// `BLOCK`, `TRUST`, `PERMIT`, `NETWORK_DISCOVERY` or an intrusion
    /// policy action.
    pub action: String,
    /// Record type, `AccessPolicyDefaultAction`.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub object_type: Option<String>,
    /// Log at connection start.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_begin: Option<bool>,
    /// Log at connection end.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_end: Option<bool>,
    /// Send connection events to the FMC.
    #[serde(
        rename = "sendEventsToFMC",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub send_events_to_fmc: Option<bool>,
    /// Intrusion policy applied by the default action.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intrusion_policy: Option<Reference>,
}

impl DefaultAction {
    /// A default action with only `action` set.
    #[must_use]
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            ..Self::default()
        }
    }
}

/// An access control policy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AccessPolicy {
    /// Policy id.
    pub id: PolicyId,
    /// Policy name.
    pub name: String,
    /// Record type, `AccessPolicy`.
    #[serde(rename = "type", default)]
    pub object_type: String,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Default action.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_action: Option<DefaultAction>,
    /// Link to the rules collection; rules are listed separately.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules: Option<Value>,
    /// Server bookkeeping.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    /// Attributes not modelled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AccessPolicy {
    /// Reference usable when assigning the policy to a device.
    #[must_use]
    pub fn reference(&self) -> Reference {
        Reference::new(self.id.as_str(), "AccessPolicy").with_name(self.name.clone())
    }
}

/// Payload creating an access control policy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccessPolicyRequest {
    /// Policy name.
    pub name: String,
    /// Record type.
    #[serde(rename = "type")]
    pub object_type: String,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Default action.
    pub default_action: DefaultAction,
}

impl CreateAccessPolicyRequest {
    /// A policy with the given default action, e.g. `BLOCK`.
    #[must_use]
    pub fn new(name: impl Into<String>, default_action: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            object_type: "AccessPolicy".to_string(),
            description: None,
            default_action: DefaultAction::new(default_action),
        }
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Payload modifying an access control policy. Rules and metadata are not
/// part of it; the FMC answers 422 when they are sent back.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAccessPolicyRequest {
    /// Policy id.
    pub id: PolicyId,
    /// Policy name.
    pub name: String,
    /// Record type.
    #[serde(rename = "type")]
    pub object_type: String,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Default action, including its id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_action: Option<DefaultAction>,
}

impl From<&AccessPolicy> for UpdateAccessPolicyRequest {
    fn from(policy: &AccessPolicy) -> Self {
        Self {
            id: policy.id.clone(),
            name: policy.name.clone(),
            object_type: "AccessPolicy".to_string(),
            description: policy.description.clone(),
            default_action: policy.default_action.clone(),
        }
    }
}

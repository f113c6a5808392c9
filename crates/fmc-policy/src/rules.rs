//! Access rules.

use fmc_core::ids::RuleId;
use fmc_core::{Metadata, Reference};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Rule actions accepted by the FMC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleAction {
    /// Inspect and allow.
    Allow,
    /// Allow without inspection.
    Trust,
    /// Log and continue matching.
    Monitor,
    /// Drop.
    Block,
    /// Drop and reset the connection.
    BlockReset,
    /// Show a block page the user may bypass.
    BlockInteractive,
    /// Interactive block with reset.
    BlockResetInteractive,
}

impl RuleAction {
    /// Wire value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Allow => "ALLOW",
            Self::Trust => "TRUST",
            Self::Monitor => "MONITOR",
            Self::Block => "BLOCK",
            Self::BlockReset => "BLOCK_RESET",
            Self::BlockInteractive => "BLOCK_INTERACTIVE",
            Self::BlockResetInteractive => "BLOCK_RESET_INTERACTIVE",
        }
    }
}

impl fmt::Display for RuleAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Objects and literals a rule condition matches.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ObjectSelection {
    /// Referenced objects.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub objects: Vec<Reference>,
    /// Inline literals. Their shape depends on the condition (addresses,
    /// ports, VLAN tags), so they are kept as JSON.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub literals: Vec<Value>,
}

impl ObjectSelection {
    /// A selection of the given objects, reduced to `{id, type}`.
    #[must_use]
    pub fn of<'a>(objects: impl IntoIterator<Item = &'a Reference>) -> Self {
        Self {
            objects: objects.into_iter().map(Reference::bare).collect(),
            literals: Vec::new(),
        }
    }

    /// Add a literal.
    #[must_use]
    pub fn with_literal(mut self, literal: Value) -> Self {
        self.literals.push(literal);
        self
    }

    /// Same selection with bare object references.
    #[must_use]
    pub fn bare(&self) -> Self {
        Self {
            objects: self.objects.iter().map(Reference::bare).collect(),
            literals: self.literals.clone(),
        }
    }

    fn is_empty(&self) -> bool {
        self.objects.is_empty() && self.literals.is_empty()
    }
}

/// An access rule of a policy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AccessRule {
    /// Rule id.
    pub id: RuleId,
    /// Rule name.
    pub name: String,
    /// Record type, `AccessRule`.
    #[serde(rename = "type", default)]
    pub object_type: String,
    /// Action, e.g. `ALLOW`.
    #[serde(default)]
    pub action: String,
    /// Whether the rule is active.
    #[serde(default)]
    pub enabled: bool,
    /// Source zones.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_zones: Option<ObjectSelection>,
    /// Destination zones.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_zones: Option<ObjectSelection>,
    /// Source networks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_networks: Option<ObjectSelection>,
    /// Destination networks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_networks: Option<ObjectSelection>,
    /// Destination ports.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_ports: Option<ObjectSelection>,
    /// Log at connection start.
    #[serde(default)]
    pub log_begin: bool,
    /// Log at connection end.
    #[serde(default)]
    pub log_end: bool,
    /// Send connection events to the FMC.
    #[serde(rename = "sendEventsToFMC", default)]
    pub send_events_to_fmc: bool,
    /// Server bookkeeping.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    /// Attributes not modelled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Payload creating an access rule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccessRuleRequest {
    /// Rule name.
    pub name: String,
    /// Record type.
    #[serde(rename = "type")]
    pub object_type: String,
    /// Action, see [`RuleAction`].
    pub action: String,
    /// Whether the rule is active.
    pub enabled: bool,
    /// Source zones.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_zones: Option<ObjectSelection>,
    /// Destination zones.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_zones: Option<ObjectSelection>,
    /// Source networks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_networks: Option<ObjectSelection>,
    /// Destination networks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_networks: Option<ObjectSelection>,
    /// Destination ports.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_ports: Option<ObjectSelection>,
    /// Log at connection start.
    #[serde(default)]
    pub log_begin: bool,
    /// Log at connection end.
    #[serde(default)]
    pub log_end: bool,
    /// Send connection events to the FMC.
    #[serde(rename = "sendEventsToFMC", default)]
    pub send_events_to_fmc: bool,
}

impl CreateAccessRuleRequest {
    /// An enabled rule with no conditions.
    #[must_use]
    pub fn new(name: impl Into<String>, action: RuleAction) -> Self {
        Self {
            name: name.into(),
            object_type: "AccessRule".to_string(),
            action: action.as_str().to_string(),
            enabled: true,
            source_zones: None,
            destination_zones: None,
            source_networks: None,
            destination_networks: None,
            destination_ports: None,
            log_begin: false,
            log_end: false,
            send_events_to_fmc: false,
        }
    }

    /// Match traffic entering through these zones.
    #[must_use]
    pub fn with_source_zones<'a>(mut self, zones: impl IntoIterator<Item = &'a Reference>) -> Self {
        self.source_zones = Some(ObjectSelection::of(zones));
        self
    }

    /// Match traffic leaving through these zones.
    #[must_use]
    pub fn with_destination_zones<'a>(
        mut self,
        zones: impl IntoIterator<Item = &'a Reference>,
    ) -> Self {
        self.destination_zones = Some(ObjectSelection::of(zones));
        self
    }

    /// Match these source networks.
    #[must_use]
    pub fn with_source_networks(mut self, networks: ObjectSelection) -> Self {
        self.source_networks = Some(networks);
        self
    }

    /// Match these destination networks.
    #[must_use]
    pub fn with_destination_networks(mut self, networks: ObjectSelection) -> Self {
        self.destination_networks = Some(networks);
        self
    }

    /// Match these destination ports.
    #[must_use]
    pub fn with_destination_ports(mut self, ports: ObjectSelection) -> Self {
        self.destination_ports = Some(ports);
        self
    }

    /// Log at connection end and send the events to the FMC.
    #[must_use]
    pub const fn logged(mut self) -> Self {
        self.log_end = true;
        self.send_events_to_fmc = true;
        self
    }
}

/// Payload modifying an access rule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UpdateAccessRuleRequest {
    /// Rule id.
    pub id: RuleId,
    /// Writable attributes.
    #[serde(flatten)]
    pub settings: CreateAccessRuleRequest,
}

fn bare_selection(selection: Option<&ObjectSelection>) -> Option<ObjectSelection> {
    selection
        .map(ObjectSelection::bare)
        .filter(|selection| !selection.is_empty())
}

impl From<&AccessRule> for UpdateAccessRuleRequest {
    fn from(rule: &AccessRule) -> Self {
        Self {
            id: rule.id.clone(),
            settings: CreateAccessRuleRequest {
                name: rule.name.clone(),
                object_type: "AccessRule".to_string(),
                action: rule.action.clone(),
                enabled: rule.enabled,
                source_zones: bare_selection(rule.source_zones.as_ref()),
                destination_zones: bare_selection(rule.destination_zones.as_ref()),
                source_networks: bare_selection(rule.source_networks.as_ref()),
                destination_networks: bare_selection(rule.destination_networks.as_ref()),
                destination_ports: bare_selection(rule.destination_ports.as_ref()),
                log_begin: rule.log_begin,
                log_end: rule.log_end,
                send_events_to_fmc: rule.send_events_to_fmc,
            },
        }
    }
}

/// Where a new rule goes in the policy.
///
/// `insert_after` and `insert_before` are 1-based rule indices. `section` is
/// `mandatory` or `default`; `category` names a user category. With nothing
/// set the rule is appended to the default section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RulePlacement {
    /// Insert after the rule with this index.
    pub insert_after: Option<u32>,
    /// Insert before the rule with this index.
    pub insert_before: Option<u32>,
    /// Section to insert into.
    pub section: Option<String>,
    /// Category to insert into.
    pub category: Option<String>,
}

impl RulePlacement {
    /// Append at the end of the default section.
    #[must_use]
    pub fn append() -> Self {
        Self::default()
    }

    /// Insert after rule `index`.
    #[must_use]
    pub fn after(index: u32) -> Self {
        Self {
            insert_after: Some(index),
            ..Self::default()
        }
    }

    /// Insert before rule `index`.
    #[must_use]
    pub fn before(index: u32) -> Self {
        Self {
            insert_before: Some(index),
            ..Self::default()
        }
    }

    /// Insert into `section`.
    #[must_use]
    pub fn in_section(section: impl Into<String>) -> Self {
        Self {
            section: Some(section.into()),
            ..Self::default()
        }
    }

    /// Insert into `category`.
    #[must_use]
    pub fn in_category(category: impl Into<String>) -> Self {
        Self {
            category: Some(category.into()),
            ..Self::default()
        }
    }

    /// Query pairs; unset fields are omitted.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(index) = self.insert_after {
            pairs.push(("insertAfter", index.to_string()));
        }
        if let Some(index) = self.insert_before {
            pairs.push(("insertBefore", index.to_string()));
        }
        if let Some(section) = &self.section {
            pairs.push(("section", section.clone()));
        }
        if let Some(category) = &self.category {
            pairs.push(("category", category.clone()));
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn create_request_shape() {
        let inside = Reference::new("z1", "SecurityZone").with_name("inside");
        let outside = Reference::new("z2", "SecurityZone").with_name("outside");
        let request = CreateAccessRuleRequest::new("allow-web", RuleAction::Allow)
            .with_source_zones([&inside])
            .with_destination_zones([&outside])
            .with_destination_ports(ObjectSelection::default().with_literal(json!({
                "type": "PortLiteral", "port": "443", "protocol": "6"
            })))
            .logged();

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "name": "allow-web",
                "type": "AccessRule",
                "action": "ALLOW",
                "enabled": true,
                "sourceZones": { "objects": [{ "id": "z1", "type": "SecurityZone" }] },
                "destinationZones": { "objects": [{ "id": "z2", "type": "SecurityZone" }] },
                "destinationPorts": {
                    "literals": [{ "type": "PortLiteral", "port": "443", "protocol": "6" }]
                },
                "logBegin": false,
                "logEnd": true,
                "sendEventsToFMC": true
            })
        );
    }

    #[test]
    fn placement_pairs() {
        assert!(RulePlacement::append().to_pairs().is_empty());
        assert_eq!(
            RulePlacement::after(3).to_pairs(),
            vec![("insertAfter", "3".to_string())]
        );
        let placement = RulePlacement {
            section: Some("mandatory".into()),
            category: Some("infra".into()),
            ..RulePlacement::default()
        };
        assert_eq!(
            placement.to_pairs(),
            vec![
                ("section", "mandatory".to_string()),
                ("category", "infra".to_string())
            ]
        );
    }

    #[test]
    fn update_from_rule_strips_names_and_empty_conditions() {
        let rule: AccessRule = serde_json::from_value(json!({
            "id": "r1",
            "name": "allow-dns",
            "type": "AccessRule",
            "action": "ALLOW",
            "enabled": true,
            "sourceNetworks": {
                "objects": [{ "id": "n1", "type": "Network", "name": "lan", "overridable": false }]
            },
            "destinationNetworks": {},
            "metadata": { "readOnly": { "state": false } }
        }))
        .unwrap();

        let value = serde_json::to_value(UpdateAccessRuleRequest::from(&rule)).unwrap();
        assert_eq!(
            value["sourceNetworks"],
            json!({ "objects": [{ "id": "n1", "type": "Network" }] })
        );
        assert!(value.get("destinationNetworks").is_none());
        assert!(value.get("metadata").is_none());
        assert_eq!(value["id"], "r1");
    }

    #[test]
    fn action_wire_values() {
        assert_eq!(RuleAction::BlockResetInteractive.to_string(), "BLOCK_RESET_INTERACTIVE");
        assert_eq!(RuleAction::Trust.as_str(), "TRUST");
    }
}

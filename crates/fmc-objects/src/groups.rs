//! Network groups.
//!
//! A group lists member objects by reference and inline literals. The FMC
//! rejects member references carrying anything beyond `id` and `type`, so the
//! request builders reduce members with [`Reference::bare`].

use fmc_core::ids::ObjectId;
use fmc_core::{Metadata, Reference};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Inline member of a group.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GroupLiteral {
    /// `Network` or `Host`.
    #[serde(rename = "type")]
    pub object_type: String,
    /// Address or prefix.
    pub value: String,
}

impl GroupLiteral {
    /// A literal prefix.
    #[must_use]
    pub fn network(prefix: impl Into<String>) -> Self {
        Self {
            object_type: "Network".to_string(),
            value: prefix.into(),
        }
    }

    /// A literal host address.
    #[must_use]
    pub fn host(address: impl Into<String>) -> Self {
        Self {
            object_type: "Host".to_string(),
            value: address.into(),
        }
    }
}

/// A network group.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NetworkGroup {
    /// Group id.
    pub id: ObjectId,
    /// Group name.
    pub name: String,
    /// Record type, `NetworkGroup`.
    #[serde(rename = "type", default)]
    pub object_type: String,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether devices may override the membership.
    #[serde(default)]
    pub overridable: bool,
    /// Member objects.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub objects: Vec<Reference>,
    /// Inline members.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub literals: Vec<GroupLiteral>,
    /// Server bookkeeping.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    /// Attributes not modelled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NetworkGroup {
    /// Number of members, objects and literals together.
    #[must_use]
    pub fn member_count(&self) -> usize {
        self.objects.len() + self.literals.len()
    }
}

/// Payload creating a network group.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateNetworkGroupRequest {
    /// Group name.
    pub name: String,
    /// Record type.
    #[serde(rename = "type")]
    pub object_type: String,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether devices may override the membership.
    #[serde(default)]
    pub overridable: bool,
    /// Member objects as bare references.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub objects: Vec<Reference>,
    /// Inline members.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub literals: Vec<GroupLiteral>,
}

impl CreateNetworkGroupRequest {
    /// An empty group.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            object_type: "NetworkGroup".to_string(),
            description: None,
            overridable: false,
            objects: Vec::new(),
            literals: Vec::new(),
        }
    }

    /// Add a member object.
    #[must_use]
    pub fn with_object(mut self, member: &Reference) -> Self {
        self.objects.push(member.bare());
        self
    }

    /// Add several member objects.
    #[must_use]
    pub fn with_objects<'a>(mut self, members: impl IntoIterator<Item = &'a Reference>) -> Self {
        self.objects.extend(members.into_iter().map(Reference::bare));
        self
    }

    /// Add an inline member.
    #[must_use]
    pub fn with_literal(mut self, literal: GroupLiteral) -> Self {
        self.literals.push(literal);
        self
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Bare member references, even if the caller pushed full ones into
    /// `objects` directly.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.objects = self.objects.iter().map(Reference::bare).collect();
        self
    }
}

/// Payload modifying a network group.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateNetworkGroupRequest {
    /// Group id.
    pub id: ObjectId,
    /// Writable attributes.
    #[serde(flatten)]
    pub settings: CreateNetworkGroupRequest,
}

impl UpdateNetworkGroupRequest {
    /// Bare member references, even if the caller pushed full ones into
    /// `settings.objects` directly.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.settings = self.settings.normalized();
        self
    }
}

impl From<&NetworkGroup> for UpdateNetworkGroupRequest {
    fn from(group: &NetworkGroup) -> Self {
        Self {
            id: group.id.clone(),
            settings: CreateNetworkGroupRequest {
                name: group.name.clone(),
                object_type: "NetworkGroup".to_string(),
                description: group.description.clone(),
                overridable: group.overridable,
                objects: group.objects.iter().map(Reference::bare).collect(),
                literals: group.literals.clone(),
            },
        }
    }
}

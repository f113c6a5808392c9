//! IPv4 static route models.
//!
//! Routes have no usable name on the FMC; they are identified by the networks
//! they cover and their gateway. [`Ipv4StaticRoute::matches`] implements that
//! lookup.

use fmc_core::ids::RouteId;
use fmc_core::{Metadata, Reference};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Next hop of a static route: a network object or a literal address.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Gateway {
    /// Host object used as gateway.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object: Option<Reference>,
    /// Literal gateway address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub literal: Option<LiteralAddress>,
}

impl Gateway {
    /// Gateway given by a host object.
    #[must_use]
    pub fn object(reference: &Reference) -> Self {
        Self {
            object: Some(reference.bare()),
            literal: None,
        }
    }

    /// Gateway given by a literal host address.
    #[must_use]
    pub fn literal(address: impl Into<String>) -> Self {
        Self {
            object: None,
            literal: Some(LiteralAddress {
                object_type: "Host".to_string(),
                value: address.into(),
            }),
        }
    }

    /// True when `needle` is the id or name of the gateway object, or the
    /// literal address.
    #[must_use]
    pub fn matches(&self, needle: &str) -> bool {
        self.object
            .as_ref()
            .is_some_and(|obj| obj.id == needle || obj.name.as_deref() == Some(needle))
            || self
                .literal
                .as_ref()
                .is_some_and(|literal| literal.value == needle)
    }
}

/// Inline address literal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LiteralAddress {
    /// Literal type, `Host` for gateways.
    #[serde(rename = "type")]
    pub object_type: String,
    /// Address.
    pub value: String,
}

/// An IPv4 static route of a device.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Ipv4StaticRoute {
    /// Route id.
    pub id: RouteId,
    /// Record type, `IPv4StaticRoute`.
    #[serde(rename = "type", default)]
    pub object_type: String,
    /// Logical name of the egress interface.
    #[serde(default)]
    pub interface_name: String,
    /// Destination networks.
    #[serde(default)]
    pub selected_networks: Vec<Reference>,
    /// Next hop.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateway: Option<Gateway>,
    /// Administrative distance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric_value: Option<u8>,
    /// Tunneled default route.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_tunneled: Option<bool>,
    /// SLA monitor, passed through.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route_tracking: Option<Value>,
    /// Server bookkeeping.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    /// Attributes not modelled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Ipv4StaticRoute {
    /// True when one of the selected networks has `network` as id or name and
    /// the gateway matches `gateway` (see [`Gateway::matches`]).
    #[must_use]
    pub fn matches(&self, network: &str, gateway: &str) -> bool {
        let network_hit = self
            .selected_networks
            .iter()
            .any(|net| net.id == network || net.name.as_deref() == Some(network));
        network_hit && self.gateway.as_ref().is_some_and(|gw| gw.matches(gateway))
    }
}

/// Payload creating a static route.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateIpv4StaticRouteRequest {
    /// Record type.
    #[serde(rename = "type")]
    pub object_type: String,
    /// Logical name of the egress interface.
    pub interface_name: String,
    /// Destination networks, as bare references.
    pub selected_networks: Vec<Reference>,
    /// Next hop.
    pub gateway: Gateway,
    /// Administrative distance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric_value: Option<u8>,
    /// Tunneled default route.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_tunneled: Option<bool>,
}

impl CreateIpv4StaticRouteRequest {
    /// Route to `networks` through `gateway` on `interface_name`.
    #[must_use]
    pub fn new(interface_name: impl Into<String>, networks: &[Reference], gateway: Gateway) -> Self {
        Self {
            object_type: "IPv4StaticRoute".to_string(),
            interface_name: interface_name.into(),
            selected_networks: networks.iter().map(Reference::bare).collect(),
            gateway,
            metric_value: None,
            is_tunneled: None,
        }
    }

    /// Set the administrative distance.
    #[must_use]
    pub const fn with_metric(mut self, metric: u8) -> Self {
        self.metric_value = Some(metric);
        self
    }
}

/// Payload modifying a static route.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UpdateIpv4StaticRouteRequest {
    /// Route id.
    pub id: RouteId,
    /// Writable attributes.
    #[serde(flatten)]
    pub settings: CreateIpv4StaticRouteRequest,
}

impl UpdateIpv4StaticRouteRequest {
    /// Builds an update from a route read earlier. Returns `None` when the
    /// route has no gateway.
    #[must_use]
    pub fn from_route(route: &Ipv4StaticRoute) -> Option<Self> {
        let gateway = route.gateway.as_ref()?;
        Some(Self {
            id: route.id.clone(),
            settings: CreateIpv4StaticRouteRequest {
                object_type: "IPv4StaticRoute".to_string(),
                interface_name: route.interface_name.clone(),
                selected_networks: route.selected_networks.iter().map(Reference::bare).collect(),
                gateway: Gateway {
                    object: gateway.object.as_ref().map(Reference::bare),
                    literal: gateway.literal.clone(),
                },
                metric_value: route.metric_value,
                is_tunneled: route.is_tunneled,
            },
        })
    }
}

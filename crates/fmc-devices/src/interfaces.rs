//! Interface models.
//!
//! Physical interfaces exist on the hardware and can only be modified.
//! Subinterfaces are created on top of a physical interface with a VLAN tag.
//! VLAN interfaces are read here but not modelled in detail.

use fmc_core::ids::InterfaceId;
use fmc_core::{Metadata, Reference};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// IPv4 addressing of an interface.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct InterfaceIpv4 {
    /// Static address.
    #[serde(rename = "static", default, skip_serializing_if = "Option::is_none")]
    pub static_address: Option<StaticIpv4>,
    /// DHCP settings, e.g. `{"enableDefaultRouteDHCP": true, "dhcpRouteMetric": 1}`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dhcp: Option<Value>,
}

impl InterfaceIpv4 {
    /// Static addressing.
    #[must_use]
    pub fn with_static(address: impl Into<String>, netmask: impl Into<String>) -> Self {
        Self {
            static_address: Some(StaticIpv4 {
                address: address.into(),
                netmask: netmask.into(),
            }),
            dhcp: None,
        }
    }
}

/// Static IPv4 address and netmask (prefix length or dotted mask).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StaticIpv4 {
    /// Interface address.
    pub address: String,
    /// Prefix length (`24`) or mask (`255.255.255.0`).
    pub netmask: String,
}

/// A physical interface of a device.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PhysicalInterface {
    /// Interface id.
    pub id: InterfaceId,
    /// Hardware name, e.g. `GigabitEthernet0/1`.
    pub name: String,
    /// Logical name, e.g. `outside`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ifname: Option<String>,
    /// Record type, `PhysicalInterface`.
    #[serde(rename = "type", default)]
    pub object_type: String,
    /// Administrative state.
    #[serde(default)]
    pub enabled: bool,
    /// MTU.
    #[serde(rename = "MTU", default, skip_serializing_if = "Option::is_none")]
    pub mtu: Option<u32>,
    /// Interface mode, e.g. `NONE`, `PASSIVE`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Assigned security zone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security_zone: Option<Reference>,
    /// IPv4 addressing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv4: Option<InterfaceIpv4>,
    /// IPv6 settings, passed through.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv6: Option<Value>,
    /// Speed and duplex, passed through.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hardware: Option<Value>,
    /// Restricted to management traffic.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub management_only: Option<bool>,
    /// Server bookkeeping.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    /// Attributes not modelled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Payload modifying a physical interface.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePhysicalInterfaceRequest {
    /// Interface id.
    pub id: InterfaceId,
    /// Hardware name; the FMC requires it unchanged.
    pub name: String,
    /// Record type.
    #[serde(rename = "type")]
    pub object_type: String,
    /// Logical name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ifname: Option<String>,
    /// Administrative state.
    pub enabled: bool,
    /// MTU.
    #[serde(rename = "MTU", default, skip_serializing_if = "Option::is_none")]
    pub mtu: Option<u32>,
    /// Interface mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Security zone, as a bare reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security_zone: Option<Reference>,
    /// IPv4 addressing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv4: Option<InterfaceIpv4>,
    /// IPv6 settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv6: Option<Value>,
    /// Speed and duplex.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hardware: Option<Value>,
    /// Restricted to management traffic.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub management_only: Option<bool>,
}

impl From<&PhysicalInterface> for UpdatePhysicalInterfaceRequest {
    fn from(iface: &PhysicalInterface) -> Self {
        Self {
            id: iface.id.clone(),
            name: iface.name.clone(),
            object_type: "PhysicalInterface".to_string(),
            ifname: iface.ifname.clone(),
            enabled: iface.enabled,
            mtu: iface.mtu,
            mode: iface.mode.clone(),
            description: iface.description.clone(),
            security_zone: iface.security_zone.as_ref().map(Reference::bare),
            ipv4: iface.ipv4.clone(),
            ipv6: iface.ipv6.clone(),
            hardware: iface.hardware.clone(),
            management_only: iface.management_only,
        }
    }
}

/// A VLAN subinterface.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SubInterface {
    /// Interface id.
    pub id: InterfaceId,
    /// Parent hardware name, e.g. `GigabitEthernet0/1`.
    pub name: String,
    /// Logical name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ifname: Option<String>,
    /// Record type, `SubInterface`.
    #[serde(rename = "type", default)]
    pub object_type: String,
    /// Subinterface number (the part after the dot).
    pub sub_intf_id: u32,
    /// 802.1Q tag.
    pub vlan_id: u16,
    /// Administrative state.
    #[serde(default)]
    pub enabled: bool,
    /// MTU.
    #[serde(rename = "MTU", default, skip_serializing_if = "Option::is_none")]
    pub mtu: Option<u32>,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Assigned security zone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security_zone: Option<Reference>,
    /// IPv4 addressing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv4: Option<InterfaceIpv4>,
    /// Server bookkeeping.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    /// Attributes not modelled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SubInterface {
    /// Full interface name, e.g. `GigabitEthernet0/1.100`.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{}.{}", self.name, self.sub_intf_id)
    }
}

/// Payload creating a subinterface.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubInterfaceRequest {
    /// Parent hardware name.
    pub name: String,
    /// Record type.
    #[serde(rename = "type")]
    pub object_type: String,
    /// Logical name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ifname: Option<String>,
    /// Subinterface number.
    pub sub_intf_id: u32,
    /// 802.1Q tag.
    pub vlan_id: u16,
    /// Administrative state.
    pub enabled: bool,
    /// MTU.
    #[serde(rename = "MTU", default, skip_serializing_if = "Option::is_none")]
    pub mtu: Option<u32>,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Security zone, as a bare reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security_zone: Option<Reference>,
    /// IPv4 addressing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv4: Option<InterfaceIpv4>,
}

impl CreateSubInterfaceRequest {
    /// An enabled subinterface with no addressing.
    #[must_use]
    pub fn new(parent: impl Into<String>, sub_intf_id: u32, vlan_id: u16) -> Self {
        Self {
            name: parent.into(),
            object_type: "SubInterface".to_string(),
            ifname: None,
            sub_intf_id,
            vlan_id,
            enabled: true,
            mtu: None,
            description: None,
            security_zone: None,
            ipv4: None,
        }
    }

    /// Set the logical name.
    #[must_use]
    pub fn with_ifname(mut self, ifname: impl Into<String>) -> Self {
        self.ifname = Some(ifname.into());
        self
    }

    /// Set the security zone.
    #[must_use]
    pub fn with_security_zone(mut self, zone: &Reference) -> Self {
        self.security_zone = Some(zone.bare());
        self
    }

    /// Set IPv4 addressing.
    #[must_use]
    pub fn with_ipv4(mut self, ipv4: InterfaceIpv4) -> Self {
        self.ipv4 = Some(ipv4);
        self
    }
}

/// Payload modifying a subinterface.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UpdateSubInterfaceRequest {
    /// Interface id.
    pub id: InterfaceId,
    /// Writable attributes.
    #[serde(flatten)]
    pub settings: CreateSubInterfaceRequest,
}

impl From<&SubInterface> for UpdateSubInterfaceRequest {
    fn from(iface: &SubInterface) -> Self {
        Self {
            id: iface.id.clone(),
            settings: CreateSubInterfaceRequest {
                name: iface.name.clone(),
                object_type: "SubInterface".to_string(),
                ifname: iface.ifname.clone(),
                sub_intf_id: iface.sub_intf_id,
                vlan_id: iface.vlan_id,
                enabled: iface.enabled,
                mtu: iface.mtu,
                description: iface.description.clone(),
                security_zone: iface.security_zone.as_ref().map(Reference::bare),
                ipv4: iface.ipv4.clone(),
            },
        }
    }
}

/// A VLAN interface (switch-port models).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VlanInterface {
    /// Interface id.
    pub id: InterfaceId,
    /// Name, e.g. `Vlan100`.
    #[serde(default)]
    pub name: String,
    /// Logical name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ifname: Option<String>,
    /// VLAN tag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vlan_id: Option<u16>,
    /// Record type.
    #[serde(rename = "type", default)]
    pub object_type: String,
    /// Attributes not modelled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

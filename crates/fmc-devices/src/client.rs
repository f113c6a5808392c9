//! Device configuration service.

use crate::interfaces::{
    CreateSubInterfaceRequest, PhysicalInterface, SubInterface, UpdatePhysicalInterfaceRequest,
    UpdateSubInterfaceRequest, VlanInterface,
};
use crate::models::{Chassis, CreateDeviceRequest, Device, UpdateDeviceRequest};
use crate::routes::{CreateIpv4StaticRouteRequest, Ipv4StaticRoute, UpdateIpv4StaticRouteRequest};
use crate::Result;
use fmc_core::ids::{DeviceId, InterfaceId, RouteId};
use fmc_core::{FmcClient, ListParams};
use tracing::{debug, info};

/// Access to `devices/...` and `chassis/...` under the selected domain.
#[derive(Debug, Clone)]
pub struct DeviceService {
    client: FmcClient,
}

impl DeviceService {
    /// Wrap an authenticated client.
    #[must_use]
    pub const fn new(client: FmcClient) -> Self {
        Self { client }
    }

    /// The underlying client.
    #[must_use]
    pub const fn client(&self) -> &FmcClient {
        &self.client
    }

    fn device_path(&self, device: &DeviceId, suffix: &str) -> Result<String> {
        self.client
            .config_path(&format!("devices/devicerecords/{device}/{suffix}"))
    }

    // Device records

    /// List every device record.
    pub async fn list_devices(&self, params: &ListParams) -> Result<Vec<Device>> {
        let path = self.client.config_path("devices/devicerecords")?;
        self.client.list_all(&path, params).await
    }

    /// Fetch one device record.
    pub async fn get_device(&self, device: &DeviceId) -> Result<Device> {
        let path = self
            .client
            .config_path(&format!("devices/devicerecords/{device}"))?;
        self.client.get(&path).await
    }

    /// Register a device.
    pub async fn create_device(&self, request: &CreateDeviceRequest) -> Result<Device> {
        let path = self.client.config_path("devices/devicerecords")?;
        let device: Device = self.client.post(&path, request).await?;
        info!(device = %device.id, name = %device.name, "registered FMC device");
        Ok(device)
    }

    /// Modify a device record.
    pub async fn update_device(&self, request: &UpdateDeviceRequest) -> Result<Device> {
        let path = self
            .client
            .config_path(&format!("devices/devicerecords/{}", request.id))?;
        self.client.put(&path, request).await
    }

    /// Unregister a device. Returns the deleted record.
    pub async fn delete_device(&self, device: &DeviceId) -> Result<Device> {
        let path = self
            .client
            .config_path(&format!("devices/devicerecords/{device}"))?;
        let deleted: Device = self.client.delete(&path).await?;
        info!(device = %device, "deleted FMC device");
        Ok(deleted)
    }

    /// List chassis managed by the FMC.
    pub async fn list_chassis(&self, params: &ListParams) -> Result<Vec<Chassis>> {
        let path = self.client.config_path("chassis/fmcmanagedchassis")?;
        self.client.list_all(&path, params).await
    }

    // Physical interfaces

    /// List the physical interfaces of a device.
    pub async fn list_physical_interfaces(
        &self,
        device: &DeviceId,
        params: &ListParams,
    ) -> Result<Vec<PhysicalInterface>> {
        let path = self.device_path(device, "physicalinterfaces")?;
        self.client.list_all(&path, params).await
    }

    /// Fetch one physical interface.
    pub async fn get_physical_interface(
        &self,
        device: &DeviceId,
        interface: &InterfaceId,
    ) -> Result<PhysicalInterface> {
        let path = self.device_path(device, &format!("physicalinterfaces/{interface}"))?;
        self.client.get(&path).await
    }

    /// Modify a physical interface.
    pub async fn update_physical_interface(
        &self,
        device: &DeviceId,
        request: &UpdatePhysicalInterfaceRequest,
    ) -> Result<PhysicalInterface> {
        let path = self.device_path(device, &format!("physicalinterfaces/{}", request.id))?;
        self.client.put(&path, request).await
    }

    // Subinterfaces

    /// List the subinterfaces of a device.
    pub async fn list_subinterfaces(
        &self,
        device: &DeviceId,
        params: &ListParams,
    ) -> Result<Vec<SubInterface>> {
        let path = self.device_path(device, "subinterfaces")?;
        self.client.list_all(&path, params).await
    }

    /// Fetch one subinterface.
    pub async fn get_subinterface(
        &self,
        device: &DeviceId,
        interface: &InterfaceId,
    ) -> Result<SubInterface> {
        let path = self.device_path(device, &format!("subinterfaces/{interface}"))?;
        self.client.get(&path).await
    }

    /// Create a subinterface.
    pub async fn create_subinterface(
        &self,
        device: &DeviceId,
        request: &CreateSubInterfaceRequest,
    ) -> Result<SubInterface> {
        let path = self.device_path(device, "subinterfaces")?;
        let created: SubInterface = self.client.post(&path, request).await?;
        debug!(device = %device, interface = %created.full_name(), "created subinterface");
        Ok(created)
    }

    /// Modify a subinterface.
    pub async fn update_subinterface(
        &self,
        device: &DeviceId,
        request: &UpdateSubInterfaceRequest,
    ) -> Result<SubInterface> {
        let path = self.device_path(device, &format!("subinterfaces/{}", request.id))?;
        self.client.put(&path, request).await
    }

    /// Delete a subinterface. Returns the deleted record.
    pub async fn delete_subinterface(
        &self,
        device: &DeviceId,
        interface: &InterfaceId,
    ) -> Result<SubInterface> {
        let path = self.device_path(device, &format!("subinterfaces/{interface}"))?;
        self.client.delete(&path).await
    }

    // VLAN interfaces

    /// List the VLAN interfaces of a device.
    pub async fn list_vlan_interfaces(
        &self,
        device: &DeviceId,
        params: &ListParams,
    ) -> Result<Vec<VlanInterface>> {
        let path = self.device_path(device, "vlaninterfaces")?;
        self.client.list_all(&path, params).await
    }

    /// Fetch one VLAN interface.
    pub async fn get_vlan_interface(
        &self,
        device: &DeviceId,
        interface: &InterfaceId,
    ) -> Result<VlanInterface> {
        let path = self.device_path(device, &format!("vlaninterfaces/{interface}"))?;
        self.client.get(&path).await
    }

    // IPv4 static routes

    /// List the IPv4 static routes of a device.
    pub async fn list_ipv4_static_routes(
        &self,
        device: &DeviceId,
        params: &ListParams,
    ) -> Result<Vec<Ipv4StaticRoute>> {
        let path = self.device_path(device, "routing/ipv4staticroutes")?;
        self.client.list_all(&path, params).await
    }

    /// Fetch one IPv4 static route.
    pub async fn get_ipv4_static_route(
        &self,
        device: &DeviceId,
        route: &RouteId,
    ) -> Result<Ipv4StaticRoute> {
        let path = self.device_path(device, &format!("routing/ipv4staticroutes/{route}"))?;
        self.client.get(&path).await
    }

    /// Create an IPv4 static route.
    ///
    /// A route with the same interface and gateway as an existing one is
    /// rejected with `Error::DuplicateStaticRoute`.
    pub async fn create_ipv4_static_route(
        &self,
        device: &DeviceId,
        request: &CreateIpv4StaticRouteRequest,
    ) -> Result<Ipv4StaticRoute> {
        let path = self.device_path(device, "routing/ipv4staticroutes")?;
        self.client.post(&path, request).await
    }

    /// Modify an IPv4 static route.
    pub async fn update_ipv4_static_route(
        &self,
        device: &DeviceId,
        request: &UpdateIpv4StaticRouteRequest,
    ) -> Result<Ipv4StaticRoute> {
        let path = self.device_path(device, &format!("routing/ipv4staticroutes/{}", request.id))?;
        self.client.put(&path, request).await
    }

    /// Delete an IPv4 static route. Returns the deleted record.
    pub async fn delete_ipv4_static_route(
        &self,
        device: &DeviceId,
        route: &RouteId,
    ) -> Result<Ipv4StaticRoute> {
        let path = self.device_path(device, &format!("routing/ipv4staticroutes/{route}"))?;
        self.client.delete(&path).await
    }

    /// Find the static routes covering `network` through `gateway`.
    ///
    /// Both arguments match an object id or name; `gateway` also matches a
    /// literal address.
    pub async fn find_ipv4_static_routes(
        &self,
        device: &DeviceId,
        network: &str,
        gateway: &str,
    ) -> Result<Vec<Ipv4StaticRoute>> {
        let routes = self
            .list_ipv4_static_routes(device, &ListParams::expanded())
            .await?;
        Ok(routes
            .into_iter()
            .filter(|route| route.matches(network, gateway))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::Gateway;
    use fmc_core::{Credentials, Error, Reference};
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const DOMAIN: &str = "e276abec-e0f2-11e3-8169-6d9ed49b625f";
    const DEVICE: &str = "a6b1c2d3-0000-1111-2222-333344445555";

    fn device_id() -> DeviceId {
        DeviceId::parse_str(DEVICE).unwrap()
    }

    fn records(suffix: &str) -> String {
        format!("/api/fmc_config/v1/domain/{DOMAIN}/devices/devicerecords{suffix}")
    }

    async fn service(server: &MockServer) -> DeviceService {
        Mock::given(method("POST"))
            .and(path("/api/fmc_platform/v1/auth/generatetoken"))
            .respond_with(
                ResponseTemplate::new(204)
                    .append_header("X-auth-access-token", "token")
                    .append_header("DOMAIN_UUID", DOMAIN),
            )
            .mount(server)
            .await;
        let client = FmcClient::new(server.uri(), Credentials::new("api", "pw")).unwrap();
        client.login().await.unwrap();
        DeviceService::new(client)
    }

    #[tokio::test]
    async fn list_devices_success() {
        let server = MockServer::start().await;
        let devices = service(&server).await;

        Mock::given(method("GET"))
            .and(path(records("").as_str()))
            .and(query_param("expanded", "true"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [{
                    "id": DEVICE,
                    "name": "ftd-1",
                    "type": "Device",
                    "hostName": "10.1.1.1",
                    "model": "Cisco Firepower Threat Defense for VMware"
                }],
                "paging": { "count": 1, "pages": 1 }
            })))
            .mount(&server)
            .await;

        let list = devices.list_devices(&ListParams::expanded()).await.unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].host_name.as_deref(), Some("10.1.1.1"));
    }

    #[tokio::test]
    async fn update_device_sends_writable_fields_only() {
        let server = MockServer::start().await;
        let devices = service(&server).await;

        Mock::given(method("PUT"))
            .and(path(records(&format!("/{DEVICE}")).as_str()))
            .and(body_json(json!({
                "id": DEVICE,
                "name": "ftd-renamed",
                "type": "Device",
                "hostName": "10.1.1.1"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": DEVICE, "name": "ftd-renamed", "type": "Device"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let request = UpdateDeviceRequest {
            id: device_id(),
            name: "ftd-renamed".to_string(),
            object_type: "Device".to_string(),
            host_name: Some("10.1.1.1".to_string()),
            prohibit_packet_transfer: None,
        };
        let device = devices.update_device(&request).await.unwrap();
        assert_eq!(device.name, "ftd-renamed");
    }

    #[tokio::test]
    async fn delete_device_returns_record() {
        let server = MockServer::start().await;
        let devices = service(&server).await;

        Mock::given(method("DELETE"))
            .and(path(records(&format!("/{DEVICE}")).as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": DEVICE, "name": "ftd-1", "type": "Device"
            })))
            .mount(&server)
            .await;

        let deleted = devices.delete_device(&device_id()).await.unwrap();
        assert_eq!(deleted.id, device_id());
    }

    #[tokio::test]
    async fn list_chassis_success() {
        let server = MockServer::start().await;
        let devices = service(&server).await;

        Mock::given(method("GET"))
            .and(path(format!("/api/fmc_config/v1/domain/{DOMAIN}/chassis/fmcmanagedchassis").as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [{ "id": "ch-1", "name": "fp4112", "type": "FMCManagedChassis" }],
                "paging": { "count": 1, "pages": 1 }
            })))
            .mount(&server)
            .await;

        let chassis = devices.list_chassis(&ListParams::expanded()).await.unwrap();
        assert_eq!(chassis[0].name, "fp4112");
    }

    #[tokio::test]
    async fn get_physical_interface_success() {
        let server = MockServer::start().await;
        let devices = service(&server).await;

        Mock::given(method("GET"))
            .and(path(records(&format!("/{DEVICE}/physicalinterfaces/if-1")).as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "if-1",
                "name": "GigabitEthernet0/0",
                "ifname": "outside",
                "type": "PhysicalInterface",
                "enabled": true,
                "MTU": 1500
            })))
            .mount(&server)
            .await;

        let iface = devices
            .get_physical_interface(&device_id(), &InterfaceId::parse_str("if-1").unwrap())
            .await
            .unwrap();
        assert_eq!(iface.ifname.as_deref(), Some("outside"));
    }

    #[tokio::test]
    async fn create_subinterface_posts_payload() {
        let server = MockServer::start().await;
        let devices = service(&server).await;

        Mock::given(method("POST"))
            .and(path(records(&format!("/{DEVICE}/subinterfaces")).as_str()))
            .and(body_json(json!({
                "name": "GigabitEthernet0/1",
                "type": "SubInterface",
                "ifname": "vlan100",
                "subIntfId": 100,
                "vlanId": 100,
                "enabled": true
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": "sub-1",
                "name": "GigabitEthernet0/1",
                "type": "SubInterface",
                "ifname": "vlan100",
                "subIntfId": 100,
                "vlanId": 100,
                "enabled": true
            })))
            .expect(1)
            .mount(&server)
            .await;

        let request =
            CreateSubInterfaceRequest::new("GigabitEthernet0/1", 100, 100).with_ifname("vlan100");
        let created = devices
            .create_subinterface(&device_id(), &request)
            .await
            .unwrap();
        assert_eq!(created.full_name(), "GigabitEthernet0/1.100");
    }

    #[tokio::test]
    async fn list_vlan_interfaces_empty() {
        let server = MockServer::start().await;
        let devices = service(&server).await;

        Mock::given(method("GET"))
            .and(path(records(&format!("/{DEVICE}/vlaninterfaces")).as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "paging": { "count": 0, "pages": 0 }
            })))
            .mount(&server)
            .await;

        let vlans = devices
            .list_vlan_interfaces(&device_id(), &ListParams::default())
            .await
            .unwrap();
        assert!(vlans.is_empty());
    }

    #[tokio::test]
    async fn duplicate_static_route_is_reported() {
        let server = MockServer::start().await;
        let devices = service(&server).await;

        Mock::given(method("POST"))
            .and(path(records(&format!("/{DEVICE}/routing/ipv4staticroutes")).as_str()))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": {
                    "category": "FRAMEWORK",
                    "messages": [{
                        "description": "Route with same interface and gateway in another route exists"
                    }],
                    "severity": "ERROR"
                }
            })))
            .mount(&server)
            .await;

        let request = CreateIpv4StaticRouteRequest::new(
            "outside",
            &[Reference::new("net-1", "Network")],
            Gateway::literal("203.0.113.1"),
        );
        let err = devices
            .create_ipv4_static_route(&device_id(), &request)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateStaticRoute(_)));
    }

    #[tokio::test]
    async fn find_static_routes_by_network_and_gateway() {
        let server = MockServer::start().await;
        let devices = service(&server).await;

        Mock::given(method("GET"))
            .and(path(records(&format!("/{DEVICE}/routing/ipv4staticroutes")).as_str()))
            .and(query_param("expanded", "true"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [
                    {
                        "id": "r1",
                        "interfaceName": "outside",
                        "selectedNetworks": [{ "id": "net-1", "type": "Network", "name": "branch-a" }],
                        "gateway": { "literal": { "type": "Host", "value": "203.0.113.1" } }
                    },
                    {
                        "id": "r2",
                        "interfaceName": "outside",
                        "selectedNetworks": [{ "id": "net-2", "type": "Network", "name": "branch-b" }],
                        "gateway": { "literal": { "type": "Host", "value": "203.0.113.1" } }
                    },
                    {
                        "id": "r3",
                        "interfaceName": "inside",
                        "selectedNetworks": [{ "id": "net-1", "type": "Network", "name": "branch-a" }],
                        "gateway": { "object": { "id": "h1", "type": "Host", "name": "core-gw" } }
                    }
                ],
                "paging": { "count": 3, "pages": 1 }
            })))
            .mount(&server)
            .await;

        let found = devices
            .find_ipv4_static_routes(&device_id(), "branch-a", "203.0.113.1")
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id.as_str(), "r1");
    }

    #[tokio::test]
    async fn delete_static_route_not_found() {
        let server = MockServer::start().await;
        let devices = service(&server).await;

        Mock::given(method("DELETE"))
            .and(path(records(&format!("/{DEVICE}/routing/ipv4staticroutes/gone")).as_str()))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = devices
            .delete_ipv4_static_route(&device_id(), &RouteId::parse_str("gone").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }
}

//! Object service.

use crate::groups::{CreateNetworkGroupRequest, NetworkGroup, UpdateNetworkGroupRequest};
use crate::models::{
    AddressKind, AddressObject, CreateAddressRequest, UpdateAddressRequest, VariableSet,
};
use crate::zones::{CreateSecurityZoneRequest, SecurityZone, UpdateSecurityZoneRequest};
use crate::Result;
use fmc_core::ids::{ObjectId, VariableSetId, ZoneId};
use fmc_core::{Envelope, FmcClient, ListParams};
use serde::Deserialize;
use tracing::{debug, info};

/// The answer to a bulk create: either a bare array or a list envelope.
#[derive(Deserialize)]
#[serde(untagged)]
enum BulkCreated {
    Items(Vec<AddressObject>),
    Envelope(Envelope<AddressObject>),
}

impl BulkCreated {
    fn into_items(self) -> Vec<AddressObject> {
        match self {
            Self::Items(items) => items,
            Self::Envelope(envelope) => envelope.items,
        }
    }
}

fn override_query(override_target: Option<&str>) -> Vec<(&'static str, String)> {
    override_target
        .map(|target| vec![("overrideTargetId", target.to_string())])
        .unwrap_or_default()
}

/// Access to `object/...` under the selected domain.
#[derive(Debug, Clone)]
pub struct ObjectService {
    client: FmcClient,
}

impl ObjectService {
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

    fn collection_path(&self, collection: &str) -> Result<String> {
        self.client.config_path(collection)
    }

    fn record_path(&self, collection: &str, id: &str) -> Result<String> {
        self.client.config_path(&format!("{collection}/{id}"))
    }

    // Network and host objects

    /// List network or host objects. `params.filter` accepts e.g.
    /// `nameOrValue:10.0.0` or `unusedOnly:true`.
    pub async fn list_addresses(
        &self,
        kind: AddressKind,
        params: &ListParams,
    ) -> Result<Vec<AddressObject>> {
        let path = self.collection_path(kind.collection())?;
        self.client.list_all(&path, params).await
    }

    /// Fetch one network or host object. With `override_target` set, the
    /// value overridden for that device or domain is returned.
    pub async fn get_address(
        &self,
        kind: AddressKind,
        id: &ObjectId,
        override_target: Option<&str>,
    ) -> Result<AddressObject> {
        let path = self.record_path(kind.collection(), id.as_str())?;
        self.client
            .get_with(&path, &override_query(override_target))
            .await
    }

    /// Create one network or host object.
    pub async fn create_address(
        &self,
        kind: AddressKind,
        request: &CreateAddressRequest,
    ) -> Result<AddressObject> {
        let path = self.collection_path(kind.collection())?;
        let created: AddressObject = self.client.post(&path, request).await?;
        debug!(kind = kind.type_name(), id = %created.id, name = %created.name, "created object");
        Ok(created)
    }

    /// Create many network or host objects in one call (`bulk=true`).
    ///
    /// The FMC rejects the whole batch if one entry is a duplicate; callers
    /// importing large sets may prefer [`ObjectService::create_address`] per
    /// entry and skip errors where [`fmc_core::Error::is_duplicate`] holds.
    pub async fn create_addresses(
        &self,
        kind: AddressKind,
        requests: &[CreateAddressRequest],
    ) -> Result<Vec<AddressObject>> {
        if requests.is_empty() {
            return Ok(Vec::new());
        }
        let path = self.collection_path(kind.collection())?;
        let created: BulkCreated = self
            .client
            .post_with(&path, &[("bulk", "true".to_string())], requests)
            .await?;
        let created = created.into_items();
        info!(kind = kind.type_name(), count = created.len(), "bulk created objects");
        Ok(created)
    }

    /// Modify a network or host object.
    pub async fn update_address(
        &self,
        kind: AddressKind,
        request: &UpdateAddressRequest,
    ) -> Result<AddressObject> {
        let path = self.record_path(kind.collection(), request.id.as_str())?;
        self.client.put(&path, request).await
    }

    /// Delete a network or host object. Returns the deleted record.
    ///
    /// An object still referenced elsewhere fails with
    /// `Error::DeletionRestricted`.
    pub async fn delete_address(&self, kind: AddressKind, id: &ObjectId) -> Result<AddressObject> {
        let path = self.record_path(kind.collection(), id.as_str())?;
        self.client.delete(&path).await
    }

    /// List network objects.
    pub async fn list_networks(&self, params: &ListParams) -> Result<Vec<AddressObject>> {
        self.list_addresses(AddressKind::Network, params).await
    }

    /// Fetch one network object.
    pub async fn get_network(
        &self,
        id: &ObjectId,
        override_target: Option<&str>,
    ) -> Result<AddressObject> {
        self.get_address(AddressKind::Network, id, override_target)
            .await
    }

    /// Create a network object.
    pub async fn create_network(&self, request: &CreateAddressRequest) -> Result<AddressObject> {
        self.create_address(AddressKind::Network, request).await
    }

    /// Bulk create network objects.
    pub async fn create_networks(
        &self,
        requests: &[CreateAddressRequest],
    ) -> Result<Vec<AddressObject>> {
        self.create_addresses(AddressKind::Network, requests).await
    }

    /// Modify a network object.
    pub async fn update_network(&self, request: &UpdateAddressRequest) -> Result<AddressObject> {
        self.update_address(AddressKind::Network, request).await
    }

    /// Delete a network object.
    pub async fn delete_network(&self, id: &ObjectId) -> Result<AddressObject> {
        self.delete_address(AddressKind::Network, id).await
    }

    /// List host objects.
    pub async fn list_hosts(&self, params: &ListParams) -> Result<Vec<AddressObject>> {
        self.list_addresses(AddressKind::Host, params).await
    }

    /// Fetch one host object.
    pub async fn get_host(
        &self,
        id: &ObjectId,
        override_target: Option<&str>,
    ) -> Result<AddressObject> {
        self.get_address(AddressKind::Host, id, override_target).await
    }

    /// Create a host object.
    pub async fn create_host(&self, request: &CreateAddressRequest) -> Result<AddressObject> {
        self.create_address(AddressKind::Host, request).await
    }

    /// Bulk create host objects.
    pub async fn create_hosts(&self, requests: &[CreateAddressRequest]) -> Result<Vec<AddressObject>> {
        self.create_addresses(AddressKind::Host, requests).await
    }

    /// Modify a host object.
    pub async fn update_host(&self, request: &UpdateAddressRequest) -> Result<AddressObject> {
        self.update_address(AddressKind::Host, request).await
    }

    /// Delete a host object.
    pub async fn delete_host(&self, id: &ObjectId) -> Result<AddressObject> {
        self.delete_address(AddressKind::Host, id).await
    }

    // Network groups

    /// List network groups.
    pub async fn list_network_groups(&self, params: &ListParams) -> Result<Vec<NetworkGroup>> {
        let path = self.collection_path("object/networkgroups")?;
        self.client.list_all(&path, params).await
    }

    /// Fetch one network group.
    pub async fn get_network_group(
        &self,
        id: &ObjectId,
        override_target: Option<&str>,
    ) -> Result<NetworkGroup> {
        let path = self.record_path("object/networkgroups", id.as_str())?;
        self.client
            .get_with(&path, &override_query(override_target))
            .await
    }

    /// Create a network group. Member references are sent as `{id, type}`.
    pub async fn create_network_group(
        &self,
        request: &CreateNetworkGroupRequest,
    ) -> Result<NetworkGroup> {
        let request = request.clone().normalized();
        let path = self.collection_path("object/networkgroups")?;
        self.client.post(&path, &request).await
    }

    /// Modify a network group. Member references are sent as `{id, type}`.
    pub async fn update_network_group(
        &self,
        request: &UpdateNetworkGroupRequest,
    ) -> Result<NetworkGroup> {
        let request = request.clone().normalized();
        let path = self.record_path("object/networkgroups", request.id.as_str())?;
        self.client.put(&path, &request).await
    }

    /// Delete a network group. Returns the deleted record.
    pub async fn delete_network_group(&self, id: &ObjectId) -> Result<NetworkGroup> {
        let path = self.record_path("object/networkgroups", id.as_str())?;
        self.client.delete(&path).await
    }

    // Security zones

    /// List security zones.
    pub async fn list_security_zones(&self, params: &ListParams) -> Result<Vec<SecurityZone>> {
        let path = self.collection_path("object/securityzones")?;
        self.client.list_all(&path, params).await
    }

    /// Fetch one security zone. `group_by_device` controls how member
    /// interfaces are grouped in the answer.
    pub async fn get_security_zone(
        &self,
        id: &ZoneId,
        group_by_device: Option<bool>,
    ) -> Result<SecurityZone> {
        let path = self.record_path("object/securityzones", id.as_str())?;
        let query: Vec<(&'static str, String)> = group_by_device
            .map(|group| vec![("groupByDevice", group.to_string())])
            .unwrap_or_default();
        self.client.get_with(&path, &query).await
    }

    /// Create a security zone.
    pub async fn create_security_zone(
        &self,
        request: &CreateSecurityZoneRequest,
    ) -> Result<SecurityZone> {
        let path = self.collection_path("object/securityzones")?;
        self.client.post(&path, request).await
    }

    /// Modify a security zone.
    pub async fn update_security_zone(
        &self,
        request: &UpdateSecurityZoneRequest,
    ) -> Result<SecurityZone> {
        let path = self.record_path("object/securityzones", request.id.as_str())?;
        self.client.put(&path, request).await
    }

    /// Delete a security zone. Returns the deleted record.
    pub async fn delete_security_zone(&self, id: &ZoneId) -> Result<SecurityZone> {
        let path = self.record_path("object/securityzones", id.as_str())?;
        self.client.delete(&path).await
    }

    // Variable sets

    /// List variable sets.
    pub async fn list_variable_sets(&self, params: &ListParams) -> Result<Vec<VariableSet>> {
        let path = self.collection_path("object/variablesets")?;
        self.client.list_all(&path, params).await
    }

    /// Fetch one variable set.
    pub async fn get_variable_set(&self, id: &VariableSetId) -> Result<VariableSet> {
        let path = self.record_path("object/variablesets", id.as_str())?;
        self.client.get(&path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::groups::GroupLiteral;
    use fmc_core::{Credentials, Error, Reference};
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path, query_param, query_param_is_missing};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const DOMAIN: &str = "e276abec-e0f2-11e3-8169-6d9ed49b625f";

    fn object_path(suffix: &str) -> String {
        format!("/api/fmc_config/v1/domain/{DOMAIN}/object/{suffix}")
    }

    async fn service(server: &MockServer) -> ObjectService {
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
        ObjectService::new(client)
    }

    #[tokio::test]
    async fn list_networks_with_filter() {
        let server = MockServer::start().await;
        let objects = service(&server).await;

        Mock::given(method("GET"))
            .and(path(object_path("networks").as_str()))
            .and(query_param("filter", "nameOrValue:10.0"))
            .and(query_param("expanded", "true"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [
                    { "id": "n1", "name": "net10", "type": "Network", "value": "10.0.0.0/24" }
                ],
                "paging": { "count": 1, "pages": 1 }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let nets = objects
            .list_networks(&ListParams::expanded().with_filter("nameOrValue:10.0"))
            .await
            .unwrap();
        assert_eq!(nets.len(), 1);
        assert_eq!(nets[0].value, "10.0.0.0/24");
    }

    #[tokio::test]
    async fn get_host_with_override_target() {
        let server = MockServer::start().await;
        let objects = service(&server).await;

        Mock::given(method("GET"))
            .and(path(object_path("hosts/h1").as_str()))
            .and(query_param("overrideTargetId", "dev-9"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "h1", "name": "gw", "type": "Host", "value": "192.0.2.254"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let host = objects
            .get_host(&ObjectId::parse_str("h1").unwrap(), Some("dev-9"))
            .await
            .unwrap();
        assert_eq!(host.value, "192.0.2.254");
    }

    #[tokio::test]
    async fn get_network_without_override_sends_no_query() {
        let server = MockServer::start().await;
        let objects = service(&server).await;

        Mock::given(method("GET"))
            .and(path(object_path("networks/n1").as_str()))
            .and(query_param_is_missing("overrideTargetId"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "n1", "name": "net10", "type": "Network", "value": "10.0.0.0/24"
            })))
            .expect(1)
            .mount(&server)
            .await;

        objects
            .get_network(&ObjectId::parse_str("n1").unwrap(), None)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn create_network_reports_duplicate() {
        let server = MockServer::start().await;
        let objects = service(&server).await;

        Mock::given(method("POST"))
            .and(path(object_path("networks").as_str()))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": {
                    "category": "FRAMEWORK",
                    "messages": [{ "description": "Duplicate Name: net10" }],
                    "severity": "ERROR"
                }
            })))
            .mount(&server)
            .await;

        let err = objects
            .create_network(&CreateAddressRequest::network("net10", "10.0.0.0/24"))
            .await
            .unwrap_err();
        assert!(err.is_duplicate());
    }

    #[tokio::test]
    async fn bulk_create_hosts() {
        let server = MockServer::start().await;
        let objects = service(&server).await;

        let requests = vec![
            CreateAddressRequest::host("dns-1", "192.0.2.53"),
            CreateAddressRequest::host("dns-2", "192.0.2.54"),
        ];

        Mock::given(method("POST"))
            .and(path(object_path("hosts").as_str()))
            .and(query_param("bulk", "true"))
            .and(body_json(json!([
                { "name": "dns-1", "value": "192.0.2.53", "type": "Host", "overridable": false },
                { "name": "dns-2", "value": "192.0.2.54", "type": "Host", "overridable": false }
            ])))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "items": [
                    { "id": "h1", "name": "dns-1", "type": "Host", "value": "192.0.2.53" },
                    { "id": "h2", "name": "dns-2", "type": "Host", "value": "192.0.2.54" }
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let created = objects.create_hosts(&requests).await.unwrap();
        assert_eq!(created.len(), 2);
        assert_eq!(created[1].name, "dns-2");
    }

    #[tokio::test]
    async fn bulk_create_accepts_bare_array() {
        let server = MockServer::start().await;
        let objects = service(&server).await;

        Mock::given(method("POST"))
            .and(path(object_path("networks").as_str()))
            .and(query_param("bulk", "true"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!([
                { "id": "n1", "name": "a", "type": "Network", "value": "10.1.0.0/16" }
            ])))
            .mount(&server)
            .await;

        let created = objects
            .create_networks(&[CreateAddressRequest::network("a", "10.1.0.0/16")])
            .await
            .unwrap();
        assert_eq!(created[0].id.as_str(), "n1");
    }

    #[tokio::test]
    async fn empty_bulk_create_sends_nothing() {
        let server = MockServer::start().await;
        let objects = service(&server).await;

        let created = objects.create_networks(&[]).await.unwrap();
        assert!(created.is_empty());
        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1, "only the login request is expected");
    }

    #[tokio::test]
    async fn delete_referenced_network_is_restricted() {
        let server = MockServer::start().await;
        let objects = service(&server).await;

        Mock::given(method("DELETE"))
            .and(path(object_path("networks/n1").as_str()))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": {
                    "messages": [{ "description": "Object deletion restricted: used by grp-1" }]
                }
            })))
            .mount(&server)
            .await;

        let err = objects
            .delete_network(&ObjectId::parse_str("n1").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::DeletionRestricted(_)));
    }

    #[tokio::test]
    async fn create_network_group_sends_bare_members() {
        let server = MockServer::start().await;
        let objects = service(&server).await;

        Mock::given(method("POST"))
            .and(path(object_path("networkgroups").as_str()))
            .and(body_json(json!({
                "name": "dns",
                "type": "NetworkGroup",
                "overridable": false,
                "objects": [{ "id": "h1", "type": "Host" }]
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": "g2",
                "name": "dns",
                "type": "NetworkGroup",
                "objects": [{ "id": "h1", "type": "Host", "name": "dns-1" }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut request = CreateNetworkGroupRequest::new("dns");
        request
            .objects
            .push(Reference::new("h1", "Host").with_name("dns-1"));

        let group = objects.create_network_group(&request).await.unwrap();
        assert_eq!(group.member_count(), 1);
    }

    #[tokio::test]
    async fn update_network_group_sends_bare_members() {
        let server = MockServer::start().await;
        let objects = service(&server).await;

        Mock::given(method("PUT"))
            .and(path(object_path("networkgroups/g1").as_str()))
            .and(body_json(json!({
                "id": "g1",
                "name": "dns",
                "type": "NetworkGroup",
                "overridable": false,
                "objects": [{ "id": "h1", "type": "Host" }],
                "literals": [{ "type": "Host", "value": "192.0.2.1" }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "g1",
                "name": "dns",
                "type": "NetworkGroup",
                "objects": [{ "id": "h1", "type": "Host", "name": "dns-1" }],
                "literals": [{ "type": "Host", "value": "192.0.2.1" }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut request = UpdateNetworkGroupRequest {
            id: ObjectId::parse_str("g1").unwrap(),
            settings: CreateNetworkGroupRequest::new("dns").with_literal(GroupLiteral::host("192.0.2.1")),
        };
        request
            .settings
            .objects
            .push(Reference::new("h1", "Host").with_name("dns-1"));

        let group = objects.update_network_group(&request).await.unwrap();
        assert_eq!(group.member_count(), 2);
    }

    #[tokio::test]
    async fn get_security_zone_grouped_by_device() {
        let server = MockServer::start().await;
        let objects = service(&server).await;

        Mock::given(method("GET"))
            .and(path(object_path("securityzones/z1").as_str()))
            .and(query_param("groupByDevice", "true"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "z1",
                "name": "outside-zone",
                "type": "SecurityZone",
                "interfaceMode": "ROUTED",
                "interfaces": [{ "device": { "id": "dev-1" }, "interfaces": [] }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let zone = objects
            .get_security_zone(&ZoneId::parse_str("z1").unwrap(), Some(true))
            .await
            .unwrap();
        assert_eq!(zone.interface_mode, "ROUTED");
        assert_eq!(zone.interfaces.len(), 1);
    }

    #[tokio::test]
    async fn create_and_delete_security_zone() {
        let server = MockServer::start().await;
        let objects = service(&server).await;

        Mock::given(method("POST"))
            .and(path(object_path("securityzones").as_str()))
            .and(body_json(json!({
                "name": "dmz", "type": "SecurityZone", "interfaceMode": "ROUTED"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": "z2", "name": "dmz", "type": "SecurityZone", "interfaceMode": "ROUTED"
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path(object_path("securityzones/z2").as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "z2", "name": "dmz", "type": "SecurityZone", "interfaceMode": "ROUTED"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let zone = objects
            .create_security_zone(&CreateSecurityZoneRequest::new("dmz", "ROUTED"))
            .await
            .unwrap();
        let deleted = objects.delete_security_zone(&zone.id).await.unwrap();
        assert_eq!(deleted.name, "dmz");
    }

    #[tokio::test]
    async fn list_variable_sets_success() {
        let server = MockServer::start().await;
        let objects = service(&server).await;

        Mock::given(method("GET"))
            .and(path(object_path("variablesets").as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [{ "id": "vs1", "name": "Default-Set", "type": "VariableSet" }],
                "paging": { "count": 1, "pages": 1 }
            })))
            .mount(&server)
            .await;

        let sets = objects
            .list_variable_sets(&ListParams::default())
            .await
            .unwrap();
        assert_eq!(sets[0].name, "Default-Set");
    }
}

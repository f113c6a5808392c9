//! Platform information service.

use crate::models::{DomainInfo, ServerVersion};
use crate::Result;
use fmc_core::ids::validate_id;
use fmc_core::{FmcClient, ListParams};
use tracing::debug;

/// Access to `/api/fmc_platform/v1/info/...`.
#[derive(Debug, Clone)]
pub struct PlatformService {
    client: FmcClient,
}

impl PlatformService {
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

    /// List every domain on the controller.
    pub async fn list_domains(&self) -> Result<Vec<DomainInfo>> {
        let path = self.client.platform_path("info/domain");
        let domains: Vec<DomainInfo> = self.client.list_all(&path, &ListParams::expanded()).await?;
        debug!(count = domains.len(), "listed FMC domains");
        Ok(domains)
    }

    /// Fetch one domain by id, looked up within the selected domain.
    pub async fn get_domain(&self, id: &str) -> Result<DomainInfo> {
        let domain = self.client.domain_uuid()?;
        let path = self
            .client
            .platform_path(&format!("info/domain/{domain}/{}", validate_id(id)?));
        self.client.get(&path).await
    }

    /// List the software versions the controller reports.
    pub async fn list_server_versions(&self) -> Result<Vec<ServerVersion>> {
        let path = self.client.platform_path("info/serverversion");
        self.client.list_all(&path, &ListParams::expanded()).await
    }

    /// Fetch one server-version record.
    pub async fn get_server_version(&self, id: &str) -> Result<ServerVersion> {
        let path = self
            .client
            .platform_path(&format!("info/serverversion/{}", validate_id(id)?));
        self.client.get(&path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fmc_core::{Credentials, Error};
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const DOMAIN: &str = "e276abec-e0f2-11e3-8169-6d9ed49b625f";

    async fn service(server: &MockServer) -> PlatformService {
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
        PlatformService::new(client)
    }

    #[tokio::test]
    async fn list_domains_success() {
        let server = MockServer::start().await;
        let platform = service(&server).await;

        Mock::given(method("GET"))
            .and(path("/api/fmc_platform/v1/info/domain"))
            .and(query_param("expanded", "true"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [
                    { "uuid": DOMAIN, "name": "Global", "type": "Domain" },
                    { "uuid": "0fce8a1b-3d2c-4e5f-8a9b-1c2d3e4f5a6b", "name": "Global/Tenant-A", "type": "Domain" }
                ],
                "paging": { "offset": 0, "limit": 25, "count": 2, "pages": 1 }
            })))
            .mount(&server)
            .await;

        let domains = platform.list_domains().await.unwrap();
        assert_eq!(domains.len(), 2);
        assert_eq!(domains[1].leaf_name(), "Tenant-A");
    }

    #[tokio::test]
    async fn get_domain_scoped_to_selected_domain() {
        let server = MockServer::start().await;
        let platform = service(&server).await;

        Mock::given(method("GET"))
            .and(path(format!("/api/fmc_platform/v1/info/domain/{DOMAIN}/abc").as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "abc", "name": "Global/Tenant-B"
            })))
            .mount(&server)
            .await;

        let domain = platform.get_domain("abc").await.unwrap();
        assert_eq!(domain.name, "Global/Tenant-B");
    }

    #[tokio::test]
    async fn list_server_versions_success() {
        let server = MockServer::start().await;
        let platform = service(&server).await;

        Mock::given(method("GET"))
            .and(path("/api/fmc_platform/v1/info/serverversion"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [{ "serverVersion": "7.2.5 (build 208)", "vdbVersion": "build 370" }],
                "paging": { "count": 1, "pages": 1 }
            })))
            .mount(&server)
            .await;

        let versions = platform.list_server_versions().await.unwrap();
        assert_eq!(versions[0].server_version.as_deref(), Some("7.2.5 (build 208)"));
    }

    #[tokio::test]
    async fn get_server_version_not_found() {
        let server = MockServer::start().await;
        let platform = service(&server).await;

        Mock::given(method("GET"))
            .and(path("/api/fmc_platform/v1/info/serverversion/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = platform.get_server_version("missing").await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn rejects_path_like_ids() {
        let server = MockServer::start().await;
        let platform = service(&server).await;

        let err = platform.get_server_version("../auth").await.unwrap_err();
        assert!(matches!(err, Error::InvalidEndpoint(_)));
    }
}

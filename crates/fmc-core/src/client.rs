//! The authenticated FMC client.
//!
//! [`FmcClient`] owns the transport and the session. Every call goes through
//! the same steps: build a [`RawRequest`], attach the access token, send it,
//! run the answer through [`classify`], then decode the payload. A 429 is the
//! only outcome ever retried, and only when a [`RetryPolicy`] allows it.

use crate::classify::{classify, Payload};
use crate::config::{ClientConfig, Credentials, FmcConfig, RetryPolicy};
use crate::error::{Error, Result};
use crate::ids::DomainUuid;
use crate::paging::{accumulate_pages, Envelope};
use crate::query::ListParams;
use crate::session::{Domain, Session, SessionInfo, ACCESS_TOKEN_HEADER};
use crate::transport::{HttpTransport, RawRequest, Transport};
use bytes::Bytes;
use reqwest::header::HeaderValue;
use reqwest::Method;
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::time::sleep;
use tracing::{debug, error, info, warn};
use url::Url;

/// Prefix of platform endpoints (auth, domains, server info).
pub const PLATFORM_PREFIX: &str = "/api/fmc_platform/v1";

/// Prefix of domain-scoped configuration endpoints.
pub const CONFIG_PREFIX: &str = "/api/fmc_config/v1";

/// Token exchange endpoint.
pub const TOKEN_PATH: &str = "/api/fmc_platform/v1/auth/generatetoken";

/// Builder for [`FmcClient`].
pub struct FmcClientBuilder {
    base_url: Url,
    credentials: Credentials,
    http_config: ClientConfig,
    retry_policy: RetryPolicy,
    transport: Option<Arc<dyn Transport>>,
}

impl FmcClientBuilder {
    /// Create a new builder from the provided base URL.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the URL does not parse.
    pub fn new(base_url: impl AsRef<str>, credentials: Credentials) -> Result<Self> {
        let url = Url::parse(base_url.as_ref()).map_err(|err| {
            Error::ConfigError(format!("Invalid FMC base URL `{}`: {err}", base_url.as_ref()))
        })?;

        Ok(Self {
            base_url: url,
            credentials,
            http_config: ClientConfig::new(),
            retry_policy: RetryPolicy::no_retry(),
            transport: None,
        })
    }

    /// Create a builder from a validated [`FmcConfig`].
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn from_config(config: &FmcConfig, credentials: Credentials) -> Result<Self> {
        validator::Validate::validate(config)?;
        Ok(Self {
            base_url: config.base_url()?,
            credentials,
            http_config: config.client_config(),
            retry_policy: config.retry_policy(),
            transport: None,
        })
    }

    /// Retry rate-limited requests according to `retry`.
    #[must_use]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry_policy = retry;
        self
    }

    /// Override the HTTP client configuration.
    #[must_use]
    pub fn with_http_config(mut self, config: ClientConfig) -> Self {
        self.http_config = config;
        self
    }

    /// Send requests through `transport` instead of a reqwest client.
    #[must_use]
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Build the client instance.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn build(self) -> Result<FmcClient> {
        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(HttpTransport::new(&self.http_config)?),
        };

        Ok(FmcClient {
            transport,
            base_url: self.base_url,
            credentials: Arc::new(self.credentials),
            retry_policy: self.retry_policy,
            session: Arc::new(RwLock::new(None)),
        })
    }
}

/// Asynchronous client for one FMC.
///
/// Cloning is cheap; clones share the session.
#[derive(Clone)]
pub struct FmcClient {
    transport: Arc<dyn Transport>,
    base_url: Url,
    credentials: Arc<Credentials>,
    retry_policy: RetryPolicy,
    session: Arc<RwLock<Option<Session>>>,
}

impl fmt::Debug for FmcClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FmcClient")
            .field("base_url", &self.base_url.as_str())
            .field("username", &self.credentials.username)
            .field("retry_policy", &self.retry_policy)
            .field("authenticated", &self.is_authenticated())
            .finish_non_exhaustive()
    }
}

impl FmcClient {
    /// Construct directly from a base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the HTTP client cannot be built.
    pub fn new(base_url: impl AsRef<str>, credentials: Credentials) -> Result<Self> {
        FmcClientBuilder::new(base_url, credentials)?.build()
    }

    /// Access the base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Exchange the credentials for an access token.
    ///
    /// Replaces any previous session. The domain selected afterwards is the
    /// server's default.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Auth`] if the credentials are rejected, or any
    /// transport error.
    pub async fn login(&self) -> Result<SessionInfo> {
        let mut request = RawRequest::new(Method::POST, self.build_url(TOKEN_PATH)?);
        request.basic_auth = Some((
            self.credentials.username.clone(),
            self.credentials.password.expose_secret().to_string(),
        ));

        let payload = self.execute(request).await.map_err(|err| match err {
            Error::Auth(_) => Error::Auth(format!(
                "credentials for `{}` were rejected",
                self.credentials.username
            )),
            other => other,
        })?;

        let Some(headers) = payload.headers() else {
            return Err(Error::Auth(
                "token exchange did not answer 204 No Content".to_string(),
            ));
        };

        let session = Session::from_headers(headers)?;
        let info = session.info();
        info!(
            user = %self.credentials.username,
            domain = %info.default_domain,
            domains = info.domains.len(),
            "logged in to FMC"
        );
        *self.write_session() = Some(session);
        Ok(info)
    }

    /// Forget the current session. Later requests fail until the next login.
    pub fn logout(&self) {
        *self.write_session() = None;
    }

    /// Returns true once [`FmcClient::login`] has succeeded.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.read_session().is_some()
    }

    /// Snapshot of the current session, without tokens.
    #[must_use]
    pub fn session(&self) -> Option<SessionInfo> {
        self.read_session().as_ref().map(Session::info)
    }

    /// Domains granted at login.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotAuthenticated`] before login.
    pub fn domains(&self) -> Result<Vec<Domain>> {
        self.with_session(|session| session.domains().to_vec())
    }

    /// Scope configuration requests to the named domain.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownDomain`] if the name was not granted at login,
    /// leaving the selection unchanged, or [`Error::NotAuthenticated`].
    pub fn select_domain(&self, name: &str) -> Result<DomainUuid> {
        let mut guard = self.write_session();
        let session = guard.as_mut().ok_or(Error::NotAuthenticated)?;
        let uuid = session.select_domain(name)?.clone();
        info!(domain = name, uuid = %uuid, "selected FMC domain");
        Ok(uuid)
    }

    /// UUID of the selected domain.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotAuthenticated`] before login.
    pub fn domain_uuid(&self) -> Result<DomainUuid> {
        self.with_session(|session| session.selected_domain().clone())
    }

    /// `/api/fmc_platform/v1/{suffix}`.
    #[must_use]
    pub fn platform_path(&self, suffix: &str) -> String {
        format!("{PLATFORM_PREFIX}/{}", suffix.trim_start_matches('/'))
    }

    /// `/api/fmc_config/v1/domain/{selected domain}/{suffix}`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotAuthenticated`] before login.
    pub fn config_path(&self, suffix: &str) -> Result<String> {
        let domain = self.domain_uuid()?;
        Ok(format!(
            "{CONFIG_PREFIX}/domain/{domain}/{}",
            suffix.trim_start_matches('/')
        ))
    }

    /// GET and decode.
    ///
    /// # Errors
    ///
    /// Returns the classified error of a failed request, or
    /// [`Error::ParseError`] if the body does not decode into `T`.
    pub async fn get<T>(&self, path: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.send_json::<(), T>(Method::GET, path, &[], None).await
    }

    /// GET with query parameters and decode.
    ///
    /// # Errors
    ///
    /// See [`FmcClient::get`].
    pub async fn get_with<T>(&self, path: &str, query: &[(&'static str, String)]) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.send_json::<(), T>(Method::GET, path, query, None).await
    }

    /// GET returning the classified payload as is, for endpoints that do not
    /// answer JSON.
    ///
    /// # Errors
    ///
    /// Returns the classified error of a failed request.
    pub async fn get_payload(&self, path: &str, query: &[(&'static str, String)]) -> Result<Payload> {
        let request = self.authorized_request(Method::GET, path, query, None)?;
        self.execute(request).await
    }

    /// GET returning the raw body bytes.
    ///
    /// # Errors
    ///
    /// Returns the classified error of a failed request.
    pub async fn get_bytes(&self, path: &str) -> Result<Bytes> {
        match self.get_payload(path, &[]).await? {
            Payload::Raw(bytes) => Ok(bytes),
            Payload::Json(value) => Ok(Bytes::from(value.to_string())),
            Payload::NoContent(_) => Ok(Bytes::new()),
        }
    }

    /// POST a JSON body and decode the answer.
    ///
    /// # Errors
    ///
    /// See [`FmcClient::get`].
    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(Method::POST, path, &[], Some(body)).await
    }

    /// POST with query parameters.
    ///
    /// # Errors
    ///
    /// See [`FmcClient::get`].
    pub async fn post_with<B, T>(
        &self,
        path: &str,
        query: &[(&'static str, String)],
        body: &B,
    ) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(Method::POST, path, query, Some(body)).await
    }

    /// PUT a JSON body and decode the answer.
    ///
    /// # Errors
    ///
    /// See [`FmcClient::get`].
    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(Method::PUT, path, &[], Some(body)).await
    }

    /// DELETE and decode the answer (FMC echoes the deleted record).
    ///
    /// # Errors
    ///
    /// See [`FmcClient::get`].
    pub async fn delete<T>(&self, path: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.send_json::<(), T>(Method::DELETE, path, &[], None).await
    }

    /// Fetch one page of a collection.
    ///
    /// # Errors
    ///
    /// See [`FmcClient::get`].
    pub async fn get_envelope<T>(&self, path: &str, params: &ListParams) -> Result<Envelope<T>>
    where
        T: DeserializeOwned,
    {
        self.get_with(path, &params.to_pairs()).await
    }

    /// Fetch every page of a collection and concatenate the items.
    ///
    /// # Errors
    ///
    /// Fails as a whole if any page fails; no partial list is returned.
    pub async fn list_all<T>(&self, path: &str, params: &ListParams) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let first = self.get_envelope(path, params).await?;
        accumulate_pages(first, |page| {
            let params = params.for_page(&page);
            async move { self.get_envelope(path, &params).await }
        })
        .await
    }

    fn build_url(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|err| Error::InvalidEndpoint(format!("Invalid FMC path `{path}`: {err}")))
    }

    fn authorized_request(
        &self,
        method: Method,
        path: &str,
        query: &[(&'static str, String)],
        body: Option<Value>,
    ) -> Result<RawRequest> {
        let token = self.with_session(|session| session.access_token().to_string())?;
        let token = HeaderValue::from_str(&token)
            .map_err(|err| Error::Auth(format!("unusable access token: {err}")))?;

        let mut request = RawRequest::new(method, self.build_url(path)?);
        request.query = query.to_vec();
        request.headers.insert(ACCESS_TOKEN_HEADER, token);
        request.body = body;
        Ok(request)
    }

    async fn send_json<B, R>(
        &self,
        method: Method,
        path: &str,
        query: &[(&'static str, String)],
        body: Option<&B>,
    ) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let body = body.map(serde_json::to_value).transpose()?;
        let request = self.authorized_request(method, path, query, body)?;
        let payload = self.execute(request).await?;
        decode_payload(path, payload)
    }

    async fn execute(&self, request: RawRequest) -> Result<Payload> {
        let endpoint = request.path().to_string();
        let mut attempt = 0;

        loop {
            debug!(method = %request.method, endpoint = %endpoint, attempt, "FMC request");
            let response = self.transport.send(request.clone()).await?;
            let status = response.status.as_u16();
            let outcome = classify(response.status, &response.headers, &response.body);

            match outcome.into_payload(&endpoint) {
                Ok(payload) => return Ok(payload),
                Err(Error::RateLimited { retry_after }) if attempt < self.retry_policy.max_retries => {
                    attempt += 1;
                    let delay = self.retry_policy.delay_for_rate_limit(attempt, retry_after);
                    warn!(
                        endpoint = %endpoint,
                        attempt,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        "FMC rate limit hit, backing off"
                    );
                    sleep(delay).await;
                }
                Err(err) => {
                    error!(
                        method = %request.method,
                        endpoint = %endpoint,
                        status,
                        code = err.error_code(),
                        "FMC request failed"
                    );
                    return Err(err);
                }
            }
        }
    }

    fn with_session<T>(&self, f: impl FnOnce(&Session) -> T) -> Result<T> {
        self.read_session()
            .as_ref()
            .map(f)
            .ok_or(Error::NotAuthenticated)
    }

    fn read_session(&self) -> RwLockReadGuard<'_, Option<Session>> {
        self.session.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_session(&self) -> RwLockWriteGuard<'_, Option<Session>> {
        self.session.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn decode_payload<R>(path: &str, payload: Payload) -> Result<R>
where
    R: DeserializeOwned,
{
    let value = match payload {
        Payload::Json(value) => value,
        Payload::NoContent(_) => Value::Null,
        Payload::Raw(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Value::Null,
        Payload::Raw(_) => {
            return Err(Error::ParseError(format!(
                "FMC response for `{path}` is not JSON"
            )))
        }
    };
    serde_json::from_value(value).map_err(|err| {
        Error::ParseError(format!("Failed to parse FMC response for `{path}`: {err}"))
    })
}

//! Session state produced by the token exchange.
//!
//! Login answers 204 with everything in the response headers: the token pair,
//! the user's UUID, the default domain and the full list of domains the user
//! may act in. [`Session::from_headers`] turns those into a [`Session`]; the
//! client keeps it and attaches the access token to every later request.

use crate::error::{Error, Result};
use crate::ids::DomainUuid;
use reqwest::header::HeaderMap;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Header carrying the access token, on the login response and on requests.
pub const ACCESS_TOKEN_HEADER: &str = "x-auth-access-token";
/// Header carrying the refresh token.
pub const REFRESH_TOKEN_HEADER: &str = "x-auth-refresh-token";
/// Header carrying the authenticated user's UUID.
pub const USER_UUID_HEADER: &str = "user_uuid";
/// Header carrying the default domain UUID.
pub const DOMAIN_UUID_HEADER: &str = "domain_uuid";
/// Header carrying the JSON list of granted domains.
pub const DOMAINS_HEADER: &str = "domains";

/// A domain (tenant partition) the user was granted at login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Domain {
    /// Domain name, e.g. `Global` or `Global/Tenant-A`.
    pub name: String,
    /// Domain UUID.
    pub uuid: DomainUuid,
}

/// Authenticated session.
///
/// Tokens are held as [`SecretString`] and never appear in `Debug` output.
pub struct Session {
    access_token: SecretString,
    refresh_token: Option<SecretString>,
    user_uuid: Option<String>,
    default_domain: DomainUuid,
    domains: Vec<Domain>,
    selected: DomainUuid,
}

impl Session {
    /// Builds a session from the headers of the token exchange response.
    ///
    /// The default domain comes from `DOMAIN_UUID`, falling back to the first
    /// entry of `DOMAINS`. It is selected initially.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Auth`] when the access token is missing and
    /// [`Error::ParseError`] when the domain headers are unusable.
    pub fn from_headers(headers: &HeaderMap) -> Result<Self> {
        let access_token = header_str(headers, ACCESS_TOKEN_HEADER)
            .ok_or_else(|| Error::Auth("login response carried no access token".to_string()))?;
        let refresh_token = header_str(headers, REFRESH_TOKEN_HEADER);
        let user_uuid = header_str(headers, USER_UUID_HEADER);

        let domains: Vec<Domain> = match header_str(headers, DOMAINS_HEADER) {
            Some(raw) => serde_json::from_str(&raw)
                .map_err(|err| Error::ParseError(format!("invalid DOMAINS header: {err}")))?,
            None => Vec::new(),
        };

        let default_domain = match header_str(headers, DOMAIN_UUID_HEADER) {
            Some(uuid) => DomainUuid::parse_str(&uuid)?,
            None => domains
                .first()
                .map(|domain| domain.uuid.clone())
                .ok_or_else(|| {
                    Error::ParseError("login response named no domain".to_string())
                })?,
        };

        Ok(Self {
            access_token: SecretString::from(access_token),
            refresh_token: refresh_token.map(SecretString::from),
            user_uuid,
            selected: default_domain.clone(),
            default_domain,
            domains,
        })
    }

    /// Returns the access token for the request header.
    pub(crate) fn access_token(&self) -> &str {
        self.access_token.expose_secret()
    }

    /// Returns true when the server issued a refresh token.
    #[must_use]
    pub const fn has_refresh_token(&self) -> bool {
        self.refresh_token.is_some()
    }

    /// UUID of the authenticated user.
    #[must_use]
    pub fn user_uuid(&self) -> Option<&str> {
        self.user_uuid.as_deref()
    }

    /// Domain chosen by the server at login.
    #[must_use]
    pub const fn default_domain(&self) -> &DomainUuid {
        &self.default_domain
    }

    /// Domain that configuration requests are scoped to.
    #[must_use]
    pub const fn selected_domain(&self) -> &DomainUuid {
        &self.selected
    }

    /// Domains granted at login.
    #[must_use]
    pub fn domains(&self) -> &[Domain] {
        &self.domains
    }

    /// Selects the domain with the given name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownDomain`] when no granted domain has that name;
    /// the current selection is kept.
    pub fn select_domain(&mut self, name: &str) -> Result<&DomainUuid> {
        let domain = self
            .domains
            .iter()
            .find(|domain| domain.name == name)
            .ok_or_else(|| Error::UnknownDomain(name.to_string()))?;
        self.selected = domain.uuid.clone();
        Ok(&self.selected)
    }

    /// Returns a secret-free snapshot of this session.
    #[must_use]
    pub fn info(&self) -> SessionInfo {
        SessionInfo {
            user_uuid: self.user_uuid.clone(),
            default_domain: self.default_domain.clone(),
            selected_domain: self.selected.clone(),
            domains: self.domains.clone(),
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &"[REDACTED]")
            .field("user_uuid", &self.user_uuid)
            .field("default_domain", &self.default_domain)
            .field("selected", &self.selected)
            .field("domains", &self.domains)
            .finish_non_exhaustive()
    }
}

/// What a caller may see of the session. Contains no token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionInfo {
    /// UUID of the authenticated user.
    pub user_uuid: Option<String>,
    /// Domain chosen by the server at login.
    pub default_domain: DomainUuid,
    /// Domain configuration requests are scoped to.
    pub selected_domain: DomainUuid,
    /// Domains granted at login.
    pub domains: Vec<Domain>,
}

fn header_str(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

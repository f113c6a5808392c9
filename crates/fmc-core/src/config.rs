//! Configuration for FMC clients.
//!
//! [`FmcConfig`] describes which controller to talk to and how; it is what an
//! application loads from a file or the environment. [`ClientConfig`] and
//! [`RetryPolicy`] are the HTTP-level knobs derived from it.

use crate::error::{Error, Result};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;
use validator::Validate;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default idle timeout for connection pools
pub const DEFAULT_POOL_IDLE_TIMEOUT: u64 = 90;

/// Default maximum idle connections per host
pub const DEFAULT_POOL_MAX_IDLE_PER_HOST: usize = 10;

/// Default number of rate-limit retries when retrying is enabled.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default initial retry delay in milliseconds
pub const DEFAULT_RETRY_DELAY_MS: u64 = 1000;

/// Default maximum retry delay in milliseconds (for exponential backoff)
pub const DEFAULT_RETRY_MAX_DELAY_MS: u64 = 30_000;

/// Connection settings for one FMC.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct FmcConfig {
    /// Hostname or IP address of the controller.
    #[validate(length(min = 1, max = 253))]
    pub host: String,

    /// HTTPS port, when not 443.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    /// Whether to verify TLS certificates
    #[serde(default = "default_tls_verify")]
    pub tls_verify: bool,

    /// Optional path to custom CA certificate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls_ca_cert: Option<PathBuf>,

    /// Request timeout in seconds
    #[validate(range(min = 1, max = 300))]
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// How many times a throttled (429) request is retried. Zero disables it.
    #[validate(range(min = 0, max = 10))]
    #[serde(default)]
    pub rate_limit_retries: u32,
}

const fn default_tls_verify() -> bool {
    true
}

const fn default_request_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl FmcConfig {
    /// Create a configuration for the given host.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails.
    pub fn new(host: impl Into<String>) -> Result<Self> {
        let config = Self {
            host: host.into(),
            port: None,
            tls_verify: default_tls_verify(),
            tls_ca_cert: None,
            request_timeout_secs: default_request_timeout_secs(),
            rate_limit_retries: 0,
        };
        config.validate()?;
        Ok(config)
    }

    /// Load the configuration from `FMC_HOST`, `FMC_PORT`, `FMC_VERIFY`,
    /// `FMC_TIMEOUT_SECS` and `FMC_RATE_LIMIT_RETRIES`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if `FMC_HOST` is unset or a value does
    /// not parse or validate.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`FmcConfig::from_env`] with a custom variable source.
    ///
    /// # Errors
    ///
    /// See [`FmcConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("FMC_HOST")
            .ok_or_else(|| Error::ConfigError("FMC_HOST is not set".to_string()))?;
        let mut config = Self::new(host)?;

        if let Some(port) = lookup("FMC_PORT") {
            config.port = Some(parse_var("FMC_PORT", &port)?);
        }
        if let Some(verify) = lookup("FMC_VERIFY") {
            config.tls_verify = parse_bool("FMC_VERIFY", &verify)?;
        }
        if let Some(timeout) = lookup("FMC_TIMEOUT_SECS") {
            config.request_timeout_secs = parse_var("FMC_TIMEOUT_SECS", &timeout)?;
        }
        if let Some(retries) = lookup("FMC_RATE_LIMIT_RETRIES") {
            config.rate_limit_retries = parse_var("FMC_RATE_LIMIT_RETRIES", &retries)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Set the HTTPS port.
    #[must_use]
    pub const fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Set whether to verify TLS certificates.
    #[must_use]
    pub const fn with_tls_verify(mut self, verify: bool) -> Self {
        self.tls_verify = verify;
        self
    }

    /// Set custom CA certificate path.
    #[must_use]
    pub fn with_ca_cert(mut self, path: PathBuf) -> Self {
        self.tls_ca_cert = Some(path);
        self
    }

    /// Set request timeout in seconds.
    #[must_use]
    pub const fn with_timeout(mut self, seconds: u64) -> Self {
        self.request_timeout_secs = seconds;
        self
    }

    /// Set the number of rate-limit retries.
    #[must_use]
    pub const fn with_rate_limit_retries(mut self, retries: u32) -> Self {
        self.rate_limit_retries = retries;
        self
    }

    /// Get the request timeout as a Duration.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// `https://{host}[:{port}]`.
    ///
    /// # Errors
    ///
    /// Returns an error if the host does not form a valid URL.
    pub fn base_url(&self) -> Result<Url> {
        let raw = match self.port {
            Some(port) => format!("https://{}:{port}", self.host),
            None => format!("https://{}", self.host),
        };
        Url::parse(&raw).map_err(|e| Error::ConfigError(format!("Invalid FMC host `{}`: {e}", self.host)))
    }

    /// HTTP settings matching this configuration.
    #[must_use]
    pub fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::new()
            .with_timeout(self.timeout())
            .with_tls_verify(self.tls_verify);
        if let Some(path) = &self.tls_ca_cert {
            config = config.with_ca_cert(path.clone());
        }
        config
    }

    /// Rate-limit retry policy matching this configuration.
    #[must_use]
    pub const fn retry_policy(&self) -> RetryPolicy {
        if self.rate_limit_retries == 0 {
            RetryPolicy::no_retry()
        } else {
            RetryPolicy::new().with_max_retries(self.rate_limit_retries)
        }
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::ConfigError(format!("{key} has an invalid value `{value}`")))
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(Error::ConfigError(format!(
            "{key} has an invalid value `{value}`"
        ))),
    }
}

/// Username and password for the token exchange.
#[derive(Debug)]
pub struct Credentials {
    /// API user name.
    pub username: String,
    /// Password. Only exposed when building the login request.
    pub password: SecretString,
}

impl Credentials {
    /// Create credentials.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: SecretString::from(password.into()),
        }
    }

    /// Load credentials from `FMC_USERNAME` and `FMC_PASSWORD`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if either variable is unset.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load credentials through `lookup`, keyed like [`Credentials::from_env`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if either key is missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let username = lookup("FMC_USERNAME")
            .ok_or_else(|| Error::ConfigError("FMC_USERNAME is not set".to_string()))?;
        let password = lookup("FMC_PASSWORD")
            .ok_or_else(|| Error::ConfigError("FMC_PASSWORD is not set".to_string()))?;
        Ok(Self::new(username, password))
    }
}

/// Retry policy with exponential backoff.
///
/// Only rate-limited requests are retried. When the server names a delay in
/// `Retry-After` it is used up to `max_delay`; otherwise the backoff below
/// applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of retry attempts
    pub max_retries: u32,

    /// Initial delay before first retry
    pub initial_delay: Duration,

    /// Maximum delay between retries (cap for exponential backoff)
    pub max_delay: Duration,

    /// Backoff multiplier
    pub backoff_multiplier: u32,
}

impl RetryPolicy {
    /// Create a new retry policy with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            initial_delay: Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
            max_delay: Duration::from_millis(DEFAULT_RETRY_MAX_DELAY_MS),
            backoff_multiplier: 2,
        }
    }

    /// Create a retry policy with no retries. This is what clients use
    /// unless told otherwise.
    #[must_use]
    pub const fn no_retry() -> Self {
        Self {
            max_retries: 0,
            initial_delay: Duration::from_millis(0),
            max_delay: Duration::from_millis(0),
            backoff_multiplier: 1,
        }
    }

    /// Set the maximum number of retries.
    #[must_use]
    pub const fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Set the initial delay.
    #[must_use]
    pub const fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Set the maximum delay.
    #[must_use]
    pub const fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Set the backoff multiplier.
    #[must_use]
    pub const fn with_backoff_multiplier(mut self, multiplier: u32) -> Self {
        self.backoff_multiplier = multiplier;
        self
    }

    /// Calculate delay for a given attempt number.
    ///
    /// delay = min(initial_delay * multiplier^(attempt - 1), max_delay)
    #[must_use]
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::from_secs(0);
        }

        let multiplier = self.backoff_multiplier.saturating_pow(attempt - 1);
        let delay = self.initial_delay.saturating_mul(multiplier);

        std::cmp::min(delay, self.max_delay)
    }

    /// Delay before retry number `attempt`, preferring the server's hint.
    /// Never longer than `max_delay`.
    #[must_use]
    pub fn delay_for_rate_limit(&self, attempt: u32, retry_after: Option<Duration>) -> Duration {
        retry_after.map_or_else(
            || self.delay_for_attempt(attempt),
            |hint| hint.min(self.max_delay),
        )
    }

    /// Check if retries are enabled.
    #[must_use]
    pub const fn has_retries(&self) -> bool {
        self.max_retries > 0
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::no_retry()
    }
}

/// HTTP client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Request timeout
    pub timeout: Duration,

    /// Connection pool idle timeout
    pub pool_idle_timeout: Duration,

    /// Maximum idle connections per host
    pub pool_max_idle_per_host: usize,

    /// Enable response compression
    pub enable_compression: bool,

    /// Verify the controller's certificate. FMCs commonly run with a
    /// self-signed one.
    pub tls_verify: bool,

    /// Extra root certificate (PEM).
    pub ca_cert: Option<PathBuf>,
}

impl ClientConfig {
    /// Create a new client configuration with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            pool_idle_timeout: Duration::from_secs(DEFAULT_POOL_IDLE_TIMEOUT),
            pool_max_idle_per_host: DEFAULT_POOL_MAX_IDLE_PER_HOST,
            enable_compression: true,
            tls_verify: true,
            ca_cert: None,
        }
    }

    /// Set request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set connection pool idle timeout.
    #[must_use]
    pub const fn with_pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.pool_idle_timeout = timeout;
        self
    }

    /// Set maximum idle connections per host.
    #[must_use]
    pub const fn with_pool_max_idle(mut self, max: usize) -> Self {
        self.pool_max_idle_per_host = max;
        self
    }

    /// Enable or disable compression.
    #[must_use]
    pub const fn with_compression(mut self, enabled: bool) -> Self {
        self.enable_compression = enabled;
        self
    }

    /// Enable or disable certificate verification.
    #[must_use]
    pub const fn with_tls_verify(mut self, verify: bool) -> Self {
        self.tls_verify = verify;
        self
    }

    /// Trust an extra CA certificate.
    #[must_use]
    pub fn with_ca_cert(mut self, path: PathBuf) -> Self {
        self.ca_cert = Some(path);
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

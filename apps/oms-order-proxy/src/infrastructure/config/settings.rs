//! Proxy Configuration Settings
//!
//! Configuration types for the order proxy, loaded from environment
//! variables. Upstream credentials are required; everything else has a
//! sensible default.

use std::path::PathBuf;
use std::time::Duration;

/// Upstream OMS API credentials.
#[derive(Clone)]
pub struct Credentials {
    token: String,
    client_id: String,
}

impl Credentials {
    /// Create new credentials.
    #[must_use]
    pub const fn new(token: String, client_id: String) -> Self {
        Self { token, client_id }
    }

    /// The bearer token.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    /// The OMS client id sent in the `Oms-Cid` header.
    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.client_id
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("token", &"[REDACTED]")
            .field("client_id", &"[REDACTED]")
            .finish()
    }
}

/// Upstream OMS endpoint settings.
#[derive(Debug, Clone)]
pub struct UpstreamSettings {
    /// Order search endpoint URL.
    pub base_url: String,
    /// Orders requested per pagination page.
    pub page_size: u32,
    /// Per-request timeout.
    pub request_timeout: Duration,
}

impl Default for UpstreamSettings {
    fn default() -> Self {
        Self {
            base_url: "https://client.omsguru.com/order_api/orders".to_string(),
            page_size: 100,
            request_timeout: Duration::from_millis(10_000),
        }
    }
}

/// Fetch pipeline settings.
#[derive(Debug, Clone)]
pub struct FetchSettings {
    /// Maximum day-fetches in flight at once.
    pub concurrency: usize,
    /// Default day count when the request does not specify one.
    pub default_days: u32,
    /// Per-day pagination page cap.
    pub max_pages_per_day: u32,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            concurrency: 5,
            default_days: 1,
            max_pages_per_day: 1_000,
        }
    }
}

/// Local server settings.
#[derive(Debug, Clone)]
pub struct ServerSettings {
    /// HTTP port for the orders endpoint.
    pub http_port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self { http_port: 8080 }
    }
}

/// Cache file settings.
#[derive(Debug, Clone)]
pub struct CacheSettings {
    /// Path of the orders cache document.
    pub path: PathBuf,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("orders_data.json"),
        }
    }
}

/// Complete proxy configuration.
#[derive(Debug, Clone)]
pub struct ProxyConfig {
    /// Upstream API credentials.
    pub credentials: Credentials,
    /// Upstream endpoint settings.
    pub upstream: UpstreamSettings,
    /// Fetch pipeline settings.
    pub fetch: FetchSettings,
    /// Local server settings.
    pub server: ServerSettings,
    /// Cache file settings.
    pub cache: CacheSettings,
}

/// Source of configuration values, keyed by environment variable name.
type EnvLookup<'a> = &'a dyn Fn(&str) -> Option<String>;

impl ProxyConfig {
    /// Create configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if required environment variables are missing
    /// or empty.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(&|key| std::env::var(key).ok())
    }

    /// Create configuration from an arbitrary key-value lookup.
    ///
    /// Mutating process env in tests is unsound under edition 2024, so
    /// the parsing logic is driven through this seam instead.
    fn from_lookup(lookup: EnvLookup<'_>) -> Result<Self, ConfigError> {
        let token = required(lookup, "OMS_TOKEN")?;
        let client_id = required(lookup, "OMS_CID")?;

        let upstream = UpstreamSettings {
            base_url: lookup("OMS_BASE_URL")
                .unwrap_or_else(|| UpstreamSettings::default().base_url),
            page_size: parse_u32(
                lookup,
                "ORDER_PROXY_PAGE_SIZE",
                UpstreamSettings::default().page_size,
            ),
            request_timeout: parse_duration_millis(
                lookup,
                "ORDER_PROXY_REQUEST_TIMEOUT_MS",
                UpstreamSettings::default().request_timeout,
            ),
        };

        let fetch = FetchSettings {
            concurrency: parse_usize(
                lookup,
                "ORDER_PROXY_CONCURRENCY",
                FetchSettings::default().concurrency,
            ),
            default_days: parse_u32(
                lookup,
                "ORDER_PROXY_DEFAULT_DAYS",
                FetchSettings::default().default_days,
            ),
            max_pages_per_day: parse_u32(
                lookup,
                "ORDER_PROXY_MAX_PAGES_PER_DAY",
                FetchSettings::default().max_pages_per_day,
            ),
        };

        let server = ServerSettings {
            http_port: parse_u16(
                lookup,
                "ORDER_PROXY_HTTP_PORT",
                ServerSettings::default().http_port,
            ),
        };

        let cache = CacheSettings {
            path: lookup("ORDER_PROXY_CACHE_PATH")
                .map_or_else(|| CacheSettings::default().path, PathBuf::from),
        };

        Ok(Self {
            credentials: Credentials::new(token, client_id),
            upstream,
            fetch,
            server,
            cache,
        })
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Required environment variable is missing.
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    /// Environment variable has empty value.
    #[error("environment variable {0} cannot be empty")]
    EmptyValue(String),
}

fn required(lookup: EnvLookup<'_>, key: &str) -> Result<String, ConfigError> {
    let value = lookup(key).ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))?;
    if value.is_empty() {
        return Err(ConfigError::EmptyValue(key.to_string()));
    }
    Ok(value)
}

fn parse_u16(lookup: EnvLookup<'_>, key: &str, default: u16) -> u16 {
    lookup(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn parse_u32(lookup: EnvLookup<'_>, key: &str, default: u32) -> u32 {
    lookup(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn parse_usize(lookup: EnvLookup<'_>, key: &str, default: usize) -> usize {
    lookup(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn parse_duration_millis(lookup: EnvLookup<'_>, key: &str, default: Duration) -> Duration {
    lookup(key)
        .and_then(|v| v.parse::<u64>().ok())
        .map_or(default, Duration::from_millis)
}

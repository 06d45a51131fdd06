//! Portal configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `PORTAL_API_URL` - Base URL of the ticket REST API (http or https)
//!
//! ## Optional
//! - `PORTAL_HOST` - Bind address (default: 127.0.0.1)
//! - `PORTAL_PORT` - Listen port (default: 3000)
//! - `PORTAL_BASE_URL` - Public URL of the portal (default: <http://localhost:3000>)
//! - `PORTAL_API_TIMEOUT_SECS` - Per-request timeout for API calls (default: 15)
//! - `PORTAL_BRAND_LOGO_URL` - Navbar logo image
//! - `PORTAL_FOOTER_LOGO_URL` - Footer logo image
//! - `PORTAL_HOME_URL` - External "Home" link in the navbar
//! - `PORTAL_LOG_FORMAT` - `json` for structured logs, anything else for text
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error event sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Performance trace sample rate (default: 0.1)

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_BRAND_LOGO_URL: &str = "https://res.cloudinary.com/dzzurd9al/image/upload/v1765505385/logoParqueExplora_iapiws.jpg";
const DEFAULT_FOOTER_LOGO_URL: &str = "https://res.cloudinary.com/dzzurd9al/image/upload/v1765505764/imagenExploraGris_ueibcn.jpg";
const DEFAULT_HOME_URL: &str = "https://www.parqueexplora.org/tienda/boleteria";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Portal application configuration.
#[derive(Debug, Clone)]
pub struct PortalConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the portal
    pub base_url: String,
    /// Ticket REST API configuration
    pub api: ApiConfig,
    /// Static chrome shown on every page
    pub shell: ShellConfig,
    /// Emit JSON logs instead of text
    pub json_logs: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Error event sample rate
    pub sentry_sample_rate: f32,
    /// Performance trace sample rate
    pub sentry_traces_sample_rate: f32,
}

/// Ticket REST API configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL all endpoint paths are appended to
    pub base_url: Url,
    /// Timeout applied to every request
    pub timeout: Duration,
}

/// Branding and navigation links for the page shell.
#[derive(Debug, Clone)]
pub struct ShellConfig {
    pub brand_logo_url: String,
    pub footer_logo_url: String,
    pub home_url: String,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            brand_logo_url: DEFAULT_BRAND_LOGO_URL.to_string(),
            footer_logo_url: DEFAULT_FOOTER_LOGO_URL.to_string(),
            home_url: DEFAULT_HOME_URL.to_string(),
        }
    }
}

impl PortalConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("PORTAL_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("PORTAL_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("PORTAL_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("PORTAL_PORT".to_string(), e.to_string()))?;
        let base_url = get_env_or_default("PORTAL_BASE_URL", "http://localhost:3000");

        let api = ApiConfig::from_env()?;
        let shell = ShellConfig::from_env();

        let json_logs = get_optional_env("PORTAL_LOG_FORMAT")
            .is_some_and(|format| format.eq_ignore_ascii_case("json"));

        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = parse_sample_rate("SENTRY_SAMPLE_RATE", 1.0)?;
        let sentry_traces_sample_rate = parse_sample_rate("SENTRY_TRACES_SAMPLE_RATE", 0.1)?;

        Ok(Self {
            host,
            port,
            base_url,
            api,
            shell,
            json_logs,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Build a configuration for a portal talking to `api_base_url`, with
    /// every other setting at its default.
    #[must_use]
    pub fn for_api(api_base_url: Url) -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            api: ApiConfig {
                base_url: api_base_url,
                timeout: Duration::from_secs(ApiConfig::DEFAULT_TIMEOUT_SECS),
            },
            shell: ShellConfig::default(),
            json_logs: false,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.1,
        }
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the portal is served over HTTPS (controls `Secure` cookies).
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl ApiConfig {
    /// Default per-request timeout in seconds.
    pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

    fn from_env() -> Result<Self, ConfigError> {
        let base_url = parse_api_url(&get_required_env("PORTAL_API_URL")?)?;
        let timeout_secs = match get_optional_env("PORTAL_API_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| {
                    ConfigError::InvalidEnvVar(
                        "PORTAL_API_TIMEOUT_SECS".to_string(),
                        format!("expected a positive number of seconds, got '{raw}'"),
                    )
                })?,
            None => Self::DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            base_url,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

impl ShellConfig {
    fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            brand_logo_url: get_optional_env("PORTAL_BRAND_LOGO_URL")
                .unwrap_or(defaults.brand_logo_url),
            footer_logo_url: get_optional_env("PORTAL_FOOTER_LOGO_URL")
                .unwrap_or(defaults.footer_logo_url),
            home_url: get_optional_env("PORTAL_HOME_URL").unwrap_or(defaults.home_url),
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable. Empty values count as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Parse the API base URL.
///
/// A trailing slash is ensured so that endpoint paths join under any path
/// prefix (`https://host/prod` + `login` = `https://host/prod/login`).
fn parse_api_url(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |msg: String| ConfigError::InvalidEnvVar("PORTAL_API_URL".to_string(), msg);

    let mut url = Url::parse(raw.trim()).map_err(|e| invalid(e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }

    if url.cannot_be_a_base() || url.host_str().is_none() {
        return Err(invalid("URL must have a host".to_string()));
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}

/// Parse a Sentry sample rate in `0.0..=1.0`.
fn parse_sample_rate(key: &str, default: f32) -> Result<f32, ConfigError> {
    let Some(raw) = get_optional_env(key) else {
        return Ok(default);
    };

    raw.parse::<f32>()
        .ok()
        .filter(|rate| (0.0..=1.0).contains(rate))
        .ok_or_else(|| {
            ConfigError::InvalidEnvVar(
                key.to_string(),
                format!("expected a number between 0.0 and 1.0, got '{raw}'"),
            )
        })
}

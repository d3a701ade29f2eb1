//! Configuration sections.

use serde::{Deserialize, Serialize};
use trellis_core::FailurePolicy;

/// Server section.
///
/// # Example
///
/// ```
/// use trellis_config::ServerConfig;
///
/// let config = ServerConfig {
///     port: 3000,
///     dev: true,
///     advertised_hosts: vec!["https://api.example.com".to_string()],
/// };
/// assert_eq!(config.port, 3000);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Port the service listens on; also used for the document's server URLs.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Development mode.
    #[serde(default)]
    pub dev: bool,

    /// Extra server URLs listed in the document, after the discovered ones.
    #[serde(default)]
    pub advertised_hosts: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            dev: false,
            advertised_hosts: Vec::new(),
        }
    }
}

fn default_port() -> u16 {
    8080
}

/// API document section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct DocumentSettings {
    /// Document title.
    #[serde(default = "default_title")]
    pub title: String,

    /// API version.
    #[serde(default = "default_version")]
    pub version: String,

    /// Free-form description.
    #[serde(default)]
    pub description: String,
}

impl Default for DocumentSettings {
    fn default() -> Self {
        Self {
            title: default_title(),
            version: default_version(),
            description: String::new(),
        }
    }
}

fn default_title() -> String {
    "API".to_string()
}

fn default_version() -> String {
    "0.1.0".to_string()
}

/// OAuth section.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct OAuthConfig {
    /// Authorization URL advertised by the bearer security scheme.
    ///
    /// Empty leaves the scheme without a usable URL.
    #[serde(default, alias = "issuerUrl")]
    pub issuer_url: String,
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON lines.
    #[default]
    Json,
    /// Human-readable output.
    Pretty,
}

/// Logging section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Emit logs at all.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Level or filter directive (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,

    /// ANSI colors.
    #[serde(default)]
    pub ansi: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: default_log_level(),
            format: LogFormat::default(),
            ansi: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

/// Route registration section.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RegistrationConfig {
    /// What a build does with a route that cannot be documented.
    #[serde(default)]
    pub failure_policy: FailurePolicy,
}

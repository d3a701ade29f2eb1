//! The root configuration type.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::{
    ConfigError, DocumentSettings, LogFormat, LoggingConfig, OAuthConfig, RegistrationConfig,
    ServerConfig,
};

/// Complete Trellis configuration.
///
/// Use [`ConfigLoader`](crate::ConfigLoader) to load it from files and the
/// environment.
///
/// # Example
///
/// ```
/// use trellis_config::TrellisConfig;
///
/// let config = TrellisConfig::default();
/// assert_eq!(config.server.port, 8080);
/// assert_eq!(config.document.title, "API");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct TrellisConfig {
    /// Service identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Server section.
    #[serde(default)]
    pub server: ServerConfig,

    /// API document section.
    #[serde(default)]
    pub document: DocumentSettings,

    /// OAuth section.
    #[serde(default)]
    pub oauth: OAuthConfig,

    /// Logging section.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Route registration section.
    #[serde(default)]
    pub registration: RegistrationConfig,
}

impl TrellisConfig {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if:
    /// - the port is zero
    /// - the document title or version is empty
    /// - the issuer URL is set but does not parse
    /// - an advertised host does not parse as a URL
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::invalid_value("server.port", "must be non-zero"));
        }

        if self.document.title.trim().is_empty() {
            return Err(ConfigError::invalid_value("document.title", "must not be empty"));
        }

        if self.document.version.trim().is_empty() {
            return Err(ConfigError::invalid_value("document.version", "must not be empty"));
        }

        if !self.oauth.issuer_url.is_empty() {
            Url::parse(&self.oauth.issuer_url).map_err(|e| {
                ConfigError::invalid_value(
                    "oauth.issuer_url",
                    format!("invalid URL '{}': {e}", self.oauth.issuer_url),
                )
            })?;
        }

        for host in &self.server.advertised_hosts {
            Url::parse(host).map_err(|e| {
                ConfigError::invalid_value(
                    "server.advertised_hosts",
                    format!("invalid URL '{host}': {e}"),
                )
            })?;
        }

        Ok(())
    }

    /// Local development preset: dev mode, debug level, pretty colored logs.
    ///
    /// ```
    /// use trellis_config::{LogFormat, TrellisConfig};
    ///
    /// let config = TrellisConfig::development();
    /// assert!(config.server.dev);
    /// assert_eq!(config.logging.format, LogFormat::Pretty);
    /// ```
    #[must_use]
    pub fn development() -> Self {
        let mut config = Self::default();
        config.server.dev = true;
        config.logging = LoggingConfig {
            level: "debug".to_string(),
            format: LogFormat::Pretty,
            ansi: true,
            ..LoggingConfig::default()
        };
        config
    }

    /// Production preset: info level JSON logs without colors.
    #[must_use]
    pub fn production() -> Self {
        let mut config = Self::default();
        config.server.dev = false;
        config.logging = LoggingConfig {
            level: "info".to_string(),
            format: LogFormat::Json,
            ansi: false,
            ..LoggingConfig::default()
        };
        config
    }
}

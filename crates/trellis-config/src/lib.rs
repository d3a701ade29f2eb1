//! Typed configuration for Trellis services.
//!
//! - TOML, JSON and YAML files
//! - `.env` files through `dotenvy`
//! - `TRELLIS__SECTION__KEY` environment overrides
//! - strict parsing (unknown fields are errors) and validation
//!
//! # Overview
//!
//! [`TrellisConfig`] holds every section:
//!
//! - [`ServerConfig`] - port, dev mode, extra advertised server URLs
//! - [`DocumentSettings`] - title, version and description of the API document
//! - [`OAuthConfig`] - issuer URL of the bearer security scheme
//! - [`LoggingConfig`] - level, format, colors
//! - [`RegistrationConfig`] - failure policy of router builds
//!
//! # Example
//!
//! ```no_run
//! use trellis_config::ConfigLoader;
//!
//! # fn main() -> Result<(), trellis_config::ConfigError> {
//! // .env, then $CONFIG_LOCATION/$CONFIG_NAME.yml, then TRELLIS__* overrides
//! let config = ConfigLoader::autoload()?;
//! println!("{} {}", config.document.title, config.document.version);
//! # Ok(())
//! # }
//! ```
//!
//! # File format
//!
//! ```yaml
//! id: shop
//! server:
//!   port: 8080
//!   dev: false
//!   advertised_hosts:
//!     - https://shop.example.com
//! document:
//!   title: Shop
//!   version: 1.4.0
//!   description: Orders and inventory
//! oauth:
//!   issuer_url: https://id.example.com/realms/shop/protocol/openid-connect/auth
//! logging:
//!   level: info
//!   format: json
//! registration:
//!   failure_policy: abort
//! ```
//!
//! # Environment overrides
//!
//! - `TRELLIS__SERVER__PORT=9000`
//! - `TRELLIS__DOCUMENT__TITLE=Shop`
//! - `TRELLIS__REGISTRATION__FAILURE_POLICY=degrade`

#![doc(html_root_url = "https://docs.rs/trellis-config/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod loader;
mod schema;

pub use config::TrellisConfig;
pub use error::ConfigError;
pub use loader::{ConfigLoader, FileFormat, CONFIG_LOCATION_VAR, CONFIG_NAME_VAR, ENV_PREFIX};
pub use schema::{
    DocumentSettings, LogFormat, LoggingConfig, OAuthConfig, RegistrationConfig, ServerConfig,
};

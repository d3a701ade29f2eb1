//! Layered configuration loading.
//!
//! Layers apply in order, later ones overriding earlier ones:
//! 1. defaults or a preset
//! 2. a configuration file (TOML, JSON or YAML)
//! 3. environment variables (`PREFIX__SECTION__KEY`)

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use trellis_core::FailurePolicy;

use crate::{ConfigError, LogFormat, TrellisConfig};

/// Prefix of the environment overrides read by [`ConfigLoader::autoload`].
pub const ENV_PREFIX: &str = "TRELLIS";

/// Directory holding the configuration file, for [`ConfigLoader::autoload`].
pub const CONFIG_LOCATION_VAR: &str = "CONFIG_LOCATION";

/// File name without extension, for [`ConfigLoader::autoload`].
pub const CONFIG_NAME_VAR: &str = "CONFIG_NAME";

/// Configuration file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// TOML.
    Toml,
    /// JSON.
    Json,
    /// YAML.
    Yaml,
}

impl FileFormat {
    /// Format for a file extension or format name, case-insensitive.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }

    fn parse(self, content: &str) -> Result<TrellisConfig, ConfigError> {
        Ok(match self {
            Self::Toml => toml::from_str(content)?,
            Self::Json => serde_json::from_str(content)?,
            Self::Yaml => serde_yaml::from_str(content)?,
        })
    }
}

/// Layered configuration loader.
///
/// # Example
///
/// ```no_run
/// use trellis_config::ConfigLoader;
///
/// # fn main() -> Result<(), trellis_config::ConfigError> {
/// let config = ConfigLoader::new()
///     .with_defaults()
///     .with_dotenv()?
///     .with_file("config/service.yml")?
///     .with_env_prefix("TRELLIS")
///     .load()?;
///
/// println!("documenting on port {}", config.server.port);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ConfigLoader {
    config: TrellisConfig,
    env_prefix: Option<String>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Creates a loader starting from defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: TrellisConfig::default(),
            env_prefix: None,
        }
    }

    /// Resets to default values.
    #[must_use]
    pub fn with_defaults(mut self) -> Self {
        self.config = TrellisConfig::default();
        self
    }

    /// Starts from the development preset.
    ///
    /// ```
    /// use trellis_config::ConfigLoader;
    ///
    /// let config = ConfigLoader::new().with_development().load().unwrap();
    /// assert_eq!(config.logging.level, "debug");
    /// ```
    #[must_use]
    pub fn with_development(mut self) -> Self {
        self.config = TrellisConfig::development();
        self
    }

    /// Starts from the production preset.
    #[must_use]
    pub fn with_production(mut self) -> Self {
        self.config = TrellisConfig::production();
        self
    }

    /// Loads a file, picking the format from its extension.
    ///
    /// The file replaces the whole configuration; fields it leaves out take
    /// their defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file is missing, unreadable, has an
    /// unknown extension, or does not parse (unknown fields included).
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::file_not_found(path));
        }

        let format = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(FileFormat::from_name)
            .ok_or_else(|| ConfigError::UnsupportedFormat(path.display().to_string()))?;

        let content = fs::read_to_string(path).map_err(|e| ConfigError::read_error(path, e))?;
        self.config = format.parse(&content)?;
        Ok(self)
    }

    /// Loads a file if it exists.
    ///
    /// # Errors
    ///
    /// Same as [`ConfigLoader::with_file`] when the file exists.
    pub fn with_optional_file<P: AsRef<Path>>(self, path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            self.with_file(path)
        } else {
            Ok(self)
        }
    }

    /// Loads configuration from a string.
    ///
    /// `format` is `toml`, `json`, `yaml` or `yml`.
    ///
    /// ```
    /// use trellis_config::ConfigLoader;
    ///
    /// let yaml = "
    /// server:
    ///   port: 3000
    /// document:
    ///   title: Shop
    /// ";
    ///
    /// let config = ConfigLoader::new()
    ///     .with_string(yaml, "yaml")
    ///     .unwrap()
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(config.server.port, 3000);
    /// assert_eq!(config.document.title, "Shop");
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` on an unknown format or a parse failure.
    pub fn with_string(mut self, content: &str, format: &str) -> Result<Self, ConfigError> {
        let format = FileFormat::from_name(format)
            .ok_or_else(|| ConfigError::UnsupportedFormat(format.to_string()))?;
        self.config = format.parse(content)?;
        Ok(self)
    }

    /// Loads `.env` from the working directory into the process environment.
    ///
    /// A missing `.env` is not an error.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Dotenv` if the file exists but cannot be read
    /// or parsed.
    pub fn with_dotenv(self) -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(_) => Ok(self),
            Err(e) if e.not_found() => Ok(self),
            Err(e) => Err(e.into()),
        }
    }

    /// Loads `<location>/<name>.yml`, both read through `lookup`.
    ///
    /// `lookup` resolves [`CONFIG_LOCATION_VAR`] and [`CONFIG_NAME_VAR`];
    /// [`ConfigLoader::autoload`] passes the process environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnv` if either variable is unset or
    /// empty, otherwise the errors of [`ConfigLoader::with_file`].
    pub fn with_located_file(
        self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let required = |var: &str| {
            lookup(var)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| ConfigError::missing_env(var))
        };
        let location = required(CONFIG_LOCATION_VAR)?;
        let name = required(CONFIG_NAME_VAR)?;
        self.with_file(located_path(&location, &name))
    }

    /// Sets the prefix of environment overrides.
    ///
    /// With prefix `TRELLIS`, `TRELLIS__SERVER__PORT=9000` sets
    /// `server.port`.
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_uppercase());
        self
    }

    /// Applies environment overrides and validates.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if an override does not parse or validation
    /// fails.
    pub fn load(mut self) -> Result<TrellisConfig, ConfigError> {
        if let Some(prefix) = self.env_prefix.take() {
            self.apply_env_overrides(&prefix)?;
        }

        self.config.validate()?;
        Ok(self.config)
    }

    /// Returns the configuration without overrides or validation.
    #[must_use]
    pub fn load_unvalidated(self) -> TrellisConfig {
        self.config
    }

    /// The bootstrap sequence: `.env`, then the file named by
    /// `CONFIG_LOCATION` and `CONFIG_NAME`, then `TRELLIS__*` overrides.
    ///
    /// # Errors
    ///
    /// Any error from the individual layers.
    pub fn autoload() -> Result<TrellisConfig, ConfigError> {
        Self::new()
            .with_dotenv()?
            .with_located_file(|var| env::var(var).ok())?
            .with_env_prefix(ENV_PREFIX)
            .load()
    }

    fn apply_env_overrides(&mut self, prefix: &str) -> Result<(), ConfigError> {
        let marker = format!("{prefix}__");
        let mut vars: Vec<(String, String)> =
            env::vars().filter(|(k, _)| k.starts_with(&marker)).collect();
        vars.sort();

        for (key, value) in vars {
            self.apply_env_var(&key, &value, prefix)?;
        }
        Ok(())
    }

    fn apply_env_var(&mut self, key: &str, value: &str, prefix: &str) -> Result<(), ConfigError> {
        let path = key
            .strip_prefix(prefix)
            .and_then(|k| k.strip_prefix("__"))
            .ok_or_else(|| ConfigError::env_parse_error(key, "invalid key format"))?;

        let parts: Vec<&str> = path.split("__").collect();
        let config = &mut self.config;

        match parts.as_slice() {
            ["ID"] => {
                config.id = (!value.is_empty()).then(|| value.to_string());
            }

            ["SERVER", "PORT"] => {
                config.server.port = value
                    .parse()
                    .map_err(|_| ConfigError::env_parse_error(key, "expected port number"))?;
            }
            ["SERVER", "DEV"] => {
                config.server.dev = parse_bool(value)
                    .ok_or_else(|| ConfigError::env_parse_error(key, "expected boolean"))?;
            }
            ["SERVER", "ADVERTISED_HOSTS"] => {
                config.server.advertised_hosts = value
                    .split(',')
                    .map(str::trim)
                    .filter(|h| !h.is_empty())
                    .map(String::from)
                    .collect();
            }

            ["DOCUMENT", "TITLE"] => config.document.title = value.to_string(),
            ["DOCUMENT", "VERSION"] => config.document.version = value.to_string(),
            ["DOCUMENT", "DESCRIPTION"] => config.document.description = value.to_string(),

            ["OAUTH", "ISSUER_URL"] => config.oauth.issuer_url = value.to_string(),

            ["LOGGING", "ENABLED"] => {
                config.logging.enabled = parse_bool(value)
                    .ok_or_else(|| ConfigError::env_parse_error(key, "expected boolean"))?;
            }
            ["LOGGING", "LEVEL"] => config.logging.level = value.to_string(),
            ["LOGGING", "FORMAT"] => {
                config.logging.format = match value.to_lowercase().as_str() {
                    "json" => LogFormat::Json,
                    "pretty" => LogFormat::Pretty,
                    _ => {
                        return Err(ConfigError::env_parse_error(
                            key,
                            "expected 'json' or 'pretty'",
                        ))
                    }
                };
            }
            ["LOGGING", "ANSI"] => {
                config.logging.ansi = parse_bool(value)
                    .ok_or_else(|| ConfigError::env_parse_error(key, "expected boolean"))?;
            }

            ["REGISTRATION", "FAILURE_POLICY"] => {
                config.registration.failure_policy = value
                    .parse::<FailurePolicy>()
                    .map_err(|reason| ConfigError::env_parse_error(key, reason))?;
            }

            // unknown keys are ignored
            _ => {}
        }

        Ok(())
    }
}

fn located_path(location: &str, name: &str) -> PathBuf {
    Path::new(location).join(format!("{name}.yml"))
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_loader_new() {
        let config = ConfigLoader::new().load().unwrap();
        assert_eq!(config, TrellisConfig::default());
    }

    #[test]
    fn test_loader_with_production() {
        let config = ConfigLoader::new().with_production().load().unwrap();
        assert_eq!(config.logging.format, LogFormat::Json);
        assert!(!config.server.dev);
    }

    #[test]
    fn test_file_format_from_name() {
        assert_eq!(FileFormat::from_name("TOML"), Some(FileFormat::Toml));
        assert_eq!(FileFormat::from_name("yml"), Some(FileFormat::Yaml));
        assert_eq!(FileFormat::from_name("ini"), None);
    }

    #[test]
    fn test_with_string_toml() {
        let toml = r#"
            id = "shop"

            [server]
            port = 3000

            [registration]
            failure_policy = "degrade"
        "#;

        let config = ConfigLoader::new()
            .with_string(toml, "toml")
            .unwrap()
            .load()
            .unwrap();

        assert_eq!(config.id.as_deref(), Some("shop"));
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.registration.failure_policy, FailurePolicy::Degrade);
        assert_eq!(config.document.title, "API");
    }

    #[test]
    fn test_with_string_json() {
        let json = r#"{"document": {"title": "Shop", "version": "2.0.0"}}"#;
        let config = ConfigLoader::new()
            .with_string(json, "json")
            .unwrap()
            .load()
            .unwrap();
        assert_eq!(config.document.version, "2.0.0");
    }

    #[test]
    fn test_with_string_unsupported_format() {
        let err = ConfigLoader::new().with_string("", "ini").unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_with_string_unknown_field() {
        let err = ConfigLoader::new()
            .with_string("server:\n  tls: true\n", "yaml")
            .unwrap_err();
        assert!(matches!(err, ConfigError::YamlError(_)));
    }

    #[test]
    fn test_with_file_by_extension() {
        let dir = TempDir::new().unwrap();
        let toml = write(&dir, "service.toml", "[server]\nport = 7000\n");
        let yaml = write(&dir, "service.yaml", "server:\n  port: 7001\n");
        let json = write(&dir, "service.json", r#"{"server": {"port": 7002}}"#);

        for (path, port) in [(toml, 7000), (yaml, 7001), (json, 7002)] {
            let config = ConfigLoader::new().with_file(&path).unwrap().load().unwrap();
            assert_eq!(config.server.port, port);
        }
    }

    #[test]
    fn test_with_file_not_found() {
        let err = ConfigLoader::new()
            .with_file("/nonexistent/config.toml")
            .unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound { .. }));
    }

    #[test]
    fn test_with_file_unknown_extension() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "service.ini", "port=1");
        let err = ConfigLoader::new().with_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_with_optional_file_missing() {
        let config = ConfigLoader::new()
            .with_development()
            .with_optional_file("/nonexistent/config.toml")
            .unwrap()
            .load()
            .unwrap();
        assert!(config.server.dev);
    }

    #[test]
    fn test_load_validates() {
        let err = ConfigLoader::new()
            .with_string("server:\n  port: 0\n", "yaml")
            .unwrap()
            .load()
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_load_unvalidated() {
        let config = ConfigLoader::new()
            .with_string("server:\n  port: 0\n", "yaml")
            .unwrap()
            .load_unvalidated();
        assert_eq!(config.server.port, 0);
    }

    #[test]
    fn test_with_located_file() {
        let dir = TempDir::new().unwrap();
        write(&dir, "shop.yml", "document:\n  title: Shop\n  description: Orders\n");

        let vars: HashMap<&str, String> = [
            (CONFIG_LOCATION_VAR, dir.path().display().to_string()),
            (CONFIG_NAME_VAR, "shop".to_string()),
        ]
        .into_iter()
        .collect();

        let config = ConfigLoader::new()
            .with_located_file(|var| vars.get(var).cloned())
            .unwrap()
            .load()
            .unwrap();
        assert_eq!(config.document.title, "Shop");
        assert_eq!(config.document.description, "Orders");
    }

    #[test]
    fn test_with_located_file_requires_both_vars() {
        let err = ConfigLoader::new()
            .with_located_file(|var| (var == CONFIG_LOCATION_VAR).then(|| "/etc".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnv { var } if var == CONFIG_NAME_VAR));

        let err = ConfigLoader::new()
            .with_located_file(|_| Some(String::new()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnv { var } if var == CONFIG_LOCATION_VAR));
    }

    #[test]
    fn test_located_path() {
        assert_eq!(
            located_path("/etc/shop", "service"),
            PathBuf::from("/etc/shop/service.yml")
        );
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool("on"), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
        assert_eq!(parse_bool(""), None);
    }

    #[test]
    fn test_apply_env_var_server() {
        let mut loader = ConfigLoader::new();
        loader.apply_env_var("TEST__SERVER__PORT", "9000", "TEST").unwrap();
        loader.apply_env_var("TEST__SERVER__DEV", "yes", "TEST").unwrap();
        loader
            .apply_env_var(
                "TEST__SERVER__ADVERTISED_HOSTS",
                "https://a.example.com, ,https://b.example.com",
                "TEST",
            )
            .unwrap();
        assert_eq!(loader.config.server.port, 9000);
        assert!(loader.config.server.dev);
        assert_eq!(
            loader.config.server.advertised_hosts,
            vec!["https://a.example.com", "https://b.example.com"]
        );
    }

    #[test]
    fn test_apply_env_var_document_and_oauth() {
        let mut loader = ConfigLoader::new();
        loader.apply_env_var("TEST__DOCUMENT__TITLE", "Shop", "TEST").unwrap();
        loader.apply_env_var("TEST__DOCUMENT__VERSION", "3.1.0", "TEST").unwrap();
        loader
            .apply_env_var("TEST__OAUTH__ISSUER_URL", "https://id.example.com", "TEST")
            .unwrap();
        loader.apply_env_var("TEST__ID", "shop", "TEST").unwrap();
        assert_eq!(loader.config.document.title, "Shop");
        assert_eq!(loader.config.document.version, "3.1.0");
        assert_eq!(loader.config.oauth.issuer_url, "https://id.example.com");
        assert_eq!(loader.config.id.as_deref(), Some("shop"));
    }

    #[test]
    fn test_apply_env_var_logging() {
        let mut loader = ConfigLoader::new();
        loader.apply_env_var("TEST__LOGGING__FORMAT", "pretty", "TEST").unwrap();
        loader.apply_env_var("TEST__LOGGING__LEVEL", "trellis=trace", "TEST").unwrap();
        assert_eq!(loader.config.logging.format, LogFormat::Pretty);
        assert_eq!(loader.config.logging.level, "trellis=trace");

        assert!(loader.apply_env_var("TEST__LOGGING__FORMAT", "xml", "TEST").is_err());
    }

    #[test]
    fn test_apply_env_var_failure_policy() {
        let mut loader = ConfigLoader::new();
        loader
            .apply_env_var("TEST__REGISTRATION__FAILURE_POLICY", "degrade", "TEST")
            .unwrap();
        assert_eq!(loader.config.registration.failure_policy, FailurePolicy::Degrade);

        let err = loader
            .apply_env_var("TEST__REGISTRATION__FAILURE_POLICY", "ignore", "TEST")
            .unwrap_err();
        assert!(matches!(err, ConfigError::EnvParseError { .. }));
    }

    #[test]
    fn test_apply_env_var_invalid_port() {
        let mut loader = ConfigLoader::new();
        assert!(loader.apply_env_var("TEST__SERVER__PORT", "70000", "TEST").is_err());
    }

    #[test]
    fn test_apply_env_var_unknown_key_ignored() {
        let mut loader = ConfigLoader::new();
        loader.apply_env_var("TEST__DATABASE__URL", "mongodb://db", "TEST").unwrap();
        assert_eq!(loader.config, TrellisConfig::default());
    }

    #[test]
    fn test_apply_env_var_bad_key() {
        let mut loader = ConfigLoader::new();
        assert!(loader.apply_env_var("OTHER_KEY", "1", "TEST").is_err());
    }
}

//! Loading complete configuration files from disk.

use std::fs;

use tempfile::TempDir;
use trellis_config::{ConfigError, ConfigLoader, LogFormat, CONFIG_LOCATION_VAR, CONFIG_NAME_VAR};
use trellis_core::FailurePolicy;

const SERVICE_YML: &str = "
id: shop
server:
  port: 9090
  advertised_hosts:
    - https://shop.example.com
document:
  title: Shop
  version: 1.4.0
  description: Orders and inventory
oauth:
  issuerUrl: https://id.example.com/realms/shop/protocol/openid-connect/auth
logging:
  level: debug
  format: pretty
registration:
  failure_policy: degrade
";

#[test]
fn complete_yaml_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("service.yml");
    fs::write(&path, SERVICE_YML).unwrap();

    let config = ConfigLoader::new().with_file(&path).unwrap().load().unwrap();

    assert_eq!(config.id.as_deref(), Some("shop"));
    assert_eq!(config.server.port, 9090);
    assert_eq!(config.server.advertised_hosts, vec!["https://shop.example.com"]);
    assert_eq!(config.document.title, "Shop");
    assert_eq!(config.document.version, "1.4.0");
    assert!(config.oauth.issuer_url.starts_with("https://id.example.com/"));
    assert_eq!(config.logging.format, LogFormat::Pretty);
    assert_eq!(config.registration.failure_policy, FailurePolicy::Degrade);
}

#[test]
fn located_file_matches_direct_load() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("service.yml"), SERVICE_YML).unwrap();
    let location = dir.path().display().to_string();

    let located = ConfigLoader::new()
        .with_located_file(|var| match var {
            CONFIG_LOCATION_VAR => Some(location.clone()),
            CONFIG_NAME_VAR => Some("service".to_string()),
            _ => None,
        })
        .unwrap()
        .load()
        .unwrap();
    let direct = ConfigLoader::new()
        .with_file(dir.path().join("service.yml"))
        .unwrap()
        .load()
        .unwrap();

    assert_eq!(located, direct);
}

#[test]
fn invalid_issuer_fails_validation() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.toml");
    fs::write(&path, "[oauth]\nissuer_url = \"::nope\"\n").unwrap();

    let err = ConfigLoader::new().with_file(&path).unwrap().load().unwrap_err();
    assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "oauth.issuer_url"));
}

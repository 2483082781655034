//! Configuration resolution tests
//!
//! Note: Uses serial_test crate to prevent ENV variable race conditions.
//! Tests that manipulate the API key variables are marked with #[serial].

use flora_common::config::{load_toml_config, TomlConfig};
use flora_common::Error;
use flora_id::config::{
    build_services, resolve_gemini_api_key, resolve_plant_id_api_key, GEMINI_API_KEY_ENV,
    PLANT_ID_API_KEY_ENV,
};
use serial_test::serial;
use std::io::Write;

fn config_with_keys(gemini: Option<&str>, plant_id: Option<&str>) -> TomlConfig {
    let mut config = TomlConfig::default();
    config.gemini.api_key = gemini.map(str::to_string);
    config.plant_id.api_key = plant_id.map(str::to_string);
    config
}

fn clear_env() {
    std::env::remove_var(GEMINI_API_KEY_ENV);
    std::env::remove_var(PLANT_ID_API_KEY_ENV);
}

#[test]
#[serial]
fn test_env_overrides_toml() {
    clear_env();
    std::env::set_var(GEMINI_API_KEY_ENV, "env-key");

    let key = resolve_gemini_api_key(&config_with_keys(Some("toml-key"), None)).unwrap();
    assert_eq!(key, "env-key");

    clear_env();
}

#[test]
#[serial]
fn test_toml_fallback_when_env_missing() {
    clear_env();

    let key = resolve_plant_id_api_key(&config_with_keys(None, Some("toml-key"))).unwrap();
    assert_eq!(key, "toml-key");
}

#[test]
#[serial]
fn test_whitespace_env_key_ignored() {
    clear_env();
    std::env::set_var(GEMINI_API_KEY_ENV, "   ");

    let key = resolve_gemini_api_key(&config_with_keys(Some("toml-key"), None)).unwrap();
    assert_eq!(key, "toml-key");

    clear_env();
}

#[test]
#[serial]
fn test_missing_key_is_config_error() {
    clear_env();

    let err = resolve_gemini_api_key(&TomlConfig::default()).unwrap_err();
    match err {
        Error::Config(msg) => {
            assert!(msg.contains(GEMINI_API_KEY_ENV));
            assert!(msg.contains("[gemini] api_key"));
        }
        other => panic!("expected Config error, got {:?}", other),
    }
}

#[test]
#[serial]
fn test_build_services_requires_both_keys() {
    clear_env();

    assert!(build_services(&config_with_keys(Some("g"), None)).is_err());
    assert!(build_services(&config_with_keys(None, Some("p"))).is_err());
    assert!(build_services(&config_with_keys(Some("g"), Some("p"))).is_ok());
}

#[test]
#[serial]
fn test_keys_from_toml_file() {
    clear_env();

    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
port = 8080

[gemini]
api_key = "file-gemini"
model = "gemini-1.5-flash"

[plant_id]
api_key = "file-plant-id"

[retry]
max_attempts = 3
backoff_ms = 250
"#
    )
    .unwrap();

    let config = load_toml_config(file.path()).unwrap();

    assert_eq!(config.port, 8080);
    assert_eq!(config.gemini.model, "gemini-1.5-flash");
    assert_eq!(resolve_gemini_api_key(&config).unwrap(), "file-gemini");
    assert_eq!(resolve_plant_id_api_key(&config).unwrap(), "file-plant-id");
    assert_eq!(config.retry.max_attempts, 3);
    assert!(build_services(&config).is_ok());
}

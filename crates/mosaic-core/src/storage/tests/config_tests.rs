use std::path::Path;

use tempfile::tempdir;

use crate::kernel::constants;
use crate::kernel::error::{Error, Result};
use crate::storage::error::StorageSystemError;
use crate::storage::{AppConfig, ConfigFormat};

#[test]
fn test_format_from_path() {
    assert_eq!(ConfigFormat::from_path(Path::new("app.json")), Some(ConfigFormat::Json));
    #[cfg(feature = "toml-config")]
    assert_eq!(ConfigFormat::from_path(Path::new("app.TOML")), Some(ConfigFormat::Toml));
    #[cfg(feature = "yaml-config")]
    assert_eq!(ConfigFormat::from_path(Path::new("app.yml")), Some(ConfigFormat::Yaml));
    assert_eq!(ConfigFormat::from_path(Path::new("app.ini")), None);
    assert_eq!(ConfigFormat::from_path(Path::new("app")), None);
}

#[test]
fn test_missing_fields_use_defaults() -> Result<()> {
    let config = AppConfig::parse(r#"{ "required_services": ["posts"] }"#, ConfigFormat::Json)?;

    assert_eq!(config.required_services, vec!["posts".to_string()]);
    assert!(config.ui_services.is_empty());
    assert_eq!(config.loading_element, constants::DEFAULT_LOADING_ELEMENT);
    assert_eq!(config.fallback_message, constants::DEFAULT_FALLBACK_MESSAGE);
    Ok(())
}

#[cfg(feature = "toml-config")]
#[test]
fn test_load_toml_file() -> Result<()> {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let path = temp_dir.path().join("mosaic.toml");
    std::fs::write(
        &path,
        "required_services = [\"theme\", \"posts\"]\nloading_element = \"spinner\"\n",
    )
    .expect("Failed to write config");

    let config = AppConfig::load(&path)?;
    assert_eq!(config.required_services, vec!["theme".to_string(), "posts".to_string()]);
    assert_eq!(config.loading_element, "spinner");
    assert_eq!(config.theme_toggle_element, constants::DEFAULT_THEME_TOGGLE_ELEMENT);
    Ok(())
}

#[cfg(feature = "yaml-config")]
#[test]
fn test_yaml_serialize_then_parse_keeps_values() -> Result<()> {
    let mut config = AppConfig::default();
    config.required_services = vec!["cases".to_string()];
    config.log_level = "debug".to_string();

    let text = config.serialize(ConfigFormat::Yaml)?;
    assert_eq!(AppConfig::parse(&text, ConfigFormat::Yaml)?, config);
    Ok(())
}

#[test]
fn test_unsupported_extension_is_rejected() {
    let result = AppConfig::load(Path::new("mosaic.ini"));
    assert!(matches!(
        result,
        Err(Error::StorageSystem(StorageSystemError::UnsupportedConfigFormat(_)))
    ));
}

#[test]
fn test_missing_file_is_reported() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let result = AppConfig::load(&temp_dir.path().join("absent.json"));
    assert!(matches!(result, Err(Error::StorageSystem(StorageSystemError::FileNotFound(_)))));
}

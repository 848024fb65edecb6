use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::kernel::constants;
use crate::kernel::error::Result;
use crate::storage::error::StorageSystemError;

/// Supported configuration file formats
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigFormat {
    /// JSON format (.json)
    Json,
    /// YAML format (.yaml, .yml) - requires "yaml-config" feature
    #[cfg(feature = "yaml-config")]
    Yaml,
    /// TOML format (.toml) - requires "toml-config" feature
    #[cfg(feature = "toml-config")]
    Toml,
}

impl ConfigFormat {
    /// Get the file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            ConfigFormat::Json => "json",
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => "yaml",
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => "toml",
        }
    }

    /// Determine format from file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| match ext.to_lowercase().as_str() {
                "json" => Some(ConfigFormat::Json),
                #[cfg(feature = "yaml-config")]
                "yaml" | "yml" => Some(ConfigFormat::Yaml),
                #[cfg(feature = "toml-config")]
                "toml" => Some(ConfigFormat::Toml),
                _ => None,
            })
    }
}

/// Startup configuration consumed by the bootstrap pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Service names that must resolve after service initialization
    pub required_services: Vec<String>,
    /// Services placed in the components' dependency bundle.
    /// Empty means every registered service.
    pub ui_services: Vec<String>,
    /// Element hidden once bootstrap completes
    pub loading_element: String,
    /// Element wired to the theme service, if present on the surface
    pub theme_toggle_element: String,
    /// Text shown in place of the loading indicator after a fatal failure
    pub fallback_message: String,
    /// Log level used when no override is given
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            required_services: Vec::new(),
            ui_services: Vec::new(),
            loading_element: constants::DEFAULT_LOADING_ELEMENT.to_string(),
            theme_toggle_element: constants::DEFAULT_THEME_TOGGLE_ELEMENT.to_string(),
            fallback_message: constants::DEFAULT_FALLBACK_MESSAGE.to_string(),
            log_level: constants::DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl AppConfig {
    /// Load a configuration file, picking the format from its extension.
    pub fn load(path: &Path) -> Result<Self> {
        let format = ConfigFormat::from_path(path)
            .ok_or_else(|| StorageSystemError::UnsupportedConfigFormat(path.display().to_string()))?;
        if !path.exists() {
            return Err(StorageSystemError::FileNotFound(path.to_path_buf()).into());
        }
        let raw = fs::read_to_string(path)
            .map_err(|e| StorageSystemError::io(e, "read_config", path.to_path_buf()))?;
        let config = Self::parse(&raw, format)?;
        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parse configuration text in the given format
    pub fn parse(data: &str, format: ConfigFormat) -> Result<Self> {
        let deserialize_error = |source: Box<dyn std::error::Error + Send + Sync>| {
            StorageSystemError::DeserializationError {
                format: format.extension().to_string(),
                key: "config".to_string(),
                source,
            }
        };
        let config = match format {
            ConfigFormat::Json => {
                serde_json::from_str(data).map_err(|e| deserialize_error(Box::new(e)))?
            }
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => {
                serde_yaml::from_str(data).map_err(|e| deserialize_error(Box::new(e)))?
            }
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => {
                toml::from_str(data).map_err(|e| deserialize_error(Box::new(e)))?
            }
        };
        Ok(config)
    }

    /// Serialize to string based on format
    pub fn serialize(&self, format: ConfigFormat) -> Result<String> {
        let serialize_error = |source: Box<dyn std::error::Error + Send + Sync>| {
            StorageSystemError::SerializationError {
                format: format.extension().to_string(),
                key: "config".to_string(),
                source,
            }
        };
        let text = match format {
            ConfigFormat::Json => {
                serde_json::to_string_pretty(self).map_err(|e| serialize_error(Box::new(e)))?
            }
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => serde_yaml::to_string(self).map_err(|e| serialize_error(Box::new(e)))?,
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => {
                toml::to_string_pretty(self).map_err(|e| serialize_error(Box::new(e)))?
            }
        };
        Ok(text)
    }
}

//! Weft Configuration

use serde::Deserialize;
use weft_control::ControlOptions;
use weft_css::StyleOptions;

/// Toolkit configuration options
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Prefix of the element tag and of each descriptor class
    pub class_prefix: String,

    /// Prefix of the per-instance scoping class
    pub style_class_prefix: String,

    /// Run every compiled rule through the CSS parser before inserting it
    pub validate_css: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            class_prefix: "weft-".to_string(),
            style_class_prefix: "style-".to_string(),
            validate_css: true,
        }
    }
}

impl Config {
    /// Load a configuration from JSON. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).inspect_err(|e| {
            tracing::warn!("Rejected configuration: {}", e);
        })?;
        tracing::debug!(
            "Loaded configuration (prefix {}, style prefix {}, validate {})",
            config.class_prefix,
            config.style_class_prefix,
            config.validate_css
        );
        Ok(config)
    }

    /// Options handed to every control built with this configuration
    pub fn control_options(&self) -> ControlOptions {
        ControlOptions {
            class_prefix: self.class_prefix.clone(),
            style: StyleOptions {
                class_prefix: self.style_class_prefix.clone(),
                validate: self.validate_css,
            },
        }
    }
}

impl From<&Config> for ControlOptions {
    fn from(config: &Config) -> Self {
        config.control_options()
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        let options = config.control_options();
        assert_eq!(options.class_prefix, "weft-");
        assert_eq!(options.style.class_prefix, "style-");
        assert!(options.style.validate);
    }

    #[test]
    fn test_partial_json() {
        let config = Config::from_json(r#"{ "class_prefix": "ui-", "validate_css": false }"#).unwrap();
        assert_eq!(config.class_prefix, "ui-");
        assert_eq!(config.style_class_prefix, "style-");
        assert!(!config.validate_css);
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(Config::from_json("[1, 2"), Err(ConfigError::Json(_))));
    }
}

//! Application configuration.
//!
//! Controls help triggers, suggestion sensitivity and help output. Every
//! field has a default, so a configuration file only needs the keys it
//! changes.
//!
//! # Example YAML
//!
//! ```yaml
//! help_triggers:
//!   - --help
//!   - -h
//! suggestion_threshold: 3
//! help_format: json
//! program_name: cicd
//! ```

use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::help::HelpFormat;

/// Errors raised while loading or saving an [`AppConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

/// Settings of an [`Application`](crate::Application).
///
/// # Examples
///
/// ```
/// use cmdplan_dispatch::{AppConfig, HelpFormat};
///
/// let config = AppConfig::from_yaml("help_format: yaml").unwrap();
/// assert_eq!(config.help_format, HelpFormat::Yaml);
/// assert_eq!(config.help_triggers, ["--help", "-h", "help"]);
/// assert_eq!(config.suggestion_threshold, 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Tokens that request help instead of running the plan.
    pub help_triggers: Vec<String>,
    /// Maximum edit distance for flags listed as alternatives.
    pub suggestion_threshold: usize,
    /// How help is rendered.
    pub help_format: HelpFormat,
    /// Root name shown in help, instead of the root command's name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub program_name: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            help_triggers: vec!["--help".into(), "-h".into(), "help".into()],
            suggestion_threshold: cmdplan_core::DEFAULT_SUGGESTION_THRESHOLD,
            help_format: HelpFormat::default(),
            program_name: None,
        }
    }
}

impl AppConfig {
    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::IoError`] if the file cannot be read, or
    /// [`ConfigError::YamlError`] if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config = serde_yaml::from_reader(reader)?;
        Ok(config)
    }

    /// Saves the configuration as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::IoError`] if the file cannot be written, or
    /// [`ConfigError::YamlError`] if serialization fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Returns `true` if `token` requests help.
    pub fn is_help_trigger(&self, token: &str) -> bool {
        self.help_triggers.iter().any(|trigger| trigger == token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert!(config.is_help_trigger("-h"));
        assert!(config.is_help_trigger("help"));
        assert!(!config.is_help_trigger("--verbose"));
        assert_eq!(config.help_format, HelpFormat::Table);
        assert_eq!(config.program_name, None);
    }

    #[test]
    fn test_from_yaml_overrides_some_fields() {
        let config = AppConfig::from_yaml(
            r#"
help_triggers: ["--usage"]
suggestion_threshold: 4
program_name: cicd
"#,
        )
        .unwrap();
        assert_eq!(config.help_triggers, ["--usage"]);
        assert_eq!(config.suggestion_threshold, 4);
        assert_eq!(config.help_format, HelpFormat::Table);
        assert_eq!(config.program_name.as_deref(), Some("cicd"));
    }

    #[test]
    fn test_from_yaml_rejects_unknown_format() {
        assert!(matches!(
            AppConfig::from_yaml("help_format: markdown"),
            Err(ConfigError::YamlError(_))
        ));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cicd.yml");
        let config = AppConfig {
            help_format: HelpFormat::Json,
            suggestion_threshold: 1,
            ..Default::default()
        };
        config.save(&path).unwrap();
        assert_eq!(AppConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            AppConfig::load(dir.path().join("missing.yml")),
            Err(ConfigError::IoError(_))
        ));
    }
}

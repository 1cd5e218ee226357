//! Error types for plan construction and execution.
//!
//! Schema, resolution, flag and value errors are all raised while a plan is
//! built, before any handler runs. Handler errors are passed through as-is.

use cmdplan_core::{SchemaError, ValueError};
use thiserror::Error;

use crate::config::ConfigError;

/// Error returned by command handlers; any error type converts into it.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// Result of a command handler.
pub type HandlerResult = std::result::Result<(), HandlerError>;

/// Errors that can occur while building or running a plan.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed option or command declaration.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// No subcommand has the requested name.
    #[error("command {name} not found{}", did_you_mean(.suggestion))]
    Resolution {
        /// The name as typed.
        name: String,
        /// Closest full command path from the root, space separated.
        suggestion: Option<String>,
    },

    /// A flag-shaped token was not consumed by any step.
    #[error("unknown flag {flag}{}", flag_hint(.nearest, .alternatives))]
    Flag {
        /// The token as typed.
        flag: String,
        /// The single closest known alias.
        nearest: Option<String>,
        /// Known aliases within the suggestion threshold.
        alternatives: Vec<String>,
    },

    /// A flag or environment value could not be bound.
    #[error(transparent)]
    Value(#[from] ValueError),

    /// A handler or teardown handler failed.
    #[error(transparent)]
    Handler(HandlerError),

    /// Application configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// JSON help rendering failure.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML help rendering failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

/// Convenience alias for results with [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

fn did_you_mean(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(path) => format!(", did you mean {path}?"),
        None => String::new(),
    }
}

fn flag_hint(nearest: &Option<String>, alternatives: &[String]) -> String {
    match (nearest, alternatives) {
        (Some(alias), _) => format!(", did you mean {alias}?"),
        (None, []) => String::new(),
        (None, alternatives) => format!(", did you mean one of {}?", alternatives.join(", ")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_message_includes_path() {
        let err = Error::Resolution {
            name: "buidl".into(),
            suggestion: Some("app build".into()),
        };
        assert_eq!(err.to_string(), "command buidl not found, did you mean app build?");
    }

    #[test]
    fn test_flag_message_variants() {
        let nearest = Error::Flag {
            flag: "--relase".into(),
            nearest: Some("--release".into()),
            alternatives: vec!["--release".into(), "--replace".into()],
        };
        assert_eq!(nearest.to_string(), "unknown flag --relase, did you mean --release?");

        let tied = Error::Flag {
            flag: "--ab".into(),
            nearest: None,
            alternatives: vec!["--ax".into(), "--ay".into()],
        };
        assert_eq!(tied.to_string(), "unknown flag --ab, did you mean one of --ax, --ay?");

        let bare = Error::Flag {
            flag: "--x".into(),
            nearest: None,
            alternatives: Vec::new(),
        };
        assert_eq!(bare.to_string(), "unknown flag --x");
    }

    #[test]
    fn test_handler_error_passes_through() {
        let err = Error::Handler("disk full".into());
        assert_eq!(err.to_string(), "disk full");
    }
}

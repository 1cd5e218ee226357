//! Value coercion for option kinds.
//!
//! One coercion function per value-taking [`ValueKind`](crate::ValueKind);
//! the binding layer picks the right one with a `match`. Booleans never
//! take a value, so they have none.

use thiserror::Error;

use crate::ValueKind;

/// A value could not be bound to an option.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    /// The raw text does not parse as the option's kind.
    #[error("invalid {kind} value for {option}: {value:?}")]
    Invalid {
        /// Option (canonical alias) being bound.
        option: String,
        /// Kind the value had to coerce to.
        kind: ValueKind,
        /// The offending text.
        value: String,
    },
    /// A value-taking flag was the last token, or was followed by `--`.
    #[error("missing value for argument {0}")]
    Missing(String),
}

/// Parses a base-10 signed integer.
pub fn parse_integer(raw: &str) -> Option<i64> {
    raw.parse().ok()
}

/// Parses a float.
pub fn parse_float(raw: &str) -> Option<f64> {
    raw.parse().ok()
}

pub(crate) fn invalid(option: &str, kind: ValueKind, value: &str) -> ValueError {
    ValueError::Invalid {
        option: option.to_string(),
        kind,
        value: value.to_string(),
    }
}

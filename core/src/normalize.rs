//! Argument vector normalization.
//!
//! Rewrites raw process arguments into a canonical token stream so option
//! binding only ever compares whole tokens:
//!
//! - `--name=value` becomes `--name`, `value`;
//! - a short-flag cluster `-abc=value` becomes `-a`, `-b`, `-c`, `value`;
//! - a bare `-` (conventionally standard input) passes through;
//! - the first literal `--` passes through and everything after it is left
//!   verbatim.
//!
//! # Examples
//!
//! ```
//! use cmdplan_core::normalize;
//!
//! let raw = ["--a=1", "-bc", "x"].map(String::from);
//! assert_eq!(normalize(&raw), ["--a", "1", "-b", "-c", "x"]);
//! ```

/// The token that ends flag interpretation.
pub const SEPARATOR: &str = "--";

/// Normalizes an argument vector. Idempotent on its own output for
/// values that do not themselves start with `-`.
pub fn normalize(tokens: &[String]) -> Vec<String> {
    let mut normalized = Vec::with_capacity(tokens.len());
    let mut verbatim = false;

    for token in tokens {
        if verbatim || token == "-" || !token.starts_with('-') {
            normalized.push(token.clone());
            continue;
        }
        if token == SEPARATOR {
            verbatim = true;
            normalized.push(token.clone());
            continue;
        }

        if let Some(long) = token.strip_prefix("--") {
            match long.split_once('=') {
                Some((name, value)) => {
                    normalized.push(format!("--{name}"));
                    normalized.push(value.to_string());
                }
                None => normalized.push(token.clone()),
            }
            continue;
        }

        let cluster = &token[1..];
        let (letters, value) = match cluster.split_once('=') {
            Some((letters, value)) => (letters, Some(value)),
            None => (cluster, None),
        };
        if letters.is_empty() {
            normalized.push(token.clone());
            continue;
        }
        normalized.extend(letters.chars().map(|letter| format!("-{letter}")));
        if let Some(value) = value {
            normalized.push(value.to_string());
        }
    }

    normalized
}

/// Splits `tokens` at the first literal `--`, returning the flag-bearing
/// prefix and the verbatim tail (separator included).
pub fn split_at_separator(tokens: &[String]) -> (&[String], &[String]) {
    let end = tokens
        .iter()
        .position(|token| token == SEPARATOR)
        .unwrap_or(tokens.len());
    tokens.split_at(end)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_normalize_splits_long_assignment() {
        assert_eq!(
            normalize(&strings(&["--key=value", "--url=a=b"])),
            strings(&["--key", "value", "--url", "a=b"])
        );
    }

    #[test]
    fn test_normalize_expands_short_cluster_with_value() {
        assert_eq!(
            normalize(&strings(&["-abc=harry", "positional"])),
            strings(&["-a", "-b", "-c", "harry", "positional"])
        );
    }

    #[test]
    fn test_normalize_keeps_stdin_marker() {
        assert_eq!(normalize(&strings(&["-", "-x"])), strings(&["-", "-x"]));
    }

    #[test]
    fn test_normalize_stops_after_separator() {
        assert_eq!(
            normalize(&strings(&["-ab", "--", "-cd", "--e=f"])),
            strings(&["-a", "-b", "--", "-cd", "--e=f"])
        );
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let raw = strings(&["--a=1", "-bc", "x", "-", "-d=2", "--", "-ef", "--g=h"]);
        let once = normalize(&raw);
        assert_eq!(normalize(&once), once);
    }

    #[test]
    fn test_normalize_keeps_empty_cluster() {
        assert_eq!(normalize(&strings(&["-=x"])), strings(&["-=x"]));
    }

    #[test]
    fn test_split_at_separator() {
        let tokens = strings(&["a", "--", "b"]);
        let (head, tail) = split_at_separator(&tokens);
        assert_eq!(head, &tokens[..1]);
        assert_eq!(tail, &tokens[1..]);
    }
}

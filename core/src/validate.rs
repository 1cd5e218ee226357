//! Binding declaration parsing and validation.
//!
//! Option bindings are declared with a compact tag such as
//! `"--remote|-r|$GIT_REMOTE,Remote to push the tag to <name>"`: a
//! `|`-separated alias list, a comma, then help text that may carry one
//! `<placeholder>`. This module turns those tags into validated parts and
//! rejects malformed declarations before any command is registered.
//!
//! # Examples
//!
//! ```
//! use cmdplan_core::{Alias, SchemaError, parse_tag};
//!
//! let tag = parse_tag("--remote|-r|$GIT_REMOTE,Remote to push to <name>").unwrap();
//! assert_eq!(tag.aliases[1], Alias::Short('r'));
//! assert_eq!(tag.placeholder.as_deref(), Some("<name>"));
//!
//! // Short aliases are a single character
//! assert!(matches!(
//!     parse_tag("-rm,Remove"),
//!     Err(SchemaError::ShortAliasTooLong(_))
//! ));
//! ```

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::Alias;

static LONG_ALIAS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9-]+$").expect("static regex must compile"));
static ENV_ALIAS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z0-9_]+$").expect("static regex must compile"));
static COMMAND_ALIAS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-a-z0-9]+$").expect("static regex must compile"));
static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[a-z0-9|]+>").expect("static regex must compile"));
static BROKEN_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\n\s*").expect("static regex must compile"));

/// Malformed option or command declarations.
///
/// Detected when an options record's schema is extracted or a command is
/// constructed; these are programming errors in the command tree and are
/// surfaced before anything is parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// Tag lacks the `,` separating aliases from help text.
    #[error("invalid binding tag {0:?}, expected '--opt|-o|$ENV,Help text with optional <metavar>'")]
    MalformedTag(String),
    /// An alias between `|` separators is empty.
    #[error("empty alias in binding tag {0:?}")]
    EmptyAlias(String),
    /// Alias does not start with `-`, `--` or `$`.
    #[error("alias {0:?} must start with '-', '--' or '$'")]
    MissingPrefix(String),
    /// Alias starts with three or more dashes.
    #[error("too many dashes in alias {0:?}")]
    TooManyDashes(String),
    /// Single-dash alias longer than one character.
    #[error("short alias {0:?} should be a single character")]
    ShortAliasTooLong(String),
    /// Long alias outside lowercase alphanumerics and dashes.
    #[error("invalid long alias {0:?}, must match [a-z0-9-]")]
    InvalidLongAlias(String),
    /// Environment alias outside uppercase alphanumerics and underscores.
    #[error("invalid environment alias {0:?}, must match [A-Z0-9_]")]
    InvalidEnvAlias(String),
    /// Two options of one record (including embedded records) share an alias.
    #[error("duplicate alias {0}")]
    DuplicateAlias(String),
    /// Help text is empty.
    #[error("missing help text for {0}")]
    MissingHelp(String),
    /// A boolean option declared a value placeholder.
    #[error("placeholder is not allowed for boolean option {0}")]
    BooleanPlaceholder(String),
    /// Help text mentions two different placeholders.
    #[error("different <metavar> found in help text: {0}")]
    ConflictingPlaceholders(String),
    /// Command alias outside lowercase alphanumerics and dashes.
    #[error("command alias {0:?} is not valid, must match [-a-z0-9]+")]
    InvalidCommandAlias(String),
}

/// Convenience alias for results with [`SchemaError`].
pub type Result<T> = std::result::Result<T, SchemaError>;

/// A parsed binding tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTag {
    /// Aliases in declaration order.
    pub aliases: Vec<Alias>,
    /// Normalized help text.
    pub help: String,
    /// First `<placeholder>` found in the help text.
    pub placeholder: Option<String>,
}

/// Parses an option binding tag into aliases, help text and placeholder.
///
/// The tag is split on the first `,`; the left side is split on `|`.
///
/// # Errors
///
/// Returns a [`SchemaError`] for a missing separator, any invalid alias,
/// an alias repeated within the tag, empty help text, or conflicting
/// placeholders.
pub fn parse_tag(tag: &str) -> Result<ParsedTag> {
    let Some((alias_list, help)) = tag.split_once(',') else {
        return Err(SchemaError::MalformedTag(tag.to_string()));
    };

    let mut aliases: Vec<Alias> = Vec::new();
    for raw in alias_list.split('|') {
        let alias = parse_alias(raw, tag)?;
        if aliases.contains(&alias) {
            return Err(SchemaError::DuplicateAlias(alias.to_string()));
        }
        aliases.push(alias);
    }

    let (help, placeholder) = extract_placeholder(help)?;
    if help.is_empty() {
        let name = aliases
            .first()
            .map(Alias::to_string)
            .unwrap_or_else(|| tag.to_string());
        return Err(SchemaError::MissingHelp(name));
    }

    Ok(ParsedTag {
        aliases,
        help,
        placeholder,
    })
}

fn parse_alias(raw: &str, tag: &str) -> Result<Alias> {
    let alias = raw.trim();
    if alias.is_empty() {
        return Err(SchemaError::EmptyAlias(tag.to_string()));
    }

    if let Some(name) = alias.strip_prefix('$') {
        if !ENV_ALIAS_RE.is_match(name) {
            return Err(SchemaError::InvalidEnvAlias(alias.to_string()));
        }
        return Ok(Alias::Env(name.to_string()));
    }

    let dashes = alias.chars().take_while(|c| *c == '-').count();
    let name = &alias[dashes..];
    match dashes {
        0 => Err(SchemaError::MissingPrefix(alias.to_string())),
        1 => {
            let mut chars = name.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if c.is_ascii_alphanumeric() => Ok(Alias::Short(c)),
                (None, _) => Err(SchemaError::EmptyAlias(tag.to_string())),
                _ => Err(SchemaError::ShortAliasTooLong(alias.to_string())),
            }
        }
        2 if name.is_empty() => Err(SchemaError::EmptyAlias(tag.to_string())),
        2 if LONG_ALIAS_RE.is_match(name) => Ok(Alias::Long(name.to_string())),
        2 => Err(SchemaError::InvalidLongAlias(alias.to_string())),
        _ => Err(SchemaError::TooManyDashes(alias.to_string())),
    }
}

/// Normalizes help text and extracts its `<placeholder>`, if any.
///
/// Whitespace runs spanning a line break collapse to a single space, and a
/// literal `\n` becomes a real newline. The same placeholder may appear
/// several times; two different ones are rejected.
///
/// # Examples
///
/// ```
/// use cmdplan_core::extract_placeholder;
///
/// let (help, placeholder) = extract_placeholder("Write to <file>\n   or stdout").unwrap();
/// assert_eq!(help, "Write to <file> or stdout");
/// assert_eq!(placeholder.as_deref(), Some("<file>"));
/// ```
pub fn extract_placeholder(help: &str) -> Result<(String, Option<String>)> {
    let help = BROKEN_LINE_RE.replace_all(help.trim(), " ");
    let help = help.trim().replace("\\n", "\n");
    if help.is_empty() {
        return Ok((help, None));
    }

    let mut placeholder: Option<&str> = None;
    for found in PLACEHOLDER_RE.find_iter(&help) {
        match placeholder {
            None => placeholder = Some(found.as_str()),
            Some(first) if first != found.as_str() => {
                return Err(SchemaError::ConflictingPlaceholders(help.clone()));
            }
            Some(_) => {}
        }
    }
    let placeholder = placeholder.map(String::from);
    Ok((help, placeholder))
}

/// Parses a `|`-separated command alias list.
///
/// # Errors
///
/// Returns [`SchemaError::InvalidCommandAlias`] for any alias outside
/// `[-a-z0-9]+`, including an empty one.
///
/// # Examples
///
/// ```
/// use cmdplan_core::parse_command_aliases;
///
/// assert_eq!(parse_command_aliases("tag-bump|bump").unwrap(), vec!["tag-bump", "bump"]);
/// assert!(parse_command_aliases("Tag").is_err());
/// ```
pub fn parse_command_aliases(aliases: &str) -> Result<Vec<String>> {
    aliases
        .split('|')
        .map(str::trim)
        .map(|alias| {
            if COMMAND_ALIAS_RE.is_match(alias) {
                Ok(alias.to_string())
            } else {
                Err(SchemaError::InvalidCommandAlias(alias.to_string()))
            }
        })
        .collect()
}

//! Option descriptor type definitions.
//!
//! An [`OptionDescriptor`] is the derived, immutable metadata for one
//! bindable field of an options record: its [`Alias`]es, help text,
//! placeholder, stringified default, and [`ValueKind`]. Descriptors are
//! serializable so help output can be emitted as JSON or YAML.

use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

/// Kind of value an option binds to.
///
/// A closed set: every bindable field is one of these four kinds, and each
/// kind has exactly one coercion rule (see [`crate::value`]).
///
/// # Examples
///
/// ```
/// use cmdplan_core::ValueKind;
///
/// assert_eq!(ValueKind::Integer.placeholder(), "<integer>");
/// assert!(!ValueKind::Boolean.takes_value());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    /// Free-form text.
    String,
    /// Signed 64-bit integer.
    Integer,
    /// 64-bit float.
    Float,
    /// Toggle; never takes a value on the command line.
    Boolean,
}

impl ValueKind {
    /// Lowercase name of the kind.
    pub fn name(self) -> &'static str {
        match self {
            ValueKind::String => "string",
            ValueKind::Integer => "integer",
            ValueKind::Float => "float",
            ValueKind::Boolean => "boolean",
        }
    }

    /// Placeholder inferred for options whose help text declares none.
    pub fn placeholder(self) -> String {
        format!("<{}>", self.name())
    }

    /// Returns `true` if a flag of this kind consumes a following token.
    pub fn takes_value(self) -> bool {
        self != ValueKind::Boolean
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One recognized spelling of an option.
///
/// Flags are matched against command-line tokens; environment aliases are
/// looked up in the environment before any token is considered.
///
/// # Examples
///
/// ```
/// use cmdplan_core::Alias;
///
/// let long = Alias::Long("dry-run".into());
/// assert_eq!(long.to_string(), "--dry-run");
/// assert!(long.matches("--dry-run"));
///
/// let env = Alias::Env("GIT_REMOTE".into());
/// assert_eq!(env.to_string(), "$GIT_REMOTE");
/// assert!(!env.matches("$GIT_REMOTE"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Alias {
    /// `--name`
    Long(String),
    /// `-x`
    Short(char),
    /// `$NAME`, an environment variable
    Env(String),
}

impl Alias {
    /// Returns `true` for command-line flag spellings (long or short).
    pub fn is_flag(&self) -> bool {
        !matches!(self, Alias::Env(_))
    }

    /// Environment variable name, if this is an environment alias.
    pub fn env_name(&self) -> Option<&str> {
        match self {
            Alias::Env(name) => Some(name),
            _ => None,
        }
    }

    /// Checks whether a command-line token spells this alias.
    ///
    /// Environment aliases never match tokens.
    pub fn matches(&self, token: &str) -> bool {
        match self {
            Alias::Long(name) => token.strip_prefix("--") == Some(name.as_str()),
            Alias::Short(c) => {
                let mut chars = token.chars();
                chars.next() == Some('-') && chars.next() == Some(*c) && chars.next().is_none()
            }
            Alias::Env(_) => false,
        }
    }
}

impl fmt::Display for Alias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Alias::Long(name) => write!(f, "--{name}"),
            Alias::Short(c) => write!(f, "-{c}"),
            Alias::Env(name) => write!(f, "${name}"),
        }
    }
}

impl Serialize for Alias {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Metadata for one bindable option.
///
/// Produced by [`OptionSchema::extract`](crate::OptionSchema::extract);
/// every descriptor has at least one alias and non-empty help text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionDescriptor {
    /// Recognized spellings, in declaration order.
    pub aliases: Vec<Alias>,
    /// Help text with the placeholder left in place.
    pub help: String,
    /// Value placeholder such as `<prefix>`; `None` for booleans.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    /// Stringified prototype value; `None` when the prototype holds the
    /// zero value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    /// Kind of the bound field.
    pub kind: ValueKind,
}

impl OptionDescriptor {
    /// Returns the first alias, as written in the declaration.
    pub fn canonical_name(&self) -> String {
        self.aliases
            .first()
            .map(Alias::to_string)
            .unwrap_or_default()
    }

    /// Checks whether a command-line token spells any flag alias.
    pub fn matches(&self, token: &str) -> bool {
        self.aliases.iter().any(|alias| alias.matches(token))
    }

    /// Checks whether any alias (flag or environment) has this spelling.
    pub fn has_alias(&self, spelled: &str) -> bool {
        self.aliases.iter().any(|alias| alias.to_string() == spelled)
    }

    /// Flag aliases only.
    pub fn flag_aliases(&self) -> impl Iterator<Item = &Alias> {
        self.aliases.iter().filter(|alias| alias.is_flag())
    }

    /// Environment variable names only.
    pub fn env_names(&self) -> impl Iterator<Item = &str> {
        self.aliases.iter().filter_map(Alias::env_name)
    }
}

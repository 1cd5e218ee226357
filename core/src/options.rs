//! Declarative option records and their extracted schemas.
//!
//! An options record is any `Clone` struct that implements [`Options`] by
//! declaring its bindable fields: each declaration pairs a binding tag
//! (aliases, help, placeholder) with an accessor closure for the field.
//! [`OptionSchema::extract`] validates those declarations once and produces
//! the record's [`OptionDescriptor`]s; the same schema then binds
//! environment variables and command-line tokens into fresh copies of a
//! prototype record.
//!
//! # Example
//!
//! ```
//! use std::collections::HashMap;
//!
//! use cmdplan_core::{Fields, OptionSchema, Options};
//!
//! #[derive(Debug, Clone, Default)]
//! struct TagOptions {
//!     prefix: String,
//!     count: i64,
//!     dry_run: bool,
//! }
//!
//! impl Options for TagOptions {
//!     fn declare(fields: &mut Fields<Self>) {
//!         fields
//!             .string("--prefix|-p,Prefix for the new tag <prefix>", |o| &mut o.prefix)
//!             .integer("--count,How many tags to keep", |o| &mut o.count)
//!             .boolean("--dry-run|$DRY_RUN,Do not push anything", |o| &mut o.dry_run);
//!     }
//! }
//!
//! let defaults = TagOptions { count: 3, ..Default::default() };
//! let schema = OptionSchema::extract(&defaults).unwrap();
//! assert_eq!(schema.descriptors().len(), 3);
//! assert_eq!(schema.descriptors()[1].default.as_deref(), Some("3"));
//!
//! let tokens = vec!["--prefix".to_string(), "v".to_string(), "file".to_string()];
//! let (bound, rest) = schema.bind(&defaults, &HashMap::<String, String>::new(), tokens).unwrap();
//! assert_eq!(bound.prefix, "v");
//! assert_eq!(rest, vec!["file"]);
//! ```

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use tracing::trace;

use crate::value::{invalid, parse_float, parse_integer};
use crate::{Environment, OptionDescriptor, SchemaError, ValueError, ValueKind, parse_tag};

/// An options record that can be bound from the environment and the
/// command line.
///
/// Implementors list their bindable fields in [`declare`](Options::declare).
/// Fields that are not declared are never touched by binding.
pub trait Options: Clone + Send + Sync + 'static {
    /// Declares the bindable fields of this record, in display order.
    fn declare(fields: &mut Fields<Self>);
}

/// Options record with no bindable fields, for commands that take none.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoOptions;

impl Options for NoOptions {
    fn declare(_fields: &mut Fields<Self>) {}
}

type Access<T, V> = Arc<dyn Fn(&mut T) -> &mut V + Send + Sync>;

fn access<T, V, F>(field: F) -> Access<T, V>
where
    F: Fn(&mut T) -> &mut V + Send + Sync + 'static,
{
    Arc::new(field)
}

enum Slot<T> {
    String(Access<T, String>),
    Integer(Access<T, i64>),
    Float(Access<T, f64>),
    Boolean(Access<T, bool>),
}

impl<T> Clone for Slot<T> {
    fn clone(&self) -> Self {
        match self {
            Slot::String(field) => Slot::String(Arc::clone(field)),
            Slot::Integer(field) => Slot::Integer(Arc::clone(field)),
            Slot::Float(field) => Slot::Float(Arc::clone(field)),
            Slot::Boolean(field) => Slot::Boolean(Arc::clone(field)),
        }
    }
}

impl<T: 'static> Slot<T> {
    fn kind(&self) -> ValueKind {
        match self {
            Slot::String(_) => ValueKind::String,
            Slot::Integer(_) => ValueKind::Integer,
            Slot::Float(_) => ValueKind::Float,
            Slot::Boolean(_) => ValueKind::Boolean,
        }
    }

    /// Re-roots this slot onto a record that embeds `T`.
    fn lift<O: 'static>(self, outer: Access<O, T>) -> Slot<O> {
        match self {
            Slot::String(inner) => Slot::String(access(move |o| inner(outer(o)))),
            Slot::Integer(inner) => Slot::Integer(access(move |o| inner(outer(o)))),
            Slot::Float(inner) => Slot::Float(access(move |o| inner(outer(o)))),
            Slot::Boolean(inner) => Slot::Boolean(access(move |o| inner(outer(o)))),
        }
    }

    /// Applies one occurrence of `option`. A boolean is switched on and
    /// ignores `raw`; every other kind needs `raw` and coerces it.
    fn set(&self, record: &mut T, option: &str, raw: Option<&str>) -> Result<(), ValueError> {
        let kind = self.kind();
        if let Slot::Boolean(field) = self {
            *field(record) = true;
            return Ok(());
        }
        let raw = raw.ok_or_else(|| ValueError::Missing(option.to_string()))?;
        match self {
            Slot::String(field) => *field(record) = raw.to_string(),
            Slot::Integer(field) => {
                *field(record) = parse_integer(raw).ok_or_else(|| invalid(option, kind, raw))?;
            }
            Slot::Float(field) => {
                *field(record) = parse_float(raw).ok_or_else(|| invalid(option, kind, raw))?;
            }
            Slot::Boolean(_) => {}
        }
        Ok(())
    }

    /// Returns the field's value as text, or `None` when it holds the
    /// zero value.
    fn read(&self, record: &mut T) -> Option<String> {
        match self {
            Slot::String(field) => Some(field(record).clone()).filter(|s| !s.is_empty()),
            Slot::Integer(field) => Some(*field(record)).filter(|n| *n != 0).map(|n| n.to_string()),
            Slot::Float(field) => Some(*field(record)).filter(|n| *n != 0.0).map(|n| n.to_string()),
            Slot::Boolean(field) => Some(*field(record)).filter(|b| *b).map(|b| b.to_string()),
        }
    }

    fn zero_text(&self) -> String {
        match self {
            Slot::String(_) => String::new(),
            Slot::Integer(_) | Slot::Float(_) => "0".to_string(),
            Slot::Boolean(_) => "false".to_string(),
        }
    }
}

struct Declaration<T> {
    tag: String,
    slot: Slot<T>,
}

/// Collects the field declarations of an [`Options`] record.
///
/// Each method takes a binding tag and an accessor returning a mutable
/// reference to the field. Tags are validated by [`OptionSchema::extract`].
pub struct Fields<T> {
    declarations: Vec<Declaration<T>>,
}

impl<T: Options> Fields<T> {
    fn new() -> Self {
        Self {
            declarations: Vec::new(),
        }
    }

    fn collect() -> Self {
        let mut fields = Self::new();
        T::declare(&mut fields);
        fields
    }

    /// Declares a string field.
    pub fn string<F>(&mut self, tag: &str, field: F) -> &mut Self
    where
        F: Fn(&mut T) -> &mut String + Send + Sync + 'static,
    {
        self.push(tag, Slot::String(access(field)))
    }

    /// Declares a signed integer field.
    pub fn integer<F>(&mut self, tag: &str, field: F) -> &mut Self
    where
        F: Fn(&mut T) -> &mut i64 + Send + Sync + 'static,
    {
        self.push(tag, Slot::Integer(access(field)))
    }

    /// Declares a float field.
    pub fn float<F>(&mut self, tag: &str, field: F) -> &mut Self
    where
        F: Fn(&mut T) -> &mut f64 + Send + Sync + 'static,
    {
        self.push(tag, Slot::Float(access(field)))
    }

    /// Declares a boolean toggle. Its help text must not name a placeholder.
    pub fn boolean<F>(&mut self, tag: &str, field: F) -> &mut Self
    where
        F: Fn(&mut T) -> &mut bool + Send + Sync + 'static,
    {
        self.push(tag, Slot::Boolean(access(field)))
    }

    /// Embeds another options record; its fields are bound at the same
    /// flat level as this record's own fields.
    pub fn embed<U, F>(&mut self, field: F) -> &mut Self
    where
        U: Options,
        F: Fn(&mut T) -> &mut U + Send + Sync + 'static,
    {
        let outer: Access<T, U> = access(field);
        for declaration in Fields::<U>::collect().declarations {
            self.declarations.push(Declaration {
                tag: declaration.tag,
                slot: declaration.slot.lift(Arc::clone(&outer)),
            });
        }
        self
    }

    fn push(&mut self, tag: &str, slot: Slot<T>) -> &mut Self {
        self.declarations.push(Declaration {
            tag: tag.to_string(),
            slot,
        });
        self
    }
}

/// The validated schema of an [`Options`] record.
///
/// Holds one [`OptionDescriptor`] per declared field (embedded records
/// flattened in declaration order) and the accessors needed to bind them.
pub struct OptionSchema<T> {
    descriptors: Vec<OptionDescriptor>,
    slots: Vec<Slot<T>>,
}

impl<T> fmt::Debug for OptionSchema<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionSchema")
            .field("descriptors", &self.descriptors)
            .finish()
    }
}

impl<T: Options> OptionSchema<T> {
    /// Derives the schema of `T`, reading defaults from `prototype`.
    ///
    /// # Errors
    ///
    /// Returns a [`SchemaError`] for any malformed tag, an alias shared by
    /// two options (embedded records included), or a boolean option that
    /// declares a placeholder.
    pub fn extract(prototype: &T) -> Result<Self, SchemaError> {
        let mut seen = HashSet::new();
        let mut descriptors = Vec::new();
        let mut slots = Vec::new();
        let mut scratch = prototype.clone();

        for Declaration { tag, slot } in Fields::<T>::collect().declarations {
            let parsed = parse_tag(&tag)?;
            for alias in &parsed.aliases {
                if !seen.insert(alias.clone()) {
                    return Err(SchemaError::DuplicateAlias(alias.to_string()));
                }
            }

            let kind = slot.kind();
            let placeholder = match (kind, parsed.placeholder) {
                (ValueKind::Boolean, Some(_)) => {
                    return Err(SchemaError::BooleanPlaceholder(parsed.aliases[0].to_string()));
                }
                (ValueKind::Boolean, None) => None,
                (_, Some(placeholder)) => Some(placeholder),
                (_, None) => Some(kind.placeholder()),
            };

            descriptors.push(OptionDescriptor {
                aliases: parsed.aliases,
                help: parsed.help,
                placeholder,
                default: slot.read(&mut scratch),
                kind,
            });
            slots.push(slot);
        }

        Ok(Self { descriptors, slots })
    }

    /// Descriptors in declaration order.
    pub fn descriptors(&self) -> &[OptionDescriptor] {
        &self.descriptors
    }

    /// Copies `prototype` and binds the environment, then `tokens`, into
    /// the copy. Returns the bound record and the unconsumed tokens.
    ///
    /// The prototype itself is never modified.
    pub fn bind(
        &self,
        prototype: &T,
        env: &dyn Environment,
        tokens: Vec<String>,
    ) -> Result<(T, Vec<String>), ValueError> {
        let mut record = prototype.clone();
        self.bind_env(&mut record, env)?;
        let rest = self.bind_tokens(&mut record, tokens)?;
        Ok((record, rest))
    }

    /// Applies every environment alias that is set.
    ///
    /// A set variable switches a boolean option on regardless of its value;
    /// other kinds coerce the variable's value.
    pub fn bind_env(&self, record: &mut T, env: &dyn Environment) -> Result<(), ValueError> {
        for (descriptor, slot) in self.descriptors.iter().zip(&self.slots) {
            for name in descriptor.env_names() {
                let Some(value) = env.var(name) else {
                    continue;
                };
                trace!(variable = name, "binding option from environment");
                slot.set(record, &format!("${name}"), Some(&value))?;
            }
        }
        Ok(())
    }

    /// Consumes tokens that spell one of this schema's flags.
    ///
    /// Scanning is left to right and stops at a literal `--`. A boolean
    /// flag consumes one token; any other flag consumes itself and the
    /// following token as its value.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::Missing`] when a value-taking flag is last or
    /// followed by `--`, and [`ValueError::Invalid`] when the value does not
    /// coerce to the option's kind.
    pub fn bind_tokens(&self, record: &mut T, mut tokens: Vec<String>) -> Result<Vec<String>, ValueError> {
        let mut i = 0;
        while i < tokens.len() {
            if tokens[i] == "--" {
                break;
            }
            let Some(index) = self.position(&tokens[i]) else {
                i += 1;
                continue;
            };

            let slot = &self.slots[index];
            if !slot.kind().takes_value() {
                slot.set(record, &tokens[i], None)?;
                tokens.remove(i);
                continue;
            }

            let value = tokens.get(i + 1).filter(|value| *value != "--");
            slot.set(record, &tokens[i], value.map(String::as_str))?;
            tokens.drain(i..i + 2);
        }
        Ok(tokens)
    }

    /// Returns the current value of the option spelled `alias` in `record`,
    /// as text. Zero values render as `""`, `0` or `false`.
    pub fn value_of(&self, record: &T, alias: &str) -> Option<String> {
        let index = self
            .descriptors
            .iter()
            .position(|descriptor| descriptor.has_alias(alias))?;
        let slot = &self.slots[index];
        let mut copy = record.clone();
        Some(slot.read(&mut copy).unwrap_or_else(|| slot.zero_text()))
    }

    fn position(&self, token: &str) -> Option<usize> {
        self.descriptors
            .iter()
            .position(|descriptor| descriptor.matches(token))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::Alias;

    #[derive(Debug, Clone, Default)]
    struct LogOptions {
        level: String,
        verbose: bool,
    }

    impl Options for LogOptions {
        fn declare(fields: &mut Fields<Self>) {
            fields
                .string("--loglevel|$LOG_LEVEL,Log level <level>", |o| &mut o.level)
                .boolean("--verbose|-v,Verbose output", |o| &mut o.verbose);
        }
    }

    #[derive(Debug, Clone, Default)]
    struct BuildOptions {
        log: LogOptions,
        jobs: i64,
        ratio: f64,
        notes: String,
    }

    impl Options for BuildOptions {
        fn declare(fields: &mut Fields<Self>) {
            fields
                .embed(|o| &mut o.log)
                .integer("--jobs|-j|$JOBS,Parallel jobs", |o| &mut o.jobs)
                .float("--ratio,Compression ratio", |o| &mut o.ratio);
        }
    }

    fn tokens(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_extract_flattens_embedded_records() {
        let schema = OptionSchema::extract(&BuildOptions::default()).unwrap();
        let names: Vec<String> = schema
            .descriptors()
            .iter()
            .map(OptionDescriptor::canonical_name)
            .collect();
        assert_eq!(names, vec!["--loglevel", "--verbose", "--jobs", "--ratio"]);
    }

    #[test]
    fn test_extract_infers_placeholders() {
        let schema = OptionSchema::extract(&BuildOptions::default()).unwrap();
        let placeholders: Vec<Option<&str>> = schema
            .descriptors()
            .iter()
            .map(|d| d.placeholder.as_deref())
            .collect();
        assert_eq!(
            placeholders,
            vec![Some("<level>"), None, Some("<integer>"), Some("<float>")]
        );
    }

    #[test]
    fn test_extract_reports_non_zero_defaults_only() {
        let defaults = BuildOptions {
            log: LogOptions {
                level: "info".into(),
                verbose: false,
            },
            jobs: 0,
            ratio: 0.5,
            notes: "ignored".into(),
        };
        let schema = OptionSchema::extract(&defaults).unwrap();
        let defaults: Vec<Option<&str>> = schema
            .descriptors()
            .iter()
            .map(|d| d.default.as_deref())
            .collect();
        assert_eq!(defaults, vec![Some("info"), None, None, Some("0.5")]);
    }

    #[test]
    fn test_bind_tokens_boolean_consumes_one_token() {
        let schema = OptionSchema::extract(&LogOptions::default()).unwrap();
        let mut record = LogOptions::default();
        let rest = schema.bind_tokens(&mut record, tokens(&["--verbose"])).unwrap();
        assert!(record.verbose);
        assert!(rest.is_empty());
    }

    #[test]
    fn test_bind_tokens_integer_consumes_two_tokens() {
        let schema = OptionSchema::extract(&BuildOptions::default()).unwrap();
        let mut record = BuildOptions::default();
        let rest = schema
            .bind_tokens(&mut record, tokens(&["--jobs", "42"]))
            .unwrap();
        assert_eq!(record.jobs, 42);
        assert!(rest.is_empty());
    }

    #[test]
    fn test_bind_tokens_stops_at_separator() {
        let schema = OptionSchema::extract(&BuildOptions::default()).unwrap();
        let mut record = BuildOptions::default();
        let rest = schema
            .bind_tokens(&mut record, tokens(&["a", "-j", "2", "--", "--jobs", "9"]))
            .unwrap();
        assert_eq!(record.jobs, 2);
        assert_eq!(rest, tokens(&["a", "--", "--jobs", "9"]));
    }

    #[test]
    fn test_bind_tokens_reports_bad_value() {
        let schema = OptionSchema::extract(&BuildOptions::default()).unwrap();
        let mut record = BuildOptions::default();
        let err = schema
            .bind_tokens(&mut record, tokens(&["--ratio", "fast"]))
            .unwrap_err();
        assert_eq!(
            err,
            ValueError::Invalid {
                option: "--ratio".into(),
                kind: ValueKind::Float,
                value: "fast".into(),
            }
        );
    }

    #[test]
    fn test_bind_tokens_reports_missing_value() {
        let schema = OptionSchema::extract(&BuildOptions::default()).unwrap();
        let mut record = BuildOptions::default();
        assert_eq!(
            schema.bind_tokens(&mut record, tokens(&["--jobs"])),
            Err(ValueError::Missing("--jobs".into()))
        );
        assert_eq!(
            schema.bind_tokens(&mut record, tokens(&["--jobs", "--", "x"])),
            Err(ValueError::Missing("--jobs".into()))
        );
    }

    #[test]
    fn test_bind_applies_env_before_tokens() {
        let schema = OptionSchema::extract(&BuildOptions::default()).unwrap();
        let env: HashMap<String, String> = [
            ("JOBS".to_string(), "4".to_string()),
            ("LOG_LEVEL".to_string(), "warn".to_string()),
        ]
        .into_iter()
        .collect();

        let (bound, _) = schema
            .bind(&BuildOptions::default(), &env, tokens(&["--jobs", "8"]))
            .unwrap();
        assert_eq!(bound.jobs, 8);
        assert_eq!(bound.log.level, "warn");
    }

    #[test]
    fn test_bind_env_reports_variable_name() {
        let schema = OptionSchema::extract(&BuildOptions::default()).unwrap();
        let env: HashMap<String, String> =
            [("JOBS".to_string(), "many".to_string())].into_iter().collect();
        let err = schema
            .bind(&BuildOptions::default(), &env, Vec::new())
            .unwrap_err();
        assert!(matches!(err, ValueError::Invalid { ref option, .. } if option == "$JOBS"));
    }

    #[derive(Debug, Clone, Default)]
    struct CiOptions {
        ci: bool,
    }

    impl Options for CiOptions {
        fn declare(fields: &mut Fields<Self>) {
            fields.boolean("--ci|$CI,Running under CI", |o| &mut o.ci);
        }
    }

    #[test]
    fn test_bind_env_switches_boolean_on_whatever_the_value() {
        let schema = OptionSchema::extract(&CiOptions::default()).unwrap();
        for value in ["true", "false", "0", ""] {
            let env: HashMap<String, String> =
                [("CI".to_string(), value.to_string())].into_iter().collect();
            let (bound, _) = schema.bind(&CiOptions::default(), &env, Vec::new()).unwrap();
            assert!(bound.ci, "CI={value:?}");
        }

        let (bound, _) = schema
            .bind(&CiOptions::default(), &HashMap::<String, String>::new(), Vec::new())
            .unwrap();
        assert!(!bound.ci);
    }

    #[test]
    fn test_bind_leaves_prototype_untouched() {
        let schema = OptionSchema::extract(&BuildOptions::default()).unwrap();
        let prototype = BuildOptions::default();
        let (bound, _) = schema
            .bind(&prototype, &HashMap::<String, String>::new(), tokens(&["-v", "-j", "3"]))
            .unwrap();
        assert!(bound.log.verbose);
        assert!(!prototype.log.verbose);
        assert_eq!(prototype.jobs, 0);
    }

    #[test]
    fn test_value_of_renders_zero_values() {
        let schema = OptionSchema::extract(&BuildOptions::default()).unwrap();
        let record = BuildOptions {
            jobs: 7,
            ..Default::default()
        };
        assert_eq!(schema.value_of(&record, "-j").as_deref(), Some("7"));
        assert_eq!(schema.value_of(&record, "--verbose").as_deref(), Some("false"));
        assert_eq!(schema.value_of(&record, "$JOBS").as_deref(), Some("7"));
        assert_eq!(schema.value_of(&record, "--missing"), None);
    }

    #[derive(Debug, Clone, Default)]
    struct Clashing {
        log: LogOptions,
        verbose: bool,
    }

    impl Options for Clashing {
        fn declare(fields: &mut Fields<Self>) {
            fields
                .embed(|o| &mut o.log)
                .boolean("--quiet|-v,Suppress output", |o| &mut o.verbose);
        }
    }

    #[test]
    fn test_extract_rejects_alias_shared_with_embedded_record() {
        let err = OptionSchema::extract(&Clashing::default()).unwrap_err();
        assert_eq!(err, SchemaError::DuplicateAlias(Alias::Short('v').to_string()));
    }

    #[derive(Debug, Clone, Default)]
    struct BadToggle {
        on: bool,
    }

    impl Options for BadToggle {
        fn declare(fields: &mut Fields<Self>) {
            fields.boolean("--on,Turn it <on>", |o| &mut o.on);
        }
    }

    #[test]
    fn test_extract_rejects_boolean_placeholder() {
        assert_eq!(
            OptionSchema::extract(&BadToggle::default()).unwrap_err(),
            SchemaError::BooleanPlaceholder("--on".into())
        );
    }
}

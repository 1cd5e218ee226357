//! Option schemas and argument primitives for command trees.
//!
//! This crate holds the building blocks that do not depend on a command
//! tree:
//!
//! - [`Options`] / [`Fields`]: declare which fields of an options record
//!   are bindable, with their aliases and help text.
//! - [`OptionSchema`]: the validated [`OptionDescriptor`]s of a record,
//!   able to bind environment variables and tokens into record copies.
//! - [`normalize`]: canonicalizes a raw argument vector.
//! - [`levenshtein`], [`closest`], [`suggest_flag`]: "did you mean"
//!   suggestions.
//!
//! Validation errors ([`SchemaError`]) are reported when a schema is
//! extracted, before any argument is parsed; binding errors
//! ([`ValueError`]) name the option and the offending text.
//!
//! # Example
//!
//! ```
//! use std::collections::HashMap;
//!
//! use cmdplan_core::*;
//!
//! #[derive(Debug, Clone, Default)]
//! struct ArchiveOptions {
//!     output: String,
//!     level: i64,
//! }
//!
//! impl Options for ArchiveOptions {
//!     fn declare(fields: &mut Fields<Self>) {
//!         fields
//!             .string("--output|-o,Archive to write <file>", |o| &mut o.output)
//!             .integer("--level|$ARCHIVE_LEVEL,Compression level", |o| &mut o.level);
//!     }
//! }
//!
//! let raw = ["-o=out.tgz", "src"].map(String::from);
//! let tokens = normalize(&raw);
//!
//! let env: HashMap<String, String> =
//!     [("ARCHIVE_LEVEL".to_string(), "9".to_string())].into_iter().collect();
//! let schema = OptionSchema::extract(&ArchiveOptions::default()).unwrap();
//! let (options, rest) = schema.bind(&ArchiveOptions::default(), &env, tokens).unwrap();
//!
//! assert_eq!(options.output, "out.tgz");
//! assert_eq!(options.level, 9);
//! assert_eq!(rest, ["src"]);
//! ```

mod env;
mod fuzzy;
mod normalize;
mod options;
mod types;
mod validate;
pub mod value;

pub use env::{Environment, ProcessEnv};
pub use fuzzy::{
    DEFAULT_SUGGESTION_THRESHOLD, FlagSuggestion, Match, closest, levenshtein, suggest_flag,
};
pub use normalize::{SEPARATOR, normalize, split_at_separator};
pub use options::{Fields, NoOptions, OptionSchema, Options};
pub use types::*;
pub use validate::{
    ParsedTag, Result, SchemaError, extract_placeholder, parse_command_aliases, parse_tag,
};
pub use value::ValueError;

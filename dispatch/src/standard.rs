//! Option records and commands most command trees want.

use std::io::Write;

use cmdplan_core::{Fields, Options, SchemaError};
use thiserror::Error;
use tracing::level_filters::LevelFilter;

use crate::command::{Command, program_name};

/// Unknown log level name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid log level {0:?}")]
pub struct InvalidLogLevel(pub String);

/// Logging options, usually embedded in the root command's record.
///
/// # Examples
///
/// ```
/// use cmdplan_dispatch::LogOptions;
/// use tracing::level_filters::LevelFilter;
///
/// let options = LogOptions { level: String::new(), verbose: true };
/// assert_eq!(options.filter().unwrap(), LevelFilter::DEBUG);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogOptions {
    /// Level name; empty means `info`.
    pub level: String,
    /// Shorthand for `--loglevel debug` when no level is given.
    pub verbose: bool,
}

impl Options for LogOptions {
    fn declare(fields: &mut Fields<Self>) {
        fields
            .string(
                "--loglevel|$CICD_LOGLEVEL,Log level (trace|debug|info|warn|error|silent) <level>",
                |o| &mut o.level,
            )
            .boolean(
                "--verbose,Verbose output (alias for --loglevel debug)",
                |o| &mut o.verbose,
            );
    }
}

impl LogOptions {
    /// The level filter these options select.
    pub fn filter(&self) -> Result<LevelFilter, InvalidLogLevel> {
        let level = match self.level.as_str() {
            "" if self.verbose => "debug",
            level => level,
        };
        match level {
            "trace" => Ok(LevelFilter::TRACE),
            "debug" => Ok(LevelFilter::DEBUG),
            "info" | "" => Ok(LevelFilter::INFO),
            "warn" | "warning" => Ok(LevelFilter::WARN),
            "error" => Ok(LevelFilter::ERROR),
            "silent" => Ok(LevelFilter::OFF),
            other => Err(InvalidLogLevel(other.to_string())),
        }
    }
}

/// Options of the `version` command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VersionOptions {
    /// Print only the version number.
    pub short: bool,
}

impl Options for VersionOptions {
    fn declare(fields: &mut Fields<Self>) {
        fields.boolean("--short,Print only the version number", |o| &mut o.short);
    }
}

/// Build metadata printed by the `version` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildInfo {
    /// Release version, usually `CARGO_PKG_VERSION`.
    pub version: String,
    /// When the binary was built.
    pub date: String,
    /// Who or what built it, e.g. a CI job.
    pub by: String,
}

impl BuildInfo {
    /// Text printed by `version`, or by `version --short` when `short`.
    pub fn render(&self, short: bool) -> String {
        if short {
            format!("{}\n", self.version)
        } else {
            format!(
                "version: {}\ndate: {}\nby: {}\n",
                self.version, self.date, self.by
            )
        }
    }
}

/// A `version` command printing `info` to standard output.
pub fn version_command(info: BuildInfo) -> Result<Command, SchemaError> {
    let help = format!("Print the version of {}", program_name());
    Command::new("version", &help, VersionOptions::default())
        .run(move |_ctx, options, _args| {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(info.render(options.short).as_bytes())?;
            Ok(())
        })
        .build()
}

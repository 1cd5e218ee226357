//! Command trees, execution plans and help.
//!
//! A command tree is built from [`Command`]s, each pairing an options
//! record (see [`cmdplan_core::Options`]) with run and teardown handlers.
//! For one argument vector the [`PlanBuilder`] resolves the command path,
//! binds every level's options from the environment and the command line,
//! and rejects anything left unrecognized. The resulting [`Plan`] runs the
//! handlers root to leaf, then the teardown handlers leaf to root.
//!
//! [`Application`] adds configuration, help triggers and help rendering on
//! top.
//!
//! # Example
//!
//! ```
//! use std::collections::HashMap;
//!
//! use cmdplan_core::{Fields, Options};
//! use cmdplan_dispatch::{Application, Command, Outcome};
//!
//! #[derive(Debug, Clone, Default)]
//! struct BumpOptions {
//!     prefix: String,
//!     dry_run: bool,
//! }
//!
//! impl Options for BumpOptions {
//!     fn declare(fields: &mut Fields<Self>) {
//!         fields
//!             .string("--prefix,Prefix of the new tag", |o| &mut o.prefix)
//!             .boolean("--dry-run|$DRY_RUN,Only print the new tag", |o| &mut o.dry_run);
//!     }
//! }
//!
//! let bump = Command::new("tag-bump", "Bump the latest tag", BumpOptions::default())
//!     .run(|_ctx, options, _args| {
//!         assert_eq!(options.prefix, "v");
//!         assert!(options.dry_run);
//!         Ok(())
//!     })
//!     .build()
//!     .unwrap();
//! let git = Command::group("git", "Git helpers").subcommand(bump).build().unwrap();
//! let root = Command::group("cicd", "CI/CD utilities").subcommand(git).build().unwrap();
//!
//! let env: HashMap<String, String> =
//!     [("DRY_RUN".to_string(), "1".to_string())].into_iter().collect();
//! let app = Application::new(root).with_environment(env);
//!
//! let args = ["git", "tag-bump", "--prefix=v"].map(String::from);
//! assert_eq!(app.run(&args).unwrap(), Outcome::Completed);
//! ```

mod app;
mod command;
mod config;
mod context;
mod error;
mod group;
mod help;
mod plan;
mod standard;
mod step;

pub use app::{Application, Invocation, Outcome};
pub use command::{Command, CommandBuilder, Modifier, program_name};
pub use config::{AppConfig, ConfigError};
pub use context::Context;
pub use error::{Error, HandlerError, HandlerResult, Result};
pub use group::{CommandGroup, PathMatch};
pub use help::{CommandSummary, FlagSection, HelpFormat, HelpPage};
pub use plan::{Plan, PlanBuilder};
pub use standard::{BuildInfo, InvalidLogLevel, LogOptions, VersionOptions, version_command};
pub use step::Step;

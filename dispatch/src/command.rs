//! Commands and their construction.
//!
//! A [`Command`] is an immutable node of the command tree: aliases, help
//! text, an options prototype with its extracted schema, optional run and
//! teardown handlers, and an ordered [`CommandGroup`] of subcommands.
//! Commands are cheap to clone; clones share the same node.
//!
//! Commands are built through [`CommandBuilder`], which validates the
//! aliases, the help text and the options schema before anything is run:
//!
//! ```
//! use cmdplan_core::{Fields, Options};
//! use cmdplan_dispatch::Command;
//!
//! #[derive(Debug, Clone, Default)]
//! struct PushOptions {
//!     remote: String,
//! }
//!
//! impl Options for PushOptions {
//!     fn declare(fields: &mut Fields<Self>) {
//!         fields.string("--remote|$GIT_REMOTE,Remote to push to", |o| &mut o.remote);
//!     }
//! }
//!
//! let push = Command::new("push", "Push the current branch", PushOptions::default())
//!     .run(|_ctx, options, _args| {
//!         println!("pushing to {}", options.remote);
//!         Ok(())
//!     })
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(push.name(), "push");
//! assert_eq!(push.descriptors()[0].canonical_name(), "--remote");
//! ```

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use cmdplan_core::{
    Environment, NoOptions, OptionDescriptor, OptionSchema, Options, SchemaError, ValueError,
    extract_placeholder, parse_command_aliases,
};

use crate::context::Context;
use crate::error::HandlerResult;
use crate::group::CommandGroup;
use crate::step::{Bound, BoundOptions, Handler};

/// Type-erased options side of a command: schema, prototype and handlers.
pub(crate) trait Binder: Send + Sync {
    fn descriptors(&self) -> &[OptionDescriptor];

    fn has_handler(&self) -> bool;

    /// Copies the prototype and binds environment and tokens into it.
    fn bind(
        &self,
        env: &dyn Environment,
        tokens: Vec<String>,
    ) -> Result<(Box<dyn BoundOptions>, Vec<String>), ValueError>;
}

struct TypedBinder<T> {
    prototype: T,
    schema: Arc<OptionSchema<T>>,
    run: Option<Handler<T>>,
    teardown: Option<Handler<T>>,
}

impl<T: Options> Binder for TypedBinder<T> {
    fn descriptors(&self) -> &[OptionDescriptor] {
        self.schema.descriptors()
    }

    fn has_handler(&self) -> bool {
        self.run.is_some()
    }

    fn bind(
        &self,
        env: &dyn Environment,
        tokens: Vec<String>,
    ) -> Result<(Box<dyn BoundOptions>, Vec<String>), ValueError> {
        let (options, rest) = self.schema.bind(&self.prototype, env, tokens)?;
        let bound = Bound {
            options,
            schema: Arc::clone(&self.schema),
            run: self.run.clone(),
            teardown: self.teardown.clone(),
        };
        Ok((Box::new(bound), rest))
    }
}

#[derive(Clone)]
struct Node {
    aliases: Vec<String>,
    help: String,
    placeholder: Option<String>,
    subcommands: CommandGroup,
    logical_group: bool,
    binder: Arc<dyn Binder>,
}

/// A node of the command tree.
///
/// Every command has at least one alias (the first is its name) and
/// non-empty help text. A command flagged as a logical group does not need
/// its own name on the command line: its subcommands resolve as if they
/// belonged to its parent.
#[derive(Clone)]
pub struct Command(Arc<Node>);

impl Command {
    /// Starts building a command whose options record is `prototype`.
    ///
    /// `aliases` is a `|`-separated list such as `"tag-bump|bump"`; an
    /// empty string names the command after the running program. The first
    /// `<placeholder>` in `help` names the command's positional arguments.
    pub fn new<T: Options>(aliases: &str, help: &str, prototype: T) -> CommandBuilder<T> {
        CommandBuilder {
            aliases: aliases.to_string(),
            help: help.to_string(),
            prototype,
            run: None,
            teardown: None,
            logical_group: false,
            subcommands: CommandGroup::new(),
        }
    }

    /// Starts building a command that takes no options and only groups
    /// subcommands.
    pub fn group(aliases: &str, help: &str) -> CommandBuilder<NoOptions> {
        Command::new(aliases, help, NoOptions)
    }

    /// The canonical name (first alias).
    pub fn name(&self) -> &str {
        &self.0.aliases[0]
    }

    /// All aliases, canonical name first.
    pub fn aliases(&self) -> &[String] {
        &self.0.aliases
    }

    /// Checks whether `name` is one of this command's aliases.
    pub fn answers_to(&self, name: &str) -> bool {
        self.0.aliases.iter().any(|alias| alias == name)
    }

    /// Help text, whitespace-normalized, placeholder left in place.
    pub fn help(&self) -> &str {
        &self.0.help
    }

    /// Placeholder naming the positional arguments, if the help declares one.
    pub fn placeholder(&self) -> Option<&str> {
        self.0.placeholder.as_deref()
    }

    /// Returns `true` if this command is a logical group.
    pub fn is_logical_group(&self) -> bool {
        self.0.logical_group
    }

    /// Returns `true` if this command has a run handler.
    pub fn has_handler(&self) -> bool {
        self.0.binder.has_handler()
    }

    /// Option descriptors of this command's options record.
    pub fn descriptors(&self) -> &[OptionDescriptor] {
        self.0.binder.descriptors()
    }

    /// Subcommands in insertion order.
    pub fn subcommands(&self) -> &CommandGroup {
        &self.0.subcommands
    }

    /// Returns a new command with `modifiers` applied; `self` is unchanged.
    ///
    /// # Errors
    ///
    /// Fails when a modifier carries invalid aliases or help text.
    ///
    /// # Examples
    ///
    /// ```
    /// use cmdplan_dispatch::{Command, Modifier};
    ///
    /// let git = Command::group("git", "Git helpers").build().unwrap();
    /// let promoted = git.with([Modifier::LogicalGroup, Modifier::Aliases("vcs".into())]).unwrap();
    ///
    /// assert!(!git.is_logical_group());
    /// assert!(promoted.is_logical_group());
    /// assert_eq!(promoted.name(), "vcs");
    /// ```
    pub fn with<I>(&self, modifiers: I) -> Result<Command, SchemaError>
    where
        I: IntoIterator<Item = Modifier>,
    {
        let mut node = (*self.0).clone();
        for modifier in modifiers {
            match modifier {
                Modifier::LogicalGroup => node.logical_group = true,
                Modifier::Aliases(aliases) => node.aliases = command_aliases(&aliases)?,
                Modifier::Help(help) => {
                    let (help, placeholder) = command_help(&help)?;
                    node.help = help;
                    node.placeholder = placeholder;
                }
            }
        }
        Ok(Command(Arc::new(node)))
    }

    pub(crate) fn bind(
        &self,
        env: &dyn Environment,
        tokens: Vec<String>,
    ) -> Result<(Box<dyn BoundOptions>, Vec<String>), ValueError> {
        self.0.binder.bind(env, tokens)
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("aliases", &self.0.aliases)
            .field("logical_group", &self.0.logical_group)
            .field("subcommands", &self.0.subcommands)
            .finish_non_exhaustive()
    }
}

/// Adjustment applied to an existing command by [`Command::with`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modifier {
    /// Mark the command as a logical group.
    LogicalGroup,
    /// Replace the aliases (`|`-separated; empty derives the program name).
    Aliases(String),
    /// Replace the help text.
    Help(String),
}

/// Builder for a [`Command`] with options record `T`.
#[must_use]
pub struct CommandBuilder<T: Options> {
    aliases: String,
    help: String,
    prototype: T,
    run: Option<Handler<T>>,
    teardown: Option<Handler<T>>,
    logical_group: bool,
    subcommands: CommandGroup,
}

impl<T: Options> CommandBuilder<T> {
    /// Sets the run handler, called in root-to-leaf order with a fresh copy
    /// of the options record.
    pub fn run<F>(mut self, handler: F) -> Self
    where
        F: Fn(&Context<'_>, &mut T, &[String]) -> HandlerResult + Send + Sync + 'static,
    {
        self.run = Some(Arc::new(handler));
        self
    }

    /// Sets the teardown handler, called in leaf-to-root order once every
    /// run handler of the plan has succeeded.
    pub fn teardown<F>(mut self, handler: F) -> Self
    where
        F: Fn(&Context<'_>, &mut T, &[String]) -> HandlerResult + Send + Sync + 'static,
    {
        self.teardown = Some(Arc::new(handler));
        self
    }

    /// Marks the command as a logical group.
    pub fn logical_group(mut self) -> Self {
        self.logical_group = true;
        self
    }

    /// Appends a subcommand.
    pub fn subcommand(mut self, command: Command) -> Self {
        self.subcommands.push(command);
        self
    }

    /// Appends several subcommands, keeping their order.
    pub fn subcommands<I>(mut self, commands: I) -> Self
    where
        I: IntoIterator<Item = Command>,
    {
        for command in commands {
            self.subcommands.push(command);
        }
        self
    }

    /// Validates the declaration and builds the command.
    ///
    /// # Errors
    ///
    /// Returns a [`SchemaError`] for invalid aliases, help text with
    /// conflicting placeholders, or a malformed options record.
    pub fn build(self) -> Result<Command, SchemaError> {
        let aliases = command_aliases(&self.aliases)?;
        let (help, placeholder) = command_help(&self.help)?;
        let schema = OptionSchema::extract(&self.prototype)?;

        let binder = TypedBinder {
            prototype: self.prototype,
            schema: Arc::new(schema),
            run: self.run,
            teardown: self.teardown,
        };
        Ok(Command(Arc::new(Node {
            aliases,
            help,
            placeholder,
            subcommands: self.subcommands,
            logical_group: self.logical_group,
            binder: Arc::new(binder),
        })))
    }
}

fn command_aliases(aliases: &str) -> Result<Vec<String>, SchemaError> {
    if aliases.is_empty() {
        return Ok(vec![program_name()]);
    }
    parse_command_aliases(aliases)
}

fn command_help(help: &str) -> Result<(String, Option<String>), SchemaError> {
    let (help, placeholder) = extract_placeholder(help)?;
    if help.trim().is_empty() {
        return Err(SchemaError::MissingHelp("command".to_string()));
    }
    Ok((help, placeholder))
}

/// Command name derived from the running program's path.
pub fn program_name() -> String {
    let arg0 = std::env::args_os().next().unwrap_or_default();
    name_from_path(&arg0.to_string_lossy())
}

/// Derives a command name from a program path: basename, extension
/// stripped, lowercased, `_` replaced by `-`, surrounding dashes trimmed.
pub(crate) fn name_from_path(path: &str) -> String {
    let stem = Path::new(path)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name: String = stem
        .to_lowercase()
        .chars()
        .map(|c| if c == '_' { '-' } else { c })
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-')
        .collect();
    let name = name.trim_matches('-');
    if name.is_empty() {
        "app".to_string()
    } else {
        name.to_string()
    }
}

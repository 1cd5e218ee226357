//! The top-level entry point tying a command tree to its configuration.

use std::any::Any;

use cmdplan_core::{Environment, ProcessEnv, SEPARATOR};
use tracing::debug;

use crate::command::Command;
use crate::config::AppConfig;
use crate::error::Result;
use crate::help::HelpPage;
use crate::plan::{Plan, PlanBuilder};

/// What an argument vector asks for.
#[derive(Debug)]
pub enum Invocation {
    /// Help was requested; the plan covers the command path typed so far.
    Help(Plan),
    /// A validated plan, ready to run.
    Run(Plan),
}

/// Result of [`Application::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Every handler ran and succeeded.
    Completed,
    /// Help was requested; holds the rendered page.
    Help(String),
}

/// A command tree with its configuration and environment.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
///
/// use cmdplan_dispatch::{Application, Command, Outcome};
///
/// let build = Command::group("build", "Build the project").build().unwrap();
/// let root = Command::group("app", "Demo").subcommand(build).build().unwrap();
/// let app = Application::new(root).with_environment(HashMap::<String, String>::new());
///
/// let args = ["build", "--help"].map(String::from);
/// match app.run(&args).unwrap() {
///     Outcome::Help(page) => assert!(page.contains("app build")),
///     Outcome::Completed => unreachable!(),
/// }
/// ```
pub struct Application {
    root: Command,
    config: AppConfig,
    env: Box<dyn Environment + Send + Sync>,
}

impl Application {
    /// An application with default configuration, reading the process
    /// environment.
    pub fn new(root: Command) -> Self {
        Self {
            root,
            config: AppConfig::default(),
            env: Box::new(ProcessEnv),
        }
    }

    /// Replaces the configuration.
    #[must_use]
    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = config;
        self
    }

    /// Replaces the environment used for `$NAME` aliases.
    #[must_use]
    pub fn with_environment<E>(mut self, env: E) -> Self
    where
        E: Environment + Send + Sync + 'static,
    {
        self.env = Box::new(env);
        self
    }

    /// The root command.
    pub fn root(&self) -> &Command {
        &self.root
    }

    /// The configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    fn planner(&self) -> PlanBuilder<'_> {
        PlanBuilder::new(&self.root)
            .environment(self.env.as_ref())
            .suggestion_threshold(self.config.suggestion_threshold)
    }

    /// Builds the plan for `args`, or the help plan when a help trigger
    /// appears before `--`.
    pub fn prepare(&self, args: &[String]) -> Result<Invocation> {
        let (args, help) = strip_help_triggers(args, &self.config);
        if help {
            debug!("help requested");
            return Ok(Invocation::Help(self.planner().resolve(&args)?));
        }
        Ok(Invocation::Run(self.planner().build(&args)?))
    }

    /// Renders help for `plan` as configured.
    pub fn render_help(&self, plan: &Plan) -> Result<String> {
        HelpPage::from_plan(plan, self.config.program_name.as_deref())
            .render(self.config.help_format)
    }

    /// Prepares and runs `args` with no caller state.
    pub fn run(&self, args: &[String]) -> Result<Outcome> {
        self.run_with(args, &())
    }

    /// Prepares `args`, then either renders help or runs the plan with
    /// `state` available to every handler.
    pub fn run_with(&self, args: &[String], state: &(dyn Any + Send + Sync)) -> Result<Outcome> {
        match self.prepare(args)? {
            Invocation::Help(plan) => Ok(Outcome::Help(self.render_help(&plan)?)),
            Invocation::Run(plan) => {
                plan.run_with(state)?;
                Ok(Outcome::Completed)
            }
        }
    }
}

/// Removes help triggers that appear before `--`. Returns the remaining
/// arguments and whether any trigger was found.
fn strip_help_triggers(args: &[String], config: &AppConfig) -> (Vec<String>, bool) {
    let mut kept = Vec::with_capacity(args.len());
    let mut found = false;
    let mut verbatim = false;
    for arg in args {
        if !verbatim && arg == SEPARATOR {
            verbatim = true;
        } else if !verbatim && config.is_help_trigger(arg) {
            found = true;
            continue;
        }
        kept.push(arg.clone());
    }
    (kept, found)
}

//! Plan construction and execution.
//!
//! A [`Plan`] is built in one pass over the normalized argument vector:
//! the root is bound first, then each positional name selects the next
//! subcommand, which binds its own flags from what is left. Everything
//! that can go wrong with the command line (an unknown command, a bad
//! value, a flag no step declares) is reported here, before any handler
//! runs.
//!
//! ```
//! use std::collections::HashMap;
//! use std::sync::{Arc, Mutex};
//!
//! use cmdplan_dispatch::{Command, PlanBuilder};
//!
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let log = Arc::clone(&seen);
//! let build = Command::group("build", "Build the project")
//!     .run(move |_ctx, _options, args| {
//!         log.lock().unwrap().extend(args.iter().cloned());
//!         Ok(())
//!     })
//!     .build()
//!     .unwrap();
//! let root = Command::group("app", "Demo").subcommand(build).build().unwrap();
//!
//! let env = HashMap::<String, String>::new();
//! let args = ["build", "release"].map(String::from);
//! let plan = PlanBuilder::new(&root).environment(&env).build(&args).unwrap();
//! assert_eq!(plan.steps().len(), 2);
//!
//! plan.run().unwrap();
//! assert_eq!(*seen.lock().unwrap(), ["release"]);
//! ```

use std::any::Any;

use cmdplan_core::{
    DEFAULT_SUGGESTION_THRESHOLD, Environment, ProcessEnv, SEPARATOR, normalize,
    split_at_separator, suggest_flag,
};
use tracing::{debug, trace};

use crate::command::Command;
use crate::context::Context;
use crate::error::{Error, Result};
use crate::step::Step;

/// Builds [`Plan`]s from a command tree.
pub struct PlanBuilder<'a> {
    root: &'a Command,
    env: &'a dyn Environment,
    threshold: usize,
}

impl<'a> PlanBuilder<'a> {
    /// A builder reading the process environment.
    pub fn new(root: &'a Command) -> Self {
        Self {
            root,
            env: &ProcessEnv,
            threshold: DEFAULT_SUGGESTION_THRESHOLD,
        }
    }

    /// Reads environment aliases from `env` instead of the process.
    pub fn environment(mut self, env: &'a dyn Environment) -> Self {
        self.env = env;
        self
    }

    /// Maximum edit distance for flags listed as alternatives.
    pub fn suggestion_threshold(mut self, threshold: usize) -> Self {
        self.threshold = threshold;
        self
    }

    /// Resolves the command path and binds every step, without rejecting
    /// unconsumed flags. Used to render help for partial command lines.
    ///
    /// # Errors
    ///
    /// [`Error::Resolution`] for an unknown subcommand and [`Error::Value`]
    /// for a flag or environment value that does not bind.
    pub fn resolve(&self, args: &[String]) -> Result<Plan> {
        let mut tokens = normalize(args);
        trace!(?tokens, "normalized arguments");

        let mut steps = Vec::new();
        let mut current = self.root;
        loop {
            let (step, rest) = Step::bind(current, self.env, tokens)?;
            steps.push(step);
            tokens = rest;

            if current.subcommands().is_empty() {
                break;
            }
            let Some(name) = take_positional(&mut tokens) else {
                break;
            };
            let prefix: Vec<String> = steps
                .iter()
                .map(|step| step.command().name().to_string())
                .collect();
            current = current.subcommands().resolve(&name, &prefix)?;
            debug!(name = name.as_str(), command = current.name(), "resolved subcommand");
        }

        Ok(Plan {
            steps,
            leftover: tokens,
        })
    }

    /// Resolves and binds like [`resolve`](Self::resolve), then rejects any
    /// flag-shaped token before `--` that no step consumed.
    ///
    /// # Errors
    ///
    /// Everything [`resolve`](Self::resolve) reports, plus [`Error::Flag`]
    /// with the nearest known flag and close alternatives.
    pub fn build(&self, args: &[String]) -> Result<Plan> {
        let plan = self.resolve(args)?;
        plan.check_unconsumed_flags(self.threshold)?;
        Ok(plan)
    }
}

/// Removes and returns the first token that does not look like a flag,
/// looking only before `--`.
fn take_positional(tokens: &mut Vec<String>) -> Option<String> {
    let index = tokens
        .iter()
        .take_while(|token| *token != SEPARATOR)
        .position(|token| !token.starts_with('-'))?;
    Some(tokens.remove(index))
}

/// A resolved, validated sequence of steps, root first.
///
/// Running a plan consumes it.
#[derive(Debug)]
pub struct Plan {
    steps: Vec<Step>,
    leftover: Vec<String>,
}

impl Plan {
    /// Builds a plan for `args` with default settings.
    pub fn build(root: &Command, args: &[String], env: &dyn Environment) -> Result<Plan> {
        PlanBuilder::new(root).environment(env).build(args)
    }

    /// Steps, root first.
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// The deepest resolved step.
    pub fn last(&self) -> &Step {
        // Resolution always binds at least the root.
        &self.steps[self.steps.len() - 1]
    }

    /// Arguments passed to the last step's handlers.
    pub fn leftover(&self) -> &[String] {
        &self.leftover
    }

    fn check_unconsumed_flags(&self, threshold: usize) -> Result<()> {
        let (flags, _) = split_at_separator(&self.leftover);
        let Some(flag) = flags.iter().find(|token| token.starts_with('-') && *token != "-") else {
            return Ok(());
        };

        let known: Vec<String> = self
            .steps
            .iter()
            .flat_map(|step| step.command().descriptors())
            .flat_map(|descriptor| descriptor.flag_aliases())
            .map(ToString::to_string)
            .collect();
        let suggestion = suggest_flag(flag, &known, threshold);
        debug!(flag = flag.as_str(), ?suggestion, "unconsumed flag");
        Err(Error::Flag {
            flag: flag.clone(),
            nearest: suggestion.nearest,
            alternatives: suggestion.alternatives,
        })
    }

    /// Runs the plan with no caller state.
    ///
    /// See [`run_with`](Self::run_with).
    pub fn run(self) -> Result<()> {
        self.run_with(&())
    }

    /// Runs every step's handler from root to leaf, then every teardown
    /// handler from leaf to root.
    ///
    /// Only the last step receives the leftover arguments. The first
    /// failing handler aborts the run and its error is returned as
    /// [`Error::Handler`]; teardown handlers run only when every run
    /// handler succeeded.
    pub fn run_with(mut self, state: &(dyn Any + Send + Sync)) -> Result<()> {
        let count = self.steps.len();

        for index in 0..count {
            let args: &[String] = if index + 1 == count { &self.leftover } else { &[] };
            let (ancestors, rest) = self.steps.split_at_mut(index);
            let step = &mut rest[0];
            debug!(command = step.command().name(), depth = index, "running step");
            let current = step.snapshot();
            let ctx = Context::new(ancestors, current.as_ref(), index, count, state);
            step.run(&ctx, args).map_err(Error::Handler)?;
        }

        for index in (0..count).rev() {
            let args: &[String] = if index + 1 == count { &self.leftover } else { &[] };
            let (ancestors, rest) = self.steps.split_at_mut(index);
            let step = &mut rest[0];
            trace!(command = step.command().name(), depth = index, "tearing down step");
            let current = step.snapshot();
            let ctx = Context::new(ancestors, current.as_ref(), index, count, state);
            step.teardown(&ctx, args).map_err(Error::Handler)?;
        }

        Ok(())
    }
}

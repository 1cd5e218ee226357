//! One command's binding within a plan.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use cmdplan_core::{Environment, OptionSchema, Options};
use tracing::debug;

use crate::command::Command;
use crate::context::Context;
use crate::error::{Error, HandlerResult};

pub(crate) type Handler<T> =
    Arc<dyn Fn(&Context<'_>, &mut T, &[String]) -> HandlerResult + Send + Sync>;

/// Read-only access to a bound options record.
pub(crate) trait OptionsView {
    fn as_any(&self) -> &dyn Any;

    fn value_of(&self, alias: &str) -> Option<String>;
}

/// A bound options record together with the handlers that receive it.
pub(crate) trait BoundOptions: OptionsView + Send {
    /// Copy of the record as it is now, readable while the handler holds
    /// the record itself.
    fn snapshot(&self) -> Box<dyn OptionsView>;

    fn run(&mut self, ctx: &Context<'_>, args: &[String]) -> HandlerResult;

    fn teardown(&mut self, ctx: &Context<'_>, args: &[String]) -> HandlerResult;
}

pub(crate) struct Bound<T> {
    pub(crate) options: T,
    pub(crate) schema: Arc<OptionSchema<T>>,
    pub(crate) run: Option<Handler<T>>,
    pub(crate) teardown: Option<Handler<T>>,
}

struct Snapshot<T> {
    options: T,
    schema: Arc<OptionSchema<T>>,
}

impl<T: Options> OptionsView for Snapshot<T> {
    fn as_any(&self) -> &dyn Any {
        &self.options
    }

    fn value_of(&self, alias: &str) -> Option<String> {
        self.schema.value_of(&self.options, alias)
    }
}

impl<T: Options> OptionsView for Bound<T> {
    fn as_any(&self) -> &dyn Any {
        &self.options
    }

    fn value_of(&self, alias: &str) -> Option<String> {
        self.schema.value_of(&self.options, alias)
    }
}

impl<T: Options> BoundOptions for Bound<T> {
    fn snapshot(&self) -> Box<dyn OptionsView> {
        Box::new(Snapshot {
            options: self.options.clone(),
            schema: Arc::clone(&self.schema),
        })
    }

    fn run(&mut self, ctx: &Context<'_>, args: &[String]) -> HandlerResult {
        match &self.run {
            Some(handler) => handler(ctx, &mut self.options, args),
            None => Ok(()),
        }
    }

    fn teardown(&mut self, ctx: &Context<'_>, args: &[String]) -> HandlerResult {
        match &self.teardown {
            Some(handler) => handler(ctx, &mut self.options, args),
            None => Ok(()),
        }
    }
}

/// A command bound to its own copy of the options record.
///
/// Binding copies the command's prototype, applies environment aliases and
/// then consumes the flags the command declares. The prototype is never
/// modified, so the same tree can produce any number of independent plans.
pub struct Step {
    command: Command,
    bound: Box<dyn BoundOptions>,
    remaining: Vec<String>,
}

impl Step {
    /// Binds `command` against `env` and `tokens`.
    ///
    /// Returns the step and the tokens it did not consume.
    pub(crate) fn bind(
        command: &Command,
        env: &dyn Environment,
        tokens: Vec<String>,
    ) -> Result<(Step, Vec<String>), Error> {
        let (bound, rest) = command.bind(env, tokens)?;
        debug!(command = command.name(), remaining = rest.len(), "bound step");
        let step = Step {
            command: command.clone(),
            bound,
            remaining: rest.clone(),
        };
        Ok((step, rest))
    }

    /// The command this step binds.
    pub fn command(&self) -> &Command {
        &self.command
    }

    /// Tokens left over after this step consumed its flags.
    pub fn remaining(&self) -> &[String] {
        &self.remaining
    }

    /// The bound options record, if it has type `T`.
    pub fn options<T: Options>(&self) -> Option<&T> {
        self.bound.as_any().downcast_ref::<T>()
    }

    /// Current value of the option spelled `alias` (`--name`, `-n` or
    /// `$NAME`), as text.
    pub fn value_of(&self, alias: &str) -> Option<String> {
        self.bound.value_of(alias)
    }

    pub(crate) fn snapshot(&self) -> Box<dyn OptionsView> {
        self.bound.snapshot()
    }

    pub(crate) fn run(&mut self, ctx: &Context<'_>, args: &[String]) -> HandlerResult {
        self.bound.run(ctx, args)
    }

    pub(crate) fn teardown(&mut self, ctx: &Context<'_>, args: &[String]) -> HandlerResult {
        self.bound.teardown(ctx, args)
    }
}

impl fmt::Debug for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Step")
            .field("command", &self.command.name())
            .field("remaining", &self.remaining)
            .finish_non_exhaustive()
    }
}

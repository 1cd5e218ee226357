//! What a handler can see of the plan it runs in.

use std::any::Any;

use cmdplan_core::Options;

use crate::step::{OptionsView, Step};

/// Execution context handed to every run and teardown handler.
///
/// The executing step's own options arrive as the handler's `&mut T`
/// argument. The context reads options from the executing step and the
/// steps above it, and also exposes the handler's position in the plan and
/// the caller's opaque state.
///
/// The executing step is seen as it was when the handler was called;
/// changes made through `&mut T` do not show up here.
pub struct Context<'a> {
    ancestors: &'a [Step],
    current: &'a dyn OptionsView,
    depth: usize,
    len: usize,
    state: &'a (dyn Any + Send + Sync),
}

impl<'a> Context<'a> {
    pub(crate) fn new(
        ancestors: &'a [Step],
        current: &'a dyn OptionsView,
        depth: usize,
        len: usize,
        state: &'a (dyn Any + Send + Sync),
    ) -> Self {
        Self {
            ancestors,
            current,
            depth,
            len,
            state,
        }
    }

    /// Position of the executing step; the root is 0.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Returns `true` if the executing step is the last one of the plan.
    pub fn is_last(&self) -> bool {
        self.depth + 1 == self.len
    }

    /// Steps above the executing one, root first.
    pub fn ancestors(&self) -> &'a [Step] {
        self.ancestors
    }

    /// Names of the commands above the executing one, root first.
    pub fn path(&self) -> Vec<&'a str> {
        self.ancestors
            .iter()
            .map(|step| step.command().name())
            .collect()
    }

    /// Options record of type `T` nearest to the executing step, starting
    /// with the executing step itself.
    pub fn find_options<T: Options>(&self) -> Option<&'a T> {
        self.current.as_any().downcast_ref::<T>().or_else(|| {
            self.ancestors
                .iter()
                .rev()
                .find_map(|step| step.options::<T>())
        })
    }

    /// Value of the option spelled `alias`, as text, from the executing
    /// step or else the nearest ancestor that declares it.
    pub fn option_value(&self, alias: &str) -> Option<String> {
        self.current.value_of(alias).or_else(|| {
            self.ancestors
                .iter()
                .rev()
                .find_map(|step| step.value_of(alias))
        })
    }

    /// The caller state passed to [`Plan::run_with`](crate::Plan::run_with),
    /// if it has type `S`.
    pub fn state<S: Any>(&self) -> Option<&'a S> {
        self.state.downcast_ref::<S>()
    }
}

//! Ordered collections of subcommands and name resolution.

use cmdplan_core::closest;
use tracing::trace;

use crate::command::Command;
use crate::error::Error;

/// Closest command path found by [`CommandGroup::find_best_match`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathMatch {
    /// Path from the root, ending with the matched alias.
    pub path: Vec<String>,
    /// Edit distance between the requested name and the matched alias.
    pub distance: usize,
}

/// The subcommands of a command, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct CommandGroup {
    commands: Vec<Command>,
}

impl CommandGroup {
    /// Creates an empty group.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, command: Command) {
        self.commands.push(command);
    }

    /// Number of direct subcommands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Returns `true` if there are no subcommands.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Iterates direct subcommands in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Command> {
        self.commands.iter()
    }

    /// Resolves `name` among the subcommands.
    ///
    /// Subcommands are tried in insertion order. For a logical group the
    /// group's own subtree is searched before its own aliases are
    /// compared, so a promoted child shadows a sibling registered later.
    pub fn find_exact(&self, name: &str) -> Option<&Command> {
        for command in &self.commands {
            if command.is_logical_group() {
                if let Some(found) = command.subcommands().find_exact(name) {
                    return Some(found);
                }
            }
            if command.answers_to(name) {
                return Some(command);
            }
        }
        None
    }

    /// Finds the command alias closest to `name` anywhere below this
    /// group, logical groups included.
    ///
    /// The returned path starts with `prefix`. Ties go to the command
    /// registered first, in a depth-first walk.
    pub fn find_best_match(&self, name: &str, prefix: &[String]) -> Option<PathMatch> {
        let mut candidates = Vec::new();
        self.collect_paths(prefix.to_vec(), &mut candidates);
        closest(name, candidates, |path| path.last().map_or("", String::as_str)).map(|found| {
            PathMatch {
                path: found.candidate,
                distance: found.distance,
            }
        })
    }

    fn collect_paths(&self, prefix: Vec<String>, out: &mut Vec<Vec<String>>) {
        for command in &self.commands {
            for alias in command.aliases() {
                let mut path = prefix.clone();
                path.push(alias.clone());
                out.push(path);
            }
            let mut below = prefix.clone();
            below.push(command.name().to_string());
            command.subcommands().collect_paths(below, out);
        }
    }

    /// Resolves `name` exactly, or fails with the closest known path.
    pub fn resolve(&self, name: &str, prefix: &[String]) -> Result<&Command, Error> {
        if let Some(command) = self.find_exact(name) {
            return Ok(command);
        }
        let suggestion = self.find_best_match(name, prefix);
        trace!(name, ?suggestion, "command not found");
        Err(Error::Resolution {
            name: name.to_string(),
            suggestion: suggestion.map(|found| found.path.join(" ")),
        })
    }
}

impl<'a> IntoIterator for &'a CommandGroup {
    type Item = &'a Command;
    type IntoIter = std::slice::Iter<'a, Command>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

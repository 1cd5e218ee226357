//! The `cicd` command tree.

use cmdplan_core::{Fields, Options, SchemaError};
use cmdplan_dispatch::{BuildInfo, Command, Context, HandlerResult, LogOptions, version_command};
use tracing::{debug, info};

use crate::bump::{Part, next_tag};

/// Options bound at the root, before any subcommand runs.
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    pub log: LogOptions,
}

impl Options for GlobalOptions {
    fn declare(fields: &mut Fields<Self>) {
        fields.embed(|o| &mut o.log);
    }
}

#[derive(Debug, Clone)]
pub struct TagBumpOptions {
    pub prefix: String,
    pub suffix: String,
    pub part: String,
}

impl Default for TagBumpOptions {
    fn default() -> Self {
        Self {
            prefix: "v".to_string(),
            suffix: String::new(),
            part: "patch".to_string(),
        }
    }
}

impl Options for TagBumpOptions {
    fn declare(fields: &mut Fields<Self>) {
        fields
            .string("--prefix,Tag prefix, stripped before parsing", |o| &mut o.prefix)
            .string("--suffix,Suffix appended to the new tag", |o| &mut o.suffix)
            .string(
                "--part|-p|$CICD_BUMP_PART,Version part to bump (major|minor|patch) <part>",
                |o| &mut o.part,
            );
    }
}

fn build_info() -> BuildInfo {
    BuildInfo {
        version: env!("CARGO_PKG_VERSION").to_string(),
        date: option_env!("CICD_BUILD_DATE").unwrap_or("unknown").to_string(),
        by: option_env!("CICD_BUILD_BY").unwrap_or("unknown").to_string(),
    }
}

/// Builds the full tree, rooted at a command named after the binary.
pub fn root() -> Result<Command, SchemaError> {
    let bump = Command::new(
        "tag-bump|bump",
        "Print the tag that follows <tag>",
        TagBumpOptions::default(),
    )
    .run(tag_bump)
    .build()?;

    let git = Command::group("git", "Git helpers")
        .logical_group()
        .subcommand(bump)
        .build()?;

    Command::new("", "A utility for CI/CD operations", GlobalOptions::default())
        .run(setup_logging)
        .teardown(|_ctx, _options, _args| {
            debug!("done");
            Ok(())
        })
        .subcommand(version_command(build_info())?)
        .subcommand(git)
        .build()
}

fn setup_logging(_ctx: &Context<'_>, options: &mut GlobalOptions, _args: &[String]) -> HandlerResult {
    let filter = options.log.filter()?;
    tracing_subscriber::fmt()
        .with_max_level(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .try_init()?;
    debug!(level = %filter, "logging initialized");
    Ok(())
}

fn tag_bump(ctx: &Context<'_>, options: &mut TagBumpOptions, args: &[String]) -> HandlerResult {
    let [current] = args else {
        return Err(format!("expected exactly one <tag>, got {}", args.len()).into());
    };
    let part: Part = options.part.parse()?;
    let next = next_tag(current, &options.prefix, &options.suffix, part)?;
    info!(
        path = %ctx.path().join(" "),
        current = current.as_str(),
        next = next.as_str(),
        "bumped tag"
    );
    println!("{next}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use cmdplan_dispatch::PlanBuilder;

    use super::*;

    fn strings(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_tree_shape() {
        let root = root().unwrap();
        let names: Vec<&str> = root.subcommands().iter().map(Command::name).collect();
        assert_eq!(names, ["version", "git"]);
        assert!(root.subcommands().find_exact("bump").is_some());
    }

    #[test]
    fn test_tag_bump_binds_env_part() {
        let root = root().unwrap();
        let env: HashMap<String, String> =
            [("CICD_BUMP_PART".to_string(), "minor".to_string())].into_iter().collect();
        let plan = PlanBuilder::new(&root)
            .environment(&env)
            .build(&strings(&["tag-bump", "--suffix=-rc", "v1.0.0"]))
            .unwrap();

        let options = plan.last().options::<TagBumpOptions>().unwrap();
        assert_eq!(options.part, "minor");
        assert_eq!(options.suffix, "-rc");
        assert_eq!(options.prefix, "v");
        assert_eq!(plan.leftover(), strings(&["v1.0.0"]));
    }

    #[test]
    fn test_log_options_are_global() {
        let root = root().unwrap();
        let env = HashMap::<String, String>::new();
        let plan = PlanBuilder::new(&root)
            .environment(&env)
            .build(&strings(&["git", "bump", "--verbose", "v1"]))
            .unwrap();
        assert!(plan.steps()[0].options::<GlobalOptions>().unwrap().log.verbose);
    }
}

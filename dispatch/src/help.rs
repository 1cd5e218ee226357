//! Help rendering for a resolved plan.

use cmdplan_core::{Alias, OptionDescriptor};
use serde::{Deserialize, Serialize};

use crate::command::Command;
use crate::error::Result;
use crate::plan::Plan;

/// Supported help output formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HelpFormat {
    /// Aligned plain text.
    #[default]
    Table,
    /// Pretty-printed JSON of the [`HelpPage`].
    Json,
    /// YAML of the [`HelpPage`].
    Yaml,
}

/// Name and help text of one command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandSummary {
    /// Canonical name, or the program name for the root.
    pub name: String,
    /// Aliases other than the name.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    /// One-line description of the command.
    pub help: String,
}

impl CommandSummary {
    fn of(command: &Command, name: &str) -> Self {
        Self {
            name: name.to_string(),
            aliases: command.aliases()[1..].to_vec(),
            help: command.help().to_string(),
        }
    }
}

/// The options one step contributes to the command line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlagSection {
    /// `Global Flags` for the root, `Flags for <name>` otherwise.
    pub title: String,
    /// The step's descriptors, in declaration order.
    pub flags: Vec<OptionDescriptor>,
}

/// Everything help shows for one command line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HelpPage {
    /// `<path...> [subcommand] <flags...> <args...>`.
    pub usage: String,
    /// Commands of the plan, root first.
    pub hierarchy: Vec<CommandSummary>,
    /// Subcommands of the deepest command, in insertion order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub subcommands: Vec<CommandSummary>,
    /// One section per step that declares options.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub flags: Vec<FlagSection>,
}

impl HelpPage {
    /// Describes `plan`. `program_name` replaces the root command's name
    /// when given.
    pub fn from_plan(plan: &Plan, program_name: Option<&str>) -> Self {
        let steps = plan.steps();
        let names: Vec<&str> = steps
            .iter()
            .enumerate()
            .map(|(index, step)| match program_name {
                Some(name) if index == 0 => name,
                _ => step.command().name(),
            })
            .collect();

        let deepest = plan.last().command();
        let mut usage = names.join(" ");
        if !deepest.subcommands().is_empty() {
            usage.push_str(" [subcommand]");
        }
        usage.push_str(" <flags...> ");
        usage.push_str(deepest.placeholder().unwrap_or("<args...>"));

        let hierarchy = steps
            .iter()
            .zip(&names)
            .map(|(step, name)| CommandSummary::of(step.command(), name))
            .collect();

        let subcommands = deepest
            .subcommands()
            .iter()
            .map(|command| CommandSummary::of(command, command.name()))
            .collect();

        let flags = steps
            .iter()
            .zip(&names)
            .enumerate()
            .filter(|(_, (step, _))| !step.command().descriptors().is_empty())
            .map(|(index, (step, name))| FlagSection {
                title: if index == 0 {
                    "Global Flags".to_string()
                } else {
                    format!("Flags for {name}")
                },
                flags: step.command().descriptors().to_vec(),
            })
            .collect();

        Self {
            usage,
            hierarchy,
            subcommands,
            flags,
        }
    }

    /// Renders the page in `format`.
    pub fn render(&self, format: HelpFormat) -> Result<String> {
        match format {
            HelpFormat::Table => Ok(self.to_table()),
            HelpFormat::Json => Ok(serde_json::to_string_pretty(self)?),
            HelpFormat::Yaml => Ok(serde_yaml::to_string(self)?),
        }
    }

    /// Plain-text rendering with aligned columns per section.
    pub fn to_table(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("Usage:\n  {}\n", self.usage));

        push_rows(&mut out, "Command Hierarchy", &summary_rows(&self.hierarchy));
        if !self.subcommands.is_empty() {
            push_rows(&mut out, "Available Subcommands", &summary_rows(&self.subcommands));
        }
        for section in &self.flags {
            let rows: Vec<(String, String)> = section
                .flags
                .iter()
                .map(|flag| (flag_label(flag), flag_help(flag)))
                .collect();
            push_rows(&mut out, &section.title, &rows);
        }
        out
    }
}

fn summary_rows(summaries: &[CommandSummary]) -> Vec<(String, String)> {
    summaries
        .iter()
        .map(|summary| {
            let mut name = summary.name.clone();
            for alias in &summary.aliases {
                name.push_str(&format!(", {alias}"));
            }
            (name, summary.help.clone())
        })
        .collect()
}

fn push_rows(out: &mut String, title: &str, rows: &[(String, String)]) {
    let width = rows.iter().map(|(name, _)| name.len()).max().unwrap_or(4);
    out.push_str(&format!("\n{title}:\n"));
    for (name, help) in rows {
        out.push_str(&format!("  {name:<width$}  {help}\n"));
    }
}

/// `--remote, -r <name>`; an option spelled only through the environment
/// shows its `$NAME`.
fn flag_label(flag: &OptionDescriptor) -> String {
    let spellings: Vec<String> = flag.flag_aliases().map(Alias::to_string).collect();
    let mut label = if spellings.is_empty() {
        flag.canonical_name()
    } else {
        spellings.join(", ")
    };
    if let Some(placeholder) = &flag.placeholder {
        label.push(' ');
        label.push_str(placeholder);
    }
    label
}

fn flag_help(flag: &OptionDescriptor) -> String {
    let mut help = flag.help.clone();
    if let Some(default) = &flag.default {
        help.push_str(&format!(" (default: {default})"));
    }
    let env: Vec<&str> = flag.env_names().collect();
    if !env.is_empty() && flag.flag_aliases().next().is_some() {
        help.push_str(&format!(" [env: {}]", env.join(", ")));
    }
    help
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use cmdplan_core::{Fields, Options, ValueKind};

    use super::*;
    use crate::plan::PlanBuilder;

    #[derive(Debug, Clone, Default)]
    struct GlobalOptions {
        level: String,
    }

    impl Options for GlobalOptions {
        fn declare(fields: &mut Fields<Self>) {
            fields.string("--loglevel|$CICD_LOGLEVEL,Log level <level>", |o| &mut o.level);
        }
    }

    #[derive(Debug, Clone, Default)]
    struct BumpOptions {
        remote: String,
        dry_run: bool,
    }

    impl Options for BumpOptions {
        fn declare(fields: &mut Fields<Self>) {
            fields
                .string("--remote|-r,Remote to push to", |o| &mut o.remote)
                .boolean("--dry-run,Only print the new tag", |o| &mut o.dry_run);
        }
    }

    fn tree() -> Command {
        let bump = Command::new(
            "tag-bump|bump",
            "Bump the latest tag <part>",
            BumpOptions {
                remote: "origin".into(),
                dry_run: false,
            },
        )
        .build()
        .unwrap();
        let git = Command::group("git", "Git helpers").subcommand(bump).build().unwrap();
        let version = Command::group("version", "Print the version").build().unwrap();
        Command::new(
            "cicd",
            "CI/CD utilities",
            GlobalOptions {
                level: "info".into(),
            },
        )
        .subcommand(version)
        .subcommand(git)
        .build()
        .unwrap()
    }

    fn page(args: &[&str], program_name: Option<&str>) -> HelpPage {
        let root = tree();
        let env = HashMap::<String, String>::new();
        let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
        let plan = PlanBuilder::new(&root).environment(&env).resolve(&args).unwrap();
        HelpPage::from_plan(&plan, program_name)
    }

    #[test]
    fn test_root_page() {
        let page = page(&[], None);
        assert_eq!(page.usage, "cicd [subcommand] <flags...> <args...>");
        let names: Vec<&str> = page.subcommands.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["version", "git"]);
        assert_eq!(page.flags.len(), 1);
        assert_eq!(page.flags[0].title, "Global Flags");
    }

    #[test]
    fn test_leaf_page() {
        let page = page(&["git", "bump"], Some("ci"));
        assert_eq!(page.usage, "ci git tag-bump <flags...> <part>");
        assert_eq!(page.hierarchy.len(), 3);
        assert_eq!(page.hierarchy[2].aliases, ["bump"]);
        assert!(page.subcommands.is_empty());

        let titles: Vec<&str> = page.flags.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, ["Global Flags", "Flags for tag-bump"]);
        assert_eq!(page.flags[1].flags[1].kind, ValueKind::Boolean);
    }

    #[test]
    fn test_table_layout() {
        let table = page(&["git", "tag-bump"], None).to_table();
        assert!(table.starts_with("Usage:\n  cicd git tag-bump <flags...> <part>\n"));
        assert!(table.contains("\nCommand Hierarchy:\n  cicd            CI/CD utilities\n"));
        assert!(table.contains("  tag-bump, bump  Bump the latest tag <part>\n"));
        assert!(table.contains(
            "\nGlobal Flags:\n  --loglevel <level>  Log level <level> (default: info) [env: CICD_LOGLEVEL]\n"
        ));
        assert!(table.contains("  --remote, -r <string>  Remote to push to (default: origin)\n"));
        assert!(table.contains("  --dry-run              Only print the new tag\n"));
        assert!(!table.contains("Available Subcommands"));
    }

    #[test]
    fn test_json_and_yaml_rendering() {
        let page = page(&["git"], None);
        let json = page.render(HelpFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["usage"], "cicd git [subcommand] <flags...> <args...>");
        assert_eq!(value["flags"][0]["flags"][0]["aliases"][1], "$CICD_LOGLEVEL");

        let yaml = page.render(HelpFormat::Yaml).unwrap();
        let parsed: serde_yaml::Value = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed["subcommands"][0]["name"].as_str(), Some("tag-bump"));
    }
}

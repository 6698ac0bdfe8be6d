use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use civiclab_types::{TagCategory, TagDefinition};
use civiclab_util::{LoadedConfig, TagCatalog, load_config};
use clap::{Parser, Subcommand};
use indexmap::IndexMap;
use tracing_subscriber::EnvFilter;

const LOG_FILE_ENV: &str = "CIVICLAB_LOG_FILE";

/// Browse civic-tech projects, filter them by tag, and get in touch with their owners.
#[derive(Debug, Parser)]
#[command(name = "civiclab", version, about)]
struct Cli {
    /// Configuration file (defaults to $CIVICLAB_CONFIG_PATH, then the user config dir)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the resolved configuration as JSON
    Config,
    /// Print the tag catalog, grouped the way the filter selectors show it
    Tags {
        /// Only print this category, e.g. "Role"
        category: Option<TagCategory>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing()?;

    let loaded = load_config(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(path = %loaded.path.display(), from_file = loaded.from_file, "configuration resolved");

    match cli.command {
        None => civiclab_tui::run(loaded.config).await,
        Some(Command::Config) => print_config(&loaded),
        Some(Command::Tags { category }) => {
            let catalog = loaded.config.load_tags().context("could not load the tag catalog")?;
            print_tags(&catalog, category);
            Ok(())
        }
    }
}

/// Logs go to `$CIVICLAB_LOG_FILE` when set, stderr otherwise; the TUI owns stdout.
fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match std::env::var_os(LOG_FILE_ENV) {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("cannot open log file {}", PathBuf::from(&path).display()))?;
            let _ = builder.with_ansi(false).with_writer(Mutex::new(file)).try_init();
        }
        None => {
            let _ = builder.with_writer(std::io::stderr).try_init();
        }
    }
    Ok(())
}

fn print_config(loaded: &LoadedConfig) -> Result<()> {
    let source = if loaded.from_file { "" } else { " (not found, defaults)" };
    eprintln!("# {}{source}", loaded.path.display());
    println!("{}", serde_json::to_string_pretty(&loaded.config)?);
    Ok(())
}

fn print_tags(catalog: &TagCatalog, only: Option<TagCategory>) {
    let categories: Vec<TagCategory> = match only {
        Some(category) => vec![category],
        None => TagCategory::ALL.to_vec(),
    };
    for category in categories {
        let tags = catalog.by_category(category);
        if tags.is_empty() {
            continue;
        }
        println!("{category}");
        for (subcategory, tags) in group_by_subcategory(tags) {
            let indent = match subcategory {
                Some(name) => {
                    println!("  {name}");
                    "    "
                }
                None => "  ",
            };
            for tag in tags {
                println!("{indent}{} ({})", tag.display_name, tag.tag_name);
            }
        }
    }
}

/// Subcategories sorted by name, tags sorted by display name. Untagged entries come first.
fn group_by_subcategory(tags: Vec<TagDefinition>) -> IndexMap<Option<String>, Vec<TagDefinition>> {
    let mut groups: IndexMap<Option<String>, Vec<TagDefinition>> = IndexMap::new();
    for tag in tags {
        groups.entry(tag.subcategory.clone()).or_default().push(tag);
    }
    groups.sort_keys();
    for tags in groups.values_mut() {
        tags.sort_by(|a, b| a.display_name.cmp(&b.display_name));
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(name: &str, subcategory: Option<&str>) -> TagDefinition {
        TagDefinition {
            tag_name: name.to_lowercase(),
            display_name: name.to_string(),
            category: TagCategory::Role,
            subcategory: subcategory.map(str::to_string),
        }
    }

    #[test]
    fn tags_group_by_sorted_subcategory() {
        let groups = group_by_subcategory(vec![
            tag("Writer", Some("Marketing")),
            tag("Backend", Some("Engineering")),
            tag("Designer", Some("Design")),
            tag("Frontend", Some("Engineering")),
        ]);
        let keys: Vec<Option<&str>> = groups.keys().map(Option::as_deref).collect();
        assert_eq!(keys, [Some("Design"), Some("Engineering"), Some("Marketing")]);
        let engineering: Vec<&str> = groups[&Some("Engineering".to_string())]
            .iter()
            .map(|t| t.display_name.as_str())
            .collect();
        assert_eq!(engineering, ["Backend", "Frontend"]);
    }

    #[test]
    fn cli_parses_category_and_config() {
        let cli = Cli::try_parse_from(["civiclab", "--config", "/tmp/c.json", "tags", "Role"]).expect("parse");
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/c.json")));
        assert!(matches!(cli.command, Some(Command::Tags { category: Some(TagCategory::Role) })));
    }
}

//! Evidex CLI: terminal dashboard for evidence-first medical search.
//!
//! Starts the interactive dashboard by default; `search` runs a single query
//! and prints the answer.

mod commands;
mod tui;

use clap::Parser;
use evidex_core::config::{EvidexConfig, ServiceBackend};
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Evidex: search, sort and compare synthesized medical evidence
#[derive(Parser, Debug)]
#[command(name = "evidex", version, about, long_about = None)]
struct Cli {
    /// Query to search for as soon as the dashboard opens
    query: Option<String>,

    /// Workspace directory (for .evidex/config.toml)
    #[arg(short, long, default_value = ".")]
    workspace: PathBuf,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Serve results from a JSON fixture file instead of the evidence service
    #[arg(long)]
    fixture: Option<PathBuf>,

    /// Use the built-in demo data instead of the evidence service
    #[arg(long, conflicts_with = "fixture")]
    demo: bool,

    /// Color theme: dark, light
    #[arg(long)]
    theme: Option<String>,

    /// Increase verbosity (-v, -vv). In the dashboard this raises the log file level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-essential output. In the dashboard this lowers the log file level
    #[arg(short, long)]
    quiet: bool,

    /// Subcommand
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Run one search and print the synthesized answer and evidence matrix
    Search {
        /// Search query
        query: String,

        /// Sort column: year, type, population, outcome, grade
        #[arg(short, long, default_value = "year")]
        sort: evidex_core::SortKey,

        /// Sort ascending instead of descending
        #[arg(long)]
        asc: bool,

        /// Print the raw search result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(clap::Subcommand, Debug)]
enum ConfigAction {
    /// Write a default .evidex/config.toml into the workspace
    Init,
    /// Print the resolved configuration
    Show,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let interactive = cli.command.is_none();

    // Set up tracing: human-readable stderr + JSON file logging
    let filter = stderr_filter(cli.verbose, cli.quiet);

    // The dashboard owns the terminal, so stderr logging is off while it runs.
    let stderr_layer = (!interactive).then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_filter(EnvFilter::new(filter))
    });

    // JSON file layer for structured logging
    let log_dir = directories::ProjectDirs::from("dev", "evidex", "evidex")
        .map(|d| d.data_dir().join("logs"))
        .unwrap_or_else(|| PathBuf::from("."));
    let _ = std::fs::create_dir_all(&log_dir);
    let file_appender = tracing_appender::rolling::daily(&log_dir, "evidex.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let json_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(non_blocking)
        .with_filter(EnvFilter::new(file_filter(cli.verbose, cli.quiet, interactive)));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    // Resolve workspace
    let workspace = cli
        .workspace
        .canonicalize()
        .unwrap_or_else(|_| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

    if let Some(Commands::Config {
        action: ConfigAction::Init,
    }) = &cli.command
    {
        return commands::init_config(&workspace);
    }

    // Load configuration
    let mut config = evidex_core::load_config(Some(&workspace), cli.config.as_deref())
        .map_err(|e| anyhow::anyhow!("Configuration error: {}", e))?;

    // Apply CLI overrides
    apply_overrides(&mut config, &cli);
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Configuration error: {}", e))?;

    match cli.command {
        Some(Commands::Search {
            query,
            sort,
            asc,
            json,
        }) => commands::run_search(&config, &query, sort, asc, json).await,
        Some(Commands::Config { action }) => match action {
            ConfigAction::Show => commands::show_config(&config),
            ConfigAction::Init => commands::init_config(&workspace),
        },
        None => tui::run(config, cli.query).await,
    }
}

fn stderr_filter(verbose: u8, quiet: bool) -> &'static str {
    match verbose {
        0 if quiet => "error",
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

/// Subcommands keep a full debug log on disk. The dashboard has no stderr
/// output, so its log file follows the verbosity flags instead.
fn file_filter(verbose: u8, quiet: bool, interactive: bool) -> &'static str {
    if !interactive {
        return "debug";
    }
    match verbose {
        0 if quiet => "warn",
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

fn apply_overrides(config: &mut EvidexConfig, cli: &Cli) {
    if let Some(path) = &cli.fixture {
        config.service.backend = ServiceBackend::Fixture;
        config.service.fixture_path = Some(path.clone());
    }
    if cli.demo {
        config.service.backend = ServiceBackend::Mock;
    }
    if let Some(theme) = &cli.theme {
        config.ui.theme = theme.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_default_query() {
        let cli = Cli::parse_from(["evidex", "metformin longevity"]);
        assert_eq!(cli.query.as_deref(), Some("metformin longevity"));
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_parses_search_command() {
        let cli = Cli::parse_from(["evidex", "search", "statins", "--sort", "grade", "--asc"]);
        match cli.command {
            Some(Commands::Search {
                query, sort, asc, ..
            }) => {
                assert_eq!(query, "statins");
                assert_eq!(sort, evidex_core::SortKey::Grade);
                assert!(asc);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_sort_key() {
        let result = Cli::try_parse_from(["evidex", "search", "q", "--sort", "sample"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_fixture_and_demo_conflict() {
        let result = Cli::try_parse_from(["evidex", "--fixture", "a.json", "--demo"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_overrides_select_fixture_backend() {
        let cli = Cli::parse_from(["evidex", "--fixture", "result.json", "--theme", "light"]);
        let mut config = EvidexConfig::default();
        apply_overrides(&mut config, &cli);
        assert_eq!(config.service.backend, ServiceBackend::Fixture);
        assert_eq!(
            config.service.fixture_path,
            Some(PathBuf::from("result.json"))
        );
        assert_eq!(config.ui.theme, "light");
    }

    #[test]
    fn test_log_filters_follow_flags() {
        assert_eq!(stderr_filter(0, true), "error");
        assert_eq!(stderr_filter(2, false), "debug");
        assert_eq!(file_filter(0, true, false), "debug");
        assert_eq!(file_filter(0, true, true), "warn");
        assert_eq!(file_filter(0, false, true), "info");
        assert_eq!(file_filter(1, false, true), "debug");
        assert_eq!(file_filter(3, false, true), "trace");
    }

    #[test]
    fn test_demo_flag_repairs_invalid_workspace_backend() {
        let dir = tempfile::tempdir().unwrap();
        let evidex_dir = dir.path().join(".evidex");
        std::fs::create_dir_all(&evidex_dir).unwrap();
        std::fs::write(
            evidex_dir.join("config.toml"),
            "[service]\nbackend = \"fixture\"\n",
        )
        .unwrap();

        let mut config = evidex_core::load_config(Some(dir.path()), None).unwrap();
        assert!(config.validate().is_err());

        let cli = Cli::parse_from(["evidex", "--demo"]);
        apply_overrides(&mut config, &cli);
        assert_eq!(config.service.backend, ServiceBackend::Mock);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_demo_override() {
        let cli = Cli::parse_from(["evidex", "--demo"]);
        let mut config = EvidexConfig::default();
        apply_overrides(&mut config, &cli);
        assert_eq!(config.service.backend, ServiceBackend::Mock);
    }
}

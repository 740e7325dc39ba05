//! CLI definition and handler

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::load_config;
use crate::linters::DotnetLinters;
use crate::orchestrator::Orchestrator;
use crate::reporter::RunState;

/// pbilint - quality gate for Power BI projects
///
/// Finds semantic models and reports in PBIP folders, runs the TMDL and
/// PBI Inspector linters on each, and scores the results from 0 to 10.
#[derive(Parser, Debug)]
#[command(name = "pbilint")]
#[command(
    version,
    about = "Lint Power BI project items and score them from 0 to 10",
    after_help = "\
Scores: >= 8 excellent, >= 6 needs attention, < 6 poor (fails the run).
Exit status is 1 if any item scored poor, any linter failed, or a path was missing.

Examples:
  pbilint                                  Lint items under the current directory
  pbilint reports/ models/                 Lint several trees
  pbilint . --rules my_rules.json          Use a custom PBI Inspector rules file
  pbilint . --log-level debug              Show raw linter output"
)]
pub struct Cli {
    /// Paths to search for items (default: current directory)
    #[arg(default_value = ".")]
    pub paths: Vec<PathBuf>,

    /// Config file (default: ./pbilint.toml when present)
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// PBI Inspector rules file
    #[arg(long)]
    pub rules: Option<PathBuf>,

    /// How many folder levels to search below each path [default: 5]
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Seconds before a linter run is abandoned, 0 = no limit [default: 120]
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,
}

/// Install the log subscriber. `RUST_LOG` takes precedence over `level`.
pub fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .without_time()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

/// Run the CLI with parsed arguments, returning the process exit status
pub fn run(cli: Cli) -> Result<i32> {
    let cwd = std::env::current_dir().context("Failed to read the current directory")?;
    let config = load_config(cli.config.as_deref(), &cwd)?.with_overrides(
        cli.rules,
        cli.max_depth,
        cli.timeout,
    );
    debug!("Effective config: {:?}", config);

    let backend = DotnetLinters::new(config.tools.clone());
    let mut state = RunState::new();
    Orchestrator::new(&backend, config.max_depth).lint_paths(&cli.paths, &mut state);

    Ok(state.exit_code())
}

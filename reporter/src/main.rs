//! Console reporter for behavior-driven test runs.
//!
//! Replays a runner's event log through the scope state machine, then prints
//! the hierarchical report and, when given, the code-coverage summary.

use std::io::{IsTerminal, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;

use reporter::coverage::load_coverage;
use reporter::exit_codes;
use reporter::io::config::{DEFAULT_CONFIG_FILE, ReportConfig, load_config, write_config};
use reporter::io::events::replay_file;
use reporter::io::sink::{ConsoleSink, write_lines};
use reporter::logging;
use reporter::render::render_report;
use reporter::{RunOptions, RunState};

#[derive(Parser)]
#[command(
    name = "reporter",
    version,
    about = "Scope tracking and console reports for behavior-driven test runs"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write the default report config if missing.
    Init {
        /// Overwrite an existing config.
        #[arg(short, long)]
        force: bool,
        #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
        config: PathBuf,
    },
    /// Replay an event log and print the report.
    Render(RenderArgs),
}

#[derive(Args)]
struct RenderArgs {
    /// JSON Lines event log written by the runner.
    #[arg(long)]
    events: PathBuf,
    /// JSON coverage report to summarize after the results.
    #[arg(long)]
    coverage: Option<PathBuf>,
    /// Strings and theme overrides; defaults apply when the file is missing.
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,
    /// Test target shown in the start banner.
    #[arg(long, default_value = ".")]
    path: String,
    /// Test name filter shown in the start banner (repeatable).
    #[arg(long = "name")]
    name_filter: Vec<String>,
    /// Tag filter shown in the start banner (repeatable).
    #[arg(long = "tag")]
    tag_filter: Vec<String>,
    /// Treat skipped and pending tests as failures.
    #[arg(long)]
    strict: bool,
    /// Disable ANSI colors.
    #[arg(long)]
    no_color: bool,
}

fn main() {
    logging::init();
    match run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{err:#}");
            std::process::exit(exit_codes::INVALID);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    match cli.command {
        Command::Init { force, config } => cmd_init(&config, force),
        Command::Render(args) => cmd_render(args),
    }
}

fn cmd_init(path: &Path, force: bool) -> Result<i32> {
    if !force && path.exists() {
        info!(path = %path.display(), "config exists, leaving it untouched");
        return Ok(exit_codes::OK);
    }
    write_config(path, &ReportConfig::default())
        .with_context(|| format!("write {}", path.display()))?;
    Ok(exit_codes::OK)
}

fn cmd_render(args: RenderArgs) -> Result<i32> {
    let config = load_config(&args.config)?;
    let coverage = args
        .coverage
        .as_deref()
        .map(load_coverage)
        .transpose()
        .context("load coverage")?;

    let mut state = RunState::new(RunOptions {
        path: args.path,
        name_filter: args.name_filter,
        tag_filter: args.tag_filter,
        strict: args.strict,
    });
    replay_file(&mut state, &args.events)?;

    let lines = render_report(&state, coverage.as_ref(), &config);
    let colored = !args.no_color && std::io::stdout().is_terminal();
    let mut sink = ConsoleSink::stdout(colored);
    write_lines(&mut sink, &lines).context("write report")?;
    sink.into_inner().flush().context("flush report")?;

    info!(
        total = state.total_count(),
        failed = state.failed_count(),
        "run reported"
    );
    if state.failed_count() > 0 {
        Ok(exit_codes::TESTS_FAILED)
    } else {
        Ok(exit_codes::OK)
    }
}

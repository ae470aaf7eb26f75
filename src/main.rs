//! Rivt CLI - the conformance test harness for the Riv toolchain.
//!
//! This is the main entry point for the rivt CLI application.
//! It uses clap for argument parsing and dispatches to appropriate
//! command handlers based on user input.

mod commands;
mod config;
mod error;
mod harness;
mod numeric;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{run_compare_layers, run_compare_output, run_tests, CompareArgs, RunArgs};
use config::Config;
use error::{Result, RivtError};

/// Rivt - conformance test harness for the Riv toolchain
///
/// Rivt discovers fixture inputs, drives the external compiler and emulator
/// over each of them, and validates the produced output against reference
/// data. It also ships two numeric trace comparators.
#[derive(Parser, Debug)]
#[command(name = "rivt")]
#[command(author = "Riv Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Conformance test harness for the Riv toolchain", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true, env = "RIVT_VERBOSE")]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "RIVT_CONFIG")]
    config: Option<PathBuf>,

    /// Disable color output
    #[arg(long, global = true, env = "RIVT_NO_COLOR")]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands for the rivt CLI.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a section of conformance tests
    ///
    /// Compiles, assembles, and emulates every fixture of the selected
    /// section, then compares captured output against references and prints
    /// a summary. Selector 0 runs exploratory mode without grading.
    Run(RunCommand),

    /// Validate a layered numeric trace against a reference
    ///
    /// Checks all 12 LAYER-tagged rows for matching tags, dimensions, and
    /// values within an absolute tolerance of 1e-10.
    CompareLayers(CompareCommand),

    /// Validate a numeric output vector against a reference
    ///
    /// Checks every PAR-tagged row for matching tags, dimensions, and
    /// values within an absolute tolerance of 1e-10.
    CompareOutput(CompareCommand),
}

/// Arguments for the run subcommand.
#[derive(Parser, Debug)]
struct RunCommand {
    /// Section selector: 0 for exploratory mode, 1-based section index otherwise
    #[arg(short, long)]
    section: i64,

    /// Suite root directory (default: from config)
    #[arg(long)]
    suite_root: Option<PathBuf>,
}

/// Arguments for the comparison subcommands.
#[derive(Parser, Debug)]
struct CompareCommand {
    /// File under test
    #[arg(required = true)]
    actual: PathBuf,

    /// Reference file
    #[arg(required = true)]
    reference: PathBuf,
}

/// Main entry point for the rivt CLI.
///
/// Parses command-line arguments, initializes logging, loads configuration,
/// and dispatches to the appropriate command handler. The process exit code
/// distinguishes usage/format errors (2) from comparison mismatches (1).
fn main() {
    if let Err(e) = try_main() {
        eprintln!("{}", e);
        std::process::exit(e.exit_code());
    }
}

fn try_main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose, cli.no_color)?;

    // Load configuration
    let config = load_config(cli.config.as_deref())?;

    // Execute the selected command
    execute_command(cli.command, cli.verbose, config)
}

/// Initialize the logging system.
///
/// All diagnostics go to stderr: stdout is reserved for the section summary
/// and comparator verdict lines.
///
/// # Arguments
/// * `verbose` - Whether to enable verbose logging
/// * `no_color` - Whether to disable colored output
fn init_logging(verbose: bool, no_color: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    let subscriber = fmt::layer()
        .with_ansi(!no_color)
        .with_target(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(subscriber)
        .try_init()
        .map_err(|e| RivtError::Config(format!("Failed to initialize logging: {}", e)))?;

    Ok(())
}

/// Load configuration from file or use defaults.
fn load_config(config_path: Option<&std::path::Path>) -> Result<Config> {
    match config_path {
        Some(path) => Config::load_from_path(path),
        None => Config::load(),
    }
}

/// Execute the selected command.
fn execute_command(command: Commands, verbose: bool, config: Config) -> Result<()> {
    match command {
        Commands::Run(args) => execute_run(args, verbose, config),
        Commands::CompareLayers(args) => run_compare_layers(compare_args(args)),
        Commands::CompareOutput(args) => run_compare_output(compare_args(args)),
    }
}

/// Execute the run command.
fn execute_run(args: RunCommand, verbose: bool, config: Config) -> Result<()> {
    let run_args = RunArgs {
        section: args.section,
        suite_root: args.suite_root,
        verbose,
    };
    run_tests(run_args, config)?;
    Ok(())
}

fn compare_args(args: CompareCommand) -> CompareArgs {
    CompareArgs {
        actual: args.actual,
        reference: args.reference,
    }
}

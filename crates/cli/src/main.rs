//! Tessera CLI
//!
//! Command-line interface for running conformance suites.

use clap::{CommandFactory, Parser as ClapParser, Subcommand};
use clap_complete::{Shell, generate};
use std::io;
use std::path::{Path, PathBuf};
use std::process;
use tessera_cli::{ReportFormat, RunnerConfig, TestRunner, TestSummary, report};
use tracing::{info, warn};

#[derive(ClapParser)]
#[command(name = "tessc")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Tessera conformance runner - run TOML scenario suites", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run suite files
    Run {
        /// Directories or suite files (defaults to current directory)
        #[arg(default_value = ".")]
        paths: Vec<PathBuf>,

        /// Filter: only run cases whose name contains this pattern
        #[arg(short, long)]
        filter: Option<String>,

        /// Verbose output (show timing for each case)
        #[arg(short, long)]
        verbose: bool,

        /// Stop at the first failing case
        #[arg(long)]
        fail_fast: bool,

        /// Report format
        #[arg(long, value_enum)]
        format: Option<ReportFormat>,

        /// Path to runner configuration (TOML)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            paths,
            filter,
            verbose,
            fail_fast,
            format,
            config,
        } => {
            init_logging();
            let mut config = load_config(config.as_deref());
            if let Some(filter) = filter {
                config = config.with_filter(filter);
            }
            if verbose {
                config = config.with_verbose(true);
            }
            if fail_fast {
                config = config.with_fail_fast(true);
            }
            if let Some(format) = format {
                config = config.with_format(format);
            }
            run_suites(&paths, config);
        }
        Commands::Completions { shell } => {
            run_completions(shell);
        }
    }
}

fn init_logging() {
    let mut filter = tracing_subscriber::EnvFilter::from_default_env();
    for directive in ["tessc=info", "tessera_cli=info"] {
        if let Ok(directive) = directive.parse() {
            filter = filter.add_directive(directive);
        }
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> RunnerConfig {
    let Some(path) = path else {
        return RunnerConfig::default();
    };
    match RunnerConfig::load(path) {
        Ok(config) => {
            info!(path = %path.display(), "loaded runner config");
            config
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn run_completions(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "tessc", &mut io::stdout());
}

fn run_suites(paths: &[PathBuf], config: RunnerConfig) {
    let format = config.format;
    let verbose = config.verbose;
    let runner = TestRunner::new(config);
    let summary = runner.run(paths);

    if summary.file_results.is_empty() {
        warn!("no suite files found");
    }

    if let Err(e) = print_report(&summary, format, verbose) {
        eprintln!("Error writing report: {}", e);
        process::exit(1);
    }

    if !summary.success() {
        process::exit(1);
    }
}

#[cfg(feature = "report-json")]
fn print_report(summary: &TestSummary, format: ReportFormat, verbose: bool) -> io::Result<()> {
    match format {
        ReportFormat::Text => report::print_text(summary, verbose),
        ReportFormat::Json => report::print_json(summary),
    }
}

#[cfg(not(feature = "report-json"))]
fn print_report(summary: &TestSummary, format: ReportFormat, verbose: bool) -> io::Result<()> {
    if format == ReportFormat::Json {
        warn!("built without the report-json feature; falling back to text");
    }
    report::print_text(summary, verbose)
}

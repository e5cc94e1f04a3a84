//! test-organizer CLI
//!
//! Prints the test manifest for a test root on stdout:
//!
//! ```text
//! TEST:<name>:<relative_path>:<category>
//! ```
//!
//! Diagnostics go to stderr. On any error nothing is written to stdout and
//! the process exits non-zero.

// Exclude from coverage - CLI binary tested via integration tests
#![cfg_attr(tarpaulin, ignore)]

use clap::{ArgAction, Parser, ValueEnum};
use std::io::{IsTerminal, Write};
use std::path::PathBuf;
use test_organizer::{ManifestEngine, OrganizerConfig, OrganizerError, OutputFormat};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Organize unit-test sources into a categorized build manifest.
#[derive(Parser, Debug)]
#[command(name = "test-organizer")]
#[command(version = test_organizer::VERSION)]
#[command(about = "Discover, name and bucket unit-test sources for grouped compilation")]
#[command(after_help = "EXAMPLES:
  # Manifest for the tests/ directory
  test-organizer tests

  # Split categories above 30 tests into 6 buckets
  test-organizer tests --threshold 30 --buckets 6

  # Skip two test files and write JSON to a file
  test-organizer --exclude test_slow.cpp --exclude test_flaky.cpp tests --format json -o manifest.json
")]
struct Cli {
    /// Test root directory
    #[arg(value_name = "ROOT")]
    root: PathBuf,

    /// File name skipped by the test pattern rule (repeatable)
    #[arg(long = "exclude", value_name = "NAME", action = ArgAction::Append)]
    exclude: Vec<String>,

    /// Directory whose direct *.cpp children are always included (repeatable, replaces fl, fx, ftl)
    #[arg(long = "include-dir", value_name = "DIR", action = ArgAction::Append)]
    include_dirs: Vec<String>,

    /// Platform keyword substring (repeatable, replaces the default list)
    #[arg(long = "platform-keyword", value_name = "KW", action = ArgAction::Append)]
    platform_keywords: Vec<String>,

    /// File-name glob selecting test sources
    #[arg(long = "pattern", value_name = "GLOB")]
    pattern: Option<String>,

    /// Split categories with more than N tests
    #[arg(long = "threshold", value_name = "N")]
    threshold: Option<usize>,

    /// Number of buckets for split categories
    #[arg(long = "buckets", value_name = "N")]
    buckets: Option<usize>,

    /// Config file path (default: ROOT/.test_organizer.json if present)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long = "format", value_enum)]
    format: Option<OutputFormatArg>,

    /// Output file path (default: stdout)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    output: Option<PathBuf>,

    /// Log discovery details to stderr
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormatArg {
    /// TEST:<name>:<path>:<category> lines
    Lines,
    /// JSON array of records
    Json,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Lines => OutputFormat::Lines,
            OutputFormatArg::Json => OutputFormat::Json,
        }
    }
}

/// Install a stderr subscriber. `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(std::io::stderr().is_terminal())
                .with_target(false),
        )
        .with(filter)
        .init();
}

/// Defaults, then config file, then CLI flags
fn load_config(cli: &Cli) -> Result<OrganizerConfig, OrganizerError> {
    let mut config = match &cli.config {
        Some(path) => OrganizerConfig::from_file(path)?,
        None if cli.root.is_dir() => OrganizerConfig::discover(&cli.root)?,
        None => OrganizerConfig::default(),
    };

    if !cli.exclude.is_empty() {
        config.exclude.extend(cli.exclude.iter().cloned());
    }
    if !cli.include_dirs.is_empty() {
        config.include_dirs = cli.include_dirs.clone();
    }
    if !cli.platform_keywords.is_empty() {
        config.platform_keywords = cli.platform_keywords.clone();
    }
    if let Some(pattern) = &cli.pattern {
        config.test_pattern = pattern.clone();
    }
    if let Some(threshold) = cli.threshold {
        config.split_threshold = threshold;
    }
    if let Some(buckets) = cli.buckets {
        config.bucket_count = buckets;
    }
    if let Some(format) = cli.format {
        config.format = format.into();
    }

    config.validate()?;
    Ok(config)
}

fn run(cli: Cli) -> Result<(), OrganizerError> {
    let config = load_config(&cli)?;
    tracing::debug!(?config, "effective configuration");

    let output = ManifestEngine::with_config(config).render(&cli.root)?;

    match &cli.output {
        Some(path) => std::fs::write(path, output)?,
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(output.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}

fn main() {
    // Fix broken pipe panic when piping to head/tail/etc.
    // Reset SIGPIPE to default behavior (terminate quietly)
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

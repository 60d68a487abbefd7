//! Command line interface for the biblioflow paper organizer.
//!
//! This crate provides the `biblioflow` binary built on the `biblioflow` library. It
//! supports:
//! - Organizing downloaded PDFs by DOI, one-off or by watching a folder
//! - Searching and inspecting the paper library
//! - Generating citations and exporting BibTeX/RIS files
//! - Editing preferences and checking for updates
//!
//! # Usage
//!
//! ```bash
//! # Write a preferences file
//! biblioflow init
//!
//! # Organize everything in the downloads folder
//! biblioflow organize ~/Downloads/*.pdf
//!
//! # Organize new downloads as they arrive
//! biblioflow watch ~/Downloads
//!
//! # Search the library and cite a paper
//! biblioflow search "neural networks"
//! biblioflow cite 20240311093015_0 --format apa
//! ```
//!
//! Output is colored and destructive operations ask for confirmation. Logging detail is
//! raised with `-v` (repeatable) or `RUST_LOG`.

use std::{
  path::{Path, PathBuf},
  str::FromStr,
};

use biblioflow::{
  citation::{cite, cite_batch, CitationFormat},
  config::{expand_tilde, Config},
  format::NamingFormat,
  library::{Add, Library, LibraryRecord, OrderField, Query, Remove},
  organizer::Transfer,
  prelude::*,
  processor::{ProcessingEvent, ProcessingResult, Processor},
  update::UpdateChecker,
  watcher::{FolderWatcher, WatchEvent},
  VERSION,
};
use clap::{builder::ArgAction, Args, Parser, Subcommand, ValueEnum};
use tracing::{debug, info, trace, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

pub mod commands;
pub mod error;
pub mod interaction;

use crate::{commands::*, error::*, interaction::*};

/// Command line interface configuration and argument parsing
#[derive(Parser)]
#[command(author, version, about = "Organize research PDFs by DOI and keep a citable library")]
pub struct Cli {
  /// Verbose mode (-v, -vv, -vvv) for different levels of logging detail
  #[arg(
        short,
        long,
        action = ArgAction::Count,
        global = true,
        help = "Increase logging verbosity"
    )]
  verbose: u8,

  /// Path to the preferences file. If not specified, uses the platform configuration
  /// directory.
  #[arg(long, global = true)]
  config: Option<PathBuf>,

  /// Also write logs to this file
  #[arg(long, global = true)]
  log_file: Option<PathBuf>,

  /// The subcommand to execute
  #[command(subcommand)]
  command: Option<Commands>,

  /// Skip all prompts and accept defaults (mostly for testing)
  #[arg(long, hide = true, global = true)]
  accept_defaults: bool,
}

/// Configures the logging system based on the verbosity level
///
/// The verbosity levels are:
/// - 0: error (default)
/// - 1: warn
/// - 2: info
/// - 3: debug
/// - 4+: trace
///
/// `RUST_LOG` takes precedence. Logs go to stderr, or to `log_file` when one is given; the
/// returned guard flushes the file writer when dropped.
fn setup_logging(verbosity: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
  let filter = match verbosity {
    0 => "error",
    1 => "warn",
    2 => "info",
    3 => "debug",
    _ => "trace",
  };

  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
  let builder = tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_file(true)
    .with_line_number(true)
    .with_thread_ids(true)
    .with_target(true);

  match log_file {
    Some(path) => {
      let directory = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
      let file_name = path
        .file_name()
        .ok_or_else(|| BiblioflowdError::Logging(format!("{} is not a file", path.display())))?;
      std::fs::create_dir_all(directory)?;
      let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(directory, file_name));
      builder
        .with_ansi(false)
        .with_writer(writer)
        .try_init()
        .map_err(|e| BiblioflowdError::Logging(e.to_string()))?;
      Ok(Some(guard))
    },
    None => {
      builder
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| BiblioflowdError::Logging(e.to_string()))?;
      Ok(None)
    },
  }
}

/// Runs one command against the preferences at `config_path`.
async fn run<I: UserInteraction>(interaction: &I, config_path: &Path, command: Commands) -> Result<()> {
  trace!("Using preferences at {}", config_path.display());
  match command {
    Commands::Init(options) => init(interaction, config_path, options),
    Commands::Config(command) => config(interaction, config_path, command),
    Commands::Organize(options) => organize(interaction, &Config::load(config_path)?, options).await,
    Commands::Watch(options) => watch(interaction, &Config::load(config_path)?, options).await,
    Commands::Search(options) => search(interaction, &Config::load(config_path)?, options),
    Commands::Get { id } => get(interaction, &Config::load(config_path)?, &id),
    Commands::Remove(options) => remove(interaction, &Config::load(config_path)?, options),
    Commands::Cite(options) => cite_paper(interaction, &Config::load(config_path)?, options),
    Commands::Export(options) => export(interaction, &Config::load(config_path)?, options),
    Commands::Update => update(interaction, &Config::load(config_path)?).await,
  }
}

/// Entry point for the biblioflow CLI application
///
/// Parses arguments, sets up logging and runs the requested command. Errors are printed
/// and turn into a non-zero exit status.
#[tokio::main]
async fn main() -> Result<()> {
  let cli = Cli::parse();

  let Some(command) = cli.command else {
    println!("Please specify a command. Use --help for usage information.");
    std::process::exit(1);
  };

  let guard = setup_logging(cli.verbose, cli.log_file.as_deref())?;
  let interaction = Terminal::new(cli.accept_defaults);
  let config_path = cli.config.unwrap_or_else(Config::default_path);

  if let Err(e) = run(&interaction, &config_path, command).await {
    debug!("Command failed: {e:?}");
    interaction.reply(ResponseContent::Error(e))?;
    drop(guard);
    std::process::exit(1);
  }
  Ok(())
}

//! Error types for the `biblioflow` command line interface.

use thiserror::Error;

use super::*;

/// Error type alias used throughout the CLI.
pub type Result<T> = core::result::Result<T, BiblioflowdError>;

/// Everything that can stop a CLI command.
#[derive(Error, Debug)]
pub enum BiblioflowdError {
  /// Error raised by the `biblioflow` library
  #[error(transparent)]
  Biblio(#[from] BiblioError),

  /// File system error outside of the library
  #[error(transparent)]
  Io(#[from] std::io::Error),

  /// An interactive prompt failed
  #[error(transparent)]
  Dialog(#[from] dialoguer::Error),

  /// A file pattern argument is not a valid glob
  #[error(transparent)]
  Glob(#[from] glob::PatternError),

  /// The batch worker panicked
  #[error(transparent)]
  Join(#[from] tokio::task::JoinError),

  /// Could not serialize output
  #[error(transparent)]
  Json(#[from] serde_json::Error),

  /// Installing the log subscriber failed
  #[error("Failed to set up logging: {0}")]
  Logging(String),

  /// The arguments do not describe anything to do
  #[error("{0}")]
  Usage(String),
}

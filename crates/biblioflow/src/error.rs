//! Error types for the biblioflow library.
//!
//! Every stage of the pipeline (PDF scraping, metadata lookup, file moves, library
//! persistence) reports failure through [`BiblioError`]. Its `Display` output is meant to be
//! shown to the user as-is.
//!
//! # Examples
//!
//! ```no_run
//! use biblioflow::{error::BiblioError, retriever::Retriever};
//!
//! # async fn example() -> Result<(), BiblioError> {
//! let retriever = Retriever::new();
//! match retriever.fetch(Some("10.1038/nature14539"), None).await {
//!   Ok(paper) => println!("{}", paper.title),
//!   Err(BiblioError::MetadataNotFound) => println!("No source knew this paper"),
//!   Err(e) => println!("Lookup failed: {e}"),
//! }
//! # Ok(())
//! # }
//! ```

use thiserror::Error;

/// Error type alias used for the [`biblioflow`](crate) crate.
pub type Result<T> = core::result::Result<T, BiblioError>;

/// Errors that can occur while organizing papers.
#[derive(Error, Debug)]
pub enum BiblioError {
  /// The input could not be read as a DOI.
  ///
  /// Raised when normalizing user input such as `doi:10.1000/xyz` or a `doi.org` URL that
  /// does not contain anything matching the DOI pattern.
  #[error("Invalid DOI: {0}")]
  InvalidDoi(String),

  /// A network request failed.
  ///
  /// Covers unreachable hosts, timeouts, TLS failures and undecodable response bodies.
  #[error(transparent)]
  Network(#[from] reqwest::Error),

  /// A metadata service answered with an error status or an unusable body.
  #[error("API error: {0}")]
  ApiError(String),

  /// A metadata service does not offer the requested kind of lookup.
  #[error("{0} does not support this lookup")]
  Unsupported(String),

  /// No configured source could resolve the paper.
  #[error("Could not find metadata for this paper")]
  MetadataNotFound,

  /// A file system operation failed.
  #[error(transparent)]
  Io(#[from] std::io::Error),

  /// PDF parsing failed.
  ///
  /// Typical causes are corrupted or truncated files and encrypted documents.
  #[error(transparent)]
  Lopdf(#[from] lopdf::Error),

  /// Reading or writing JSON (library or preferences) failed.
  #[error(transparent)]
  Json(#[from] serde_json::Error),

  /// The directory watcher reported an error.
  #[error(transparent)]
  Watch(#[from] notify_debouncer_full::notify::Error),

  /// A worker task panicked or was aborted.
  #[error(transparent)]
  Join(#[from] tokio::task::JoinError),

  /// A result was cancelled or has failed, so it can no longer be confirmed.
  #[error("{0} is not awaiting confirmation")]
  NotAwaitingConfirmation(String),

  /// No library record carries the given id.
  #[error("No paper with id \"{0}\" in the library")]
  PaperNotFound(String),

  /// A citation or naming format name was not recognized.
  #[error("Unknown format \"{0}\"")]
  UnknownFormat(String),

  /// The preferences are invalid or an unknown preference key was used.
  #[error("{0}")]
  Config(String),
}

//! Research PDF organization by DOI.
//!
//! `biblioflow` takes a pile of downloaded papers and turns it into a tidy, searchable
//! library. For every PDF it:
//!
//! 1. scrapes the text of the first pages,
//! 2. finds the first DOI in that text,
//! 3. resolves the DOI (or, failing that, a title guess) against CrossRef and Semantic Scholar,
//! 4. renames and relocates the file using a naming template.
//!
//! Organized papers are recorded in a flat JSON library from which BibTeX, APA, IEEE and RIS
//! citations can be generated.
//!
//! # Getting Started
//!
//! ```no_run
//! use biblioflow::{
//!   config::Config,
//!   library::{Add, Library, Query},
//!   prelude::*,
//!   processor::Processor,
//!   retriever::Retriever,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!   let config = Config::load(Config::default_path())?;
//!   let processor = Processor::from_config(&config).with_auto_confirm(true);
//!
//!   let result = processor.process_file("downloads/paper.pdf", None).await;
//!   if let (Some(paper), Some(path)) = (&result.metadata, &result.new_path) {
//!     let mut library = Library::open(&config.library_path)?;
//!     Add::new(paper, path).execute(&mut library)?;
//!   }
//!
//!   let mut library = Library::open(&config.library_path)?;
//!   for record in Query::text("neural").execute(&mut library)? {
//!     println!("{}: {}", record.id, record.title);
//!   }
//!   Ok(())
//! }
//! ```
//!
//! # Module Organization
//!
//! - [`paper`]: Paper metadata and author helpers
//! - [`pdf`]: PDF text extraction and DOI matching
//! - [`retriever`]: Metadata lookup against CrossRef and Semantic Scholar
//! - [`format`]: Filename sanitizing and naming templates
//! - [`organizer`]: Moving and copying files into the output folder
//! - [`processor`]: The batch pipeline tying the steps together
//! - [`library`]: The persisted JSON record of organized papers
//! - [`citation`]: BibTeX, APA, IEEE and RIS formatters
//! - [`config`]: User preferences
//! - [`watcher`]: Watching a folder for new PDFs
//! - [`update`]: Checking for newer releases

#![warn(missing_docs)]

use std::{
  collections::HashSet,
  fmt::Display,
  path::{Path, PathBuf},
  str::FromStr,
  sync::Arc,
};

use async_trait::async_trait;
use chrono::{DateTime, Local, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn};
#[cfg(test)]
use {tempfile::tempdir, tracing_test::traced_test};

pub mod citation;
pub mod config;
pub mod error;
pub mod format;
pub mod library;
pub mod organizer;
pub mod paper;
pub mod pdf;
pub mod processor;
pub mod retriever;
pub mod update;
pub mod watcher;

use crate::{error::*, paper::Paper};

/// Version of this crate, reported in the HTTP user agent and used by the update check.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common traits and types for ergonomic imports.
///
/// ```no_run
/// use biblioflow::{
///   library::{Library, Query},
///   prelude::*,
/// };
///
/// fn example() -> Result<(), BiblioError> {
///   let mut library = Library::open(Library::default_path())?;
///   let everything = Query::list_all().execute(&mut library)?;
///   println!("{} papers", everything.len());
///   Ok(())
/// }
/// ```
pub mod prelude {
  pub use crate::{
    error::BiblioError, library::LibraryInstruction, paper::Paper, retriever::MetadataSource,
  };
}

//! The organize pipeline: scrape, match, look up, rename.
//!
//! A [`Processor`] runs the steps for one file at a time. Progress is reported as
//! [`ProcessingEvent`]s over an unbounded tokio channel, so a front end can render it
//! without sharing any state with the worker. Batches run on a single spawned task and
//! files are handled strictly in the order given.
//!
//! Unless auto-confirm is enabled, a file whose metadata was found is left where it is and
//! its result is marked [`ProcessingStatus::AwaitingConfirmation`]; the caller decides
//! whether to [`Processor::confirm`] (optionally with a custom filename) or
//! [`Processor::cancel`] it.
//!
//! ```no_run
//! use biblioflow::{
//!   config::Config,
//!   processor::{ProcessingEvent, Processor},
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let processor = Processor::from_config(&Config::default());
//! let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
//!
//! let batch = processor.spawn_batch(vec!["a.pdf".into(), "b.pdf".into()], tx);
//! while let Some(event) = rx.recv().await {
//!   if let ProcessingEvent::BatchProgress { current, total } = event {
//!     println!("{current}/{total}");
//!   }
//! }
//!
//! for mut result in batch.await? {
//!   if result.is_awaiting_confirmation() {
//!     processor.confirm(&mut result, None)?;
//!   }
//! }
//! # Ok(())
//! # }
//! ```

use tokio::{sync::mpsc::UnboundedSender, task::JoinHandle};

use super::*;
use crate::{
  config::Config,
  format::NamingFormat,
  organizer::{organize_file, place_file, Transfer},
  pdf::{PDFAnalyzer, PDFContent},
  retriever::Retriever,
};

/// Where a file is in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingStatus {
  /// Not processed yet
  #[default]
  Pending,
  /// Metadata found, waiting for the user to confirm the move
  AwaitingConfirmation,
  /// Renamed and relocated
  Organized,
  /// Processing stopped with an error
  Failed,
  /// The user declined to organize the file
  Cancelled,
}

/// Outcome of processing one file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingResult {
  /// Path the file was picked up from
  pub original_path: PathBuf,
  /// File name of the original path
  pub filename:      String,
  /// Metadata found for the file
  pub metadata:      Option<Paper>,
  /// Where the file was placed
  pub new_path:      Option<PathBuf>,
  /// Human readable failure description
  pub error:         Option<String>,
  /// Pipeline state
  pub status:        ProcessingStatus,
}

impl ProcessingResult {
  /// A pending result for `path`.
  pub fn new(path: impl Into<PathBuf>) -> Self {
    let original_path = path.into();
    let filename = original_path
      .file_name()
      .map_or_else(|| original_path.display().to_string(), |name| name.to_string_lossy().into_owned());
    Self {
      original_path,
      filename,
      metadata: None,
      new_path: None,
      error: None,
      status: ProcessingStatus::Pending,
    }
  }

  /// Whether the file was organized.
  pub fn is_success(&self) -> bool { self.status == ProcessingStatus::Organized }

  /// Whether the file is waiting for [`Processor::confirm`] or [`Processor::cancel`].
  pub fn is_awaiting_confirmation(&self) -> bool {
    self.status == ProcessingStatus::AwaitingConfirmation
  }
}

/// Progress notifications sent while processing.
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessingEvent {
  /// Work on a file began
  Started {
    /// File name being processed
    filename: String,
  },
  /// Metadata was resolved for a file
  MetadataFound {
    /// File name being processed
    filename: String,
    /// The resolved metadata
    paper:    Paper,
  },
  /// A file waits for confirmation
  ConfirmationNeeded(ProcessingResult),
  /// A file was organized
  Completed {
    /// Where the file was picked up
    original_path: PathBuf,
    /// Where the file was placed
    new_path:      PathBuf,
  },
  /// Processing a file failed
  Failed {
    /// File name being processed
    filename: String,
    /// Human readable failure description
    error:    String,
  },
  /// A file of the batch is done
  BatchProgress {
    /// Number of files handled so far
    current: usize,
    /// Number of files in the batch
    total:   usize,
  },
  /// Every file of the batch is done
  BatchComplete {
    /// Number of files in the batch
    total: usize,
  },
}

/// Runs the organize pipeline.
#[derive(Debug, Clone)]
pub struct Processor {
  retriever:     Arc<Retriever>,
  analyzer:      PDFAnalyzer,
  output_folder: PathBuf,
  naming_format: NamingFormat,
  auto_confirm:  bool,
  transfer:      Transfer,
}

impl Processor {
  /// A processor resolving metadata with `retriever` and placing files in `output_folder`.
  pub fn new(retriever: Retriever, output_folder: impl Into<PathBuf>) -> Self {
    Self {
      retriever:     Arc::new(retriever),
      analyzer:      PDFAnalyzer::new(),
      output_folder: output_folder.into(),
      naming_format: NamingFormat::default(),
      auto_confirm:  false,
      transfer:      Transfer::default(),
    }
  }

  /// A processor set up from the user's preferences.
  pub fn from_config(config: &Config) -> Self {
    Self::new(Retriever::from_config(config), config.output_folder())
      .with_naming_format(config.naming_format.clone())
      .with_auto_confirm(config.auto_confirm)
      .with_transfer(config.transfer())
  }

  /// Places files in `folder`.
  pub fn with_output_folder(mut self, folder: impl Into<PathBuf>) -> Self {
    self.output_folder = folder.into();
    self
  }

  /// Names files with `format`.
  pub fn with_naming_format(mut self, format: NamingFormat) -> Self {
    self.naming_format = format;
    self
  }

  /// Organizes files as soon as their metadata is found.
  pub fn with_auto_confirm(mut self, auto_confirm: bool) -> Self {
    self.auto_confirm = auto_confirm;
    self
  }

  /// Moves or copies files.
  pub fn with_transfer(mut self, transfer: Transfer) -> Self {
    self.transfer = transfer;
    self
  }

  /// Limits how many leading pages are scanned for a DOI.
  pub fn with_max_pages(mut self, max_pages: usize) -> Self {
    self.analyzer = self.analyzer.with_max_pages(max_pages);
    self
  }

  /// Folder organized files are placed in.
  pub fn output_folder(&self) -> &Path { &self.output_folder }

  /// Runs the pipeline for a single file.
  ///
  /// Failures never escape as errors: they end up in [`ProcessingResult::error`] with
  /// [`ProcessingStatus::Failed`] and are reported as [`ProcessingEvent::Failed`].
  pub async fn process_file(
    &self,
    path: impl AsRef<Path>,
    events: Option<&UnboundedSender<ProcessingEvent>>,
  ) -> ProcessingResult {
    let mut result = ProcessingResult::new(path.as_ref());
    emit(events, ProcessingEvent::Started { filename: result.filename.clone() });

    let paper = match self.lookup(&result.original_path).await {
      Ok(paper) => paper,
      Err(e) => {
        fail(&mut result, &e, events);
        return result;
      },
    };

    info!("Found metadata for {}: {paper}", result.filename);
    emit(events, ProcessingEvent::MetadataFound {
      filename: result.filename.clone(),
      paper:    paper.clone(),
    });
    result.metadata = Some(paper);

    if self.auto_confirm {
      // Failures are recorded on the result
      let _ = self.organize(&mut result, None, events);
    } else {
      result.status = ProcessingStatus::AwaitingConfirmation;
      emit(events, ProcessingEvent::ConfirmationNeeded(result.clone()));
    }
    result
  }

  /// Processes `files` in order on the current task.
  pub async fn process_batch(
    &self,
    files: Vec<PathBuf>,
    events: Option<&UnboundedSender<ProcessingEvent>>,
  ) -> Vec<ProcessingResult> {
    let total = files.len();
    let mut results = Vec::with_capacity(total);
    for (index, file) in files.into_iter().enumerate() {
      results.push(self.process_file(&file, events).await);
      emit(events, ProcessingEvent::BatchProgress { current: index + 1, total });
    }
    emit(events, ProcessingEvent::BatchComplete { total });
    results
  }

  /// Processes `files` in order on a spawned worker task.
  ///
  /// The event channel closes once the batch is done, so a receiver loop ends by itself.
  pub fn spawn_batch(
    &self,
    files: Vec<PathBuf>,
    events: UnboundedSender<ProcessingEvent>,
  ) -> JoinHandle<Vec<ProcessingResult>> {
    let processor = self.clone();
    tokio::spawn(async move { processor.process_batch(files, Some(&events)).await })
  }

  /// Organizes a file whose metadata was found.
  ///
  /// `custom_filename` replaces the name generated from the naming format; it is sanitized,
  /// given a `.pdf` extension and never overwrites an existing file. Cancelled and failed
  /// results are rejected with [`BiblioError::NotAwaitingConfirmation`] and left as they are.
  pub fn confirm(
    &self,
    result: &mut ProcessingResult,
    custom_filename: Option<&str>,
  ) -> Result<PathBuf> {
    if result.status == ProcessingStatus::Organized {
      if let Some(new_path) = &result.new_path {
        return Ok(new_path.clone());
      }
    }
    if matches!(result.status, ProcessingStatus::Cancelled | ProcessingStatus::Failed) {
      return Err(BiblioError::NotAwaitingConfirmation(result.filename.clone()));
    }
    self.organize(result, custom_filename.map(str::trim).filter(|name| !name.is_empty()), None)
  }

  /// Marks a result as declined; the file is left untouched.
  pub fn cancel(&self, result: &mut ProcessingResult) {
    if result.status != ProcessingStatus::Organized {
      debug!("Cancelled {}", result.filename);
      result.status = ProcessingStatus::Cancelled;
    }
  }

  async fn lookup(&self, path: &Path) -> Result<Paper> {
    let analyzer = self.analyzer.clone();
    let owned = path.to_path_buf();
    let content = match tokio::task::spawn_blocking(move || analyzer.analyze(owned)).await? {
      Ok(content) => content,
      Err(e) => {
        warn!("Could not read text from {}: {e}", path.display());
        PDFContent::default()
      },
    };

    let doi = content.doi();
    let title = content
      .title_guess()
      .or_else(|| path.file_stem().map(|stem| stem.to_string_lossy().into_owned()));
    debug!("{}: DOI {doi:?}, title guess {title:?}", path.display());

    self.retriever.fetch(doi.as_deref(), title.as_deref()).await
  }

  fn organize(
    &self,
    result: &mut ProcessingResult,
    custom_filename: Option<&str>,
    events: Option<&UnboundedSender<ProcessingEvent>>,
  ) -> Result<PathBuf> {
    let Some(paper) = &result.metadata else {
      let e = BiblioError::MetadataNotFound;
      fail(result, &e, events);
      return Err(e);
    };

    let placed = match custom_filename {
      Some(filename) =>
        place_file(&result.original_path, &self.output_folder, filename, self.transfer),
      None => organize_file(
        &result.original_path,
        paper,
        &self.output_folder,
        &self.naming_format,
        self.transfer,
      ),
    };

    match placed {
      Ok(new_path) => {
        result.new_path = Some(new_path.clone());
        result.error = None;
        result.status = ProcessingStatus::Organized;
        emit(events, ProcessingEvent::Completed {
          original_path: result.original_path.clone(),
          new_path:      new_path.clone(),
        });
        Ok(new_path)
      },
      Err(e) => {
        fail(result, &e, events);
        Err(e)
      },
    }
  }
}

fn emit(events: Option<&UnboundedSender<ProcessingEvent>>, event: ProcessingEvent) {
  if let Some(events) = events {
    if events.send(event).is_err() {
      trace!("Processing event dropped, receiver is gone");
    }
  }
}

fn fail(
  result: &mut ProcessingResult,
  error: &BiblioError,
  events: Option<&UnboundedSender<ProcessingEvent>>,
) {
  warn!("Processing {} failed: {error}", result.filename);
  result.error = Some(error.to_string());
  result.status = ProcessingStatus::Failed;
  emit(events, ProcessingEvent::Failed {
    filename: result.filename.clone(),
    error:    error.to_string(),
  });
}

use super::*;

pub mod cite;
pub mod config;
pub mod export;
pub mod get;
pub mod init;
pub mod organize;
pub mod remove;
pub mod search;
pub mod update;
pub mod watch;

pub use cite::{cite_paper, CiteOptions};
pub use config::{config, ConfigCommands};
pub use export::{export, ExportOptions};
pub use get::get;
pub use init::{init, InitOptions};
pub use organize::{organize, OrganizeOptions};
pub use remove::{remove, RemoveOptions};
pub use search::{search, SearchOptions, SortKey};
pub use update::{check_on_startup, update};
pub use watch::{watch, WatchOptions};

pub(crate) use organize::{record_organized, settle};

/// Available commands for the CLI
#[derive(Subcommand, Clone)]
pub enum Commands {
  /// Create a preferences file
  Init(InitOptions),

  /// Look up metadata for PDFs, then rename and file them
  ///
  /// Examples: "paper.pdf", "~/Downloads/*.pdf", "~/Downloads"
  Organize(OrganizeOptions),

  /// Organize PDFs as they appear in a folder, until Ctrl-C
  Watch(WatchOptions),

  /// List or search the library
  Search(SearchOptions),

  /// Show one library record
  Get {
    /// Record id, as printed by `search`
    id: String,
  },

  /// Remove a record from the library; the PDF stays where it is
  Remove(RemoveOptions),

  /// Print a citation for a library record
  Cite(CiteOptions),

  /// Write citations for several records at once
  Export(ExportOptions),

  /// Inspect and edit preferences
  #[command(subcommand)]
  Config(ConfigCommands),

  /// Check for a newer release
  Update,
}

/// Reads `name` as a citation format, falling back to `default`.
pub(crate) fn citation_format(name: Option<&str>, default: CitationFormat) -> Result<CitationFormat> {
  match name {
    Some(name) => Ok(CitationFormat::from_str(name)?),
    None => Ok(default),
  }
}

/// Opens the library configured in `config`, reporting where it lives.
pub(crate) fn open_library(config: &Config) -> Result<Library> {
  let path = config.library_path();
  trace!("Using library at {}", path.display());
  Ok(Library::open(path)?)
}

/// The record with `id`, or [`BiblioError::PaperNotFound`].
pub(crate) fn find_record(library: &mut Library, id: &str) -> Result<LibraryRecord> {
  Query::by_id(id)
    .execute(library)?
    .into_iter()
    .next()
    .ok_or_else(|| BiblioError::PaperNotFound(id.to_string()).into())
}

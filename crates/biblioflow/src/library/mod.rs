//! The persisted list of organized papers.
//!
//! The library is a single JSON array of [`LibraryRecord`]s. It has no indexes and no
//! locking: every mutation rewrites the whole file. Reads and writes go through the
//! [`LibraryInstruction`] implementations [`Add`], [`Query`] and [`Remove`].
//!
//! ```no_run
//! use biblioflow::{
//!   library::{Add, Library, OrderField, Query, Remove},
//!   paper::Paper,
//!   prelude::*,
//! };
//!
//! # fn example() -> Result<(), BiblioError> {
//! let mut library = Library::open(Library::default_path())?;
//!
//! let paper = Paper { title: "Deep learning".into(), year: Some(2015), ..Default::default() };
//! let id = Add::new(&paper, "/papers/[2015] LeCun - Deep learning.pdf").execute(&mut library)?;
//!
//! let newest_first = Query::list_all().order_by(OrderField::AddedAt).descending();
//! for record in newest_first.execute(&mut library)? {
//!   println!("{} {}", record.id, record.title);
//! }
//!
//! Remove::by_id(&id).execute(&mut library)?;
//! # Ok(())
//! # }
//! ```

use chrono::NaiveDateTime;
use serde::Deserializer;

use super::*;

pub mod instruction;

pub use self::instruction::*;

/// One organized paper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibraryRecord {
  /// Unique id of the form `YYYYMMDDHHMMSS_n`
  pub id:            String,
  /// Paper title
  #[serde(default)]
  pub title:         String,
  /// Author names in publication order
  #[serde(default)]
  pub authors:       Vec<String>,
  /// Publication year
  #[serde(default)]
  pub year:          Option<i32>,
  /// Journal or venue
  #[serde(default)]
  pub journal:       Option<String>,
  /// DOI without resolver prefix
  #[serde(default)]
  pub doi:           Option<String>,
  /// Abstract text
  #[serde(default, rename = "abstract")]
  pub abstract_text: Option<String>,
  /// Where the organized PDF was placed
  #[serde(default)]
  pub file_path:     PathBuf,
  /// When the record was added
  #[serde(deserialize_with = "local_timestamp")]
  pub added_at:      DateTime<Local>,
}

impl LibraryRecord {
  /// The paper metadata of this record.
  pub fn to_paper(&self) -> Paper {
    Paper {
      title:         self.title.clone(),
      authors:       self.authors.clone(),
      year:          self.year,
      journal:       self.journal.clone(),
      doi:           self.doi.clone(),
      abstract_text: self.abstract_text.clone(),
    }
  }

  /// Whether `needle` (already lowercase) occurs in the title, an author, the journal or the DOI.
  fn matches(&self, needle: &str) -> bool {
    self.title.to_lowercase().contains(needle)
      || self.authors.iter().any(|author| author.to_lowercase().contains(needle))
      || self.journal.as_deref().is_some_and(|journal| journal.to_lowercase().contains(needle))
      || self.doi.as_deref().is_some_and(|doi| doi.to_lowercase().contains(needle))
  }
}

/// Handle to a library file and its records.
#[derive(Debug)]
pub struct Library {
  path:    PathBuf,
  records: Vec<LibraryRecord>,
}

impl Library {
  /// Loads the library stored at `path`.
  ///
  /// A missing file is an empty library; it is created on the first write. A file that
  /// cannot be parsed is reported as an error and left untouched.
  pub fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref().to_path_buf();
    let records = if path.exists() {
      let content = std::fs::read_to_string(&path)?;
      if content.trim().is_empty() {
        Vec::new()
      } else {
        serde_json::from_str(&content)?
      }
    } else {
      Vec::new()
    };
    debug!("Opened library {} with {} records", path.display(), records.len());
    Ok(Self { path, records })
  }

  /// Platform location of the library file.
  ///
  /// - Linux: `~/.local/share/biblioflow/library.json`
  /// - macOS: `~/Library/Application Support/biblioflow/library.json`
  /// - Windows: `%APPDATA%\biblioflow\library.json`
  pub fn default_path() -> PathBuf {
    dirs::data_dir().unwrap_or_else(|| PathBuf::from(".")).join("biblioflow").join("library.json")
  }

  /// File this library is stored in.
  pub fn path(&self) -> &Path { &self.path }

  /// All records in insertion order.
  pub fn records(&self) -> &[LibraryRecord] { &self.records }

  /// Number of records.
  pub fn count(&self) -> usize { self.records.len() }

  /// Writes all records to disk.
  ///
  /// The JSON is written to a sibling temporary file first and then renamed over the
  /// library, so an interrupted write never leaves a truncated library behind.
  pub fn save(&self) -> Result<()> {
    if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
      std::fs::create_dir_all(parent)?;
    }
    let mut temp = self.path.clone().into_os_string();
    temp.push(".tmp");
    let temp = PathBuf::from(temp);

    std::fs::write(&temp, serde_json::to_string_pretty(&self.records)?)?;
    std::fs::rename(&temp, &self.path)?;
    trace!("Saved {} records to {}", self.records.len(), self.path.display());
    Ok(())
  }
}

/// Accepts RFC 3339 timestamps as well as offset-less ISO 8601 ones, read as local time.
fn local_timestamp<'de, D>(deserializer: D) -> core::result::Result<DateTime<Local>, D::Error>
where D: Deserializer<'de> {
  let raw = String::deserialize(deserializer)?;
  if let Ok(timestamp) = DateTime::parse_from_rfc3339(&raw) {
    return Ok(timestamp.with_timezone(&Local));
  }
  NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
    .ok()
    .and_then(|naive| naive.and_local_timezone(Local).earliest())
    .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp {raw:?}")))
}

//! Citation strings for organized papers.
//!
//! Four styles are supported: BibTeX entries, APA 7th edition and IEEE reference strings
//! (journal names are marked up as Markdown italics) and RIS records for reference
//! managers.
//!
//! ```
//! use biblioflow::{
//!   citation::{cite, CitationFormat},
//!   paper::Paper,
//! };
//!
//! let paper = Paper {
//!   title: "Machine Learning for Research".into(),
//!   authors: vec!["John Smith".into(), "Mary Jones".into()],
//!   year: Some(2024),
//!   journal: Some("Nature".into()),
//!   doi: Some("10.1038/xxxxx".into()),
//!   abstract_text: None,
//! };
//!
//! assert_eq!(
//!   cite(&paper, CitationFormat::Apa),
//!   "Smith, J., & Jones, M. (2024). Machine Learning for Research. *Nature*. https://doi.org/10.1038/xxxxx"
//! );
//! assert!(cite(&paper, CitationFormat::Bibtex).starts_with("@article{Smith2024,"));
//! ```

use super::*;
use crate::paper::{given_names, last_name};

mod apa;
mod bibtex;
mod ieee;
mod ris;

pub use self::{apa::apa, bibtex::*, ieee::ieee, ris::*};

/// A citation style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CitationFormat {
  /// BibTeX `@article` entry
  #[default]
  Bibtex,
  /// APA 7th edition reference
  #[serde(alias = "apa7")]
  Apa,
  /// IEEE reference
  Ieee,
  /// RIS tagged record
  Ris,
}

impl CitationFormat {
  /// All styles, in menu order.
  pub const ALL: [CitationFormat; 4] =
    [CitationFormat::Bibtex, CitationFormat::Apa, CitationFormat::Ieee, CitationFormat::Ris];

  /// File extension conventionally used for exports in this style.
  pub fn extension(&self) -> &'static str {
    match self {
      CitationFormat::Bibtex => "bib",
      CitationFormat::Ris => "ris",
      CitationFormat::Apa | CitationFormat::Ieee => "txt",
    }
  }
}

impl Display for CitationFormat {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let name = match self {
      CitationFormat::Bibtex => "bibtex",
      CitationFormat::Apa => "apa",
      CitationFormat::Ieee => "ieee",
      CitationFormat::Ris => "ris",
    };
    write!(f, "{name}")
  }
}

impl FromStr for CitationFormat {
  type Err = BiblioError;

  fn from_str(s: &str) -> Result<Self> {
    match s.trim().to_lowercase().as_str() {
      "bibtex" | "bib" => Ok(CitationFormat::Bibtex),
      "apa" | "apa7" => Ok(CitationFormat::Apa),
      "ieee" => Ok(CitationFormat::Ieee),
      "ris" => Ok(CitationFormat::Ris),
      _ => Err(BiblioError::UnknownFormat(s.to_string())),
    }
  }
}

/// Citation of `paper` in `format`.
pub fn cite(paper: &Paper, format: CitationFormat) -> String {
  match format {
    CitationFormat::Bibtex => bibtex(paper),
    CitationFormat::Apa => apa(paper),
    CitationFormat::Ieee => ieee(paper),
    CitationFormat::Ris => ris(paper),
  }
}

/// Citations of several papers, separated by blank lines.
pub fn cite_batch<'a>(papers: impl IntoIterator<Item = &'a Paper>, format: CitationFormat) -> String {
  papers.into_iter().map(|paper| cite(paper, format)).collect::<Vec<_>>().join("\n\n")
}

/// `"Family, Given Names"` for a `"Given Names Family"` display name.
fn inverted_name(name: &str) -> String {
  let given = given_names(name);
  if given.is_empty() {
    name.trim().to_string()
  } else {
    format!("{}, {}", last_name(name), given.join(" "))
  }
}

/// Initials of the given names, each followed by a period: `["John", "Ronald"]` is `J. R.`.
fn initials(given: &[&str]) -> String {
  given
    .iter()
    .filter_map(|part| part.chars().next())
    .map(|c| format!("{}.", c.to_uppercase()))
    .collect::<Vec<_>>()
    .join(" ")
}

//! Core paper metadata.
//!
//! A [`Paper`] is what a metadata lookup produces and what every later step consumes: the
//! filename template, the library record and the citation formatters all read from it.
//! Authors are kept as display names (`"Given Family"`), in publication order.
//!
//! # Examples
//!
//! ```
//! use biblioflow::paper::Paper;
//!
//! let paper = Paper {
//!   title:         "Deep learning".into(),
//!   authors:       vec!["Yann LeCun".into(), "Yoshua Bengio".into(), "Geoffrey Hinton".into()],
//!   year:          Some(2015),
//!   journal:       Some("Nature".into()),
//!   doi:           Some("10.1038/nature14539".into()),
//!   abstract_text: None,
//! };
//!
//! assert_eq!(paper.first_author(), "LeCun");
//! assert_eq!(paper.author_string(), "LeCun et al.");
//! ```

use super::*;

/// Metadata describing a single research paper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Paper {
  /// The paper's full title
  pub title:         String,
  /// Author display names in publication order
  #[serde(default)]
  pub authors:       Vec<String>,
  /// Publication year, when the source knows it
  #[serde(default)]
  pub year:          Option<i32>,
  /// Journal, proceedings or venue name
  #[serde(default)]
  pub journal:       Option<String>,
  /// Digital Object Identifier
  #[serde(default)]
  pub doi:           Option<String>,
  /// Abstract as plain text
  #[serde(default, rename = "abstract")]
  pub abstract_text: Option<String>,
}

impl Paper {
  /// Last name of the first author, or `"Unknown"` when the paper lists no authors.
  ///
  /// The last whitespace-separated token of the name is taken as the family name.
  pub fn first_author(&self) -> String {
    match self.authors.first() {
      Some(name) => last_name(name).to_string(),
      None => "Unknown".to_string(),
    }
  }

  /// Short author label used in filenames.
  ///
  /// - no authors: `Unknown`
  /// - one author: `Smith`
  /// - two authors: `Smith & Jones`
  /// - three or more: `Smith et al.`
  pub fn author_string(&self) -> String {
    match self.authors.as_slice() {
      [] => "Unknown".to_string(),
      [_] => self.first_author(),
      [first, second] => format!("{} & {}", last_name(first), last_name(second)),
      _ => format!("{} et al.", self.first_author()),
    }
  }

  /// The DOI as an `https://doi.org/` link.
  pub fn doi_url(&self) -> Option<String> {
    self.doi.as_ref().map(|doi| format!("https://doi.org/{doi}"))
  }
}

impl Display for Paper {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self.year {
      Some(year) => write!(f, "{} ({year}) {}", self.author_string(), self.title),
      None => write!(f, "{} (n.d.) {}", self.author_string(), self.title),
    }
  }
}

/// Family name of a `"Given Family"` display name.
///
/// Falls back to the whole (trimmed) string when it has no whitespace-separated tokens.
pub fn last_name(name: &str) -> &str { name.split_whitespace().last().unwrap_or(name.trim()) }

/// Given-name tokens of a display name, i.e. everything but the last token.
pub(crate) fn given_names(name: &str) -> Vec<&str> {
  let parts: Vec<&str> = name.split_whitespace().collect();
  match parts.split_last() {
    Some((_, given)) => given.to_vec(),
    None => Vec::new(),
  }
}

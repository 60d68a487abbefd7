//! Filename sanitizing and naming templates.
//!
//! A [`NamingFormat`] is a template with `{placeholder}` fields that [`generate_filename`]
//! fills from a [`Paper`]. Three presets are built in; any other template string is used
//! verbatim.
//!
//! ```
//! use biblioflow::{
//!   format::{generate_filename, NamingFormat},
//!   paper::Paper,
//! };
//!
//! let paper = Paper {
//!   title: "Machine Learning for Research".into(),
//!   authors: vec!["John Smith".into()],
//!   year: Some(2024),
//!   ..Default::default()
//! };
//!
//! assert_eq!(
//!   generate_filename(&paper, &NamingFormat::Default),
//!   "[2024] Smith - Machine Learning for Research.pdf"
//! );
//! assert_eq!(
//!   generate_filename(&paper, &NamingFormat::Underscore),
//!   "Smith_2024_Machine Learning for Research.pdf"
//! );
//! ```

use super::*;

/// Default upper bound, in characters, for a sanitized filename component.
pub const MAX_FILENAME_LENGTH: usize = 200;

/// Titles longer than this many characters are shortened in filenames.
pub const MAX_TITLE_LENGTH: usize = 100;

lazy_static! {
  static ref INVALID_CHARS: Regex = Regex::new(r#"[<>:"/\\|?*\x00-\x1F\x7F]"#).unwrap();
  static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

/// Template used to name organized files.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NamingFormat {
  /// `[{year}] {author} - {title}.pdf`
  #[default]
  Default,
  /// `{author}_{year}_{title}.pdf`
  Underscore,
  /// `{title} ({year}).pdf`
  TitleFirst,
  /// A user-supplied template.
  ///
  /// Supports `{year}`, `{author}`, `{first_author}`, `{title}`, `{journal}` and `{doi}`.
  Custom(String),
}

impl NamingFormat {
  /// The template string this format fills in.
  pub fn template(&self) -> &str {
    match self {
      NamingFormat::Default => "[{year}] {author} - {title}.pdf",
      NamingFormat::Underscore => "{author}_{year}_{title}.pdf",
      NamingFormat::TitleFirst => "{title} ({year}).pdf",
      NamingFormat::Custom(template) => template,
    }
  }

  /// The name the format is stored under in the preferences.
  pub fn name(&self) -> &str {
    match self {
      NamingFormat::Default => "default",
      NamingFormat::Underscore => "underscore",
      NamingFormat::TitleFirst => "title_first",
      NamingFormat::Custom(template) => template,
    }
  }
}

impl From<String> for NamingFormat {
  /// Preset names map to presets, strings with placeholders become custom templates and
  /// anything else falls back to the default preset.
  fn from(value: String) -> Self {
    match value.trim() {
      "default" => NamingFormat::Default,
      "underscore" => NamingFormat::Underscore,
      "title_first" => NamingFormat::TitleFirst,
      template if template.contains('{') && template.contains('}') =>
        NamingFormat::Custom(template.to_string()),
      other => {
        warn!("Unknown naming format {other:?}, using the default format");
        NamingFormat::Default
      },
    }
  }
}

impl From<NamingFormat> for String {
  fn from(value: NamingFormat) -> Self { value.name().to_string() }
}

impl FromStr for NamingFormat {
  type Err = BiblioError;

  /// Strict parsing for user input: unknown names are rejected instead of defaulted.
  fn from_str(s: &str) -> Result<Self> {
    match s.trim() {
      "default" | "underscore" | "title_first" => Ok(NamingFormat::from(s.to_string())),
      template if template.contains('{') && template.contains('}') =>
        Ok(NamingFormat::Custom(template.to_string())),
      other => Err(BiblioError::UnknownFormat(other.to_string())),
    }
  }
}

impl Display for NamingFormat {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.template())
  }
}

/// Makes `name` safe to use as (part of) a filename.
///
/// Characters that are invalid on common file systems are removed, whitespace runs become a
/// single space and the ends are trimmed. Names longer than `max_length` characters are cut
/// at the last word boundary before the limit.
pub fn sanitize_filename(name: &str, max_length: usize) -> String {
  let sanitized = INVALID_CHARS.replace_all(name, "");
  let sanitized = WHITESPACE.replace_all(&sanitized, " ");
  let sanitized = sanitized.trim();

  if sanitized.chars().count() > max_length {
    truncate_at_word(sanitized, max_length).to_string()
  } else {
    sanitized.to_string()
  }
}

/// Fills the template of `format` with the metadata of `paper`.
pub fn generate_filename(paper: &Paper, format: &NamingFormat) -> String {
  let year = paper.year.map_or_else(|| "Unknown".to_string(), |year| year.to_string());
  let author = sanitize_filename(&paper.author_string(), MAX_FILENAME_LENGTH);
  let first_author = sanitize_filename(&paper.first_author(), MAX_FILENAME_LENGTH);
  let journal = sanitize_filename(paper.journal.as_deref().unwrap_or_default(), MAX_FILENAME_LENGTH);
  let doi = sanitize_filename(paper.doi.as_deref().unwrap_or_default(), MAX_FILENAME_LENGTH);

  let mut title = sanitize_filename(&paper.title, MAX_FILENAME_LENGTH);
  if title.chars().count() > MAX_TITLE_LENGTH {
    title = format!("{}...", truncate_at_word(&title, MAX_TITLE_LENGTH));
  }

  let filename = format
    .template()
    .replace("{year}", &year)
    .replace("{author}", &author)
    .replace("{first_author}", &first_author)
    .replace("{journal}", &journal)
    .replace("{doi}", &doi)
    .replace("{title}", &title);

  let filename = match format {
    NamingFormat::Custom(_) => ensure_pdf_extension(filename.trim()),
    _ => filename,
  };
  trace!("Generated filename {filename:?} with template {:?}", format.template());
  filename
}

/// Appends `.pdf` unless `filename` already ends with it (case-insensitively).
pub fn ensure_pdf_extension(filename: &str) -> String {
  if filename.to_lowercase().ends_with(".pdf") {
    filename.to_string()
  } else {
    format!("{filename}.pdf")
  }
}

/// First `max_chars` characters of `s`, without the partial word at the cut.
///
/// When the cut text contains no space at all it is returned whole.
fn truncate_at_word(s: &str, max_chars: usize) -> &str {
  let end = s.char_indices().nth(max_chars).map_or(s.len(), |(idx, _)| idx);
  let cut = &s[..end];
  match cut.rfind(' ') {
    Some(space) => &cut[..space],
    None => cut,
  }
}

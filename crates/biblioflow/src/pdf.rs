//! PDF text extraction and DOI matching.
//!
//! Only the first pages of a paper are scraped: the DOI of a journal article is printed in
//! the header or footer of its first page, and the title is usually the first line of text.
//!
//! ```no_run
//! use biblioflow::pdf::{extract_doi_from_text, PDFAnalyzer};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let content = PDFAnalyzer::new().analyze("paper.pdf")?;
//! println!("DOI: {:?}", content.doi());
//! println!("Title guess: {:?}", content.title_guess());
//!
//! assert_eq!(
//!   extract_doi_from_text("see https://doi.org/10.1038/nature14539."),
//!   Some("10.1038/nature14539".to_string())
//! );
//! # Ok(())
//! # }
//! ```

use lopdf::{Dictionary, Document, Object};

use super::*;

/// Number of pages scanned for a DOI when nothing else is specified.
pub const DEFAULT_MAX_PAGES: usize = 2;

lazy_static! {
  /// Pattern matching a DOI anywhere in free text.
  static ref DOI_PATTERN: Regex = Regex::new(r"(?i)10\.\d{4,9}/[-._;()/:A-Z0-9]+").unwrap();
}

/// Text and document information scraped from a PDF.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PDFContent {
  /// Entries of the document information dictionary
  pub metadata: PDFMetadata,
  /// Text of the scanned pages, in page order
  pub pages:    Vec<PageContent>,
}

/// The document information dictionary of a PDF.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PDFMetadata {
  /// `/Title`
  pub title:    Option<String>,
  /// `/Author`
  pub author:   Option<String>,
  /// `/Subject`
  pub subject:  Option<String>,
  /// `/Keywords`
  pub keywords: Option<String>,
}

/// Extracted text of one page.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PageContent {
  /// One-based page number
  pub page_number: u32,
  /// Plain text of the page
  pub text:        String,
}

/// Reads PDFs with lopdf.
#[derive(Debug, Clone)]
pub struct PDFAnalyzer {
  max_pages: usize,
}

impl Default for PDFAnalyzer {
  fn default() -> Self { Self { max_pages: DEFAULT_MAX_PAGES } }
}

impl PDFAnalyzer {
  /// An analyzer scanning the first [`DEFAULT_MAX_PAGES`] pages.
  pub fn new() -> Self { Self::default() }

  /// Limits how many leading pages are scanned.
  pub fn with_max_pages(mut self, max_pages: usize) -> Self {
    self.max_pages = max_pages;
    self
  }

  /// Loads the document at `path` and extracts its leading pages and information dictionary.
  ///
  /// A page whose content cannot be decoded contributes empty text instead of failing the
  /// whole document; only an unreadable file is an error.
  pub fn analyze<P: AsRef<Path>>(&self, path: P) -> Result<PDFContent> {
    let path = path.as_ref();
    debug!("Analyzing PDF at {}", path.display());
    let doc = Document::load(path)?;

    let metadata = self.extract_metadata(&doc);
    let pages = doc
      .get_pages()
      .into_keys()
      .take(self.max_pages)
      .map(|page_number| {
        let text = doc.extract_text(&[page_number]).unwrap_or_else(|e| {
          warn!("Could not extract text of page {page_number} in {}: {e}", path.display());
          String::new()
        });
        PageContent { page_number, text }
      })
      .collect::<Vec<_>>();

    trace!("Extracted {} page(s) from {}", pages.len(), path.display());
    Ok(PDFContent { metadata, pages })
  }

  fn extract_metadata(&self, doc: &Document) -> PDFMetadata {
    let info = match doc.trailer.get(b"Info") {
      Ok(Object::Reference(id)) => doc.get_object(*id).and_then(Object::as_dict).ok(),
      Ok(Object::Dictionary(dict)) => Some(dict),
      _ => None,
    };

    let Some(info) = info else {
      return PDFMetadata::default();
    };

    PDFMetadata {
      title:    text_from_dict(info, "Title"),
      author:   text_from_dict(info, "Author"),
      subject:  text_from_dict(info, "Subject"),
      keywords: text_from_dict(info, "Keywords"),
    }
  }
}

impl PDFContent {
  /// All scanned text, pages joined by newlines.
  pub fn text(&self) -> String {
    self.pages.iter().map(|page| page.text.as_str()).collect::<Vec<_>>().join("\n")
  }

  /// The first DOI found in the scanned text.
  pub fn doi(&self) -> Option<String> { extract_doi_from_text(&self.text()) }

  /// Best guess at the paper title.
  ///
  /// The first non-empty line of the first page, falling back to the `/Title` entry of the
  /// information dictionary.
  pub fn title_guess(&self) -> Option<String> {
    self
      .pages
      .first()
      .and_then(|page| page.text.lines().map(str::trim).find(|line| !line.is_empty()))
      .map(String::from)
      .or_else(|| self.metadata.title.clone().filter(|title| !title.trim().is_empty()))
  }
}

/// Extracts the first DOI found in `text`.
///
/// Punctuation that ends a sentence (`.`, `,`, `;`, `:`) and a closing parenthesis without a
/// matching opening one are not considered part of the DOI.
pub fn extract_doi_from_text(text: &str) -> Option<String> {
  let found = DOI_PATTERN.find(text)?.as_str();
  let mut doi = found;
  loop {
    let trimmed = doi.trim_end_matches(['.', ',', ';', ':']);
    let trimmed = if trimmed.ends_with(')') && trimmed.matches('(').count() < trimmed.matches(')').count() {
      &trimmed[..trimmed.len() - 1]
    } else {
      trimmed
    };
    if trimmed == doi {
      break;
    }
    doi = trimmed;
  }
  trace!("Matched DOI {doi:?} (raw match {found:?})");
  Some(doi.to_string())
}

/// Reads a DOI out of user input such as `10.1000/xyz`, `doi:10.1000/xyz` or
/// `https://doi.org/10.1000/xyz`.
pub fn normalize_doi(input: &str) -> Result<String> {
  extract_doi_from_text(input.trim()).ok_or_else(|| BiblioError::InvalidDoi(input.to_string()))
}

/// Text of the first `max_pages` pages of the PDF at `path`.
pub fn extract_text_from_pdf(path: impl AsRef<Path>, max_pages: usize) -> Result<String> {
  Ok(PDFAnalyzer::new().with_max_pages(max_pages).analyze(path)?.text())
}

/// The first DOI printed on the leading pages of the PDF at `path`.
pub fn extract_doi_from_pdf(path: impl AsRef<Path>) -> Result<Option<String>> {
  Ok(PDFAnalyzer::new().analyze(path)?.doi())
}

/// Decodes a text string entry, honoring the UTF-16BE byte order mark.
fn text_from_dict(dict: &Dictionary, key: &str) -> Option<String> {
  let bytes = dict.get(key.as_bytes()).ok()?.as_str().ok()?;
  let text = match bytes.strip_prefix(&[0xFE, 0xFF]) {
    Some(utf16) => {
      let units = utf16.chunks_exact(2).map(|pair| u16::from_be_bytes([pair[0], pair[1]]));
      char::decode_utf16(units).map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER)).collect()
    },
    None => String::from_utf8_lossy(bytes).into_owned(),
  };
  Some(text)
}

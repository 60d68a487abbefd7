//! Paper metadata lookup.
//!
//! A [`Retriever`] asks an ordered list of [`MetadataSource`]s for a paper, first by DOI and
//! then by title, and returns the first answer. The default chain is [`Crossref`] followed by
//! [`SemanticScholar`]: CrossRef is authoritative for DOIs, Semantic Scholar has a usable
//! title search.
//!
//! # Examples
//!
//! ```no_run
//! use biblioflow::retriever::Retriever;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let retriever = Retriever::new();
//!
//! // By DOI, falling back to the title when the DOI is unknown
//! let paper = retriever.fetch(Some("10.1038/nature14539"), Some("Deep learning")).await?;
//! println!("{paper}");
//!
//! // By title only
//! let paper = retriever.fetch(None, Some("Attention is all you need")).await?;
//! println!("{:?}", paper.doi);
//! # Ok(())
//! # }
//! ```
//!
//! Sources can be pointed at other hosts, which is how the tests talk to mock servers:
//!
//! ```
//! use biblioflow::retriever::{Crossref, Retriever, SemanticScholar};
//!
//! let retriever = Retriever::empty()
//!   .with_source(Crossref::new().with_base_url("http://localhost:8080"))
//!   .with_source(SemanticScholar::new().with_base_url("http://localhost:8081"));
//! assert_eq!(retriever.source_names(), vec!["CrossRef", "Semantic Scholar"]);
//! ```

use std::time::Duration;

use reqwest::{Response, StatusCode};

use super::*;
use crate::config::Config;

mod crossref;
mod semantic_scholar;

pub use crossref::Crossref;
pub use semantic_scholar::SemanticScholar;

/// Timeout applied to every metadata request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

lazy_static! {
  static ref MARKUP: Regex = Regex::new(r"<[^>]+>").unwrap();
  static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
  static ref SPACE_BEFORE_PUNCTUATION: Regex = Regex::new(r"\s+([.,;:!?)])").unwrap();
}

/// A bibliographic service that can resolve papers.
///
/// Both lookups default to [`BiblioError::Unsupported`], so a source only implements what
/// its API offers.
#[async_trait]
pub trait MetadataSource: Send + Sync {
  /// Human readable name of the service, used in logs and error messages.
  fn name(&self) -> &str;

  /// Resolves a paper from its DOI.
  async fn by_doi(&self, _doi: &str) -> Result<Paper> {
    Err(BiblioError::Unsupported(self.name().to_string()))
  }

  /// Resolves the best match for a title.
  async fn by_title(&self, _title: &str) -> Result<Paper> {
    Err(BiblioError::Unsupported(self.name().to_string()))
  }
}

/// Ordered collection of metadata sources.
pub struct Retriever {
  sources: Vec<Box<dyn MetadataSource>>,
}

impl Default for Retriever {
  fn default() -> Self { Self::new() }
}

impl std::fmt::Debug for Retriever {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Retriever").field("sources", &self.source_names()).finish()
  }
}

impl Retriever {
  /// CrossRef followed by Semantic Scholar, both at their public endpoints.
  pub fn new() -> Self { Self::empty().with_source(Crossref::new()).with_source(SemanticScholar::new()) }

  /// A retriever without any sources.
  pub fn empty() -> Self { Self { sources: Vec::new() } }

  /// CrossRef followed by Semantic Scholar, at the endpoints named in `config`.
  pub fn from_config(config: &Config) -> Self {
    let client = http_client();
    Self::empty()
      .with_source(Crossref::new().with_client(client.clone()).with_base_url(&config.crossref_api))
      .with_source(
        SemanticScholar::new().with_client(client).with_base_url(&config.semantic_scholar_api),
      )
  }

  /// Appends a source to the end of the chain.
  pub fn with_source(mut self, source: impl MetadataSource + 'static) -> Self {
    self.sources.push(Box::new(source));
    self
  }

  /// Whether the chain has no sources.
  pub fn is_empty(&self) -> bool { self.sources.is_empty() }

  /// Names of the configured sources, in query order.
  pub fn source_names(&self) -> Vec<&str> { self.sources.iter().map(|s| s.name()).collect() }

  /// Looks a paper up by DOI and then by title.
  ///
  /// Every source is asked for the DOI before any source is asked for the title. The first
  /// successful answer wins; individual failures are logged and skipped. When nothing
  /// answers, [`BiblioError::MetadataNotFound`] is returned.
  pub async fn fetch(&self, doi: Option<&str>, title: Option<&str>) -> Result<Paper> {
    if let Some(doi) = doi {
      for source in &self.sources {
        match source.by_doi(doi).await {
          Ok(paper) => {
            debug!("{} resolved DOI {doi}", source.name());
            return Ok(paper);
          },
          Err(BiblioError::Unsupported(_)) => trace!("{} has no DOI lookup", source.name()),
          Err(e) => warn!("{} lookup for DOI {doi} failed: {e}", source.name()),
        }
      }
    }

    if let Some(title) = title.map(str::trim).filter(|t| !t.is_empty()) {
      for source in &self.sources {
        match source.by_title(title).await {
          Ok(paper) => {
            debug!("{} resolved title {title:?}", source.name());
            return Ok(paper);
          },
          Err(BiblioError::Unsupported(_)) => trace!("{} has no title search", source.name()),
          Err(e) => warn!("{} lookup for title {title:?} failed: {e}", source.name()),
        }
      }
    }

    Err(BiblioError::MetadataNotFound)
  }
}

/// HTTP client shared by the built-in sources.
pub fn http_client() -> reqwest::Client {
  reqwest::Client::builder()
    .timeout(REQUEST_TIMEOUT)
    .user_agent(format!("biblioflow/{VERSION} (+https://github.com/logando-al/biblioFlow)"))
    .build()
    .unwrap_or_else(|e| {
      warn!("Falling back to a default HTTP client: {e}");
      reqwest::Client::new()
    })
}

/// Turns error statuses into errors: 404 means the service does not know the paper.
async fn check_status(source: &str, response: Response) -> Result<Response> {
  let status = response.status();
  if status == StatusCode::NOT_FOUND {
    return Err(BiblioError::MetadataNotFound);
  }
  if !status.is_success() {
    let body = response.text().await.unwrap_or_default();
    trace!("{source} error body: {body}");
    return Err(BiblioError::ApiError(format!("{source} responded with {status}")));
  }
  Ok(response)
}

/// Strips XML/HTML markup (e.g. JATS in CrossRef abstracts) and normalizes whitespace.
fn plain_text(text: &str) -> String {
  let stripped = MARKUP.replace_all(text, " ");
  let collapsed = WHITESPACE.replace_all(&stripped, " ");
  SPACE_BEFORE_PUNCTUATION.replace_all(&collapsed, "$1").trim().to_string()
}

/// `Some` for strings that are not blank after cleanup.
fn non_empty(text: Option<&str>) -> Option<String> {
  text.map(plain_text).filter(|t| !t.is_empty())
}

/// Base URL without a trailing slash.
fn trim_base(url: &str) -> String { url.trim_end_matches('/').to_string() }

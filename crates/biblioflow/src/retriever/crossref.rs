//! CrossRef works API.

use reqwest::header::ACCEPT;

use super::*;

/// Looks DOIs up in the CrossRef REST API (`/works/{doi}`).
#[derive(Debug, Clone)]
pub struct Crossref {
  client:   reqwest::Client,
  base_url: String,
}

/// Top level of a `/works/{doi}` response.
#[derive(Debug, Deserialize)]
struct WorkResponse {
  message: Work,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct Work {
  #[serde(default)]
  title:            Vec<String>,
  #[serde(default)]
  author:           Vec<WorkAuthor>,
  published_print:  Option<DateParts>,
  published_online: Option<DateParts>,
  issued:           Option<DateParts>,
  #[serde(default)]
  container_title:  Vec<String>,
  #[serde(rename = "abstract")]
  abstract_text:    Option<String>,
}

#[derive(Debug, Deserialize)]
struct WorkAuthor {
  given:  Option<String>,
  family: Option<String>,
  /// Set for organizations instead of given/family
  name:   Option<String>,
}

#[derive(Debug, Deserialize)]
struct DateParts {
  #[serde(rename = "date-parts", default)]
  date_parts: Vec<Vec<Option<i32>>>,
}

impl Default for Crossref {
  fn default() -> Self { Self::new() }
}

impl Crossref {
  /// Public CrossRef API endpoint.
  pub const DEFAULT_BASE_URL: &'static str = "https://api.crossref.org";

  /// A client for the public endpoint.
  pub fn new() -> Self { Self { client: http_client(), base_url: Self::DEFAULT_BASE_URL.into() } }

  /// Sends requests to `base_url` instead of the public endpoint.
  pub fn with_base_url(mut self, base_url: &str) -> Self {
    self.base_url = trim_base(base_url);
    self
  }

  /// Reuses an existing HTTP client.
  pub fn with_client(mut self, client: reqwest::Client) -> Self {
    self.client = client;
    self
  }
}

#[async_trait]
impl MetadataSource for Crossref {
  fn name(&self) -> &str { "CrossRef" }

  async fn by_doi(&self, doi: &str) -> Result<Paper> {
    let url = format!("{}/works/{doi}", self.base_url);
    debug!("Querying CrossRef: {url}");

    let response = self.client.get(&url).header(ACCEPT, "application/json").send().await?;
    let response = check_status(self.name(), response).await?;
    let body: WorkResponse = response.json().await?;

    Ok(body.message.into_paper(doi))
  }
}

impl Work {
  fn into_paper(self, doi: &str) -> Paper {
    let authors = self
      .author
      .into_iter()
      .filter_map(|author| match (author.family.as_deref().map(str::trim), author.name) {
        (Some(family), _) if !family.is_empty() => {
          let given = author.given.as_deref().unwrap_or_default();
          Some(format!("{given} {family}").trim().to_string())
        },
        (_, Some(name)) if !name.trim().is_empty() => Some(name.trim().to_string()),
        _ => None,
      })
      .collect();

    let year = [self.published_print, self.published_online, self.issued]
      .into_iter()
      .flatten()
      .find_map(|date| date.year());

    Paper {
      title: non_empty(self.title.first().map(String::as_str)).unwrap_or_else(|| "Untitled".into()),
      authors,
      year,
      journal: non_empty(self.container_title.first().map(String::as_str)),
      doi: Some(doi.to_string()),
      abstract_text: non_empty(self.abstract_text.as_deref()),
    }
  }
}

impl DateParts {
  fn year(&self) -> Option<i32> { self.date_parts.first()?.first().copied().flatten() }
}

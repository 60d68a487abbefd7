//! Semantic Scholar graph API.

use super::*;

const FIELDS: &str = "title,authors,year,venue,externalIds,abstract";

/// Title search and DOI lookup against the Semantic Scholar graph API.
#[derive(Debug, Clone)]
pub struct SemanticScholar {
  client:   reqwest::Client,
  base_url: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
  #[serde(default)]
  data: Vec<GraphPaper>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GraphPaper {
  title:         Option<String>,
  #[serde(default)]
  authors:       Vec<GraphAuthor>,
  year:          Option<i32>,
  venue:         Option<String>,
  external_ids:  Option<ExternalIds>,
  #[serde(rename = "abstract")]
  abstract_text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GraphAuthor {
  name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ExternalIds {
  #[serde(rename = "DOI")]
  doi: Option<String>,
}

impl Default for SemanticScholar {
  fn default() -> Self { Self::new() }
}

impl SemanticScholar {
  /// Public Semantic Scholar API endpoint.
  pub const DEFAULT_BASE_URL: &'static str = "https://api.semanticscholar.org";

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
impl MetadataSource for SemanticScholar {
  fn name(&self) -> &str { "Semantic Scholar" }

  async fn by_doi(&self, doi: &str) -> Result<Paper> {
    let url = format!("{}/graph/v1/paper/DOI:{doi}", self.base_url);
    debug!("Querying Semantic Scholar: {url}");

    let response = self.client.get(&url).query(&[("fields", FIELDS)]).send().await?;
    let response = check_status(self.name(), response).await?;
    let paper: GraphPaper = response.json().await?;

    let mut paper = paper.into_paper();
    paper.doi.get_or_insert_with(|| doi.to_string());
    Ok(paper)
  }

  async fn by_title(&self, title: &str) -> Result<Paper> {
    let url = format!("{}/graph/v1/paper/search", self.base_url);
    debug!("Searching Semantic Scholar for {title:?}");

    let response = self
      .client
      .get(&url)
      .query(&[("query", title), ("limit", "1"), ("fields", FIELDS)])
      .send()
      .await?;
    let response = check_status(self.name(), response).await?;
    let body: SearchResponse = response.json().await?;

    body.data.into_iter().next().map(GraphPaper::into_paper).ok_or(BiblioError::MetadataNotFound)
  }
}

impl GraphPaper {
  fn into_paper(self) -> Paper {
    Paper {
      title:         non_empty(self.title.as_deref()).unwrap_or_else(|| "Untitled".into()),
      authors:       self
        .authors
        .into_iter()
        .filter_map(|author| non_empty(author.name.as_deref()))
        .collect(),
      year:          self.year,
      journal:       non_empty(self.venue.as_deref()),
      doi:           self.external_ids.and_then(|ids| ids.doi).filter(|doi| !doi.trim().is_empty()),
      abstract_text: non_empty(self.abstract_text.as_deref()),
    }
  }
}

//! Checking for a newer release.
//!
//! Only the check is implemented; downloading and installing a release is left to the
//! user's package manager.

use reqwest::{header::ACCEPT, StatusCode};

use super::*;
use crate::retriever::http_client;

/// Latest-release endpoint of the project on GitHub.
pub const DEFAULT_RELEASE_API: &str =
  "https://api.github.com/repos/logando-al/biblioFlow/releases/latest";

/// A published release that is newer than the running version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
  /// Version number without the leading `v` of the tag
  pub version:      String,
  /// Release notes
  pub notes:        String,
  /// First downloadable asset, or the release page when there is none
  pub download_url: Option<String>,
  /// When the release was published
  pub published_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct LatestRelease {
  tag_name:     String,
  #[serde(default)]
  body:         Option<String>,
  html_url:     Option<String>,
  published_at: Option<DateTime<Utc>>,
  #[serde(default)]
  assets:       Vec<Asset>,
}

#[derive(Debug, Deserialize)]
struct Asset {
  browser_download_url: String,
}

/// Asks a release API whether a newer version exists.
#[derive(Debug, Clone)]
pub struct UpdateChecker {
  client:          reqwest::Client,
  api_url:         String,
  current_version: String,
}

impl UpdateChecker {
  /// A checker comparing the release at `api_url` with `current_version`.
  pub fn new(api_url: impl Into<String>, current_version: impl Into<String>) -> Self {
    Self { client: http_client(), api_url: api_url.into(), current_version: current_version.into() }
  }

  /// The newer release, or `None` when the running version is up to date.
  pub async fn check(&self) -> Result<Option<Release>> {
    debug!("Checking {} for updates", self.api_url);
    let response = self
      .client
      .get(&self.api_url)
      .header(ACCEPT, "application/vnd.github.v3+json")
      .send()
      .await?;

    if response.status() == StatusCode::NOT_FOUND {
      debug!("No release published yet");
      return Ok(None);
    }
    if !response.status().is_success() {
      return Err(BiblioError::ApiError(format!(
        "release check responded with {}",
        response.status()
      )));
    }

    let latest: LatestRelease = response.json().await?;
    let version = latest.tag_name.trim().trim_start_matches(['v', 'V']).to_string();
    if !is_newer(&version, &self.current_version) {
      debug!("{} is up to date (latest {version})", self.current_version);
      return Ok(None);
    }

    info!("Version {version} is available (running {})", self.current_version);
    Ok(Some(Release {
      version,
      notes: latest.body.unwrap_or_default(),
      download_url: latest
        .assets
        .into_iter()
        .map(|asset| asset.browser_download_url)
        .next()
        .or(latest.html_url),
      published_at: latest.published_at,
    }))
  }
}

/// Whether dotted version `latest` is greater than `current`.
///
/// Components are compared numerically, missing components count as zero and anything
/// after the leading digits of a component (`0-beta`) is ignored.
pub fn is_newer(latest: &str, current: &str) -> bool {
  let latest = numeric_parts(latest);
  let current = numeric_parts(current);
  let len = latest.len().max(current.len());
  let pad = |parts: &[u64]| (0..len).map(|i| parts.get(i).copied().unwrap_or(0)).collect::<Vec<_>>();
  pad(&latest) > pad(&current)
}

fn numeric_parts(version: &str) -> Vec<u64> {
  version
    .trim()
    .trim_start_matches(['v', 'V'])
    .split('.')
    .map(|part| {
      let digits: String = part.chars().take_while(char::is_ascii_digit).collect();
      digits.parse().unwrap_or(0)
    })
    .collect()
}

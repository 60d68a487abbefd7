//! User preferences stored as JSON.
//!
//! Every field has a default, so a missing file, a partial file or a file written by an
//! older version all load. Unknown keys are ignored. A file that is not valid JSON is an
//! error rather than being silently replaced.
//!
//! ```no_run
//! use biblioflow::config::Config;
//!
//! # fn example() -> Result<(), biblioflow::error::BiblioError> {
//! let path = Config::default_path();
//! let mut config = Config::load(&path)?;
//! config.set("auto_confirm", "true")?;
//! config.save(&path)?;
//! println!("Papers go to {}", config.output_folder().display());
//! # Ok(())
//! # }
//! ```

use serde::Deserializer;
use serde_json::{Map, Value};

use super::*;
use crate::{
  citation::CitationFormat,
  format::NamingFormat,
  library::Library,
  organizer::Transfer,
  retriever::{Crossref, SemanticScholar},
  update::DEFAULT_RELEASE_API,
};

/// Output folder used until the user picks one.
pub const DEFAULT_OUTPUT_FOLDER: &str = "~/Research/Papers";

/// Persisted user preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
  /// Where organized papers are placed; `~` is expanded by [`Config::output_folder`]
  pub output_folder:            PathBuf,
  /// Template used to name organized files
  pub naming_format:            NamingFormat,
  /// Whether the CLI checks for a newer release before organizing or watching
  pub check_updates_on_startup: bool,
  /// Whether `watch` without an argument uses [`Config::watch_folder_path`]
  pub watch_folder_enabled:     bool,
  /// Folder watched for new downloads
  #[serde(deserialize_with = "empty_as_none")]
  pub watch_folder_path:        Option<PathBuf>,
  /// Organize papers without asking for confirmation
  pub auto_confirm:             bool,
  /// Citation style used when none is requested explicitly
  pub default_citation_format:  CitationFormat,
  /// Copy papers into the output folder instead of moving them
  pub copy_instead_of_move:     bool,
  /// Location of the JSON paper library
  pub library_path:             PathBuf,
  /// Base URL of the CrossRef API
  pub crossref_api:             String,
  /// Base URL of the Semantic Scholar API
  pub semantic_scholar_api:     String,
  /// Endpoint returning the latest release as JSON
  pub release_api:              String,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      output_folder:            PathBuf::from(DEFAULT_OUTPUT_FOLDER),
      naming_format:            NamingFormat::Default,
      check_updates_on_startup: true,
      watch_folder_enabled:     false,
      watch_folder_path:        None,
      auto_confirm:             false,
      default_citation_format:  CitationFormat::Bibtex,
      copy_instead_of_move:     false,
      library_path:             Library::default_path(),
      crossref_api:             Crossref::DEFAULT_BASE_URL.to_string(),
      semantic_scholar_api:     SemanticScholar::DEFAULT_BASE_URL.to_string(),
      release_api:              DEFAULT_RELEASE_API.to_string(),
    }
  }
}

impl Config {
  /// Platform location of the preferences file.
  ///
  /// - Linux: `~/.config/biblioflow/config.json`
  /// - macOS: `~/Library/Application Support/biblioflow/config.json`
  /// - Windows: `%APPDATA%\biblioflow\config.json`
  pub fn default_path() -> PathBuf {
    dirs::config_dir().unwrap_or_else(|| PathBuf::from(".")).join("biblioflow").join("config.json")
  }

  /// Reads preferences from `path`, falling back to defaults when the file does not exist.
  pub fn load(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    if !path.exists() {
      debug!("No preferences at {}, using defaults", path.display());
      return Ok(Self::default());
    }
    let content = std::fs::read_to_string(path)?;
    let config = serde_json::from_str(&content)?;
    trace!("Loaded preferences from {}: {config:?}", path.display());
    Ok(config)
  }

  /// Writes the preferences to `path` as pretty-printed JSON, creating parent directories.
  pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, serde_json::to_string_pretty(self)?)?;
    debug!("Saved preferences to {}", path.display());
    Ok(())
  }

  /// Names of all preference keys.
  pub fn keys() -> Vec<String> {
    match serde_json::to_value(Self::default()) {
      Ok(Value::Object(map)) => map.keys().cloned().collect(),
      _ => Vec::new(),
    }
  }

  /// Current value of the preference `key`.
  pub fn get(&self, key: &str) -> Result<Value> {
    self.as_map()?.remove(key).ok_or_else(|| unknown_key(key))
  }

  /// Changes the preference `key`.
  ///
  /// `value` is read as JSON when possible (`true`, `42`, `null`) and as a plain string
  /// otherwise. The result must have the type the preference expects.
  pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
    let mut map = self.as_map()?;
    if !map.contains_key(key) {
      return Err(unknown_key(key));
    }
    if key == "naming_format" {
      value.parse::<NamingFormat>()?;
    }

    let candidates = match serde_json::from_str::<Value>(value) {
      Ok(parsed) => vec![parsed, Value::String(value.to_string())],
      Err(_) => vec![Value::String(value.to_string())],
    };

    let mut last_error = None;
    for candidate in candidates {
      map.insert(key.to_string(), candidate);
      match serde_json::from_value::<Config>(Value::Object(map.clone())) {
        Ok(updated) => {
          *self = updated;
          debug!("Set preference {key} = {value}");
          return Ok(());
        },
        Err(e) => last_error = Some(e),
      }
    }

    Err(BiblioError::Config(format!(
      "Invalid value {value:?} for {key}: {}",
      last_error.map(|e| e.to_string()).unwrap_or_default()
    )))
  }

  /// Restores every preference to its default.
  pub fn reset(&mut self) { *self = Self::default(); }

  /// Output folder with `~` expanded.
  pub fn output_folder(&self) -> PathBuf { expand_tilde(&self.output_folder) }

  /// Watch folder with `~` expanded, if one is configured.
  pub fn watch_folder(&self) -> Option<PathBuf> { self.watch_folder_path.as_deref().map(expand_tilde) }

  /// Library location with `~` expanded.
  pub fn library_path(&self) -> PathBuf { expand_tilde(&self.library_path) }

  /// How files get into the output folder.
  pub fn transfer(&self) -> Transfer {
    if self.copy_instead_of_move {
      Transfer::Copy
    } else {
      Transfer::Move
    }
  }

  /// Sets the output folder.
  pub fn with_output_folder(mut self, folder: impl Into<PathBuf>) -> Self {
    self.output_folder = folder.into();
    self
  }

  /// Sets the naming format.
  pub fn with_naming_format(mut self, format: NamingFormat) -> Self {
    self.naming_format = format;
    self
  }

  /// Sets the library location.
  pub fn with_library_path(mut self, path: impl Into<PathBuf>) -> Self {
    self.library_path = path.into();
    self
  }

  /// Enables watching `folder`.
  pub fn with_watch_folder(mut self, folder: impl Into<PathBuf>) -> Self {
    self.watch_folder_path = Some(folder.into());
    self.watch_folder_enabled = true;
    self
  }

  /// Sets whether results are organized without confirmation.
  pub fn with_auto_confirm(mut self, auto_confirm: bool) -> Self {
    self.auto_confirm = auto_confirm;
    self
  }

  /// Points both metadata sources at other hosts.
  pub fn with_api_endpoints(mut self, crossref: &str, semantic_scholar: &str) -> Self {
    self.crossref_api = crossref.to_string();
    self.semantic_scholar_api = semantic_scholar.to_string();
    self
  }

  fn as_map(&self) -> Result<Map<String, Value>> {
    match serde_json::to_value(self)? {
      Value::Object(map) => Ok(map),
      _ => Err(BiblioError::Config("Preferences did not serialize to an object".into())),
    }
  }
}

/// Replaces a leading `~` with the home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  match path.strip_prefix("~") {
    Ok(rest) => dirs::home_dir().map_or_else(|| path.to_path_buf(), |home| home.join(rest)),
    Err(_) => path.to_path_buf(),
  }
}

fn unknown_key(key: &str) -> BiblioError {
  BiblioError::Config(format!("Unknown preference \"{key}\" (known: {})", Config::keys().join(", ")))
}

/// Older preference files store an unset watch folder as `""`.
fn empty_as_none<'de, D>(deserializer: D) -> core::result::Result<Option<PathBuf>, D::Error>
where D: Deserializer<'de> {
  let value = Option::<String>::deserialize(deserializer)?;
  Ok(value.filter(|s| !s.trim().is_empty()).map(PathBuf::from))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[traced_test]
  #[test]
  fn test_missing_file_gives_defaults() {
    let dir = tempdir().unwrap();
    let config = Config::load(dir.path().join("config.json")).unwrap();
    assert_eq!(config, Config::default());
    assert!(config.check_updates_on_startup);
    assert_eq!(config.default_citation_format, CitationFormat::Bibtex);
  }

  #[test]
  fn test_partial_file_is_merged_with_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(
      &path,
      r#"{ "naming_format": "underscore", "watch_folder_path": "", "auto_confirm": true, "legacy": 1 }"#,
    )
    .unwrap();

    let config = Config::load(&path).unwrap();
    assert_eq!(config.naming_format, NamingFormat::Underscore);
    assert_eq!(config.watch_folder_path, None);
    assert!(config.auto_confirm);
    assert_eq!(config.output_folder, PathBuf::from(DEFAULT_OUTPUT_FOLDER));
  }

  #[test]
  fn test_malformed_file_is_an_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, "{ not json").unwrap();
    assert!(matches!(Config::load(&path), Err(BiblioError::Json(_))));
  }

  #[test]
  fn test_save_and_reload() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("config.json");
    let config = Config::default()
      .with_output_folder(dir.path().join("papers"))
      .with_naming_format(NamingFormat::Custom("{year} {title}".into()))
      .with_watch_folder("~/Downloads");
    config.save(&path).unwrap();

    assert_eq!(Config::load(&path).unwrap(), config);
  }

  #[test]
  fn test_get_and_set() {
    let mut config = Config::default();
    config.set("auto_confirm", "true").unwrap();
    assert!(config.auto_confirm);

    config.set("naming_format", "title_first").unwrap();
    assert_eq!(config.get("naming_format").unwrap(), Value::String("title_first".into()));

    config.set("default_citation_format", "apa7").unwrap();
    assert_eq!(config.default_citation_format, CitationFormat::Apa);

    config.set("output_folder", "2024").unwrap();
    assert_eq!(config.output_folder, PathBuf::from("2024"));

    config.set("watch_folder_path", "null").unwrap();
    assert_eq!(config.watch_folder_path, None);
  }

  #[test]
  fn test_set_rejects_bad_input() {
    let mut config = Config::default();
    assert!(matches!(config.set("no_such_key", "1"), Err(BiblioError::Config(_))));
    assert!(matches!(config.set("auto_confirm", "maybe"), Err(BiblioError::Config(_))));
    assert!(matches!(config.set("naming_format", "fancy"), Err(BiblioError::UnknownFormat(_))));
    assert_eq!(config, Config::default());
  }

  #[test]
  fn test_reset() {
    let mut config = Config::default().with_auto_confirm(true);
    config.reset();
    assert_eq!(config, Config::default());
  }

  #[test]
  fn test_tilde_expansion() {
    let config = Config::default();
    if let Some(home) = dirs::home_dir() {
      assert_eq!(config.output_folder(), home.join("Research").join("Papers"));
    }
    assert_eq!(expand_tilde(Path::new("/tmp/papers")), PathBuf::from("/tmp/papers"));
  }
}

//! Integration tests for the biblioflow CLI commands.
//!
//! Every test points `--config` at its own temporary preferences file, so tests never touch
//! the user's real library.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use biblioflow::{
  config::Config,
  library::{Add, Library},
  prelude::*,
};
use lopdf::{dictionary, Document, Object, Stream};
use predicates::prelude::*;
use tempfile::{tempdir, TempDir};
use wiremock::{
  matchers::{method, path},
  Mock, MockServer, ResponseTemplate,
};

// Helper function to create a clean command instance
fn biblioflow() -> Command { Command::cargo_bin("biblioflow").unwrap() }

// Helper writing preferences that keep everything inside a temporary directory
fn temp_config(api: &str) -> (TempDir, PathBuf) {
  let dir = tempdir().unwrap();
  let config_path = dir.path().join("config.json");
  let mut config = Config::default()
    .with_output_folder(dir.path().join("Papers"))
    .with_library_path(dir.path().join("library.json"))
    .with_api_endpoints(api, api);
  config.check_updates_on_startup = false;
  config.save(&config_path).unwrap();
  (dir, config_path)
}

fn sample_paper() -> Paper {
  Paper {
    title:         "Machine Learning for Research".into(),
    authors:       vec!["John Smith".into(), "Mary Jones".into()],
    year:          Some(2024),
    journal:       Some("Nature".into()),
    doi:           Some("10.1038/xxxxx".into()),
    abstract_text: None,
  }
}

fn add_record(dir: &Path, paper: &Paper) -> String {
  let mut library = Library::open(dir.join("library.json")).unwrap();
  Add::new(paper, dir.join("Papers").join("paper.pdf")).execute(&mut library).unwrap()
}

fn write_pdf(path: &Path, lines: &[&str]) {
  let mut doc = Document::with_version("1.5");
  let font_id = doc.add_object(dictionary! {
    "Type" => "Font",
    "Subtype" => "Type1",
    "BaseFont" => "Helvetica",
  });
  let content = lines
    .iter()
    .enumerate()
    .map(|(i, line)| format!("BT /F1 11 Tf 72 {} Td ({line}) Tj ET", 740 - 18 * i))
    .collect::<Vec<_>>()
    .join("\n");
  let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));
  let pages_id = doc.new_object_id();
  let page_id = doc.add_object(dictionary! {
    "Type" => "Page",
    "Parent" => pages_id,
    "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
    "Contents" => content_id,
    "Resources" => dictionary! { "Font" => dictionary! { "F1" => font_id } },
  });
  doc.objects.insert(
    pages_id,
    Object::Dictionary(dictionary! { "Type" => "Pages", "Kids" => vec![page_id.into()], "Count" => 1 }),
  );
  let catalog_id = doc.add_object(dictionary! { "Type" => "Catalog", "Pages" => pages_id });
  doc.trailer.set("Root", catalog_id);
  doc.save(path).unwrap();
}

#[test]
fn test_init_writes_preferences() {
  let dir = tempdir().unwrap();
  let config_path = dir.path().join("prefs").join("config.json");
  let papers = dir.path().join("Papers");

  biblioflow()
    .arg("init")
    .arg("--config")
    .arg(&config_path)
    .arg("--output-folder")
    .arg(&papers)
    .arg("--library-path")
    .arg(dir.path().join("library.json"))
    .arg("--naming-format")
    .arg("underscore")
    .arg("--accept-defaults")
    .assert()
    .success()
    .stdout(predicate::str::contains("initialized successfully"));

  assert!(papers.is_dir());
  let config = Config::load(&config_path).unwrap();
  assert_eq!(config.output_folder, papers);
  assert_eq!(config.naming_format.to_string(), "{author}_{year}_{title}.pdf");
}

#[test]
fn test_init_rejects_unknown_naming_format() {
  let dir = tempdir().unwrap();
  biblioflow()
    .arg("init")
    .arg("--config")
    .arg(dir.path().join("config.json"))
    .arg("--output-folder")
    .arg(dir.path())
    .arg("--naming-format")
    .arg("fancy")
    .arg("--accept-defaults")
    .assert()
    .failure()
    .stderr(predicate::str::contains("Unknown format \"fancy\""));
  assert!(!dir.path().join("config.json").exists());
}

#[test]
fn test_config_set_and_get() {
  let (_dir, config_path) = temp_config("http://127.0.0.1:9");

  biblioflow()
    .args(["config", "set", "auto_confirm", "true", "--config"])
    .arg(&config_path)
    .assert()
    .success()
    .stdout(predicate::str::contains("Set auto_confirm = true"));

  biblioflow()
    .args(["config", "get", "auto_confirm", "--config"])
    .arg(&config_path)
    .assert()
    .success()
    .stdout(predicate::str::diff("true\n"));

  biblioflow()
    .args(["config", "set", "default_citation_format", "apa", "--config"])
    .arg(&config_path)
    .assert()
    .success();
  assert_eq!(
    Config::load(&config_path).unwrap().default_citation_format.to_string(),
    "apa"
  );

  biblioflow()
    .args(["config", "set", "colour", "blue", "--config"])
    .arg(&config_path)
    .assert()
    .failure()
    .stderr(predicate::str::contains("Unknown preference \"colour\""));
}

#[test]
fn test_config_show_prints_only_json() {
  let (dir, config_path) = temp_config("http://127.0.0.1:9");

  let output = biblioflow()
    .args(["config", "show", "--config"])
    .arg(&config_path)
    .assert()
    .success()
    .get_output()
    .stdout
    .clone();

  let shown: serde_json::Value = serde_json::from_slice(&output).unwrap();
  assert_eq!(shown["auto_confirm"], serde_json::json!(false));
  assert_eq!(
    shown["output_folder"].as_str().map(PathBuf::from),
    Some(dir.path().join("Papers"))
  );
}

#[test]
fn test_search_empty_library() {
  let (_dir, config_path) = temp_config("http://127.0.0.1:9");
  biblioflow()
    .arg("search")
    .arg("--config")
    .arg(&config_path)
    .assert()
    .success()
    .stdout(predicate::str::contains("No papers found"));
}

#[test]
fn test_cite_get_and_remove() {
  let (dir, config_path) = temp_config("http://127.0.0.1:9");
  let id = add_record(dir.path(), &sample_paper());

  biblioflow()
    .args(["cite", id.as_str(), "--format", "apa", "--config"])
    .arg(&config_path)
    .assert()
    .success()
    .stdout(predicate::str::contains(
      "Smith, J., & Jones, M. (2024). Machine Learning for Research. *Nature*. \
       https://doi.org/10.1038/xxxxx",
    ));

  biblioflow()
    .args(["cite", id.as_str(), "--config"])
    .arg(&config_path)
    .assert()
    .success()
    .stdout(predicate::str::starts_with("@article{Smith2024,"));

  biblioflow()
    .args(["get", id.as_str(), "--config"])
    .arg(&config_path)
    .assert()
    .success()
    .stdout(predicate::str::contains("Machine Learning for Research"))
    .stdout(predicate::str::contains("John Smith, Mary Jones"));

  biblioflow()
    .args(["search", "jones", "--config"])
    .arg(&config_path)
    .assert()
    .success()
    .stdout(predicate::str::contains(&id));

  biblioflow()
    .args(["remove", id.as_str(), "--accept-defaults", "--config"])
    .arg(&config_path)
    .assert()
    .success()
    .stdout(predicate::str::contains("Removed 1 record(s), 0 left in the library"));

  biblioflow()
    .args(["get", id.as_str(), "--config"])
    .arg(&config_path)
    .assert()
    .failure()
    .stderr(predicate::str::contains(format!("No paper with id \"{id}\"")));
}

#[test]
fn test_export_ris_file() {
  let (dir, config_path) = temp_config("http://127.0.0.1:9");
  add_record(dir.path(), &sample_paper());
  add_record(dir.path(), &Paper {
    title:         "Attention Is All You Need".into(),
    authors:       vec!["Ashish Vaswani".into()],
    year:          Some(2017),
    journal:       None,
    doi:           None,
    abstract_text: None,
  });

  let output = dir.path().join("export").join("papers");
  biblioflow()
    .args(["export", "--format", "ris", "--output"])
    .arg(&output)
    .arg("--config")
    .arg(&config_path)
    .assert()
    .success()
    .stdout(predicate::str::contains("Exported 2 paper(s) as ris"));

  let ris = std::fs::read_to_string(output.with_extension("ris")).unwrap();
  assert_eq!(ris.matches("TY  - JOUR").count(), 2);
  assert!(ris.contains("AU  - Vaswani, Ashish"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_organize_with_doi() {
  let server = MockServer::start().await;
  Mock::given(method("GET"))
    .and(path("/works/10.1234/mlr.2024.001"))
    .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
      "status": "ok",
      "message": {
        "title": ["Machine Learning for Research"],
        "author": [
          { "given": "John", "family": "Smith" },
          { "given": "Mary", "family": "Jones" }
        ],
        "published-print": { "date-parts": [[2024, 3]] },
        "container-title": ["Nature"]
      }
    })))
    .mount(&server)
    .await;

  let (dir, config_path) = temp_config(&server.uri());
  let downloads = dir.path().join("Downloads");
  std::fs::create_dir_all(&downloads).unwrap();
  write_pdf(&downloads.join("download.pdf"), &[
    "Machine Learning for Research",
    "doi: 10.1234/mlr.2024.001",
  ]);

  biblioflow()
    .arg("organize")
    .arg(downloads.join("*.pdf"))
    .arg("--yes")
    .arg("--config")
    .arg(&config_path)
    .assert()
    .success()
    .stdout(predicate::str::contains("Organized 1 of 1 file(s), 1 added to the library"));

  let organized =
    dir.path().join("Papers").join("[2024] Smith & Jones - Machine Learning for Research.pdf");
  assert!(organized.exists());
  assert!(!downloads.join("download.pdf").exists());

  let library = Library::open(dir.path().join("library.json")).unwrap();
  assert_eq!(library.count(), 1);
  assert_eq!(library.records()[0].file_path, organized);
}

#[test]
fn test_organize_without_matches_fails() {
  let (dir, config_path) = temp_config("http://127.0.0.1:9");
  biblioflow()
    .arg("organize")
    .arg(dir.path().join("*.pdf"))
    .arg("--config")
    .arg(&config_path)
    .assert()
    .failure()
    .stderr(predicate::str::contains("No PDF files matched"));
}

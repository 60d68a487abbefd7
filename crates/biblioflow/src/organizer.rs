//! Moving and copying papers into the output folder.
//!
//! Existing files are never overwritten: when the generated name is taken, ` (1)`, ` (2)`, ...
//! is inserted before the extension until a free name is found.

use super::*;
use crate::format::{ensure_pdf_extension, generate_filename, sanitize_filename, NamingFormat};

/// How a file gets into the output folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transfer {
  /// Relocate the original file
  #[default]
  Move,
  /// Leave the original in place and organize a copy
  Copy,
}

/// Renames and relocates `source` according to the metadata in `paper`.
///
/// Returns the path the file ended up at.
pub fn organize_file(
  source: impl AsRef<Path>,
  paper: &Paper,
  output_folder: impl AsRef<Path>,
  format: &NamingFormat,
  transfer: Transfer,
) -> Result<PathBuf> {
  let filename = generate_filename(paper, format);
  place_file(source, output_folder, &filename, transfer)
}

/// Moves or copies `source` into `output_folder` under `filename`.
///
/// The folder is created if needed and `filename` is sanitized and given a `.pdf` extension.
/// Moving falls back to copy-and-delete when the rename crosses file systems.
pub fn place_file(
  source: impl AsRef<Path>,
  output_folder: impl AsRef<Path>,
  filename: &str,
  transfer: Transfer,
) -> Result<PathBuf> {
  let source = source.as_ref();
  let output_folder = output_folder.as_ref();
  std::fs::create_dir_all(output_folder)?;

  let filename = ensure_pdf_extension(&sanitize_filename(filename, format::MAX_FILENAME_LENGTH));
  let preferred = output_folder.join(&filename);
  if is_same_file(source, &preferred) {
    debug!("{} is already organized", source.display());
    return Ok(preferred);
  }

  let destination = unique_destination(output_folder, &filename);
  match transfer {
    Transfer::Copy => {
      std::fs::copy(source, &destination)?;
    },
    Transfer::Move =>
      if let Err(e) = std::fs::rename(source, &destination) {
        debug!("Rename of {} failed ({e}), copying instead", source.display());
        std::fs::copy(source, &destination)?;
        std::fs::remove_file(source)?;
      },
  }

  info!("{} -> {}", source.display(), destination.display());
  Ok(destination)
}

/// A path in `dir` for `filename` that does not exist yet.
///
/// `paper.pdf` is tried first, then `paper (1).pdf`, `paper (2).pdf` and so on.
pub fn unique_destination(dir: impl AsRef<Path>, filename: &str) -> PathBuf {
  let dir = dir.as_ref();
  let candidate = dir.join(filename);
  if !candidate.exists() {
    return candidate;
  }

  let path = Path::new(filename);
  let stem = path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
  let extension = path.extension().map(|e| format!(".{}", e.to_string_lossy())).unwrap_or_default();

  (1..)
    .map(|counter| dir.join(format!("{stem} ({counter}){extension}")))
    .find(|candidate| !candidate.exists())
    .unwrap_or(candidate)
}

fn is_same_file(a: &Path, b: &Path) -> bool {
  match (a.canonicalize(), b.canonicalize()) {
    (Ok(a), Ok(b)) => a == b,
    _ => false,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn sample_paper() -> Paper {
    Paper {
      title: "Machine Learning for Research".into(),
      authors: vec!["John Smith".into()],
      year: Some(2024),
      ..Default::default()
    }
  }

  #[traced_test]
  #[test]
  fn test_organize_moves_file() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("download.pdf");
    std::fs::write(&source, b"%PDF-1.4").unwrap();
    let output = dir.path().join("Papers");

    let new_path =
      organize_file(&source, &sample_paper(), &output, &NamingFormat::Default, Transfer::Move)
        .unwrap();

    assert_eq!(new_path, output.join("[2024] Smith - Machine Learning for Research.pdf"));
    assert!(new_path.exists());
    assert!(!source.exists());
  }

  #[test]
  fn test_organize_copies_file() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("download.pdf");
    std::fs::write(&source, b"%PDF-1.4").unwrap();
    let output = dir.path().join("Papers");

    let new_path =
      organize_file(&source, &sample_paper(), &output, &NamingFormat::TitleFirst, Transfer::Copy)
        .unwrap();

    assert!(new_path.exists());
    assert!(source.exists());
  }

  #[test]
  fn test_duplicates_get_a_counter() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("Papers");
    let mut destinations = Vec::new();
    for i in 0..3 {
      let source = dir.path().join(format!("copy{i}.pdf"));
      std::fs::write(&source, b"%PDF-1.4").unwrap();
      destinations.push(
        organize_file(&source, &sample_paper(), &output, &NamingFormat::TitleFirst, Transfer::Move)
          .unwrap(),
      );
    }

    assert_eq!(destinations[0], output.join("Machine Learning for Research (2024).pdf"));
    assert_eq!(destinations[1], output.join("Machine Learning for Research (2024) (1).pdf"));
    assert_eq!(destinations[2], output.join("Machine Learning for Research (2024) (2).pdf"));
  }

  #[test]
  fn test_place_file_sanitizes_custom_names() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("download.pdf");
    std::fs::write(&source, b"%PDF-1.4").unwrap();

    let new_path = place_file(&source, dir.path().join("out"), "my: paper", Transfer::Move).unwrap();
    assert_eq!(new_path.file_name().unwrap(), "my paper.pdf");
  }

  #[test]
  fn test_already_organized_file_stays_put() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("Machine Learning for Research (2024).pdf");
    std::fs::write(&source, b"%PDF-1.4").unwrap();

    let new_path =
      organize_file(&source, &sample_paper(), dir.path(), &NamingFormat::TitleFirst, Transfer::Move)
        .unwrap();
    assert_eq!(new_path.file_name(), source.file_name());
    assert!(source.exists());
  }

  #[test]
  fn test_missing_source_is_an_error() {
    let dir = tempdir().unwrap();
    let result = organize_file(
      dir.path().join("missing.pdf"),
      &sample_paper(),
      dir.path().join("out"),
      &NamingFormat::Default,
      Transfer::Move,
    );
    assert!(matches!(result, Err(BiblioError::Io(_))));
  }
}

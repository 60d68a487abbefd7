//! Watching a download folder for new PDFs.
//!
//! The OS change notifications themselves are not trusted to say which file appeared.
//! Instead every debounced batch of notifications triggers a rescan of the folder, which is
//! compared against the PDFs already known. A new file is only reported once it can be
//! read, so a download that is still being written is picked up by a later change.

use std::{ffi::OsString, io::Read, time::Duration};

use notify_debouncer_full::{
  new_debouncer,
  notify::{RecommendedWatcher, RecursiveMode},
  DebounceEventResult, Debouncer, RecommendedCache,
};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

use super::*;
use crate::config::expand_tilde;

/// Quiet period after the last change before the folder is rescanned.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Something the watcher wants the caller to know.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchEvent {
  /// A PDF appeared in the folder and is readable
  NewFile(PathBuf),
  /// Watching or rescanning failed
  Error(String),
}

/// Tracks which PDFs of a folder have been seen.
#[derive(Debug)]
pub struct DirectoryScan {
  dir:   PathBuf,
  known: HashSet<OsString>,
}

impl DirectoryScan {
  /// Records the PDFs currently in `dir` as already seen.
  pub fn baseline(dir: impl Into<PathBuf>) -> Result<Self> {
    let dir = dir.into();
    let known = list_pdfs(&dir)?;
    debug!("Baseline of {} has {} PDF(s)", dir.display(), known.len());
    Ok(Self { dir, known })
  }

  /// The folder being scanned.
  pub fn dir(&self) -> &Path { &self.dir }

  /// Number of PDFs seen so far.
  pub fn known_count(&self) -> usize { self.known.len() }

  /// Rescans the folder and returns the readable PDFs that were not seen before.
  ///
  /// Files that vanished are forgotten, so a file added again under the same name is
  /// reported again. Files that cannot be read yet are not remembered.
  pub fn new_files(&mut self) -> Result<Vec<PathBuf>> {
    let current = list_pdfs(&self.dir)?;
    let mut found = Vec::new();
    let mut known = HashSet::with_capacity(current.len());

    for name in current {
      if self.known.contains(&name) {
        known.insert(name);
        continue;
      }
      let path = self.dir.join(&name);
      if is_ready(&path) {
        known.insert(name);
        found.push(path);
      } else {
        trace!("{} is not ready yet", path.display());
      }
    }

    found.sort();
    self.known = known;
    Ok(found)
  }
}

/// Watches one folder (not its subfolders) for new PDFs.
pub struct FolderWatcher {
  path:      PathBuf,
  debounce:  Duration,
  debouncer: Option<Debouncer<RecommendedWatcher, RecommendedCache>>,
}

impl std::fmt::Debug for FolderWatcher {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("FolderWatcher")
      .field("path", &self.path)
      .field("debounce", &self.debounce)
      .field("watching", &self.is_watching())
      .finish()
  }
}

impl FolderWatcher {
  /// A stopped watcher for `path`; a leading `~` is expanded.
  pub fn new(path: impl AsRef<Path>) -> Self {
    Self { path: expand_tilde(path.as_ref()), debounce: DEFAULT_DEBOUNCE, debouncer: None }
  }

  /// Changes the quiet period used before rescanning.
  pub fn with_debounce(mut self, debounce: Duration) -> Self {
    self.debounce = debounce;
    self
  }

  /// The watched folder.
  pub fn watch_path(&self) -> &Path { &self.path }

  /// Whether the watcher is running.
  pub fn is_watching(&self) -> bool { self.debouncer.is_some() }

  /// Starts watching.
  ///
  /// PDFs already in the folder are taken as the baseline and never reported. New ones are
  /// sent to the returned receiver until [`FolderWatcher::stop`] is called or the watcher is
  /// dropped. Starting a running watcher restarts it with a fresh baseline.
  pub fn start(&mut self) -> Result<UnboundedReceiver<WatchEvent>> {
    self.stop();
    if !self.path.is_dir() {
      return Err(BiblioError::Io(std::io::Error::new(
        std::io::ErrorKind::NotFound,
        format!("{} is not a folder", self.path.display()),
      )));
    }

    let mut scan = DirectoryScan::baseline(&self.path)?;
    let (tx, rx) = unbounded_channel();
    let mut debouncer =
      new_debouncer(self.debounce, None, move |result: DebounceEventResult| match result {
        Ok(_) => match scan.new_files() {
          Ok(files) =>
            for file in files {
              info!("New PDF: {}", file.display());
              send(&tx, WatchEvent::NewFile(file));
            },
          Err(e) => send(&tx, WatchEvent::Error(format!("Error checking for new files: {e}"))),
        },
        Err(errors) =>
          for error in errors {
            send(&tx, WatchEvent::Error(error.to_string()));
          },
      })?;
    debouncer.watch(&self.path, RecursiveMode::NonRecursive)?;

    info!("Watching {} for new PDFs", self.path.display());
    self.debouncer = Some(debouncer);
    Ok(rx)
  }

  /// Stops watching; the receiver returned by [`FolderWatcher::start`] then closes.
  pub fn stop(&mut self) {
    if self.debouncer.take().is_some() {
      info!("Stopped watching {}", self.path.display());
    }
  }
}

fn send(tx: &UnboundedSender<WatchEvent>, event: WatchEvent) {
  if tx.send(event).is_err() {
    trace!("Watch event dropped, receiver is gone");
  }
}

/// Names of the `.pdf` files (any case) directly inside `dir`.
fn list_pdfs(dir: &Path) -> Result<HashSet<OsString>> {
  let mut names = HashSet::new();
  for entry in std::fs::read_dir(dir)? {
    let entry = entry?;
    let path = entry.path();
    let is_pdf = path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
    if is_pdf && entry.file_type().is_ok_and(|t| t.is_file()) {
      names.insert(entry.file_name());
    }
  }
  Ok(names)
}

/// A file is ready once its first byte can be read.
fn is_ready(path: &Path) -> bool {
  let mut byte = [0u8; 1];
  std::fs::File::open(path).and_then(|mut file| file.read(&mut byte)).is_ok_and(|read| read == 1)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_baseline_is_never_reported() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("old.pdf"), b"%PDF").unwrap();

    let mut scan = DirectoryScan::baseline(dir.path()).unwrap();
    assert_eq!(scan.known_count(), 1);
    assert!(scan.new_files().unwrap().is_empty());
  }

  #[traced_test]
  #[test]
  fn test_only_new_pdfs_are_reported() {
    let dir = tempdir().unwrap();
    let mut scan = DirectoryScan::baseline(dir.path()).unwrap();

    std::fs::write(dir.path().join("paper.PDF"), b"%PDF").unwrap();
    std::fs::write(dir.path().join("notes.txt"), b"text").unwrap();
    std::fs::create_dir(dir.path().join("folder.pdf")).unwrap();
    std::fs::create_dir(dir.path().join("sub")).unwrap();
    std::fs::write(dir.path().join("sub").join("nested.pdf"), b"%PDF").unwrap();

    assert_eq!(scan.new_files().unwrap(), vec![dir.path().join("paper.PDF")]);
    assert!(scan.new_files().unwrap().is_empty());
  }

  #[test]
  fn test_files_still_being_written_are_retried() {
    let dir = tempdir().unwrap();
    let mut scan = DirectoryScan::baseline(dir.path()).unwrap();
    let path = dir.path().join("download.pdf");

    std::fs::write(&path, b"").unwrap();
    assert!(scan.new_files().unwrap().is_empty());

    std::fs::write(&path, b"%PDF-1.4").unwrap();
    assert_eq!(scan.new_files().unwrap(), vec![path]);
  }

  #[test]
  fn test_removed_and_readded_file_is_reported_again() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("paper.pdf");
    std::fs::write(&path, b"%PDF").unwrap();
    let mut scan = DirectoryScan::baseline(dir.path()).unwrap();

    std::fs::remove_file(&path).unwrap();
    assert!(scan.new_files().unwrap().is_empty());
    std::fs::write(&path, b"%PDF").unwrap();
    assert_eq!(scan.new_files().unwrap(), vec![path]);
  }

  #[test]
  fn test_start_on_missing_folder_fails() {
    let dir = tempdir().unwrap();
    let mut watcher = FolderWatcher::new(dir.path().join("missing"));
    assert!(matches!(watcher.start(), Err(BiblioError::Io(_))));
    assert!(!watcher.is_watching());
  }

  #[traced_test]
  #[tokio::test]
  async fn test_watcher_reports_new_pdf() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("existing.pdf"), b"%PDF").unwrap();

    let mut watcher = FolderWatcher::new(dir.path()).with_debounce(Duration::from_millis(100));
    let mut events = watcher.start().unwrap();
    assert!(watcher.is_watching());
    assert_eq!(watcher.watch_path(), dir.path());

    let path = dir.path().join("fresh.pdf");
    std::fs::write(&path, b"%PDF-1.4").unwrap();

    let event = tokio::time::timeout(Duration::from_secs(10), events.recv()).await.unwrap();
    assert_eq!(event, Some(WatchEvent::NewFile(path)));

    watcher.stop();
    assert!(!watcher.is_watching());
  }
}

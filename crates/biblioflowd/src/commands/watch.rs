//! Module for the "watch" command.

use std::collections::HashSet;

use super::*;

#[derive(Args, Clone)]
pub struct WatchOptions {
  /// Folder to watch; defaults to the watch folder from the preferences
  pub dir: Option<PathBuf>,

  /// Organize without asking for confirmation
  #[arg(long, short)]
  pub yes: bool,

  /// Folder to place papers in, instead of the configured one
  #[arg(long, short)]
  pub output: Option<PathBuf>,
}

/// Function for the [`Commands::Watch`] in the CLI.
///
/// Runs until Ctrl-C. Every new PDF goes through the same pipeline as `organize` and is
/// added to the library once organized.
pub async fn watch<I: UserInteraction>(
  interaction: &I,
  config: &Config,
  options: WatchOptions,
) -> Result<()> {
  let WatchOptions { dir, yes, output } = options;

  let dir = match dir {
    Some(dir) => expand_tilde(&dir),
    None => config.watch_folder().filter(|_| config.watch_folder_enabled).ok_or_else(|| {
      BiblioflowdError::Usage(
        "No folder given and no watch folder enabled in the preferences".to_string(),
      )
    })?,
  };

  let mut processor = Processor::from_config(config).with_auto_confirm(yes || config.auto_confirm);
  if let Some(output) = output {
    processor = processor.with_output_folder(expand_tilde(&output));
  }

  check_on_startup(interaction, config).await?;

  let mut watcher = FolderWatcher::new(&dir);
  let mut events = watcher.start()?;
  interaction.reply(ResponseContent::Info(&format!(
    "Watching {} for new PDFs, press Ctrl-C to stop",
    watcher.watch_path().display()
  )))?;

  let mut library = open_library(config)?;
  let mut placed = PlacedFiles::default();
  let ctrl_c = tokio::signal::ctrl_c();
  tokio::pin!(ctrl_c);

  loop {
    tokio::select! {
      _ = &mut ctrl_c => break,
      event = events.recv() => match event {
        Some(WatchEvent::NewFile(path)) => {
          if placed.take(&path) {
            debug!("{} was placed by this session, skipping", path.display());
            continue;
          }
          let mut result = processor.process_file(&path, None).await;
          match (&result.error, result.is_awaiting_confirmation()) {
            (Some(error), _) =>
              interaction.reply(ResponseContent::Warning(&format!("{}: {error}", result.filename)))?,
            (None, true) => settle(interaction, &processor, &mut result)?,
            (None, false) => if let Some(new_path) = &result.new_path {
              interaction.reply(ResponseContent::Success(&format!(
                "{} {ARROW} {}",
                result.filename,
                new_path.display()
              )))?
            },
          }
          if let Some(new_path) = result.new_path.as_deref().filter(|_| result.is_success()) {
            placed.remember(&result.original_path, new_path);
          }
          record_organized(&mut library, std::slice::from_ref(&result))?;
        },
        Some(WatchEvent::Error(error)) => interaction.reply(ResponseContent::Warning(&error))?,
        None => break,
      },
    }
  }

  watcher.stop();
  interaction.reply(ResponseContent::Info("Stopped watching"))?;
  Ok(())
}

/// Files this session moved into place. When the output folder is the watched folder, their
/// arrival shows up as a new PDF and must not be organized a second time.
#[derive(Debug, Default)]
pub(crate) struct PlacedFiles(HashSet<PathBuf>);

impl PlacedFiles {
  /// Remembers `new_path` unless the file never moved.
  pub(crate) fn remember(&mut self, original: &Path, new_path: &Path) {
    let new_path = resolve(new_path);
    if resolve(original) != new_path {
      self.0.insert(new_path);
    }
  }

  /// Whether `path` was placed by this session; each placement is matched once.
  pub(crate) fn take(&mut self, path: &Path) -> bool { self.0.remove(&resolve(path)) }
}

fn resolve(path: &Path) -> PathBuf { path.canonicalize().unwrap_or_else(|_| path.to_path_buf()) }

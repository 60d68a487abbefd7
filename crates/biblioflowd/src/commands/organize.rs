//! Module for the "organize" command: running the batch pipeline over files from the
//! command line.

use tokio::sync::mpsc::unbounded_channel;

use super::*;

#[derive(Args, Clone)]
pub struct OrganizeOptions {
  /// PDF files, folders or glob patterns
  #[arg(required = true)]
  pub files: Vec<String>,

  /// Organize without asking for confirmation
  #[arg(long, short)]
  pub yes: bool,

  /// Folder to place papers in, instead of the configured one
  #[arg(long, short)]
  pub output: Option<PathBuf>,

  /// Naming preset or template, instead of the configured one
  #[arg(long)]
  pub format: Option<String>,

  /// Copy files instead of moving them
  #[arg(long)]
  pub copy: bool,
}

/// Function for the [`Commands::Organize`] in the CLI.
pub async fn organize<I: UserInteraction>(
  interaction: &I,
  config: &Config,
  options: OrganizeOptions,
) -> Result<()> {
  let OrganizeOptions { files, yes, output, format, copy } = options;

  let files = expand_inputs(&files)?;
  if files.is_empty() {
    return Err(BiblioflowdError::Usage("No PDF files matched the given paths".into()));
  }

  let mut processor = Processor::from_config(config).with_auto_confirm(yes || config.auto_confirm);
  if let Some(output) = output {
    processor = processor.with_output_folder(expand_tilde(&output));
  }
  if let Some(format) = format {
    processor = processor.with_naming_format(NamingFormat::from_str(&format)?);
  }
  if copy {
    processor = processor.with_transfer(Transfer::Copy);
  }

  check_on_startup(interaction, config).await?;

  interaction.reply(ResponseContent::Info(&format!(
    "Organizing {} file(s) into {}",
    files.len(),
    processor.output_folder().display()
  )))?;

  let (tx, mut rx) = unbounded_channel();
  let batch = processor.spawn_batch(files, tx);
  while let Some(event) = rx.recv().await {
    report_event(interaction, &event)?;
  }
  let mut results = batch.await?;

  for result in results.iter_mut().filter(|result| result.is_awaiting_confirmation()) {
    settle(interaction, &processor, result)?;
  }

  let mut library = open_library(config)?;
  let added = record_organized(&mut library, &results)?;

  let failed = results.iter().filter(|result| result.error.is_some()).count();
  interaction.reply(ResponseContent::Success(&format!(
    "Organized {} of {} file(s), {} added to the library",
    results.iter().filter(|result| result.is_success()).count(),
    results.len(),
    added
  )))?;
  if failed > 0 {
    interaction.reply(ResponseContent::Warning(&format!("{failed} file(s) could not be organized")))?;
  }
  Ok(())
}

/// Turns file, folder and glob arguments into a sorted-per-argument, duplicate-free list of
/// PDFs. Arguments matching nothing are reported and skipped.
pub(crate) fn expand_inputs(inputs: &[String]) -> Result<Vec<PathBuf>> {
  let mut files = Vec::new();
  for input in inputs {
    let path = expand_tilde(Path::new(input));
    let mut matched = if path.is_dir() {
      std::fs::read_dir(&path)?
        .filter_map(|entry| entry.ok().map(|entry| entry.path()))
        .filter(|path| is_pdf(path))
        .collect::<Vec<_>>()
    } else if path.exists() {
      if is_pdf(&path) {
        vec![path]
      } else {
        warn!("Skipping {input}, not a PDF file");
        continue;
      }
    } else {
      glob::glob(&path.to_string_lossy())?.flatten().filter(|path| is_pdf(path)).collect()
    };

    if matched.is_empty() {
      warn!("Nothing matched {input}");
      continue;
    }
    matched.sort();
    for file in matched {
      if !files.contains(&file) {
        files.push(file);
      }
    }
  }
  Ok(files)
}

fn is_pdf(path: &Path) -> bool {
  path.is_file()
    && path.extension().is_some_and(|extension| extension.eq_ignore_ascii_case("pdf"))
}

/// Prints one pipeline event.
pub(crate) fn report_event<I: UserInteraction>(interaction: &I, event: &ProcessingEvent) -> Result<()> {
  match event {
    ProcessingEvent::Started { filename } =>
      interaction.reply(ResponseContent::Working(&format!("Processing {filename}"))),
    ProcessingEvent::MetadataFound { filename, paper } =>
      interaction.reply(ResponseContent::Info(&format!("{filename}: found \"{}\"", paper.title))),
    ProcessingEvent::Completed { original_path, new_path } =>
      interaction.reply(ResponseContent::Success(&format!(
        "{} {ARROW} {}",
        original_path.display(),
        new_path.display()
      ))),
    ProcessingEvent::Failed { filename, error } =>
      interaction.reply(ResponseContent::Warning(&format!("{filename}: {error}"))),
    ProcessingEvent::ConfirmationNeeded(result) => {
      trace!("{} awaits confirmation", result.filename);
      Ok(())
    },
    ProcessingEvent::BatchProgress { current, total } => {
      debug!("Batch progress {current}/{total}");
      Ok(())
    },
    ProcessingEvent::BatchComplete { total } => {
      debug!("Batch of {total} done");
      Ok(())
    },
  }
}

/// Asks whether an unconfirmed result should be organized, optionally under a custom name.
pub(crate) fn settle<I: UserInteraction>(
  interaction: &I,
  processor: &Processor,
  result: &mut ProcessingResult,
) -> Result<()> {
  if let Some(paper) = &result.metadata {
    interaction.reply(ResponseContent::Paper(paper))?;
  }

  if !interaction.confirm(&format!("Organize {} with this metadata?", result.filename))? {
    processor.cancel(result);
    return interaction.reply(ResponseContent::Info(&format!("Left {} untouched", result.filename)));
  }

  let custom = interaction.prompt("File name (leave empty for the generated name)")?;
  match processor.confirm(result, Some(&custom)) {
    Ok(new_path) => interaction.reply(ResponseContent::Success(&format!(
      "{} {ARROW} {}",
      result.original_path.display(),
      new_path.display()
    ))),
    Err(e) => interaction.reply(ResponseContent::Warning(&format!("{}: {e}", result.filename))),
  }
}

/// Adds every organized result to `library`, returning how many were added.
pub(crate) fn record_organized(library: &mut Library, results: &[ProcessingResult]) -> Result<usize> {
  let mut added = 0;
  for result in results.iter().filter(|result| result.is_success()) {
    if let (Some(paper), Some(new_path)) = (&result.metadata, &result.new_path) {
      let id = Add::new(paper, new_path).execute(library)?;
      debug!("Recorded {} as {id}", new_path.display());
      added += 1;
    }
  }
  Ok(added)
}

//! Module for exporting several citations at once.

use super::*;

#[derive(Args, Clone)]
pub struct ExportOptions {
  /// Record ids to export; exports the whole library when omitted
  pub ids: Vec<String>,

  /// bibtex, ris, apa or ieee
  #[arg(long, short, default_value = "bibtex")]
  pub format: String,

  /// File to write; prints to stdout when omitted
  #[arg(long, short)]
  pub output: Option<PathBuf>,
}

/// Function for the [`Commands::Export`] in the CLI.
pub fn export<I: UserInteraction>(
  interaction: &I,
  config: &Config,
  export_options: ExportOptions,
) -> Result<()> {
  let ExportOptions { ids, format, output } = export_options;
  let format = CitationFormat::from_str(&format)?;
  let mut library = open_library(config)?;

  let records = if ids.is_empty() {
    Query::list_all().execute(&mut library)?
  } else {
    ids.iter().map(|id| find_record(&mut library, id)).collect::<Result<Vec<_>>>()?
  };
  if records.is_empty() {
    return interaction.reply(ResponseContent::Info("The library is empty, nothing to export"));
  }

  let papers = records.iter().map(LibraryRecord::to_paper).collect::<Vec<_>>();
  let citations = cite_batch(&papers, format);

  match output {
    Some(path) => {
      let path = match path.extension() {
        Some(_) => path,
        None => path.with_extension(format.extension()),
      };
      if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
      }
      std::fs::write(&path, format!("{citations}\n"))?;
      info!("Exported {} records to {}", papers.len(), path.display());
      interaction.reply(ResponseContent::Success(&format!(
        "Exported {} paper(s) as {format} to {}",
        papers.len(),
        path.display()
      )))
    },
    None => interaction.reply(ResponseContent::Text(&citations)),
  }
}

use super::*;

#[derive(Args, Clone)]
pub struct CiteOptions {
  /// Record id, as printed by `search`
  pub id: String,

  /// bibtex, apa, ieee or ris; defaults to the configured format
  #[arg(long, short)]
  pub format: Option<String>,
}

/// Function for the [`Commands::Cite`] in the CLI.
pub fn cite_paper<I: UserInteraction>(
  interaction: &I,
  config: &Config,
  cite_options: CiteOptions,
) -> Result<()> {
  let CiteOptions { id, format } = cite_options;
  let format = citation_format(format.as_deref(), config.default_citation_format)?;
  let mut library = open_library(config)?;
  let record = find_record(&mut library, &id)?;
  trace!("Citing {id} as {format}");
  interaction.reply(ResponseContent::Text(&cite(&record.to_paper(), format)))
}

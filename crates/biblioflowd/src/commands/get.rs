use super::*;

/// Function for the [`Commands::Get`] in the CLI.
pub fn get<I: UserInteraction>(interaction: &I, config: &Config, id: &str) -> Result<()> {
  let mut library = open_library(config)?;
  let record = find_record(&mut library, id)?;
  debug!("Found record: {record:?}");
  interaction.reply(ResponseContent::Record(&record))
}

//! Module for removing records from the library.

use super::*;

#[derive(Args, Clone)]
pub struct RemoveOptions {
  /// Record id, as printed by `search`
  pub id: String,

  /// Show what would be removed without changing the library
  #[arg(long)]
  pub dry_run: bool,
}

/// Function for the [`Commands::Remove`] in the CLI.
pub fn remove<I: UserInteraction>(
  interaction: &I,
  config: &Config,
  remove_options: RemoveOptions,
) -> Result<()> {
  let RemoveOptions { id, dry_run } = remove_options;
  let mut library = open_library(config)?;
  let record = find_record(&mut library, &id)?;
  interaction.reply(ResponseContent::Record(&record))?;

  if dry_run {
    Remove::by_id(&id).dry_run().execute(&mut library)?;
    return interaction.reply(ResponseContent::Info(&format!("Would remove \"{}\"", record.title)));
  }

  if !interaction.confirm("Remove this paper from the library? The PDF stays on disk")? {
    return interaction.reply(ResponseContent::Info("Nothing removed"));
  }

  let removed = Remove::by_id(&id).execute(&mut library)?;
  interaction.reply(ResponseContent::Success(&format!(
    "Removed {} record(s), {} left in the library",
    removed.len(),
    library.count()
  )))
}

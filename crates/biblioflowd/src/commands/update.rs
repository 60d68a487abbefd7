//! Module for release checks.

use super::*;

/// Function for the [`Commands::Update`] in the CLI.
pub async fn update<I: UserInteraction>(interaction: &I, config: &Config) -> Result<()> {
  interaction.reply(ResponseContent::Working("Checking for updates"))?;
  match UpdateChecker::new(&config.release_api, VERSION).check().await? {
    Some(release) => {
      interaction.reply(ResponseContent::Info(&format!(
        "BiblioFlow {} is available (you are running {VERSION})",
        release.version
      )))?;
      if let Some(published_at) = release.published_at {
        interaction
          .reply(ResponseContent::Info(&format!("Released {}", published_at.format("%Y-%m-%d"))))?;
      }
      if let Some(url) = &release.download_url {
        interaction.reply(ResponseContent::Info(&format!("Download: {url}")))?;
      }
      if !release.notes.trim().is_empty() {
        interaction.reply(ResponseContent::Text(release.notes.trim()))?;
      }
      Ok(())
    },
    None => interaction
      .reply(ResponseContent::Success(&format!("You are running the latest version ({VERSION})"))),
  }
}

/// The release check done before `organize` and `watch`. Failing to reach the release API
/// is only logged.
pub async fn check_on_startup<I: UserInteraction>(interaction: &I, config: &Config) -> Result<()> {
  if !config.check_updates_on_startup {
    return Ok(());
  }
  match UpdateChecker::new(&config.release_api, VERSION).check().await {
    Ok(Some(release)) => interaction.reply(ResponseContent::Warning(&format!(
      "BiblioFlow {} is available, run `biblioflow update` for details",
      release.version
    ))),
    Ok(None) => {
      debug!("No update available");
      Ok(())
    },
    Err(e) => {
      warn!("Update check failed: {e}");
      Ok(())
    },
  }
}

//! Module for inspecting and editing preferences.

use serde_json::Value;

use super::*;

/// Subcommands of [`Commands::Config`]
#[derive(Subcommand, Clone)]
pub enum ConfigCommands {
  /// Print every preference as JSON
  Show,

  /// Print one preference
  Get {
    /// Preference name, e.g. "output_folder"
    key: String,
  },

  /// Change one preference
  Set {
    /// Preference name, e.g. "auto_confirm"
    key:   String,
    /// New value; JSON literals such as `true` or `null` are understood
    value: String,
  },

  /// Restore all preferences to their defaults
  Reset,
}

/// Function for the [`Commands::Config`] in the CLI.
pub fn config<I: UserInteraction>(
  interaction: &I,
  config_path: &Path,
  command: ConfigCommands,
) -> Result<()> {
  let mut config = Config::load(config_path)?;

  match command {
    ConfigCommands::Show => {
      debug!("Preferences at {}", config_path.display());
      interaction.reply(ResponseContent::Text(&serde_json::to_string_pretty(&config)?))
    },
    ConfigCommands::Get { key } => match config.get(&key)? {
      Value::String(value) => interaction.reply(ResponseContent::Text(&value)),
      value => interaction.reply(ResponseContent::Text(&value.to_string())),
    },
    ConfigCommands::Set { key, value } => {
      config.set(&key, &value)?;
      config.save(config_path)?;
      interaction.reply(ResponseContent::Success(&format!("Set {key} = {}", config.get(&key)?)))
    },
    ConfigCommands::Reset => {
      if !interaction.confirm("Restore every preference to its default?")? {
        return interaction.reply(ResponseContent::Info("Preferences unchanged"));
      }
      config.reset();
      config.save(config_path)?;
      interaction.reply(ResponseContent::Success("Preferences restored to their defaults"))
    },
  }
}

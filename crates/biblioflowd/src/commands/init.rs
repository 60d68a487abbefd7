//! Module for writing a first preferences file.

use biblioflow::config::DEFAULT_OUTPUT_FOLDER;

use super::*;

#[derive(Args, Clone)]
pub struct InitOptions {
  /// Folder organized papers are placed in
  #[arg(long)]
  pub output_folder: Option<PathBuf>,
  /// Location of the JSON library
  #[arg(long)]
  pub library_path:  Option<PathBuf>,
  /// Naming preset (default, underscore, title_first) or a template such as "{year}_{title}.pdf"
  #[arg(long)]
  pub naming_format: Option<String>,
  /// Folder `watch` uses when run without an argument
  #[arg(long)]
  pub watch_folder:  Option<PathBuf>,
}

/// Function for the [`Commands::Init`] in the CLI.
pub fn init<I: UserInteraction>(
  interaction: &I,
  config_path: &Path,
  init_options: InitOptions,
) -> Result<()> {
  let InitOptions { output_folder, library_path, naming_format, watch_folder } = init_options;

  if config_path.exists()
    && !interaction.confirm(&format!(
      "Preferences already exist at {}, do you want to overwrite them?",
      config_path.display()
    ))?
  {
    interaction.reply(ResponseContent::Info(
      "Keeping the existing preferences. Use `biblioflow config set` to change single values",
    ))?;
    return Ok(());
  }

  let config = Config::default();

  let config = match output_folder {
    Some(folder) => config.with_output_folder(folder),
    None => match ask_for_path(
      interaction,
      &format!("Would you like to organize papers into {DEFAULT_OUTPUT_FOLDER}?"),
      "Output folder",
    )? {
      Some(folder) => config.with_output_folder(folder),
      None => config,
    },
  };

  let config = match library_path {
    Some(path) => config.with_library_path(path),
    None => match ask_for_path(
      interaction,
      &format!("Would you like to keep the library at {}?", Library::default_path().display()),
      "Library file",
    )? {
      Some(path) => config.with_library_path(path),
      None => config,
    },
  };

  let config = match naming_format {
    Some(format) => config.with_naming_format(NamingFormat::from_str(&format)?),
    None => config,
  };

  let config = match watch_folder {
    Some(folder) => config.with_watch_folder(folder),
    None => config,
  };

  std::fs::create_dir_all(config.output_folder())?;
  config.save(config_path)?;
  info!("Wrote preferences to {}", config_path.display());

  interaction.reply(ResponseContent::Success("BiblioFlow initialized successfully"))?;
  interaction.reply(ResponseContent::Info(&format!(
    "Preferences: {}\n   Output folder: {}\n   Library: {}\n   Naming format: {}",
    config_path.display(),
    config.output_folder().display(),
    config.library_path().display(),
    config.naming_format,
  )))?;
  Ok(())
}

/// `None` keeps the default, otherwise the path the user typed.
fn ask_for_path<I: UserInteraction>(
  interaction: &I,
  question: &str,
  label: &str,
) -> Result<Option<PathBuf>> {
  if interaction.confirm(question)? {
    return Ok(None);
  }
  let answer = interaction.prompt(label)?;
  let answer = answer.trim();
  Ok((!answer.is_empty()).then(|| PathBuf::from(answer)))
}

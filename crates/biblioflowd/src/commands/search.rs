//! Module for abstracting the "search" functionality to the library.

use super::*;

/// Orderings offered on the command line.
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum SortKey {
  /// When the paper was added
  Added,
  /// Paper title
  Title,
  /// Publication year
  Year,
}

impl From<SortKey> for OrderField {
  fn from(key: SortKey) -> Self {
    match key {
      SortKey::Added => OrderField::AddedAt,
      SortKey::Title => OrderField::Title,
      SortKey::Year => OrderField::Year,
    }
  }
}

#[derive(Args, Clone)]
pub struct SearchOptions {
  /// Text matched against titles, authors, journals and DOIs; lists everything when omitted
  pub query: Option<String>,

  /// Show detailed paper information
  #[arg(long)]
  pub detailed: bool,

  /// Order the results
  #[arg(long, value_enum)]
  pub sort: Option<SortKey>,

  /// Reverse the order
  #[arg(long)]
  pub reverse: bool,
}

/// Function for the [`Commands::Search`] in the CLI.
pub fn search<I: UserInteraction>(
  interaction: &I,
  config: &Config,
  search_options: SearchOptions,
) -> Result<()> {
  let SearchOptions { query, detailed, sort, reverse } = search_options;
  let mut library = open_library(config)?;

  let mut search = match query.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
    Some(text) => {
      interaction.reply(ResponseContent::Info(&format!("Searching for: {text}")))?;
      Query::text(text)
    },
    None => Query::list_all(),
  };
  if let Some(sort) = sort {
    search = search.order_by(sort.into());
  }
  if reverse {
    search = search.descending();
  }

  let records = search.execute(&mut library)?;
  if records.is_empty() {
    return interaction.reply(ResponseContent::Info("No papers found"));
  }

  if detailed {
    for record in &records {
      interaction.reply(ResponseContent::Record(record))?;
    }
    Ok(())
  } else {
    interaction.reply(ResponseContent::Records(&records))
  }
}

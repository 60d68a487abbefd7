//! Terminal output and prompts.
//!
//! Commands never print or read directly; they talk to a [`UserInteraction`] so the same
//! command code runs interactively or with `--accept-defaults`.

use console::style;
use dialoguer::{Confirm, Input};

use super::*;

pub static INFO_PREFIX: &str = "ℹ ";
pub static WORKING_PREFIX: &str = "» ";
pub static SUCCESS_PREFIX: &str = "✓ ";
pub static ERROR_PREFIX: &str = "✗ ";
pub static WARNING_PREFIX: &str = "! ";
pub static PROMPT_PREFIX: &str = "❯ ";
pub static ITEM_PREFIX: &str = "├─";
pub static LAST_ITEM_PREFIX: &str = "└─";
pub static CONTINUE_PREFIX: &str = "│  ";
pub static BULLET: &str = "•";
pub static ARROW: &str = "→";

/// Something a command wants to show.
#[derive(Debug)]
pub enum ResponseContent<'a> {
  /// Full details of one library record
  Record(&'a LibraryRecord),
  /// One line per library record
  Records(&'a [LibraryRecord]),
  /// Metadata found for a file that is not in the library yet
  Paper(&'a Paper),
  /// Output meant for pipes (citations, JSON)
  Text(&'a str),
  Working(&'a str),
  Success(&'a str),
  Info(&'a str),
  Warning(&'a str),
  Error(BiblioflowdError),
}

pub trait UserInteraction {
  fn confirm(&self, message: &str) -> Result<bool>;
  /// Free text answer; an empty string keeps whatever the caller considers the default.
  fn prompt(&self, message: &str) -> Result<String>;
  fn reply(&self, content: ResponseContent) -> Result<()>;
}

/// [`UserInteraction`] on stdin/stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct Terminal {
  accept_defaults: bool,
}

impl Terminal {
  pub fn new(accept_defaults: bool) -> Self { Self { accept_defaults } }
}

impl UserInteraction for Terminal {
  fn confirm(&self, message: &str) -> Result<bool> {
    if self.accept_defaults {
      trace!("Accepting default for: {message}");
      return Ok(true);
    }
    Ok(
      Confirm::new()
        .with_prompt(format!("{}{}", style(PROMPT_PREFIX).cyan(), message))
        .default(true)
        .wait_for_newline(true)
        .interact()?,
    )
  }

  fn prompt(&self, message: &str) -> Result<String> {
    if self.accept_defaults {
      return Ok(String::new());
    }
    Ok(
      Input::<String>::new()
        .with_prompt(format!("{}{}", style(PROMPT_PREFIX).cyan(), message))
        .allow_empty(true)
        .interact_text()?,
    )
  }

  fn reply(&self, content: ResponseContent) -> Result<()> {
    match content {
      ResponseContent::Record(record) => print_record(record),
      ResponseContent::Records(records) => print_records(records),
      ResponseContent::Paper(paper) => print_paper(paper),
      ResponseContent::Text(text) => println!("{text}"),
      ResponseContent::Working(message) => println!("{} {}", style(WORKING_PREFIX).cyan(), message),
      ResponseContent::Success(message) =>
        println!("{} {}", style(SUCCESS_PREFIX).green(), style(message).green()),
      ResponseContent::Info(message) => println!("{} {}", style(INFO_PREFIX).blue(), message),
      ResponseContent::Warning(message) =>
        println!("{} {}", style(WARNING_PREFIX).yellow(), style(message).yellow()),
      ResponseContent::Error(error) =>
        eprintln!("{} {}", style(ERROR_PREFIX).red(), style(error).red()),
    }
    Ok(())
  }
}

fn print_paper(paper: &Paper) {
  println!("{} {}", style(BULLET).cyan(), style(&paper.title).white().bold());
  detail(ITEM_PREFIX, "Authors", &paper.author_string());
  detail(ITEM_PREFIX, "Year", &paper.year.map_or_else(|| "n.d.".to_string(), |y| y.to_string()));
  detail(ITEM_PREFIX, "Journal", paper.journal.as_deref().unwrap_or("-"));
  detail(LAST_ITEM_PREFIX, "DOI", paper.doi.as_deref().unwrap_or("-"));
}

fn print_record(record: &LibraryRecord) {
  println!("{} {}", style(BULLET).cyan(), style(&record.title).white().bold());
  detail(ITEM_PREFIX, "ID", &record.id);
  detail(ITEM_PREFIX, "Authors", &record.authors.join(", "));
  detail(ITEM_PREFIX, "Year", &record.year.map_or_else(|| "n.d.".to_string(), |y| y.to_string()));
  detail(ITEM_PREFIX, "Journal", record.journal.as_deref().unwrap_or("-"));
  detail(ITEM_PREFIX, "DOI", record.doi.as_deref().unwrap_or("-"));
  detail(ITEM_PREFIX, "File", &record.file_path.display().to_string());
  detail(ITEM_PREFIX, "Added", &record.added_at.format("%Y-%m-%d %H:%M").to_string());
  match &record.abstract_text {
    Some(text) => {
      println!("{} {}", style(LAST_ITEM_PREFIX).dim(), style("Abstract:").green().bold());
      for line in wrap(text, 76) {
        println!("{}   {}", style(CONTINUE_PREFIX).dim(), line);
      }
    },
    None => detail(LAST_ITEM_PREFIX, "Abstract", "-"),
  }
}

fn print_records(records: &[LibraryRecord]) {
  println!("{} Found {} papers:", style(INFO_PREFIX).blue(), style(records.len()).yellow());
  for (i, record) in records.iter().enumerate() {
    let prefix = if i + 1 == records.len() { LAST_ITEM_PREFIX } else { ITEM_PREFIX };
    let year = record.year.map_or_else(|| "n.d.".to_string(), |y| y.to_string());
    println!(
      "{} {} {} {} {}",
      style(prefix).dim(),
      style(&record.id).yellow(),
      style(ARROW).dim(),
      style(&record.title).white().bold(),
      style(format!("({year})")).dim()
    );
  }
}

fn detail(prefix: &str, label: &str, value: &str) {
  println!("{} {} {}", style(prefix).dim(), style(format!("{label}:")).green().bold(), value);
}

fn wrap(text: &str, width: usize) -> Vec<String> {
  let mut lines = Vec::new();
  let mut current = String::new();
  for word in text.split_whitespace() {
    if !current.is_empty() && current.len() + word.len() + 1 > width {
      lines.push(std::mem::take(&mut current));
    }
    if !current.is_empty() {
      current.push(' ');
    }
    current.push_str(word);
  }
  if !current.is_empty() {
    lines.push(current);
  }
  lines
}

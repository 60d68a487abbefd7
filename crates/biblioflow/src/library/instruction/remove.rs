//! Removing records from the library.
//!
//! Only the record is removed; the organized PDF stays where it is.
//!
//! ```no_run
//! use biblioflow::{
//!   library::{Library, Query, Remove},
//!   prelude::*,
//! };
//!
//! # fn example() -> Result<(), BiblioError> {
//! let mut library = Library::open("library.json")?;
//!
//! // Preview which records a text match would remove
//! let doomed = Remove::from_query(Query::text("draft")).dry_run().execute(&mut library)?;
//! println!("Would remove {} records", doomed.len());
//!
//! Remove::by_id("20240101120000_0").execute(&mut library)?;
//! # Ok(())
//! # }
//! ```

use super::*;

/// Options for removal operations.
#[derive(Debug, Default)]
pub struct RemoveOptions {
  /// Report what would be removed without touching the library.
  pub dry_run: bool,
}

/// Removes the records selected by a [`Query`].
///
/// Executing it returns the removed records; an empty list means nothing matched and the
/// library file was not rewritten.
#[derive(Debug)]
pub struct Remove<'a> {
  query:   Query<'a>,
  options: RemoveOptions,
}

impl<'a> Remove<'a> {
  /// Removes whatever `query` selects.
  pub fn from_query(query: Query<'a>) -> Self { Self { query, options: RemoveOptions::default() } }

  /// Removes the record with this id.
  pub fn by_id(id: &'a str) -> Self { Self::from_query(Query::by_id(id)) }

  /// Only reports the records that would be removed.
  pub fn dry_run(mut self) -> Self {
    self.options.dry_run = true;
    self
  }
}

impl LibraryInstruction for Remove<'_> {
  type Output = Vec<LibraryRecord>;

  fn execute(&self, library: &mut Library) -> Result<Self::Output> {
    if self.options.dry_run {
      return self.query.execute(library);
    }

    let (removed, kept): (Vec<_>, Vec<_>) =
      library.records.iter().cloned().partition(|r| self.query.selects(r));
    if removed.is_empty() {
      return Ok(removed);
    }

    // Records only leave memory once they are gone from disk.
    let previous = std::mem::replace(&mut library.records, kept);
    if let Err(e) = library.save() {
      library.records = previous;
      return Err(e);
    }
    info!("Removed {} record(s) from the library", removed.len());
    Ok(removed)
  }
}

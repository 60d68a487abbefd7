//! Reading records back out of the library.
//!
//! Text search is a case-insensitive substring match over title, authors, journal and DOI.
//! Results keep insertion order unless an [`OrderField`] is chosen.

use super::*;

/// Which records a query selects.
#[derive(Debug)]
pub enum QueryCriteria<'a> {
  /// The record with this id
  Id(&'a str),
  /// Records whose title, authors, journal or DOI contain the text
  Text(&'a str),
  /// Every record
  All,
}

/// Sort keys for query results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderField {
  /// Time the record was added
  AddedAt,
  /// Title, ignoring case
  Title,
  /// Publication year; records without one sort first
  Year,
}

/// Selects records, optionally sorted
#[derive(Debug)]
pub struct Query<'a> {
  criteria:   QueryCriteria<'a>,
  order_by:   Option<OrderField>,
  descending: bool,
}

impl<'a> Query<'a> {
  /// A query over `criteria`, in insertion order
  pub fn new(criteria: QueryCriteria<'a>) -> Self {
    Self { criteria, order_by: None, descending: false }
  }

  /// The record with `id`
  pub fn by_id(id: &'a str) -> Self { Self::new(QueryCriteria::Id(id)) }

  /// Records containing `query`
  pub fn text(query: &'a str) -> Self { Self::new(QueryCriteria::Text(query)) }

  /// The whole library
  pub fn list_all() -> Self { Self::new(QueryCriteria::All) }

  /// Sorts results by `field`
  pub fn order_by(mut self, field: OrderField) -> Self {
    self.order_by = Some(field);
    self
  }

  /// Reverses the order
  pub fn descending(mut self) -> Self {
    self.descending = true;
    self
  }

  pub(crate) fn selects(&self, record: &LibraryRecord) -> bool {
    match &self.criteria {
      QueryCriteria::Id(id) => record.id == *id,
      QueryCriteria::Text(text) => record.matches(&text.trim().to_lowercase()),
      QueryCriteria::All => true,
    }
  }
}

impl LibraryInstruction for Query<'_> {
  type Output = Vec<LibraryRecord>;

  fn execute(&self, library: &mut Library) -> Result<Self::Output> {
    let mut records: Vec<LibraryRecord> =
      library.records.iter().filter(|record| self.selects(record)).cloned().collect();

    if let Some(order_field) = self.order_by {
      records.sort_by(|a, b| {
        let cmp = match order_field {
          OrderField::AddedAt => a.added_at.cmp(&b.added_at),
          OrderField::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
          OrderField::Year => a.year.cmp(&b.year),
        };
        if self.descending {
          cmp.reverse()
        } else {
          cmp
        }
      });
    } else if self.descending {
      records.reverse();
    }

    trace!("Query {:?} matched {} records", self.criteria, records.len());
    Ok(records)
  }
}

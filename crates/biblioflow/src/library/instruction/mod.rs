use super::*;

pub mod add;
pub mod query;
pub mod remove;

pub use self::{add::Add, query::*, remove::*};

/// An operation run against a [`Library`].
pub trait LibraryInstruction {
  /// What the operation produces.
  type Output;

  /// Runs the operation, persisting the library when it changed.
  fn execute(&self, library: &mut Library) -> Result<Self::Output>;
}

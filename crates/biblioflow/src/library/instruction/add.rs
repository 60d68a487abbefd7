use super::*;

/// Records an organized paper.
///
/// Executing it returns the id of the new record.
pub struct Add<'a> {
  paper:     &'a Paper,
  file_path: PathBuf,
}

impl<'a> Add<'a> {
  /// Records `paper` as stored at `file_path`.
  pub fn new(paper: &'a Paper, file_path: impl Into<PathBuf>) -> Self {
    Self { paper, file_path: file_path.into() }
  }
}

impl LibraryInstruction for Add<'_> {
  type Output = String;

  fn execute(&self, library: &mut Library) -> Result<Self::Output> {
    let added_at = Local::now();
    let stamp = added_at.format("%Y%m%d%H%M%S");

    let taken: HashSet<&str> = library.records.iter().map(|r| r.id.as_str()).collect();
    let id = (library.records.len()..)
      .map(|n| format!("{stamp}_{n}"))
      .find(|candidate| !taken.contains(candidate.as_str()))
      .unwrap_or_else(|| format!("{stamp}_{}", library.records.len()));

    let record = LibraryRecord {
      id: id.clone(),
      title: self.paper.title.clone(),
      authors: self.paper.authors.clone(),
      year: self.paper.year,
      journal: self.paper.journal.clone(),
      doi: self.paper.doi.clone(),
      abstract_text: self.paper.abstract_text.clone(),
      file_path: self.file_path.clone(),
      added_at,
    };

    library.records.push(record);
    if let Err(e) = library.save() {
      library.records.pop();
      return Err(e);
    }
    info!("Added \"{}\" to the library as {id}", self.paper.title);
    Ok(id)
  }
}

use super::*;

/// IEEE reference for `paper`, e.g. `J. Smith and M. Jones, "Title," *Nature*, 2024.`
pub fn ieee(paper: &Paper) -> String {
  let names = paper.authors.iter().map(|author| ieee_name(author)).collect::<Vec<_>>();
  let authors = match names.as_slice() {
    [] => "Unknown".to_string(),
    [only] => only.clone(),
    [first, second] => format!("{first} and {second}"),
    [init @ .., last] => format!("{}, and {last}", init.join(", ")),
  };

  let mut parts = vec![format!("{authors},"), format!("\"{},\"", paper.title.trim())];
  if let Some(journal) = &paper.journal {
    parts.push(format!("*{journal}*,"));
  }
  parts.push(paper.year.map_or_else(|| "n.d.".to_string(), |year| format!("{year}.")));
  parts.join(" ")
}

fn ieee_name(name: &str) -> String {
  let given = given_names(name);
  if given.is_empty() {
    name.trim().to_string()
  } else {
    format!("{} {}", initials(&given), last_name(name))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_two_authors() {
    let paper = Paper {
      title:         "Machine Learning for Research".into(),
      authors:       vec!["John Smith".into(), "Mary Jones".into()],
      year:          Some(2024),
      journal:       Some("Nature".into()),
      doi:           None,
      abstract_text: None,
    };
    assert_eq!(
      ieee(&paper),
      "J. Smith and M. Jones, \"Machine Learning for Research,\" *Nature*, 2024."
    );
  }

  #[test]
  fn test_three_authors_without_journal() {
    let paper = Paper {
      title: "Title".into(),
      authors: vec!["Ann Lee".into(), "Bo Park".into(), "Plato".into()],
      ..Default::default()
    };
    assert_eq!(ieee(&paper), "A. Lee, B. Park, and Plato, \"Title,\" n.d.");
  }
}

use super::*;

/// RIS record for `paper`, as read by Zotero, Mendeley and EndNote.
pub fn ris(paper: &Paper) -> String {
  let mut lines = vec!["TY  - JOUR".to_string(), tag("TI", &paper.title)];
  lines.extend(paper.authors.iter().map(|author| tag("AU", &inverted_name(author))));
  if let Some(year) = paper.year {
    lines.push(tag("PY", &year.to_string()));
  }
  if let Some(journal) = &paper.journal {
    lines.push(tag("JO", journal));
  }
  if let Some(doi) = &paper.doi {
    lines.push(tag("DO", doi));
  }
  if let Some(abstract_text) = &paper.abstract_text {
    lines.push(tag("AB", abstract_text));
  }
  lines.push("ER  -".to_string());
  lines.join("\n")
}

/// RIS records for several papers, separated by a blank line.
pub fn ris_batch<'a>(papers: impl IntoIterator<Item = &'a Paper>) -> String {
  papers.into_iter().map(ris).collect::<Vec<_>>().join("\n\n")
}

/// A `XX  - value` line; line breaks inside the value would start a new (bogus) tag.
fn tag(name: &str, value: &str) -> String {
  let value = value.lines().map(str::trim).filter(|line| !line.is_empty()).collect::<Vec<_>>();
  format!("{name}  - {}", value.join(" "))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_record() {
    let paper = Paper {
      title:         "Machine Learning for Research".into(),
      authors:       vec!["John Smith".into(), "Mary Jones".into()],
      year:          Some(2024),
      journal:       Some("Nature".into()),
      doi:           Some("10.1038/xxxxx".into()),
      abstract_text: Some("First line.\nSecond line.".into()),
    };
    assert_eq!(
      ris(&paper),
      "TY  - JOUR\nTI  - Machine Learning for Research\nAU  - Smith, John\nAU  - Jones, Mary\nPY  - \
       2024\nJO  - Nature\nDO  - 10.1038/xxxxx\nAB  - First line. Second line.\nER  -"
    );
  }

  #[test]
  fn test_batch() {
    let a = Paper { title: "A".into(), ..Default::default() };
    let b = Paper { title: "B".into(), ..Default::default() };
    assert_eq!(
      ris_batch([&a, &b]),
      "TY  - JOUR\nTI  - A\nER  -\n\nTY  - JOUR\nTI  - B\nER  -"
    );
    assert_eq!(ris_batch(std::iter::empty()), "");
  }
}

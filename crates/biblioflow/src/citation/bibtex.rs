use super::*;

/// Citation key of the form `Smith2024`.
///
/// Built from the first author's family name reduced to ASCII letters (`Unknown` when
/// nothing is left) and the year (`0000` when unknown).
pub fn bibtex_key(paper: &Paper) -> String {
  let author: String = paper.first_author().chars().filter(char::is_ascii_alphabetic).collect();
  let author = if author.is_empty() { "Unknown".to_string() } else { author };
  let year = paper.year.map_or_else(|| "0000".to_string(), |year| year.to_string());
  format!("{author}{year}")
}

/// `@article` entry for `paper`.
///
/// The title is double-braced to preserve its capitalization. Fields without a value are
/// omitted.
pub fn bibtex(paper: &Paper) -> String {
  let mut lines = vec![format!("@article{{{},", bibtex_key(paper))];
  lines.push(format!("  title = {{{{{}}}}},", escape_latex(&paper.title)));

  let authors =
    paper.authors.iter().map(|author| escape_latex(&inverted_name(author))).collect::<Vec<_>>();
  if !authors.is_empty() {
    lines.push(format!("  author = {{{}}},", authors.join(" and ")));
  }
  if let Some(year) = paper.year {
    lines.push(format!("  year = {{{year}}},"));
  }
  if let Some(journal) = &paper.journal {
    lines.push(format!("  journal = {{{}}},", escape_latex(journal)));
  }
  if let Some(doi) = &paper.doi {
    lines.push(format!("  doi = {{{doi}}},"));
  }
  lines.push("}".to_string());
  lines.join("\n")
}

/// Escapes the characters LaTeX treats specially in running text.
fn escape_latex(text: &str) -> String {
  let mut escaped = String::with_capacity(text.len());
  for c in text.chars() {
    if matches!(c, '&' | '%' | '$' | '#' | '_') {
      escaped.push('\\');
    }
    escaped.push(c);
  }
  escaped
}

use super::*;

/// APA 7th edition reference for `paper`.
///
/// Authors are listed as `Family, F. M.`; up to 20 are named, longer lists show the first
/// 19, an ellipsis and the last author. A missing year reads `(n.d.)`.
pub fn apa(paper: &Paper) -> String {
  let names = paper.authors.iter().map(|author| apa_name(author)).collect::<Vec<_>>();
  let authors = match names.as_slice() {
    [] => "Unknown".to_string(),
    [only] => only.clone(),
    [first, second] => format!("{first}, & {second}"),
    [init @ .., last] if names.len() <= 20 => format!("{}, & {last}", init.join(", ")),
    [.., last] => format!("{}, ... {last}", names[..19].join(", ")),
  };

  let year = paper.year.map_or_else(|| "(n.d.)".to_string(), |year| format!("({year})"));

  let title = paper.title.trim();
  let title = if title.ends_with(['.', '?', '!']) { title.to_string() } else { format!("{title}.") };

  let mut parts = vec![format!("{authors} {year}."), title];
  if let Some(journal) = &paper.journal {
    parts.push(format!("*{journal}*."));
  }
  if let Some(url) = paper.doi_url() {
    parts.push(url);
  }
  parts.join(" ")
}

fn apa_name(name: &str) -> String {
  let given = given_names(name);
  if given.is_empty() {
    name.trim().to_string()
  } else {
    format!("{}, {}", last_name(name), initials(&given))
  }
}

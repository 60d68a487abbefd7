use biblioflow::{
  citation::{cite_batch, ris_batch},
  library::OrderField,
};

use super::*;

fn sample_papers() -> Vec<Paper> {
  vec![
    Paper {
      title: "Deep learning".into(),
      authors: vec!["Yann LeCun".into(), "Yoshua Bengio".into(), "Geoffrey Hinton".into()],
      year: Some(2015),
      journal: Some("Nature".into()),
      doi: Some("10.1038/nature14539".into()),
      abstract_text: Some("Deep learning allows computational models\nto learn.".into()),
    },
    Paper {
      title: "Attention Is All You Need".into(),
      authors: vec!["Ashish Vaswani".into()],
      year: Some(2017),
      journal: None,
      doi: None,
      abstract_text: None,
    },
  ]
}

#[traced_test]
#[test]
fn test_library_round_trip_and_export() -> TestResult<()> {
  let dir = tempdir()?;
  let path = dir.path().join("library.json");
  let mut library = Library::open(&path)?;

  for (i, paper) in sample_papers().iter().enumerate() {
    Add::new(paper, dir.path().join(format!("{i}.pdf"))).execute(&mut library)?;
  }
  assert_eq!(library.count(), 2);

  let mut library = Library::open(&path)?;
  let newest_first =
    Query::list_all().order_by(OrderField::Year).descending().execute(&mut library)?;
  assert_eq!(newest_first[0].title, "Attention Is All You Need");

  let papers = newest_first.iter().map(|r| r.to_paper()).collect::<Vec<_>>();
  let ris = ris_batch(&papers);
  assert_eq!(ris.matches("TY  - JOUR").count(), 2);
  assert!(ris.contains("AB  - Deep learning allows computational models to learn."));
  assert!(ris.contains("\nER  -\n\nTY  - JOUR\n"));

  let bib = cite_batch(&papers, CitationFormat::Bibtex);
  assert!(bib.contains("@article{Vaswani2017,"));
  assert!(bib.contains("author = {LeCun, Yann and Bengio, Yoshua and Hinton, Geoffrey},"));
  Ok(())
}

#[test]
fn test_search_and_remove() -> TestResult<()> {
  let dir = tempdir()?;
  let mut library = Library::open(dir.path().join("library.json"))?;
  for paper in sample_papers() {
    Add::new(&paper, "x.pdf").execute(&mut library)?;
  }

  let hits = Query::text("hinton").execute(&mut library)?;
  assert_eq!(hits.len(), 1);
  assert_eq!(hits[0].title, "Deep learning");

  let hits = Query::text("10.1038").execute(&mut library)?;
  assert_eq!(hits.len(), 1);

  let removed = Remove::from_query(Query::text("attention")).execute(&mut library)?;
  assert_eq!(removed.len(), 1);
  assert_eq!(library.count(), 1);
  Ok(())
}

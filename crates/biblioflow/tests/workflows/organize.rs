use super::*;

#[traced_test]
#[tokio::test]
async fn test_pdf_with_doi_is_organized_and_recorded() -> TestResult<()> {
  let server = MockServer::start().await;
  mount_crossref(
    &server,
    "10.1234/mlr.2024.001",
    crossref_work(
      "Machine Learning for Research",
      &[("John", "Smith"), ("Mary", "Jones")],
      2024,
      "Journal of Testing",
    ),
  )
  .await;

  let dir = tempdir()?;
  let downloads = dir.path().join("Downloads");
  std::fs::create_dir_all(&downloads)?;
  let source = write_test_pdf(&downloads, "download (3).pdf", &[
    "Machine Learning for Research",
    "John Smith and Mary Jones",
    "https://doi.org/10.1234/mlr.2024.001",
  ]);

  let config = test_config(&server, &dir).with_auto_confirm(true);
  let processor = Processor::from_config(&config);
  let result = processor.process_file(&source, None).await;

  assert_eq!(result.status, ProcessingStatus::Organized, "{:?}", result.error);
  let new_path = result.new_path.clone().unwrap();
  assert_eq!(
    new_path,
    dir.path().join("Papers").join("[2024] Smith & Jones - Machine Learning for Research.pdf")
  );
  assert!(new_path.exists());
  assert!(!source.exists());

  let paper = result.metadata.unwrap();
  let mut library = Library::open(config.library_path())?;
  let id = Add::new(&paper, &new_path).execute(&mut library)?;

  let mut reopened = Library::open(config.library_path())?;
  let records = Query::by_id(&id).execute(&mut reopened)?;
  assert_eq!(records[0].file_path, new_path);
  assert!(cite(&records[0].to_paper(), CitationFormat::Bibtex).starts_with("@article{Smith2024,"));
  Ok(())
}

#[traced_test]
#[tokio::test]
async fn test_pdf_without_doi_uses_first_line_as_title() -> TestResult<()> {
  let server = MockServer::start().await;
  Mock::given(method("GET"))
    .and(path("/graph/v1/paper/search"))
    .and(query_param("query", "A Survey of Graph Theory"))
    .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
      "data": [{
        "title": "A Survey of Graph Theory",
        "authors": [{ "name": "Leonhard Euler" }],
        "year": 1736,
        "venue": "Commentarii"
      }]
    })))
    .mount(&server)
    .await;

  let dir = tempdir()?;
  let source = write_test_pdf(dir.path(), "scan.pdf", &["A Survey of Graph Theory", "Leonhard Euler"]);
  let config = test_config(&server, &dir);
  let processor = Processor::from_config(&config);

  let mut result = processor.process_file(&source, None).await;
  assert_eq!(result.status, ProcessingStatus::AwaitingConfirmation);
  assert_eq!(result.metadata.as_ref().unwrap().year, Some(1736));
  assert!(source.exists());

  let new_path = processor.confirm(&mut result, None)?;
  assert_eq!(new_path.file_name().unwrap(), "[1736] Euler - A Survey of Graph Theory.pdf");
  Ok(())
}

#[traced_test]
#[tokio::test]
async fn test_batch_streams_events_and_keeps_order() -> TestResult<()> {
  let server = MockServer::start().await;
  mount_crossref(&server, "10.1000/one", crossref_work("First Paper", &[("Ann", "Lee")], 2020, "J")).await;
  mount_crossref(&server, "10.1000/two", crossref_work("First Paper", &[("Ann", "Lee")], 2020, "J")).await;

  let dir = tempdir()?;
  let files = vec![
    write_test_pdf(dir.path(), "a.pdf", &["Whatever", "doi: 10.1000/one"]),
    write_test_pdf(dir.path(), "b.pdf", &["Whatever", "doi: 10.1000/two"]),
    write_test_pdf(dir.path(), "c.pdf", &["Unknown Thing"]),
  ];

  let config = test_config(&server, &dir).with_auto_confirm(true);
  let processor = Processor::from_config(&config);
  let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
  let batch = processor.spawn_batch(files, tx);

  let mut events = Vec::new();
  while let Some(event) = rx.recv().await {
    events.push(event);
  }
  let results = batch.await?;

  assert_eq!(results.len(), 3);
  assert!(results[0].is_success());
  assert!(results[1].is_success());
  assert_eq!(results[2].status, ProcessingStatus::Failed);

  // Same metadata twice: the second copy gets a counter instead of overwriting the first
  assert_eq!(
    results[0].new_path.as_ref().unwrap().file_name().unwrap(),
    "[2020] Lee - First Paper.pdf"
  );
  assert_eq!(
    results[1].new_path.as_ref().unwrap().file_name().unwrap(),
    "[2020] Lee - First Paper (1).pdf"
  );

  let completed = events.iter().filter(|e| matches!(e, ProcessingEvent::Completed { .. })).count();
  assert_eq!(completed, 2);
  assert!(events.contains(&ProcessingEvent::Failed {
    filename: "c.pdf".into(),
    error:    "Could not find metadata for this paper".into(),
  }));
  assert_eq!(events.last(), Some(&ProcessingEvent::BatchComplete { total: 3 }));
  Ok(())
}

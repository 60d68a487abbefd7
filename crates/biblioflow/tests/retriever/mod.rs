use super::*;

#[traced_test]
#[tokio::test]
async fn test_crossref_lookup() -> TestResult<()> {
  let server = MockServer::start().await;
  mount_crossref(
    &server,
    "10.1038/nature14539",
    crossref_work("Deep learning", &[("Yann", "LeCun"), ("Yoshua", "Bengio")], 2015, "Nature"),
  )
  .await;

  let crossref = Crossref::new().with_base_url(&server.uri());
  let paper = crossref.by_doi("10.1038/nature14539").await?;

  assert_eq!(paper.title, "Deep learning");
  assert_eq!(paper.authors, vec!["Yann LeCun", "Yoshua Bengio"]);
  assert_eq!(paper.year, Some(2015));
  assert_eq!(paper.journal.as_deref(), Some("Nature"));
  assert_eq!(paper.doi.as_deref(), Some("10.1038/nature14539"));
  Ok(())
}

#[tokio::test]
async fn test_crossref_unknown_doi_is_not_found() {
  let server = MockServer::start().await;
  let crossref = Crossref::new().with_base_url(&server.uri());
  assert!(matches!(crossref.by_doi("10.1000/unknown").await, Err(BiblioError::MetadataNotFound)));
}

#[tokio::test]
async fn test_crossref_server_error_is_api_error() {
  let server = MockServer::start().await;
  Mock::given(method("GET"))
    .respond_with(ResponseTemplate::new(503))
    .mount(&server)
    .await;

  let crossref = Crossref::new().with_base_url(&server.uri());
  assert!(matches!(crossref.by_doi("10.1000/x").await, Err(BiblioError::ApiError(_))));
}

#[traced_test]
#[tokio::test]
async fn test_unknown_doi_falls_back_to_title_search() -> TestResult<()> {
  let server = MockServer::start().await;
  Mock::given(method("GET"))
    .and(path("/graph/v1/paper/search"))
    .and(query_param("query", "Attention Is All You Need"))
    .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
      "total": 1,
      "data": [{
        "title": "Attention is All you Need",
        "authors": [{ "name": "Ashish Vaswani" }],
        "year": 2017,
        "venue": "",
        "externalIds": { "DOI": "10.48550/arXiv.1706.03762" }
      }]
    })))
    .mount(&server)
    .await;

  let retriever = Retriever::empty()
    .with_source(Crossref::new().with_base_url(&server.uri()))
    .with_source(SemanticScholar::new().with_base_url(&server.uri()));

  let paper = retriever.fetch(Some("10.9999/missing"), Some("Attention Is All You Need")).await?;
  assert_eq!(paper.title, "Attention is All you Need");
  assert_eq!(paper.journal, None);
  assert_eq!(paper.doi.as_deref(), Some("10.48550/arXiv.1706.03762"));
  Ok(())
}

#[tokio::test]
async fn test_nothing_found_anywhere() {
  let server = MockServer::start().await;
  Mock::given(method("GET"))
    .and(path("/graph/v1/paper/search"))
    .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "data": [] })))
    .mount(&server)
    .await;

  let config = Config::default().with_api_endpoints(&server.uri(), &server.uri());
  let retriever = Retriever::from_config(&config);

  let error = retriever.fetch(Some("10.9999/missing"), Some("Nothing")).await.unwrap_err();
  assert_eq!(error.to_string(), "Could not find metadata for this paper");
}

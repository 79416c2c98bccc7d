//! TMDB client contract tests.
//!
//! Verify the HTTP requests the client sends (paths, query encoding, auth
//! header) and how responses map to results or errors, against a local
//! mock server.

use marquee_api::{
    ApiError, MetadataConfig, MovieListOutcome, MovieQuery, MovieSource, TmdbClient,
};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> TmdbClient {
    let config = MetadataConfig::new("test-token").with_base_url(format!("{}/3", server.uri()));
    TmdbClient::new(config).expect("client")
}

#[tokio::test]
async fn discover_request_sorts_by_popularity_with_bearer_auth() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/3/discover/movie"))
        .and(query_param("sort_by", "popularity.desc"))
        .and(header("authorization", "Bearer test-token"))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "page": 1,
            "results": [{"id": 1, "title": "Popular", "poster_path": "/p.jpg"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = client_for(&server)
        .fetch(&MovieQuery::Discover)
        .await
        .expect("fetch");
    match response.into_outcome() {
        MovieListOutcome::Results(movies) => {
            assert_eq!(movies.len(), 1);
            assert_eq!(movies[0].title, "Popular");
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[tokio::test]
async fn search_request_encodes_query_text() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/3/search/movie"))
        .and(query_param("query", "the dark knight"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
        .expect(1)
        .mount(&server)
        .await;

    let response = client_for(&server)
        .fetch(&MovieQuery::Search("the dark knight".into()))
        .await
        .expect("fetch");
    assert_eq!(response.into_outcome(), MovieListOutcome::Results(vec![]));
}

#[tokio::test]
async fn server_error_maps_to_status_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/3/search/movie"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .fetch(&MovieQuery::Search("dune".into()))
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(500));
}

#[tokio::test]
async fn unauthorized_carries_service_message() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/3/discover/movie"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "success": false,
            "status_code": 7,
            "status_message": "Invalid API key: You must be granted a valid key."
        })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .fetch(&MovieQuery::Discover)
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(401));
    assert!(err.to_string().contains("Invalid API key"));
    assert!(!err.to_string().contains("test-token"));
}

#[tokio::test]
async fn malformed_body_is_parse_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/3/discover/movie"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .fetch(&MovieQuery::Discover)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Parse(_)));
}

#[tokio::test]
async fn domain_failure_in_successful_response() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/3/search/movie"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Response": "False",
            "Error": "Too many results."
        })))
        .mount(&server)
        .await;

    let response = client_for(&server)
        .fetch(&MovieQuery::Search("a".into()))
        .await
        .expect("fetch");
    assert_eq!(
        response.into_outcome(),
        MovieListOutcome::Failure(Some("Too many results.".into()))
    );
}

#[tokio::test]
async fn unreachable_server_is_http_error() {
    // Reserve a free port, then release it so connections are refused.
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
        listener.local_addr().expect("local addr")
    };
    let base_url = format!("http://{addr}/3");
    let client =
        TmdbClient::new(MetadataConfig::new("k").with_base_url(base_url)).expect("client");

    let err = client.fetch(&MovieQuery::Discover).await.unwrap_err();
    assert!(matches!(err, ApiError::Http(_)));
}

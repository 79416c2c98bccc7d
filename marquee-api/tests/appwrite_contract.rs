//! Appwrite store contract tests.
//!
//! Verify document list/create/update requests against a mock Appwrite
//! endpoint: URL layout, project/key headers, JSON query syntax and bodies.

use marquee_api::store::query;
use marquee_api::{AppwriteStore, NewTrendingEntry, StoreConfig, TrendingStore};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const DOCUMENTS: &str = "/v1/databases/db1/collections/metrics/documents";

fn store_for(server: &MockServer) -> AppwriteStore {
    let config = StoreConfig::new("proj1", "db1", "metrics")
        .with_endpoint(format!("{}/v1", server.uri()))
        .with_api_key("server-key");
    AppwriteStore::new(config).expect("store")
}

fn document(id: &str, term: &str, count: i64) -> serde_json::Value {
    json!({
        "$id": id,
        "$collectionId": "metrics",
        "$databaseId": "db1",
        "$createdAt": "2024-05-01T10:00:00.000+00:00",
        "$updatedAt": "2024-05-01T10:00:00.000+00:00",
        "$permissions": [],
        "searchTerm": term,
        "count": count,
        "movie_id": 438631,
        "poster_url": "https://image.tmdb.org/t/p/w500/d5NXSklXo0qyIYkgV94XAgMIckC.jpg"
    })
}

#[tokio::test]
async fn find_by_term_sends_equal_query_and_headers() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(DOCUMENTS))
        .and(query_param("queries[]", query::equal("searchTerm", "dune")))
        .and(header("x-appwrite-project", "proj1"))
        .and(header("x-appwrite-key", "server-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total": 1,
            "documents": [document("doc1", "dune", 3)]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let found = store_for(&server).find_by_term("dune").await.expect("find");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].document_id, "doc1");
    assert_eq!(found[0].count, 3);
}

#[tokio::test]
async fn create_posts_unique_id_and_data() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(DOCUMENTS))
        .and(body_json(json!({
            "documentId": "unique()",
            "data": {
                "searchTerm": "dune",
                "count": 1,
                "movie_id": 438631,
                "poster_url": "/no-movie.png"
            }
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(document("new1", "dune", 1)))
        .expect(1)
        .mount(&server)
        .await;

    let created = store_for(&server)
        .create(NewTrendingEntry {
            search_term: "dune".into(),
            count: 1,
            movie_id: 438631,
            poster_url: "/no-movie.png".into(),
        })
        .await
        .expect("create");
    assert_eq!(created.document_id, "new1");
    assert_eq!(created.count, 1);
}

#[tokio::test]
async fn update_count_patches_only_count() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path(format!("{DOCUMENTS}/doc1")))
        .and(body_json(json!({"data": {"count": 4}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(document("doc1", "dune", 4)))
        .expect(1)
        .mount(&server)
        .await;

    let updated = store_for(&server)
        .update_count("doc1", 4)
        .await
        .expect("update");
    assert_eq!(updated.count, 4);
}

#[tokio::test]
async fn list_top_orders_by_count_with_limit() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(DOCUMENTS))
        .and(query_param("queries[]", query::order_desc("count")))
        .and(query_param("queries[]", query::limit(5)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total": 2,
            "documents": [document("a", "batman", 9), document("b", "dune", 4)]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let top = store_for(&server).list_top(5).await.expect("list");
    let terms: Vec<&str> = top.iter().map(|e| e.search_term.as_str()).collect();
    assert_eq!(terms, vec!["batman", "dune"]);
}

#[tokio::test]
async fn appwrite_error_message_is_surfaced() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(DOCUMENTS))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "message": "Collection with the requested ID could not be found.",
            "code": 404,
            "type": "collection_not_found"
        })))
        .mount(&server)
        .await;

    let err = store_for(&server).list_top(5).await.unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert!(err.to_string().contains("could not be found"));
    assert!(!err.to_string().contains("server-key"));
}

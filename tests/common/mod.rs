//! Common test utilities

use axum::body::Body;
use axum::http::{header, Request, Response, StatusCode};
use axum::Router;
use restock::config::Config;
use restock::models::DuplicatePolicy;
use restock::web::RestockServer;
use tower::ServiceExt;

/// Server with default settings and the given duplicate policy
pub fn test_server(policy: DuplicatePolicy) -> RestockServer {
    let mut config = Config::default();
    config.reports.duplicate_policy = policy;
    config.server.enable_request_logging = false;
    RestockServer::new(config).unwrap()
}

pub async fn get(router: &Router, uri: &str) -> Response<Body> {
    router
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

/// POST an urlencoded form body
pub async fn post_form(router: &Router, uri: &str, body: &str) -> Response<Body> {
    router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

pub async fn body_string(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Number of record rows in a queue fragment
pub fn row_count(html: &str) -> usize {
    html.matches("<tr data-bin-id=").count()
}

pub async fn fragment(router: &Router, uri: &str) -> String {
    let response = get(router, uri).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_string(response).await
}

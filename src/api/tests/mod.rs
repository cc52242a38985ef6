use super::*;
use crate::config::Config;
use crate::db::Database;
use crate::test_helpers::{create_test_db, item_xml, page_xml, test_api_config};
use axum::body::Body;
use axum::extract::Request;
use axum::http::StatusCode;
use std::time::Duration;
use tower::ServiceExt;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod collect;

/// Router over a fresh database, fetching from `server`
async fn create_test_app(
    server: &MockServer,
    regions: &[&str],
) -> (Router, Arc<Database>, tempfile::NamedTempFile) {
    let (db, temp_file) = create_test_db().await;
    let config = Arc::new(Config {
        api: test_api_config(&server.uri()),
        regions: regions.iter().map(|r| r.to_string()).collect(),
        ..Config::default()
    });
    let collector = Arc::new(Collector::new(config.clone(), db.clone()).unwrap());
    (create_router(collector, config), db, temp_file)
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if body.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, json)
}

#[tokio::test]
async fn test_api_server_stops_on_shutdown() {
    let server = MockServer::start().await;
    let (db, _temp_file) = create_test_db().await;

    let mut config = Config {
        api: test_api_config(&server.uri()),
        ..Config::default()
    };
    config.server.bind_address = "127.0.0.1:0".parse().unwrap();
    let config = Arc::new(config);
    let collector = Arc::new(Collector::new(config.clone(), db).unwrap());

    let (tx, rx) = tokio::sync::oneshot::channel::<()>();
    let handle = tokio::spawn(start_api_server(collector, config, async move {
        rx.await.ok();
    }));

    tokio::time::sleep(Duration::from_millis(100)).await;
    tx.send(()).unwrap();

    let result = tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("server should stop after shutdown")
        .unwrap();
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_unknown_route_returns_404() {
    let server = MockServer::start().await;
    let (app, _db, _temp_file) = create_test_app(&server, &["11680"]).await;

    let (status, _) = get_json(app, "/no-such-route").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

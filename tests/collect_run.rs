//! End-to-end collection runs against a mock trade API and a SQLite store

mod common;

use common::{item, page, service_error, sqlite_db, test_env};
use rtms_collector::config::SEOUL_REGION_CODES;
use rtms_collector::{Collector, Config, DealMonth, Error};
use std::sync::Arc;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> Config {
    let env = test_env(&format!("{}/trades", server.uri()));
    Config::from_lookup(|key| env.get(key).cloned()).unwrap()
}

fn march_page() -> String {
    page(&[
        item("Raemian", 2024, 3, 3),
        item("Hillstate", 2024, 3, 17),
        item("Filed Late", 2024, 2, 27),
    ])
}

#[tokio::test]
async fn test_run_collects_every_seoul_region() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/trades"))
        .and(query_param("DEAL_YMD", "202403"))
        .and(query_param("serviceKey", "integration-key"))
        .respond_with(ResponseTemplate::new(200).set_body_string(march_page()))
        .expect(25)
        .mount(&server)
        .await;

    let (db, _temp_file) = sqlite_db().await;
    let db = Arc::new(db);
    let collector = Collector::new(Arc::new(config_for(&server)), db.clone()).unwrap();
    let month = DealMonth::new(2024, 3).unwrap();

    let report = collector.run_for(month).await.unwrap();

    assert_eq!(report.regions.len(), 25);
    assert_eq!(report.total_inserted_all_regions, 50);
    for code in SEOUL_REGION_CODES {
        assert_eq!(report.regions[code].inserted_count, 2, "region {code}");
        assert!(report.regions[code].error.is_none(), "region {code}");

        let stored = db.list_trades(code, month).await.unwrap();
        assert_eq!(stored.len(), 2);
        assert!(stored.iter().all(|r| r.sgg_cd == code));
        assert!(stored.iter().all(|r| r.deal_amount.as_deref() == Some("98500")));
    }

    let february = DealMonth::new(2024, 2).unwrap();
    assert_eq!(db.count_trades("11680", february).await.unwrap(), 0);
}

#[tokio::test]
async fn test_second_run_is_idempotent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/trades"))
        .respond_with(ResponseTemplate::new(200).set_body_string(march_page()))
        .mount(&server)
        .await;

    let (db, _temp_file) = sqlite_db().await;
    let collector = Collector::new(Arc::new(config_for(&server)), Arc::new(db)).unwrap();
    let month = DealMonth::new(2024, 3).unwrap();

    let first = collector.run_for(month).await.unwrap();
    let second = collector.run_for(month).await.unwrap();

    assert_eq!(first.total_inserted_all_regions, 50);
    assert_eq!(second.total_inserted_all_regions, 0);
    assert!(second.failed_regions().is_empty());
}

#[tokio::test]
async fn test_upstream_error_in_one_region_leaves_others_intact() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/trades"))
        .and(query_param("LAWD_CD", "11440"))
        .respond_with(ResponseTemplate::new(200).set_body_string(service_error("30")))
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/trades"))
        .respond_with(ResponseTemplate::new(200).set_body_string(march_page()))
        .mount(&server)
        .await;

    let (db, _temp_file) = sqlite_db().await;
    let collector = Collector::new(Arc::new(config_for(&server)), Arc::new(db)).unwrap();

    let report = collector
        .run_for(DealMonth::new(2024, 3).unwrap())
        .await
        .unwrap();

    assert_eq!(report.failed_regions(), vec!["11440"]);
    let failed = &report.regions["11440"];
    assert_eq!(failed.inserted_count, 0);
    assert!(failed.error.as_deref().unwrap().contains("30"));
    assert_eq!(report.total_inserted_all_regions, 48);
}

#[tokio::test]
async fn test_missing_configuration_is_reported_together() {
    let mut env = test_env("http://localhost/trades");
    env.remove("DB_HOST");
    env.remove("DECODED_API_KEY");

    let result = Config::from_lookup(|key| env.get(key).cloned());

    match result {
        Err(Error::Config { message, key }) => {
            assert!(message.contains("DECODED_API_KEY"));
            assert!(message.contains("DB_HOST"));
            assert_eq!(key.as_deref(), Some("DECODED_API_KEY"));
        }
        other => panic!("expected configuration error, got {other:?}"),
    }
}

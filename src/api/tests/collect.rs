use super::*;

#[tokio::test]
async fn test_run_returns_flat_report() {
    let server = MockServer::start().await;
    let month = crate::types::DealMonth::current();

    let items = vec![
        item_xml("Raemian", month.year, month.month, 1),
        item_xml("Hillstate", month.year, month.month, 2),
    ];
    Mock::given(method("GET"))
        .and(path("/trades"))
        .and(query_param("LAWD_CD", "11110"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page_xml(&items, 2)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/trades"))
        .and(query_param("LAWD_CD", "11140"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let (app, _db, _temp_file) = create_test_app(&server, &["11110", "11140"]).await;
    let (status, json) = get_json(app, "/run").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["11110"]["inserted_count"], 2);
    assert!(json["11110"]["error"].is_null());
    assert_eq!(json["11140"]["inserted_count"], 0);
    assert!(json["11140"]["error"].as_str().unwrap().contains("11140"));
    assert_eq!(json["total_inserted_all_regions"], 2);
}

#[tokio::test]
async fn test_run_twice_inserts_nothing_new() {
    let server = MockServer::start().await;
    let month = crate::types::DealMonth::current();

    let items = vec![item_xml("Raemian", month.year, month.month, 1)];
    Mock::given(method("GET"))
        .and(path("/trades"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page_xml(&items, 1)))
        .mount(&server)
        .await;

    let (app, _db, _temp_file) = create_test_app(&server, &["11680"]).await;

    let (_, first) = get_json(app.clone(), "/run").await;
    let (_, second) = get_json(app, "/run").await;

    assert_eq!(first["total_inserted_all_regions"], 1);
    assert_eq!(second["total_inserted_all_regions"], 0);
}

#[tokio::test]
async fn test_run_with_bad_config_returns_500() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let (db, _temp_file) = create_test_db().await;
    let mut config = Config {
        api: test_api_config(&server.uri()),
        ..Config::default()
    };
    config.api.service_key = String::new();
    let config = Arc::new(config);
    let collector = Arc::new(Collector::new(config.clone(), db).unwrap());
    let app = create_router(collector, config);

    let (status, json) = get_json(app, "/run").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"]["code"], "config_error");
    assert_eq!(json["error"]["details"]["key"], "DECODED_API_KEY");
}

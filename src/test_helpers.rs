//! Shared fixtures for unit tests

use crate::config::ApiSourceConfig;
use crate::db::Database;
use crate::types::TradeRecord;
use std::sync::Arc;
use tempfile::NamedTempFile;

/// Fresh migrated SQLite database backed by a temp file
///
/// The file handle must outlive the database, so it is returned alongside.
pub(crate) async fn create_test_db() -> (Arc<Database>, NamedTempFile) {
    let temp_file = NamedTempFile::new().unwrap();
    let url = format!("sqlite://{}?mode=rwc", temp_file.path().display());
    let db = Database::connect(&url).await.unwrap();
    (Arc::new(db), temp_file)
}

/// Trade API settings pointing at a mock server
pub(crate) fn test_api_config(server_uri: &str) -> ApiSourceConfig {
    ApiSourceConfig {
        service_key: "test-key".to_string(),
        endpoint: format!("{}/trades", server_uri),
        ..ApiSourceConfig::default()
    }
}

/// A fully populated trade in March 2024
pub(crate) fn sample_record(apt_nm: &str, deal_day: i32) -> TradeRecord {
    TradeRecord {
        apt_dong: Some("101".to_string()),
        apt_nm: apt_nm.to_string(),
        build_year: Some(2008),
        deal_amount: Some("125000".to_string()),
        deal_day: Some(deal_day),
        deal_month: Some(3),
        deal_year: Some(2024),
        exclu_use_ar: Some(84.97),
        floor: Some(7),
        sgg_cd: "11680".to_string(),
        umd_nm: Some("Daechi-dong".to_string()),
    }
}

/// `<item>` element for a trade signed on the given date
pub(crate) fn item_xml(apt_nm: &str, year: i32, month: u32, day: u32) -> String {
    format!(
        "<item><aptDong>101</aptDong><aptNm>{}</aptNm><buildYear>2008</buildYear>\
         <dealAmount>125,000</dealAmount><dealDay>{}</dealDay><dealMonth>{}</dealMonth>\
         <dealYear>{}</dealYear><excluUseAr>84.97</excluUseAr><floor>7</floor>\
         <sggCd>11680</sggCd><umdNm>Daechi-dong</umdNm></item>",
        apt_nm, day, month, year
    )
}

/// Successful response page wrapping the given `<item>` elements
pub(crate) fn page_xml(items: &[String], total_count: usize) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><response><header><resultCode>000</resultCode><resultMsg>OK</resultMsg></header><body><items>{}</items><numOfRows>1000</numOfRows><pageNo>1</pageNo><totalCount>{}</totalCount></body></response>"#,
        items.concat(),
        total_count
    )
}

/// Page of `count` distinct March 2024 trades, names prefixed by `prefix`
pub(crate) fn numbered_page(prefix: &str, count: usize, total_count: usize) -> String {
    let items: Vec<String> = (0..count)
        .map(|i| item_xml(&format!("{}-{}", prefix, i), 2024, 3, 1 + (i % 28) as u32))
        .collect();
    page_xml(&items, total_count)
}

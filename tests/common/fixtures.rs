//! Fixtures: environment maps, XML pages and a temp SQLite database

use rtms_collector::Database;
use std::collections::HashMap;
use tempfile::NamedTempFile;

/// Environment with every required variable set, fetching from `endpoint`
pub fn test_env(endpoint: &str) -> HashMap<String, String> {
    [
        ("DECODED_API_KEY", "integration-key"),
        ("DB_HOST", "localhost"),
        ("DB_USER", "rtms"),
        ("DB_PASSWORD", "secret"),
        ("DB_NAME", "rtms"),
        ("DB_PORT", "3306"),
        ("RTMS_ENDPOINT", endpoint),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

/// Migrated SQLite database in a temp file (keep the file alive)
pub async fn sqlite_db() -> (Database, NamedTempFile) {
    let temp_file = NamedTempFile::new().unwrap();
    let url = format!("sqlite://{}?mode=rwc", temp_file.path().display());
    (Database::connect(&url).await.unwrap(), temp_file)
}

/// `<item>` without `sggCd`, so the record takes the requested region code
pub fn item(apt_nm: &str, year: i32, month: u32, day: u32) -> String {
    format!(
        "<item><aptNm>{apt_nm}</aptNm><dealAmount> 98,500</dealAmount>\
         <dealYear>{year}</dealYear><dealMonth>{month}</dealMonth><dealDay>{day}</dealDay>\
         <excluUseAr>59.96</excluUseAr><floor>12</floor><umdNm>Yeoksam-dong</umdNm></item>"
    )
}

/// Successful response wrapping `items`
pub fn page(items: &[String]) -> String {
    format!(
        "<response><header><resultCode>000</resultCode><resultMsg>OK</resultMsg></header>\
         <body><items>{}</items><numOfRows>1000</numOfRows><pageNo>1</pageNo>\
         <totalCount>{}</totalCount></body></response>",
        items.concat(),
        items.len()
    )
}

/// Error envelope returned for an unregistered key
pub fn service_error(reason_code: &str) -> String {
    format!(
        "<OpenAPI_ServiceResponse><cmmMsgHeader><errMsg>SERVICE ERROR</errMsg>\
         <returnAuthMsg>SERVICE_KEY_IS_NOT_REGISTERED_ERROR</returnAuthMsg>\
         <returnReasonCode>{reason_code}</returnReasonCode></cmmMsgHeader></OpenAPI_ServiceResponse>"
    )
}

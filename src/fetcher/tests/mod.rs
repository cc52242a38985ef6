use super::*;
use crate::test_helpers::{create_test_db, item_xml, numbered_page, page_xml, test_api_config};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};


const REGION: &str = "11680";

fn march_2024() -> DealMonth {
    DealMonth::new(2024, 3).unwrap()
}

/// Mount a response for one page number
async fn mount_page(server: &MockServer, page_no: u32, body: String) {
    Mock::given(method("GET"))
        .and(path("/trades"))
        .and(query_param("pageNo", page_no.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(1)
        .mount(server)
        .await;
}

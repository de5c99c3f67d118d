mod common;

use jobboard_core::ScrapeQuery;
use jobboard_engine::{FailureKind, HttpSettings, ScrapeWebhook};
use pretty_assertions::assert_eq;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn webhook(server: &MockServer) -> ScrapeWebhook {
    ScrapeWebhook::new(&format!("{}/hook/abc", server.uri()), &HttpSettings::default())
        .expect("webhook")
}

#[tokio::test]
async fn trigger_sends_query_parameters() {
    common::init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/hook/abc"))
        .and(query_param("job_name", "chauffeur poids lourd"))
        .and(query_param("postal_code", "4000"))
        .and(query_param("radius_km", "25"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Accepted"))
        .expect(1)
        .mount(&server)
        .await;

    let query = ScrapeQuery::parse("chauffeur poids lourd", "4000", 25).unwrap();
    webhook(&server).trigger(&query).await.expect("trigger");
}

#[tokio::test]
async fn reset_sends_delete_action() {
    common::init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/hook/abc"))
        .and(query_param("action", "delete"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    webhook(&server).reset().await.expect("reset");
}

#[tokio::test]
async fn failure_status_is_reported() {
    common::init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("{\"ok\":true}"))
        .mount(&server)
        .await;

    let query = ScrapeQuery::parse("cariste", "1000", 10).unwrap();
    let err = webhook(&server).trigger(&query).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(500));
}

#[test]
fn invalid_url_is_rejected() {
    let err = ScrapeWebhook::new("not a url", &HttpSettings::default()).unwrap_err();
    assert_eq!(err.kind, FailureKind::InvalidUrl);
}

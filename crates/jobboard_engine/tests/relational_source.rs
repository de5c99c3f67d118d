mod common;

use jobboard_engine::{FieldMapping, RecordSource, RelationalSettings, RelationalSource};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn settings() -> RelationalSettings {
    RelationalSettings {
        table: "jobs".to_string(),
        page_size: 2,
        search_id: Some("42".to_string()),
        title_contains: Some("cariste".to_string()),
        fields: FieldMapping::relational(),
    }
}

#[tokio::test]
async fn pages_by_offset_with_exact_count() {
    common::init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/jobs"))
        .and(header("apikey", common::ANON_KEY))
        .and(header("Prefer", "count=exact"))
        .and(query_param("search_id", "eq.42"))
        .and(query_param("title", "ilike.*cariste*"))
        .and(query_param("offset", "0"))
        .and(query_param("limit", "2"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Range", "0-1/3")
                .set_body_json(json!([
                    {
                        "id": 7,
                        "title": "Cariste",
                        "location": "Gand",
                        "link": "https://www.tempo-team.be/7",
                        "publication_date": "12 Décembre 2024"
                    },
                    {
                        "id": 8,
                        "title": "Cariste de nuit",
                        "location": null,
                        "link": "https://www.unique.be/8",
                        "publication_date": null
                    }
                ])),
        )
        .mount(&server)
        .await;

    let source = RelationalSource::new(common::postgrest(&server, None), settings());
    let page = source.fetch_page(None).await.expect("page");

    assert_eq!(page.total, Some(3));
    assert_eq!(page.next_cursor.as_deref(), Some("2"));
    assert_eq!(page.records.len(), 2);
    assert_eq!(page.records[0].id, "7");
    assert_eq!(page.records[0].location.as_deref(), Some("Gand"));
    assert_eq!(page.records[0].source_offset.as_deref(), Some("0"));
    assert_eq!(page.records[1].location, None);
    assert_eq!(page.records[1].publication_date_raw, None);
}

#[tokio::test]
async fn last_page_has_no_cursor() {
    common::init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/jobs"))
        .and(query_param("offset", "2"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Range", "2-2/3")
                .set_body_json(json!([
                    { "id": 9, "title": "Cariste", "link": "https://a.be/9" }
                ])),
        )
        .mount(&server)
        .await;

    let source = RelationalSource::new(common::postgrest(&server, None), settings());
    let page = source.fetch_page(Some("2")).await.expect("page");

    assert_eq!(page.records.len(), 1);
    assert_eq!(page.next_cursor, None);
}

#[tokio::test]
async fn empty_page_ends_pagination() {
    common::init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/jobs"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Range", "*/0")
                .set_body_json(json!([])),
        )
        .mount(&server)
        .await;

    let source = RelationalSource::new(common::postgrest(&server, None), settings());
    let page = source.fetch_page(None).await.expect("page");
    assert!(page.records.is_empty());
    assert_eq!(page.total, Some(0));
    assert_eq!(page.next_cursor, None);
}

#[tokio::test]
async fn user_token_is_sent_as_bearer() {
    common::init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/jobs"))
        .and(header("Authorization", "Bearer user-jwt"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let source = RelationalSource::new(common::postgrest(&server, Some("user-jwt")), settings());
    let page = source.fetch_page(None).await.expect("page");
    // Without a count header a short page means the end.
    assert_eq!(page.next_cursor, None);
}

#[tokio::test]
async fn garbage_cursor_is_rejected_without_a_request() {
    common::init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let source = RelationalSource::new(common::postgrest(&server, None), settings());
    assert!(source.fetch_page(Some("not-a-number")).await.is_err());
}

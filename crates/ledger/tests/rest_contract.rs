//! Contract tests for `RestLedger` against the library REST API.
//!
//! ## Endpoints Tested
//!
//! | Method | Path | Test |
//! |--------|------|------|
//! | GET    | `/transactions/?student_id={id}` | `fetch_*` |
//! | PATCH  | `/records/{id}/` | `update_*` |

use std::time::Duration;

use libcard_ledger::{Error, LedgerEndpoint, LedgerStore, Reconciler, RestLedger};
use libcard_protocol::{CardGrid, CardLayout, Notice, RecordType};
use secrecy::SecretString;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer, key: Option<&str>) -> RestLedger {
    RestLedger::new(LedgerEndpoint {
        base_url: format!("{}/api", server.uri()),
        student_id: "2024-00117".to_string(),
        api_key: key.map(|k| SecretString::from(k.to_string())),
        timeout: Duration::from_secs(5),
    })
    .unwrap()
}

fn transactions_body() -> serde_json::Value {
    serde_json::json!([
        {
            "id": 3,
            "book_title": "Dune",
            "callno": "PS3558 .E63",
            "accession_number": "A-0193",
            "records": [
                {
                    "id": 7,
                    "record_type": "BORROWED",
                    "datetime": "2024-05-01T09:00:00Z",
                    "placing_number": 12
                },
                {
                    "id": 8,
                    "record_type": "RETURNED",
                    "datetime": "2024-05-15T09:00:00Z",
                    "placing_number": null
                }
            ]
        }
    ])
}

// ── GET /transactions/ ───────────────────────────────────────────────

#[tokio::test]
async fn fetch_sends_student_id_and_bearer_token() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/transactions/"))
        .and(query_param("student_id", "2024-00117"))
        .and(header("authorization", "Bearer test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(transactions_body()))
        .expect(1)
        .mount(&server)
        .await;

    let transactions = client(&server, Some("test-key"))
        .fetch_transactions()
        .await
        .unwrap();

    assert_eq!(transactions.len(), 1);
    assert_eq!(transactions[0].call_number, "PS3558 .E63");
    assert_eq!(transactions[0].records[0].record_type, RecordType::Borrowed);
    assert_eq!(transactions[0].records[0].placing_number, Some(12));
    assert_eq!(transactions[0].records[1].placing_number, None);
}

#[tokio::test]
async fn fetch_accepts_paginated_envelope() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/transactions/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "count": 1,
            "next": null,
            "results": transactions_body(),
        })))
        .mount(&server)
        .await;

    let transactions = client(&server, None).fetch_transactions().await.unwrap();
    assert_eq!(transactions[0].book_title, "Dune");
}

#[tokio::test]
async fn fetch_surfaces_detail_message() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/transactions/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "detail": "Authentication credentials were not provided."
        })))
        .mount(&server)
        .await;

    let err = client(&server, None).fetch_transactions().await.unwrap_err();
    match err {
        Error::Api {
            status, message, ..
        } => {
            assert_eq!(status, 401);
            assert_eq!(message, "Authentication credentials were not provided.");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn fetch_rejects_wrong_shape() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/transactions/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"oops": true})))
        .mount(&server)
        .await;

    let err = client(&server, None).fetch_transactions().await.unwrap_err();
    assert!(matches!(err, Error::Deserialization { .. }));
}

// ── PATCH /records/{id}/ ─────────────────────────────────────────────

#[tokio::test]
async fn update_sends_placing_number_body() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/api/records/7/"))
        .and(body_json(serde_json::json!({"placing_number": 15})))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": 7,
            "record_type": "BORROWED",
            "datetime": "2024-05-01T09:00:00Z",
            "placing_number": 15
        })))
        .expect(1)
        .mount(&server)
        .await;

    let record = client(&server, None)
        .update_placing_number(7, 15)
        .await
        .unwrap();
    assert_eq!(record.id, 7);
    assert_eq!(record.placing_number, Some(15));
}

#[tokio::test]
async fn update_missing_record_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/api/records/99/"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "detail": "Not found."
        })))
        .mount(&server)
        .await;

    let err = client(&server, None)
        .update_placing_number(99, 15)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::RecordNotFound(99)));
}

#[tokio::test]
async fn update_surfaces_message_field() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/api/records/7/"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "message": "Placing number 15 is already in use"
        })))
        .mount(&server)
        .await;

    let err = client(&server, None)
        .update_placing_number(7, 15)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Placing number 15 is already in use (HTTP 400)");
}

#[tokio::test]
async fn update_surfaces_plain_text_body() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/api/records/7/"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let err = client(&server, None)
        .update_placing_number(7, 15)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Bad Gateway (HTTP 502)");
}

// ── End to end through the reconciler ────────────────────────────────

#[tokio::test]
async fn confirmed_move_patches_then_refreshes() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/transactions/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(transactions_body()))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    let mut moved = transactions_body();
    moved[0]["records"][0]["placing_number"] = serde_json::json!(15);
    Mock::given(method("GET"))
        .and(path("/api/transactions/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(moved))
        .mount(&server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/api/records/7/"))
        .and(body_json(serde_json::json!({"placing_number": 15})))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": 7,
            "record_type": "BORROWED",
            "datetime": "2024-05-01T09:00:00Z",
            "placing_number": 15
        })))
        .expect(1)
        .mount(&server)
        .await;

    let reconciler = Reconciler::new(client(&server, None));
    reconciler.refresh().await.unwrap();
    let mut grid = CardGrid::new(CardLayout::default(), reconciler.handle());
    grid.populate_from_index();

    grid.start_drag(12).unwrap();
    grid.drop_on(15);
    let notice = reconciler.confirm_and_apply(&mut grid).await.unwrap();

    assert!(matches!(notice, Notice::Moved { record_id: 7, source: 12, target: 15, .. }));
    assert_eq!(grid.value(12), "");
    assert_eq!(grid.value(15), "BORROWED\n2024-05-01");
    let index = reconciler.handle().snapshot();
    assert_eq!(index.find(15).map(|l| l.record.id), Some(7));
}

#[tokio::test]
async fn rejected_move_leaves_grid_untouched() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/transactions/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(transactions_body()))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/api/records/7/"))
        .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
            "message": "database is locked"
        })))
        .mount(&server)
        .await;

    let reconciler = Reconciler::new(client(&server, None));
    reconciler.refresh().await.unwrap();
    let mut grid = CardGrid::new(CardLayout::default(), reconciler.handle());
    grid.populate_from_index();

    grid.start_drag(12).unwrap();
    grid.drop_on(15);
    let notice = reconciler.confirm_and_apply(&mut grid).await.unwrap();

    assert_eq!(
        notice,
        Notice::MoveFailed {
            reason: "database is locked (HTTP 500)".to_string()
        }
    );
    assert_eq!(grid.value(12), "BORROWED\n2024-05-01");
    assert_eq!(grid.value(15), "");
}

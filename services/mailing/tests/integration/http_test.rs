use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use sea_orm::DatabaseConnection;
use serde_json::{Value, json};

use courier_auth_types::{USER_ID_HEADER, USER_ROLE_HEADER};
use courier_mailing::infra::smtp::{SmtpMailTransport, SmtpSettings, SmtpTls};
use courier_mailing::router::build_router;
use courier_mailing::state::AppState;
use courier_testing::auth::MockAuth;

use crate::helpers::settings;

/// Router over a disconnected database. Only requests rejected before any query
/// can succeed here.
fn server() -> TestServer {
    let transport = SmtpMailTransport::from_settings(&SmtpSettings {
        host: "localhost".to_owned(),
        port: 2525,
        username: None,
        password: None,
        tls: SmtpTls::Plain,
    })
    .unwrap();
    let state = AppState {
        db: DatabaseConnection::Disconnected,
        transport,
        sweep: settings(),
    };
    TestServer::new(build_router(state)).unwrap()
}

fn with_auth(request: axum_test::TestRequest, auth: &MockAuth) -> axum_test::TestRequest {
    let [(id_name, id_value), (role_name, role_value)] = auth.header_pairs();
    request
        .add_header(id_name, id_value)
        .add_header(role_name, role_value)
}

#[tokio::test]
async fn should_answer_healthz_with_request_id() {
    let server = server();

    let response = server.get("/healthz").await;

    response.assert_status_ok();
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn should_report_not_ready_without_database() {
    let server = server();

    let response = server.get("/readyz").await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn should_reject_request_without_identity_headers() {
    let server = server();

    let response = server.get("/mailings").await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_route_edits_behind_identity_check() {
    let server = server();
    let id = "0192d6a4-7c1e-7000-8000-000000000003";

    for path in [
        format!("/recipients/{id}"),
        format!("/templates/{id}"),
        format!("/mailings/{id}"),
    ] {
        let response = server.patch(&path).json(&json!({})).await;
        response.assert_status(StatusCode::UNAUTHORIZED);
    }
}

#[tokio::test]
async fn should_forbid_unknown_role() {
    let server = server();

    let response = server
        .get("/mailings")
        .add_header(
            HeaderName::from_static(USER_ID_HEADER),
            HeaderValue::from_static("0192d6a4-7c1e-7000-8000-000000000001"),
        )
        .add_header(
            HeaderName::from_static(USER_ROLE_HEADER),
            HeaderValue::from_static("9"),
        )
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
    let body: Value = response.json();
    assert_eq!(body["kind"], "FORBIDDEN");
}

#[tokio::test]
async fn should_forbid_non_admin_from_triggering_sweep() {
    let server = server();

    for auth in [MockAuth::client(), MockAuth::manager()] {
        let response = with_auth(server.post("/sweeps"), &auth).await;
        response.assert_status(StatusCode::FORBIDDEN);
    }
}

#[tokio::test]
async fn should_reject_inverted_window() {
    let server = server();

    let response = with_auth(server.post("/mailings"), &MockAuth::client())
        .json(&json!({
            "window_start": "2026-10-18T12:00:00Z",
            "window_end": "2026-10-18T11:00:00Z",
            "periodicity": "daily",
            "message_template_id": "0192d6a4-7c1e-7000-8000-000000000002",
            "recipient_ids": [],
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["kind"], "INVALID_WINDOW");
    assert_eq!(body["message"], "window start is after window end");
}

#[tokio::test]
async fn should_reject_unknown_status_filter() {
    let server = server();

    let response = with_auth(server.get("/mailings"), &MockAuth::admin())
        .add_query_param("status", "paused")
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["kind"], "INVALID_STATUS");
}

#[tokio::test]
async fn should_reject_malformed_recipient_email() {
    let server = server();

    let response = with_auth(server.post("/recipients"), &MockAuth::client())
        .json(&json!({ "email": "not-an-address", "name": "Nobody" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["kind"], "INVALID_EMAIL");
}

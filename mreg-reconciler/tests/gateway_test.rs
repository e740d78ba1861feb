//! Transport behavior against a mock Mreg server.

mod common;

use common::{anonymous_gateway, gateway};
use mockito::Matcher;
use mreg_reconciler::{Method, StatusCode};
use serde_json::json;

#[tokio::test]
async fn token_sent_as_authorization_header() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/v1/hosts/h1.example.org")
        .match_header("authorization", "Token test-token")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id": 1}"#)
        .create_async()
        .await;

    let gw = gateway(&server.url());
    let response = gw
        .request(Method::GET, "/api/v1/hosts/h1.example.org", None, StatusCode::OK)
        .await
        .expect("request should succeed");

    mock.assert_async().await;
    assert_eq!(response.json.unwrap()["id"], 1);
}

#[tokio::test]
async fn trailing_slash_stripped_from_base_url() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/v1/hosts/h1")
        .with_status(200)
        .create_async()
        .await;

    let gw = gateway(&format!("{}/", server.url()));
    gw.request(Method::GET, "/api/v1/hosts/h1", None, StatusCode::OK)
        .await
        .expect("request should succeed");

    mock.assert_async().await;
}

#[tokio::test]
async fn unexpected_status_reports_full_context() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/api/v1/hosts/")
        .with_status(418)
        .with_body("not today")
        .create_async()
        .await;

    let gw = gateway(&server.url());
    let body = json!({"name": "h1"});
    let err = gw
        .request(Method::POST, "/api/v1/hosts/", Some(&body), StatusCode::CREATED)
        .await
        .expect_err("status mismatch must fail");

    assert!(err.is_error());
    assert_eq!(err.summary, "Got an error message from the Mreg API");
    assert!(err.detail.contains("POST"));
    assert!(err.detail.contains("/api/v1/hosts/"));
    assert!(err.detail.contains(r#"{"name":"h1"}"#));
    assert!(err.detail.contains("http status 418"));
    assert!(err.detail.contains("not today"));
}

#[tokio::test]
async fn malformed_json_body_fails_despite_expected_status() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/v1/hosts/h1")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("{not json")
        .create_async()
        .await;

    let gw = gateway(&server.url());
    let err = gw
        .request(Method::GET, "/api/v1/hosts/h1", None, StatusCode::OK)
        .await
        .expect_err("parse failure must fail");

    assert!(err.is_error());
    assert_eq!(err.detail, "{not json");
}

#[tokio::test]
async fn non_json_response_passes_through_as_text() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/v1/networks/net1/first_unused")
        .with_status(200)
        .with_header("content-type", "text/plain")
        .with_body("\"10.0.0.17\"")
        .create_async()
        .await;

    let gw = gateway(&server.url());
    let response = gw
        .request(
            Method::GET,
            "/api/v1/networks/net1/first_unused",
            None,
            StatusCode::OK,
        )
        .await
        .expect("request should succeed");

    assert!(response.json.is_none());
    assert_eq!(response.text, "\"10.0.0.17\"");
}

#[tokio::test]
async fn login_sets_token_from_response() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/token-auth/")
        .match_body(Matcher::Json(json!({"username": "u", "password": "p"})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"token": "abc"}"#)
        .create_async()
        .await;

    let gw = anonymous_gateway(&server.url())
        .login("u", "p")
        .await
        .expect("login should succeed");

    mock.assert_async().await;
    assert_eq!(gw.session().token(), Some("abc"));
}

#[tokio::test]
async fn login_with_malformed_response_is_an_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/api/token-auth/")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("{}")
        .create_async()
        .await;

    let err = anonymous_gateway(&server.url())
        .login("u", "p")
        .await
        .expect_err("missing token field must fail");

    assert!(err.is_error());
    assert!(err.summary.contains("unexpected result"));
    assert_eq!(err.detail, "{}");
}

// Sitepost - A content publishing API for Hugo sites
// Copyright (C) 2025 Sitepost Project Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as
// published by the Free Software Foundation, either version 3 of the
// License, or (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.


//! Login bridge and bearer protection, with the upstream OAuth2 endpoint mocked

mod common;

use axum::http::{header, HeaderValue, StatusCode};
use common::{spawn_app_with, TestApp};
use mockito::{Matcher, Mock, ServerGuard};
use serde_json::{json, Value};
use sitepost_web::auth::verify_token;

const JWT_SECRET: &str = "local-signing-key";

async fn upstream() -> ServerGuard {
    mockito::Server::new_async().await
}

fn app_with_auth(upstream: &ServerGuard) -> TestApp {
    let endpoint = format!("{}/token", upstream.url());
    spawn_app_with(move |config| {
        config.auth.endpoint = endpoint;
        config.auth.client_id = "hugo-client".to_string();
        config.auth.client_secret = "client-secret".to_string();
        config.auth.token_duration = 2;
        config.auth.jwt_secret = JWT_SECRET.to_string();
    })
}

async fn grant_mock(upstream: &mut ServerGuard, body: &str) -> Mock {
    upstream
        .mock("POST", "/token")
        .match_header("content-type", "application/x-www-form-urlencoded")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("grant_type".into(), "password".into()),
            Matcher::UrlEncoded("client_id".into(), "hugo-client".into()),
            Matcher::UrlEncoded("client_secret".into(), "client-secret".into()),
            Matcher::UrlEncoded("username".into(), "ana".into()),
            Matcher::UrlEncoded("password".into(), "hunter2".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create_async()
        .await
}

fn bearer(token: &str) -> HeaderValue {
    HeaderValue::from_str(&format!("Bearer {}", token)).unwrap()
}

#[tokio::test]
async fn test_login_with_json_issues_local_token() {
    let mut upstream = upstream().await;
    let mock = grant_mock(&mut upstream, r#"{"access_token": "upstream-token"}"#).await;
    let app = app_with_auth(&upstream);

    let response = app
        .server
        .post("/login")
        .json(&json!({"username": "ana", "password": "hunter2"}))
        .await;

    response.assert_status_ok();
    mock.assert_async().await;

    let body: Value = response.json();
    let token = body["access_token"].as_str().unwrap();
    assert_ne!(token, "upstream-token");

    let claims = verify_token(JWT_SECRET, token).unwrap();
    assert_eq!(claims.id, "ana");
    assert!(claims.iss.starts_with("http://"));
    assert!(claims.exp > chrono::Utc::now().timestamp() + 3600);
}

#[tokio::test]
async fn test_login_with_form_credentials() {
    let mut upstream = upstream().await;
    let mock = grant_mock(&mut upstream, r#"{"access_token": "upstream-token"}"#).await;
    let app = app_with_auth(&upstream);

    let response = app
        .server
        .post("/login")
        .form(&[("username", "ana"), ("password", "hunter2")])
        .await;

    response.assert_status_ok();
    mock.assert_async().await;
}

#[tokio::test]
async fn test_login_rejected_by_upstream() {
    let mut upstream = upstream().await;
    let _mock = grant_mock(&mut upstream, r#"{"error": "invalid_grant"}"#).await;
    let app = app_with_auth(&upstream);

    app.server
        .post("/login")
        .json(&json!({"username": "ana", "password": "hunter2"}))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_with_unreadable_upstream_response() {
    let mut upstream = upstream().await;
    let _mock = grant_mock(&mut upstream, "<html>maintenance</html>").await;
    let app = app_with_auth(&upstream);

    app.server
        .post("/login")
        .json(&json!({"username": "ana", "password": "hunter2"}))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_api_requires_bearer_token() {
    let mut upstream = upstream().await;
    let _mock = grant_mock(&mut upstream, r#"{"access_token": "upstream-token"}"#).await;
    let app = app_with_auth(&upstream);

    app.server
        .get("/api/sections")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    app.server
        .get("/api/sections")
        .add_header(header::AUTHORIZATION, bearer("not-a-jwt"))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    let login: Value = app
        .server
        .post("/login")
        .json(&json!({"username": "ana", "password": "hunter2"}))
        .await
        .json();
    let token = login["access_token"].as_str().unwrap();

    app.server
        .get("/api/sections")
        .add_header(header::AUTHORIZATION, bearer(token))
        .await
        .assert_status_ok();

    app.server
        .post("/api/content/posts")
        .add_header(header::AUTHORIZATION, bearer(token))
        .json(&json!({"title": "Signed in"}))
        .await
        .assert_status(StatusCode::CREATED);
    assert!(app.path("posts/signed-in/index.md").exists());
}

#[tokio::test]
async fn test_token_signed_with_other_secret_is_rejected() {
    let upstream = upstream().await;
    let app = app_with_auth(&upstream);

    let foreign = sitepost_web::auth::issue_token(
        &sitepost_web::configuration::AuthConfig {
            token_duration: 1,
            jwt_secret: "someone-else".to_string(),
            ..Default::default()
        },
        "mallory",
        "http://evil.example",
    )
    .unwrap();

    app.server
        .get("/api")
        .add_header(header::AUTHORIZATION, bearer(&foreign))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

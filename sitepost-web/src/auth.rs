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


//! Authentication bridge
//!
//! `POST /login` forwards the caller's credentials to the upstream OAuth2
//! token endpoint as a password grant. When the upstream hands back an
//! access token, a local HS256 JWT is issued; API routes then accept only
//! that local token.

use axum::{
    extract::{FromRequest, FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
    Form, Json,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    typed_header::{TypedHeader, TypedHeaderRejection},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;

use crate::{configuration::AuthConfig, error::AppError, AppState};

/// Claims carried by locally issued tokens
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Username the token was issued to
    pub id: String,
    pub exp: i64,
    pub iss: String,
}

/// Login form, accepted as JSON or url-encoded
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub access_token: String,
}

impl<S> FromRequest<S> for Credentials
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|ct| ct.trim_start().starts_with("application/json"))
            .unwrap_or(false);

        if is_json {
            let Json(credentials) = Json::<Credentials>::from_request(req, state)
                .await
                .map_err(|e| {
                    AppError::unauthorized("error binding credentials").with_details(e.body_text())
                })?;
            Ok(credentials)
        } else {
            let Form(credentials) = Form::<Credentials>::from_request(req, state)
                .await
                .map_err(|e| {
                    AppError::unauthorized("error binding credentials").with_details(e.body_text())
                })?;
            Ok(credentials)
        }
    }
}

/// Username behind a request, taken from the claims left by [`require_bearer`]
///
/// `None` when authentication is disabled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Editor(pub Option<String>);

impl Editor {
    pub fn name(&self) -> &str {
        self.0.as_deref().unwrap_or("anonymous")
    }
}

impl<S> FromRequestParts<S> for Editor
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Editor(
            parts.extensions.get::<Claims>().map(|claims| claims.id.clone()),
        ))
    }
}

/// `POST /login`
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    credentials: Credentials,
) -> Result<Json<TokenResponse>, AppError> {
    let auth = &state.config.auth;

    let upstream = exchange_password(&state.http, auth, &credentials).await?;
    if upstream.is_empty() {
        tracing::warn!(username = %credentials.username, "Upstream rejected credentials");
        return Err(AppError::unauthorized("wrong or empty credentials"));
    }

    let token = issue_token(auth, &credentials.username, &issuer(&headers))?;
    tracing::info!(username = %credentials.username, "Issued access token");

    Ok(Json(TokenResponse {
        access_token: token,
    }))
}

/// Run the OAuth2 password grant against the upstream endpoint
///
/// Returns the upstream access token, empty when the upstream did not grant one.
pub async fn exchange_password(
    client: &reqwest::Client,
    auth: &AuthConfig,
    credentials: &Credentials,
) -> Result<String, AppError> {
    let form = [
        ("grant_type", "password"),
        ("client_id", auth.client_id.as_str()),
        ("client_secret", auth.client_secret.as_str()),
        ("username", credentials.username.as_str()),
        ("password", credentials.password.as_str()),
    ];

    let response = client
        .post(&auth.endpoint)
        .form(&form)
        .send()
        .await
        .map_err(|e| {
            tracing::warn!("Token endpoint unreachable: {}", e);
            AppError::unauthorized("Unauthorized").with_details(e.to_string())
        })?;

    let body: TokenResponse = response.json().await.map_err(|e| {
        tracing::warn!("Token endpoint returned an unreadable response: {}", e);
        AppError::unauthorized("error decoding JSON").with_details(e.to_string())
    })?;

    Ok(body.access_token)
}

/// Sign a local token for `username`
pub fn issue_token(auth: &AuthConfig, username: &str, issuer: &str) -> Result<String, AppError> {
    let expiration = Duration::try_hours(auth.token_duration)
        .and_then(|duration| Utc::now().checked_add_signed(duration))
        .ok_or_else(|| {
            AppError::internal_server_error("error on generate token")
                .with_details(format!("token duration out of range: {}h", auth.token_duration))
        })?;

    let claims = Claims {
        id: username.to_string(),
        exp: expiration.timestamp(),
        iss: issuer.to_string(),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(auth.jwt_secret.as_bytes()),
    )
    .map_err(|e| AppError::unauthorized("error on generate token").with_details(e.to_string()))
}

/// Check signature and expiry of a local token
pub fn verify_token(secret: &str, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let validation = Validation::new(Algorithm::HS256);
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )?;
    Ok(token_data.claims)
}

/// `<scheme>://<host>` of the request, honoring a proxy's forwarded scheme
fn issuer(headers: &HeaderMap) -> String {
    let scheme = headers
        .get("x-forwarded-proto")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("http");
    let host = headers
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("localhost");
    format!("{}://{}", scheme, host)
}

/// Middleware guarding API routes with a bearer token
///
/// Verified claims are stored in the request extensions.
pub async fn require_bearer(
    State(state): State<AppState>,
    bearer: Result<TypedHeader<Authorization<Bearer>>, TypedHeaderRejection>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let TypedHeader(Authorization(bearer)) = bearer.map_err(|e| {
        tracing::warn!(path = %request.uri().path(), "Missing bearer token");
        AppError::unauthorized("missing or malformed jwt").with_details(e.to_string())
    })?;

    let claims = verify_token(&state.config.auth.jwt_secret, bearer.token()).map_err(|e| {
        tracing::warn!(path = %request.uri().path(), "Rejected bearer token: {}", e);
        AppError::unauthorized("invalid or expired jwt")
    })?;

    tracing::debug!(user = %claims.id, "Authenticated request");
    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

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


//! Response representation chosen from the `Accept` header
//!
//! Clients asking for anything containing `markdown` get the stored file
//! itself; everyone else gets the record as JSON.

use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use sitepost_core::ContentRecord;

pub const MARKDOWN_CONTENT_TYPE: &str = "text/markdown; charset=utf-8";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Representation {
    Json,
    Markdown,
}

impl Representation {
    pub fn from_accept(accept: Option<&HeaderValue>) -> Self {
        match accept.and_then(|value| value.to_str().ok()) {
            Some(accept) if accept.to_ascii_lowercase().contains("markdown") => Self::Markdown,
            _ => Self::Json,
        }
    }

    /// Respond with either the encoded file or the record
    pub fn respond(self, status: StatusCode, record: &ContentRecord, encoded: Vec<u8>) -> Response {
        match self {
            Self::Markdown => markdown(status, encoded),
            Self::Json => (status, Json(record)).into_response(),
        }
    }
}

pub fn markdown(status: StatusCode, encoded: Vec<u8>) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, MARKDOWN_CONTENT_TYPE)],
        encoded,
    )
        .into_response()
}

impl<S> FromRequestParts<S> for Representation
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_accept(parts.headers.get(header::ACCEPT)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accept_selection() {
        let cases = [
            (None, Representation::Json),
            (Some("application/json"), Representation::Json),
            (Some("text/markdown"), Representation::Markdown),
            (Some("text/x-markdown, */*;q=0.1"), Representation::Markdown),
            (Some("Text/Markdown"), Representation::Markdown),
        ];
        for (accept, expected) in cases {
            let value = accept.map(HeaderValue::from_static);
            assert_eq!(Representation::from_accept(value.as_ref()), expected);
        }
    }

    #[test]
    fn test_markdown_response_headers() {
        let response = markdown(StatusCode::CREATED, b"---\ntitle: A\n---\n".to_vec());
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            MARKDOWN_CONTENT_TYPE
        );
    }
}

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


use axum::{
    body::Body,
    extract::{multipart::Field, Multipart, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use sitepost_core::{mime, ContentError, ResourceRef};
use tokio_util::io::ReaderStream;

use crate::{auth::Editor, error::AppError, negotiate::Representation, AppState};

/// Multipart field carrying the uploaded file
const ATTACH_FIELD: &str = "attach";
/// Optional multipart field with the resource title
const TITLE_FIELD: &str = "title";

/// Attach a file to a record
///
/// The first bytes of the upload decide its type; nothing is written when
/// the type is not allowed. Re-uploading a file name replaces both the file
/// and its resource entry.
pub async fn attach_resource_handler(
    State(state): State<AppState>,
    Path((section, slug)): Path<(String, String)>,
    editor: Editor,
    representation: Representation,
    mut multipart: Multipart,
) -> Result<Response, AppError> {
    let mut record = state.store.load(&section, &slug)?;

    let mut uploaded: Option<String> = None;
    let mut title = String::new();

    while let Some(mut field) = multipart.next_field().await.map_err(|e| {
        AppError::new(e.status(), "error reading upload data on request")
            .with_details(e.body_text())
    })? {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            ATTACH_FIELD => {
                let file_name = field
                    .file_name()
                    .map(str::to_string)
                    .filter(|name| !name.is_empty())
                    .ok_or_else(|| AppError::bad_request("upload has no file name"))?;

                let written =
                    store_upload(&state, &section, &slug, &file_name, &mut field).await?;
                tracing::info!(
                    section = %section,
                    slug = %slug,
                    resource = %file_name,
                    bytes = written,
                    user = %editor.name(),
                    "Stored resource"
                );
                uploaded = Some(file_name);
            }
            TITLE_FIELD => {
                title = field.text().await.map_err(|e| {
                    AppError::bad_request("error reading upload data on request")
                        .with_details(e.body_text())
                })?;
            }
            _ => {}
        }
    }

    let src = uploaded
        .ok_or_else(|| AppError::bad_request("error reading upload data on request"))?;
    record.upsert_resource(ResourceRef::new(src).with_title(title));

    let encoded = state.store.save(&mut record, &section)?;
    Ok(representation.respond(StatusCode::OK, &record, encoded))
}

/// Sniff, check and stream one upload to disk; returns the number of bytes written
///
/// An existing resource is only replaced once the last chunk has arrived.
async fn store_upload(
    state: &AppState,
    section: &str,
    slug: &str,
    name: &str,
    field: &mut Field<'_>,
) -> Result<u64, AppError> {
    state.store.resource_path(section, slug, name)?;

    let mut head = Vec::with_capacity(mime::SNIFF_LEN);
    while head.len() < mime::SNIFF_LEN {
        match next_chunk(field).await? {
            Some(chunk) => head.extend_from_slice(&chunk),
            None => break,
        }
    }

    if head.is_empty() {
        return Err(ContentError::Validation("empty upload".to_string()).into());
    }

    let detected = mime::sniff(&head);
    if !mime::is_allowed(&detected, state.allowed_types()) {
        tracing::warn!(resource = %name, mimetype = %detected, "Rejected upload");
        return Err(ContentError::Forbidden(format!("mimetype forbidden '{}'", detected)).into());
    }

    let mut staged = state.store.stage_resource(section, slug, name)?;
    staged.write_all(&head)?;
    let mut written = head.len() as u64;

    while let Some(chunk) = next_chunk(field).await? {
        staged.write_all(&chunk)?;
        written += chunk.len() as u64;
    }

    staged.commit()?;
    Ok(written)
}

async fn next_chunk(field: &mut Field<'_>) -> Result<Option<axum::body::Bytes>, AppError> {
    field.chunk().await.map_err(|e| {
        AppError::new(e.status(), "error reading upload file").with_details(e.body_text())
    })
}

/// Stream a resource file back to the client
pub async fn download_resource_handler(
    State(state): State<AppState>,
    Path((section, slug, attach)): Path<(String, String, String)>,
) -> Result<Response, AppError> {
    let path = state.store.resource_path(&section, &slug, &attach)?;

    let file = tokio::fs::File::open(&path).await.map_err(|e| {
        ContentError::from_io_or_not_found("resource not found", "error reading resource", e)
    })?;

    let content_type = mime_guess::from_path(&path).first_or_octet_stream();
    let body = Body::from_stream(ReaderStream::new(file));

    Ok(([(header::CONTENT_TYPE, content_type.to_string())], body).into_response())
}

/// Remove a resource file, then its entry in the record
///
/// When the file is missing the record is left untouched.
pub async fn delete_resource_handler(
    State(state): State<AppState>,
    Path((section, slug, attach)): Path<(String, String, String)>,
    editor: Editor,
) -> Result<StatusCode, AppError> {
    state.store.remove_resource(&section, &slug, &attach)?;

    let mut record = state.store.load(&section, &slug)?;
    if record.remove_resource(&attach) {
        state.store.save(&mut record, &section)?;
    }

    tracing::info!(
        section = %section,
        slug = %slug,
        resource = %attach,
        user = %editor.name(),
        "Removed resource"
    );
    Ok(StatusCode::NO_CONTENT)
}

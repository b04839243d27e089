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
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sitepost_core::{ContentError, ContentPatch, ContentRecord};

use crate::{auth::Editor, error::AppError, negotiate, negotiate::Representation, AppState};

/// List section directories
pub async fn list_sections_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<String>>, AppError> {
    Ok(Json(state.store.list_sections()?))
}

/// List the slugs of one section
pub async fn list_content_handler(
    State(state): State<AppState>,
    Path(section): Path<String>,
) -> Result<Json<Vec<String>>, AppError> {
    Ok(Json(state.store.list_slugs(&section)?))
}

/// Create a record; the slug must not be taken yet
pub async fn create_content_handler(
    State(state): State<AppState>,
    Path(section): Path<String>,
    editor: Editor,
    representation: Representation,
    Json(mut record): Json<ContentRecord>,
) -> Result<Response, AppError> {
    record.validate_title()?;
    let slug = record.ensure_slug().to_string();

    if state.store.exists(&section, &slug)? {
        tracing::warn!(section = %section, slug = %slug, "Content already exists");
        return Err(ContentError::Conflict("content already exists".to_string()).into());
    }

    let encoded = state.store.save(&mut record, &section)?;
    tracing::info!(
        section = %section,
        slug = %record.slug,
        user = %editor.name(),
        "Created content"
    );

    Ok(representation.respond(StatusCode::CREATED, &record, encoded))
}

/// Load a record; markdown clients get the stored file untouched
pub async fn get_content_handler(
    State(state): State<AppState>,
    Path((section, slug)): Path<(String, String)>,
    representation: Representation,
) -> Result<Response, AppError> {
    match representation {
        Representation::Markdown => {
            let raw = state.store.read_raw(&section, &slug)?;
            Ok(negotiate::markdown(StatusCode::OK, raw))
        }
        Representation::Json => {
            let record = state.store.load(&section, &slug)?;
            Ok((StatusCode::OK, Json(record)).into_response())
        }
    }
}

/// Merge a patch into a stored record, keeping its slug
pub async fn update_content_handler(
    State(state): State<AppState>,
    Path((section, slug)): Path<(String, String)>,
    editor: Editor,
    representation: Representation,
    Json(patch): Json<ContentPatch>,
) -> Result<Response, AppError> {
    let mut record = state.store.load(&section, &slug)?;
    patch.apply(&mut record);

    let encoded = state.store.save(&mut record, &section)?;
    tracing::info!(
        section = %section,
        slug = %record.slug,
        user = %editor.name(),
        "Updated content"
    );

    Ok(representation.respond(StatusCode::OK, &record, encoded))
}

/// Delete a record together with its resources
pub async fn delete_content_handler(
    State(state): State<AppState>,
    Path((section, slug)): Path<(String, String)>,
    editor: Editor,
) -> Result<StatusCode, AppError> {
    state.store.remove(&section, &slug)?;
    tracing::info!(
        section = %section,
        slug = %slug,
        user = %editor.name(),
        "Removed content"
    );
    Ok(StatusCode::NO_CONTENT)
}


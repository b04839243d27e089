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


use crate::{auth, handlers, AppState};
use axum::extract::DefaultBodyLimit;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower::{Layer, ServiceBuilder};
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Content API routes, relative to the API prefix
fn api_routes(state: &AppState) -> Router<AppState> {
    let api = Router::new()
        .route("/", get(handlers::info_handler))
        .route("/sections", get(handlers::list_sections_handler))
        .route(
            "/content/{section}",
            get(handlers::list_content_handler).post(handlers::create_content_handler),
        )
        .route(
            "/content/{section}/{slug}",
            get(handlers::get_content_handler)
                .put(handlers::update_content_handler)
                .delete(handlers::delete_content_handler),
        )
        .route(
            "/content/{section}/{slug}/attach",
            post(handlers::attach_resource_handler),
        )
        .route(
            "/content/{section}/{slug}/{attach}",
            get(handlers::download_resource_handler).delete(handlers::delete_resource_handler),
        );

    if state.config.auth.is_enabled() {
        api.route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_bearer,
        ))
    } else {
        api
    }
}

pub fn create_router(state: AppState) -> Router {
    let max_upload_size = state.config.upload.max_size;
    let prefix = state.config.api_prefix.clone();

    let api = api_routes(&state);
    let mut router = if prefix.is_empty() {
        Router::new().merge(api)
    } else {
        Router::new().nest(&prefix, api)
    };

    if state.config.auth.is_enabled() {
        tracing::info!("Authentication enabled, POST /login issues tokens");
        router = router.route("/login", post(auth::login));
    }

    router
        // Everything else comes from the static folder
        .fallback_service(ServeDir::new(&state.config.static_folder))
        .layer(
            ServiceBuilder::new()
                .layer(DefaultBodyLimit::max(max_upload_size))
                .layer(TraceLayer::new_for_http()),
        )
        .with_state(state)
}

/// Router wrapped so trailing slashes are trimmed before routing
pub fn create_app(state: AppState) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(create_router(state))
}

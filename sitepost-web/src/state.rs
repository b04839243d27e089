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


use anyhow::{Context, Result};
use sitepost_core::ContentStore;
use std::sync::Arc;

use crate::configuration::Configuration;

/// Shared, read-only state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Configuration>,
    pub store: ContentStore,
    /// Client for the upstream OAuth2 token endpoint
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(config: Configuration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("sitepost/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            store: ContentStore::new(&config.content_folder),
            config: Arc::new(config),
            http,
        })
    }

    pub fn allowed_types(&self) -> &[String] {
        &self.config.upload.allowed_types
    }
}

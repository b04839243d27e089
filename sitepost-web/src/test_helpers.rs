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


use std::path::Path;

use crate::{
    configuration::{defaults, AuthConfig, Configuration, ServerConfig, UploadConfig},
    AppState,
};

/// Configuration rooted in a temporary directory, authentication disabled
pub fn test_config(dir: &Path) -> Configuration {
    Configuration {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        api_prefix: defaults::default_api_prefix(),
        content_folder: dir.join("content").to_string_lossy().to_string(),
        static_folder: dir.join("public").to_string_lossy().to_string(),
        upload: UploadConfig {
            max_size: defaults::default_max_upload_size(),
            allowed_types: defaults::default_allowed_types(),
        },
        auth: AuthConfig::default(),
    }
}

pub fn create_test_app_state(dir: &Path) -> AppState {
    let state = AppState::new(test_config(dir)).expect("Failed to create test state");
    state
        .store
        .ensure_root()
        .expect("Failed to create content folder");
    state
}

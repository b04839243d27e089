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


//! Default configuration values
//!
//! Each function returns the default value for one configuration field.

// Server defaults
pub fn default_host() -> String {
    "0.0.0.0".to_string()
}

pub fn default_port() -> u16 {
    8000
}

pub fn default_api_prefix() -> String {
    "/api".to_string()
}

// Folder defaults
pub fn default_content_folder() -> String {
    "content".to_string()
}

pub fn default_static_folder() -> String {
    "public".to_string()
}

// Upload defaults
pub fn default_allowed_types() -> Vec<String> {
    vec![
        "application/pdf".to_string(),
        "image/png".to_string(),
        "image/jpeg".to_string(),
    ]
}

pub fn default_max_upload_size() -> usize {
    10_485_760 // 10MB
}

// Auth defaults
pub fn default_token_duration() -> i64 {
    24 // hours
}

pub fn default_config_file() -> String {
    "sitepost.json".to_string()
}

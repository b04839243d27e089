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


use anyhow::Result;
use serde::Serialize;
use std::{env, path::Path};

pub mod defaults;
pub mod parser;

use parser::FileConfig;

/// Main configuration structure containing all sub-configurations
///
/// Each field is resolved in order: configuration file, environment
/// variable, built-in default. Empty or zero file values count as unset.
///
/// # Example
///
/// ```rust,no_run
/// use sitepost_web::configuration::Configuration;
///
/// let config = Configuration::load("sitepost.json").expect("Failed to load configuration");
/// println!("Server running on: {}", config.bind_addr());
/// println!("Content stored in: {}", config.content_folder);
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct Configuration {
    pub server: ServerConfig,
    pub api_prefix: String,
    pub content_folder: String,
    pub static_folder: String,
    pub upload: UploadConfig,
    pub auth: AuthConfig,
}

/// Server configuration for host and port settings
#[derive(Debug, Clone, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Upload limits and the MIME allow-list for resources
#[derive(Debug, Clone, Serialize)]
pub struct UploadConfig {
    pub max_size: usize,
    pub allowed_types: Vec<String>,
}

/// Upstream OAuth2 endpoint and local token settings
#[derive(Debug, Clone, Default, Serialize)]
pub struct AuthConfig {
    pub endpoint: String,
    pub client_id: String,
    #[serde(skip_serializing)]
    pub client_secret: String,
    pub token_duration: i64,
    #[serde(skip_serializing)]
    pub jwt_secret: String,
}

impl Configuration {
    /// Load configuration from an optional JSON file and the environment
    ///
    /// A missing file is not an error; defaults and environment variables
    /// are used instead.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = match parser::parse_json_file(path)? {
            Some(file) => {
                tracing::info!("Loaded configuration from {}", path.display());
                file
            }
            None => {
                tracing::warn!(
                    "Configuration file {} not found, using environment and defaults",
                    path.display()
                );
                FileConfig::default()
            }
        };

        Ok(Self::resolve(&file))
    }

    /// Resolve every field from already parsed file contents
    pub fn resolve(file: &FileConfig) -> Self {
        let api_prefix = normalize_prefix(
            &pick(file.api_prefix.clone(), "API_PREFIX")
                .unwrap_or_else(defaults::default_api_prefix),
        );

        let content_folder = pick(file.content_folder.clone(), "CONTENT_FOLDER")
            .unwrap_or_else(defaults::default_content_folder);

        let static_folder = pick(file.static_folder.clone(), "STATIC_FOLDER")
            .unwrap_or_else(defaults::default_static_folder);

        Self {
            server: ServerConfig::load(file),
            api_prefix,
            content_folder,
            static_folder,
            upload: UploadConfig::load(file),
            auth: AuthConfig::load(file),
        }
    }

    /// Get the server bind address
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl ServerConfig {
    fn load(file: &FileConfig) -> Self {
        let host = pick(file.host.clone(), "HOST").unwrap_or_else(defaults::default_host);

        let port = pick_number(file.port, "PORT").unwrap_or_else(defaults::default_port);

        Self { host, port }
    }
}

impl UploadConfig {
    fn load(file: &FileConfig) -> Self {
        let max_size = pick_number(file.max_upload_size, "MAX_UPLOAD_SIZE")
            .unwrap_or_else(defaults::default_max_upload_size);

        let allowed_types = file
            .mimetypes
            .clone()
            .filter(|types| !types.is_empty())
            .or_else(|| {
                env::var("MIMETYPES")
                    .ok()
                    .map(|types| split_list(&types))
                    .filter(|types| !types.is_empty())
            })
            .unwrap_or_else(defaults::default_allowed_types);

        Self {
            max_size,
            allowed_types,
        }
    }
}

impl AuthConfig {
    fn load(file: &FileConfig) -> Self {
        let auth = file.auth();

        Self {
            endpoint: pick(auth.endpoint, "AUTH_ENDPOINT").unwrap_or_default(),
            client_id: pick(auth.client_id, "AUTH_CLIENT_ID").unwrap_or_default(),
            client_secret: pick(auth.client_secret, "AUTH_CLIENT_SECRET").unwrap_or_default(),
            token_duration: pick_number(auth.token_duration, "TOKEN_DURATION")
                .filter(|hours| *hours > 0)
                .unwrap_or_else(defaults::default_token_duration),
            jwt_secret: pick(auth.jwt_secret, "JWT_SECRET").unwrap_or_default(),
        }
    }

    /// Authentication is on only when every upstream and signing setting is present
    pub fn is_enabled(&self) -> bool {
        !self.endpoint.is_empty()
            && !self.client_id.is_empty()
            && !self.client_secret.is_empty()
            && !self.jwt_secret.is_empty()
    }
}

/// File value if set, otherwise the environment variable if set
fn pick(file_value: Option<String>, var: &str) -> Option<String> {
    file_value
        .filter(|v| !v.trim().is_empty())
        .or_else(|| env::var(var).ok().filter(|v| !v.trim().is_empty()))
}

/// Numeric variant of [`pick`]; zero counts as unset and unparsable env values are ignored
fn pick_number<T>(file_value: Option<T>, var: &str) -> Option<T>
where
    T: std::str::FromStr + Default + PartialEq,
{
    file_value.filter(|v| *v != T::default()).or_else(|| {
        let raw = env::var(var).ok()?;
        match raw.trim().parse::<T>() {
            Ok(value) if value != T::default() => Some(value),
            Ok(_) => None,
            Err(_) => {
                tracing::warn!("Ignoring invalid {} value: {}", var, raw);
                None
            }
        }
    })
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

/// `api/` -> `/api`, `/` -> `` (routes mounted at the root)
fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}

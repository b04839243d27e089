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


//! JSON configuration file parser
//!
//! Every field is optional so a file may set only what it needs; anything
//! missing is resolved from the environment or the defaults.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::{fs, io, path::Path};

/// Raw configuration file contents
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub api_prefix: Option<String>,
    pub content_folder: Option<String>,
    pub static_folder: Option<String>,
    pub mimetypes: Option<Vec<String>>,
    pub max_upload_size: Option<usize>,
    pub auth: Option<FileAuthConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileAuthConfig {
    pub endpoint: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub token_duration: Option<i64>,
    pub jwt_secret: Option<String>,
}

impl FileConfig {
    pub fn auth(&self) -> FileAuthConfig {
        self.auth.clone().unwrap_or_default()
    }
}

/// Parse a JSON configuration file
///
/// Returns `Ok(None)` when the file does not exist. Unreadable or malformed
/// files are errors.
pub fn parse_json_file<P: AsRef<Path>>(path: P) -> Result<Option<FileConfig>> {
    let path = path.as_ref();

    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(e).with_context(|| {
                format!("Failed to read configuration file: {}", path.display())
            })
        }
    };

    let config: FileConfig = serde_json::from_str(&content).with_context(|| {
        format!(
            "Failed to parse JSON configuration file: {}",
            path.display()
        )
    })?;

    Ok(Some(config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "host": "127.0.0.1",
                "port": 9000,
                "api_prefix": "/v1",
                "content_folder": "site/content",
                "static_folder": "site/public",
                "mimetypes": ["image/gif"],
                "max_upload_size": 2048,
                "auth": {{
                    "endpoint": "https://idp.example.com/token",
                    "client_id": "hugo",
                    "client_secret": "s3cret",
                    "token_duration": 2,
                    "jwt_secret": "local"
                }}
            }}"#
        )
        .unwrap();

        let config = parse_json_file(file.path()).unwrap().unwrap();
        assert_eq!(config.host.as_deref(), Some("127.0.0.1"));
        assert_eq!(config.port, Some(9000));
        assert_eq!(config.mimetypes, Some(vec!["image/gif".to_string()]));
        assert_eq!(config.auth().token_duration, Some(2));
        assert_eq!(config.auth().client_id.as_deref(), Some("hugo"));
    }

    #[test]
    fn test_parse_partial_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"port": 8081}}"#).unwrap();

        let config = parse_json_file(file.path()).unwrap().unwrap();
        assert_eq!(config.port, Some(8081));
        assert!(config.host.is_none());
        assert!(config.auth.is_none());
        assert!(config.auth().endpoint.is_none());
    }

    #[test]
    fn test_missing_file_is_none() {
        let dir = tempfile::TempDir::new().unwrap();
        let result = parse_json_file(dir.path().join("absent.json")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_malformed_file_is_error() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "port = 8081").unwrap();
        assert!(parse_json_file(file.path()).is_err());
    }
}

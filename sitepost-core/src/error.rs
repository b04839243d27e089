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

use std::io;
use thiserror::Error;

/// Errors raised by the codec and the content store
#[derive(Debug, Error)]
pub enum ContentError {
    /// The record violates a write-path rule (missing title, bad date ordering)
    #[error("{0}")]
    Validation(String),

    /// A stored file could not be parsed as front matter + body
    #[error("invalid content file: {0}")]
    Format(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    /// Upload rejected by the MIME allow-list
    #[error("{0}")]
    Forbidden(String),

    /// A section, slug or resource name that cannot be used as a path segment
    #[error("{0}")]
    InvalidPath(String),

    #[error("{context}: {source}")]
    FileSystem {
        context: String,
        #[source]
        source: io::Error,
    },
}

impl ContentError {
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        Self::FileSystem {
            context: context.into(),
            source,
        }
    }

    /// Map an I/O error to `NotFound` when the target is missing, `FileSystem` otherwise
    pub fn from_io_or_not_found(
        not_found: impl Into<String>,
        context: impl Into<String>,
        source: io::Error,
    ) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            Self::NotFound(not_found.into())
        } else {
            Self::io(context, source)
        }
    }
}

pub type Result<T> = std::result::Result<T, ContentError>;

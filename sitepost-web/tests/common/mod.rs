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


//! Shared setup for HTTP integration tests

#![allow(dead_code)]

use axum_test::TestServer;
use sitepost_web::{routes, test_helpers::test_config, AppState, Configuration};
use std::path::PathBuf;
use tempfile::TempDir;

pub const PNG: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52,
    0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00,
];

pub struct TestApp {
    pub server: TestServer,
    pub content: PathBuf,
    _dir: TempDir,
}

impl TestApp {
    /// Path of a file or directory below the content folder
    pub fn path(&self, relative: &str) -> PathBuf {
        self.content.join(relative)
    }
}

pub fn spawn_app() -> TestApp {
    spawn_app_with(|_| {})
}

pub fn spawn_app_with(customize: impl FnOnce(&mut Configuration)) -> TestApp {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let mut config = test_config(dir.path());
    customize(&mut config);

    let content = PathBuf::from(&config.content_folder);
    let state = AppState::new(config).expect("Failed to create state");
    state.store.ensure_root().expect("Failed to create content folder");

    let server = TestServer::new(routes::create_router(state)).expect("Failed to create test server");

    TestApp {
        server,
        content,
        _dir: dir,
    }
}

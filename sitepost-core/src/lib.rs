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

pub mod codec;
pub mod dates;
pub mod error;
pub mod mime;
pub mod models;
pub mod store;
pub mod utils;

pub use error::{ContentError, Result};
pub use models::{ContentPatch, ContentRecord, Menu, Params, ResourceRef};
pub use store::ContentStore;

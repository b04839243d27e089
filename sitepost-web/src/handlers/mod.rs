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


pub mod content;
pub mod info;
pub mod resources;

pub use content::{
    create_content_handler, delete_content_handler, get_content_handler, list_content_handler,
    list_sections_handler, update_content_handler,
};
pub use info::info_handler;
pub use resources::{
    attach_resource_handler, delete_resource_handler, download_resource_handler,
};

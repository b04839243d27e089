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

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::dates;
use crate::error::{ContentError, Result};
use crate::utils::slug::generate_slug_from_title;

/// Free-form front matter entries, written inline next to the typed keys
pub type Params = BTreeMap<String, String>;

/// Navigation metadata: menu name to entry attributes
pub type Menu = BTreeMap<String, BTreeMap<String, String>>;

/// A file attached to a content item, stored next to its `index.md`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceRef {
    pub src: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(default, skip_serializing_if = "Params::is_empty")]
    pub params: Params,
}

impl ResourceRef {
    pub fn new(src: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            ..Default::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}

/// One publishable unit, persisted as `<section>/<slug>/index.md`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentRecord {
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub slug: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub body: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "dates::deserialize_optional"
    )]
    pub date: Option<DateTime<FixedOffset>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "dates::deserialize_optional"
    )]
    pub publish_date: Option<DateTime<FixedOffset>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "dates::deserialize_optional"
    )]
    pub expiry_date: Option<DateTime<FixedOffset>>,
    #[serde(default, skip_serializing_if = "Params::is_empty")]
    pub params: Params,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<ResourceRef>,
    #[serde(default, skip_serializing_if = "Menu::is_empty")]
    pub menu: Menu,
}

impl ContentRecord {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Reject records that cannot be written
    pub fn validate_title(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(ContentError::Validation(
                "content must have a title".to_string(),
            ));
        }
        Ok(())
    }

    /// Derive the slug from the title when none was supplied
    pub fn ensure_slug(&mut self) -> &str {
        if self.slug.is_empty() {
            self.slug = generate_slug_from_title(&self.title);
        }
        &self.slug
    }

    /// Replace the resource with the same `src`, or append it
    pub fn upsert_resource(&mut self, resource: ResourceRef) {
        match self.resources.iter_mut().find(|r| r.src == resource.src) {
            Some(existing) => *existing = resource,
            None => self.resources.push(resource),
        }
    }

    /// Drop the resource named `src`; returns whether an entry was removed
    pub fn remove_resource(&mut self, src: &str) -> bool {
        match self.resources.iter().position(|r| r.src == src) {
            Some(index) => {
                self.resources.remove(index);
                true
            }
            None => false,
        }
    }
}

/// Partial update sent by clients on PUT
///
/// Absent fields keep their stored value. `params` merge key by key and
/// `menu` merges by menu name; `resources` replaces the whole list. The slug
/// is the record's identity and is never taken from a patch.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentPatch {
    pub title: Option<String>,
    /// Ignored; the stored slug is kept
    pub slug: Option<String>,
    pub body: Option<String>,
    #[serde(default, deserialize_with = "dates::deserialize_optional")]
    pub date: Option<DateTime<FixedOffset>>,
    #[serde(default, deserialize_with = "dates::deserialize_optional")]
    pub publish_date: Option<DateTime<FixedOffset>>,
    #[serde(default, deserialize_with = "dates::deserialize_optional")]
    pub expiry_date: Option<DateTime<FixedOffset>>,
    pub params: Option<Params>,
    pub resources: Option<Vec<ResourceRef>>,
    pub menu: Option<Menu>,
}

impl ContentPatch {
    pub fn apply(self, record: &mut ContentRecord) {
        if let Some(title) = self.title {
            record.title = title;
        }
        if let Some(body) = self.body {
            record.body = body;
        }
        if self.date.is_some() {
            record.date = self.date;
        }
        if self.publish_date.is_some() {
            record.publish_date = self.publish_date;
        }
        if self.expiry_date.is_some() {
            record.expiry_date = self.expiry_date;
        }
        if let Some(params) = self.params {
            record.params.extend(params);
        }
        if let Some(menu) = self.menu {
            record.menu.extend(menu);
        }
        if let Some(resources) = self.resources {
            record.resources = resources;
        }
        if let Some(slug) = self.slug.filter(|s| *s != record.slug) {
            tracing::debug!(
                requested = %slug,
                kept = %record.slug,
                "Ignoring slug change on update"
            );
        }
    }
}

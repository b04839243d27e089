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

//! Front matter codec
//!
//! A content file is a YAML block between two `---` lines followed by the
//! body text:
//!
//! ```text
//! ---
//! title: Hello, World!
//! slug: hello-world
//! author: ana
//! resources:
//! - src: logo.png
//! ---
//! Body text...
//! ```
//!
//! Typed keys (`title`, `slug`, `resources`, `menu`) are written first; every
//! other front matter key belongs to the record's params.

use serde_yaml::{Mapping, Value};

use crate::error::{ContentError, Result};
use crate::models::{ContentRecord, Menu, Params, ResourceRef};

/// Token delimiting the front matter block
pub const SEPARATOR: &str = "---";

const SEPARATOR_LINE: &str = "---\n";

const TITLE: &str = "title";
const SLUG: &str = "slug";
const BODY: &str = "body";
const RESOURCES: &str = "resources";
const MENU: &str = "menu";

/// Keys owned by typed fields; params using them are not written
pub const RESERVED_KEYS: &[&str] = &[TITLE, SLUG, BODY, RESOURCES, MENU];

/// Serialize a record to front matter + body
///
/// Fills in the slug from the title when it is missing. Front matter holding
/// the separator token is rejected, since the file could not be read back.
pub fn encode(record: &mut ContentRecord) -> Result<Vec<u8>> {
    record.validate_title()?;
    record.ensure_slug();

    let yaml = serde_yaml::to_string(&Value::Mapping(front_matter(record)))
        .map_err(|e| ContentError::Format(format!("cannot serialize front matter: {}", e)))?;
    if yaml.contains(SEPARATOR) {
        return Err(ContentError::Validation(format!(
            "front matter cannot contain '{}'",
            SEPARATOR
        )));
    }

    let mut out = String::with_capacity(yaml.len() + record.body.len() + 2 * SEPARATOR_LINE.len());
    out.push_str(SEPARATOR_LINE);
    out.push_str(&yaml);
    out.push_str(SEPARATOR_LINE);
    out.push_str(&record.body);
    Ok(out.into_bytes())
}

fn front_matter(record: &ContentRecord) -> Mapping {
    let mut map = Mapping::new();
    map.insert(key(TITLE), Value::String(record.title.clone()));
    map.insert(key(SLUG), Value::String(record.slug.clone()));

    for (name, value) in &record.params {
        if RESERVED_KEYS.contains(&name.as_str()) {
            tracing::debug!(param = %name, "Skipping param shadowed by a typed field");
            continue;
        }
        map.insert(key(name), Value::String(value.clone()));
    }

    if !record.resources.is_empty() {
        let resources = record.resources.iter().map(resource_value).collect();
        map.insert(key(RESOURCES), Value::Sequence(resources));
    }

    if !record.menu.is_empty() {
        let menu = record
            .menu
            .iter()
            .map(|(name, entry)| (key(name), string_map_value(entry)))
            .collect();
        map.insert(key(MENU), Value::Mapping(menu));
    }

    map
}

fn key(name: &str) -> Value {
    Value::String(name.to_string())
}

fn string_map_value(map: &Params) -> Value {
    Value::Mapping(
        map.iter()
            .map(|(k, v)| (key(k), Value::String(v.clone())))
            .collect(),
    )
}

fn resource_value(resource: &ResourceRef) -> Value {
    let mut map = Mapping::new();
    map.insert(key("src"), Value::String(resource.src.clone()));
    if !resource.title.is_empty() {
        map.insert(key("title"), Value::String(resource.title.clone()));
    }
    if !resource.params.is_empty() {
        map.insert(key("params"), string_map_value(&resource.params));
    }
    Value::Mapping(map)
}

/// Parse front matter + body back into a record
///
/// The body is everything after the second separator, with separators found
/// inside it kept and surrounding whitespace trimmed.
pub fn decode(bytes: &[u8]) -> Result<ContentRecord> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| ContentError::Format(format!("content is not UTF-8: {}", e)))?;

    let segments: Vec<&str> = text.split(SEPARATOR).collect();
    if segments.len() < 3 {
        return Err(ContentError::Format("missing front matter".to_string()));
    }

    let mapping = match serde_yaml::from_str::<Value>(segments[1]) {
        Ok(Value::Mapping(mapping)) => mapping,
        Ok(Value::Null) => Mapping::new(),
        Ok(_) => {
            return Err(ContentError::Format(
                "front matter is not a mapping".to_string(),
            ))
        }
        Err(e) => return Err(ContentError::Format(e.to_string())),
    };

    let mut record = ContentRecord::default();
    for (name, value) in mapping {
        let name = scalar("front matter key", name)?;
        match name.as_str() {
            TITLE => record.title = scalar(&name, value)?,
            SLUG => record.slug = scalar(&name, value)?,
            // The body lives after the front matter
            BODY => {}
            RESOURCES => record.resources = resources(value)?,
            MENU => record.menu = menu(value)?,
            _ => {
                let value = scalar(&name, value)?;
                record.params.insert(name, value);
            }
        }
    }

    record.body = segments[2..].join(SEPARATOR).trim().to_string();
    Ok(record)
}

fn scalar(name: &str, value: Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Ok(String::new()),
        Value::Tagged(tagged) => scalar(name, tagged.value),
        Value::Sequence(_) | Value::Mapping(_) => Err(ContentError::Format(format!(
            "'{}' must be a scalar value",
            name
        ))),
    }
}

fn string_map(name: &str, value: Value) -> Result<Params> {
    match value {
        Value::Null => Ok(Params::new()),
        Value::Mapping(mapping) => mapping
            .into_iter()
            .map(|(k, v)| {
                let k = scalar(name, k)?;
                let v = scalar(&k, v)?;
                Ok((k, v))
            })
            .collect(),
        _ => Err(ContentError::Format(format!("'{}' must be a mapping", name))),
    }
}

fn resources(value: Value) -> Result<Vec<ResourceRef>> {
    let items = match value {
        Value::Null => return Ok(Vec::new()),
        Value::Sequence(items) => items,
        _ => {
            return Err(ContentError::Format(
                "'resources' must be a list".to_string(),
            ))
        }
    };

    items
        .into_iter()
        .map(|item| {
            let mut resource = ResourceRef::default();
            for (k, v) in string_map_entries(item)? {
                match k.as_str() {
                    "src" => resource.src = scalar(&k, v)?,
                    "title" => resource.title = scalar(&k, v)?,
                    "params" => resource.params = string_map(&k, v)?,
                    _ => {}
                }
            }
            Ok(resource)
        })
        .collect()
}

fn string_map_entries(item: Value) -> Result<Vec<(String, Value)>> {
    match item {
        Value::Mapping(mapping) => mapping
            .into_iter()
            .map(|(k, v)| Ok((scalar("resource key", k)?, v)))
            .collect(),
        _ => Err(ContentError::Format(
            "each resource must be a mapping".to_string(),
        )),
    }
}

fn menu(value: Value) -> Result<Menu> {
    match value {
        Value::Null => Ok(Menu::new()),
        Value::Mapping(mapping) => mapping
            .into_iter()
            .map(|(k, v)| {
                let k = scalar(MENU, k)?;
                let entry = string_map(&k, v)?;
                Ok((k, entry))
            })
            .collect(),
        _ => Err(ContentError::Format("'menu' must be a mapping".to_string())),
    }
}

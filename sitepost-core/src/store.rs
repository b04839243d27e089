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

//! Filesystem layout for content
//!
//! ```text
//! <root>/<section>/<slug>/index.md
//! <root>/<section>/<slug>/<resource files...>
//! ```
//!
//! The directory tree is the only state; every call goes to disk.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::codec;
use crate::dates;
use crate::error::{ContentError, Result};
use crate::models::ContentRecord;

/// File holding a record's front matter and body
pub const INDEX_FILE: &str = "index.md";

#[derive(Debug, Clone)]
pub struct ContentStore {
    root: PathBuf,
}

impl ContentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the content root, failing if something other than a directory is in the way
    pub fn ensure_root(&self) -> Result<()> {
        match fs::metadata(&self.root) {
            Ok(meta) if meta.is_dir() => Ok(()),
            Ok(_) => Err(ContentError::InvalidPath(format!(
                "a file exists with name {:?}",
                self.root
            ))),
            Err(_) => fs::create_dir_all(&self.root)
                .map_err(|e| ContentError::io("error creating content folder", e)),
        }
    }

    /// Directory of one record, after validating both path segments
    pub fn record_dir(&self, section: &str, slug: &str) -> Result<PathBuf> {
        validate_segment("section", section)?;
        validate_segment("slug", slug)?;
        Ok(self.root.join(section).join(slug))
    }

    pub fn exists(&self, section: &str, slug: &str) -> Result<bool> {
        Ok(self.record_dir(section, slug)?.exists())
    }

    /// Normalize dates, encode and write `index.md`, returning the bytes written
    pub fn save(&self, record: &mut ContentRecord, section: &str) -> Result<Vec<u8>> {
        validate_segment("section", section)?;
        dates::set_dates(record)?;
        let data = codec::encode(record)?;

        let dir = self.record_dir(section, &record.slug)?;
        fs::create_dir_all(&dir)
            .map_err(|e| ContentError::io("error creating folder to content", e))?;
        fs::write(dir.join(INDEX_FILE), &data)
            .map_err(|e| ContentError::io("error writing content to file", e))?;

        tracing::debug!(section, slug = %record.slug, bytes = data.len(), "Saved content");
        Ok(data)
    }

    /// Raw bytes of a record's `index.md`
    pub fn read_raw(&self, section: &str, slug: &str) -> Result<Vec<u8>> {
        let file = self.record_dir(section, slug)?.join(INDEX_FILE);
        fs::read(&file).map_err(|e| {
            ContentError::from_io_or_not_found("content not found", "error reading file content", e)
        })
    }

    /// Read and decode a record
    ///
    /// A file without a `slug` key is identified by its directory name.
    pub fn load(&self, section: &str, slug: &str) -> Result<ContentRecord> {
        let mut record = codec::decode(&self.read_raw(section, slug)?)?;
        if record.slug.is_empty() {
            record.slug = slug.to_string();
        }
        Ok(record)
    }

    /// Delete a record's directory with all of its resources
    pub fn remove(&self, section: &str, slug: &str) -> Result<()> {
        if section.is_empty() {
            return Err(ContentError::InvalidPath("path incomplete".to_string()));
        }
        let dir = self.record_dir(section, slug)?;
        fs::remove_dir_all(&dir).map_err(|e| {
            ContentError::from_io_or_not_found("content not found", "error removing content", e)
        })?;

        tracing::debug!(section, slug, "Removed content directory");
        Ok(())
    }

    /// Names of the top-level section directories, sorted
    pub fn list_sections(&self) -> Result<Vec<String>> {
        list_dirs(&self.root, "content folder not found")
    }

    /// Slugs inside a section, sorted
    pub fn list_slugs(&self, section: &str) -> Result<Vec<String>> {
        validate_segment("section", section)?;
        list_dirs(&self.root.join(section), "section not found")
    }

    /// Location of a resource file, validated against the record directory
    pub fn resource_path(&self, section: &str, slug: &str, name: &str) -> Result<PathBuf> {
        validate_segment("resource", name)?;
        if name == INDEX_FILE {
            return Err(ContentError::InvalidPath(format!(
                "'{}' is reserved for the content file",
                INDEX_FILE
            )));
        }
        Ok(self.record_dir(section, slug)?.join(name))
    }

    /// Start writing a resource
    ///
    /// Bytes go to a temporary file in the record directory; the resource
    /// itself is only replaced by [`StagedResource::commit`]. Dropping the
    /// stage discards everything written so far.
    pub fn stage_resource(&self, section: &str, slug: &str, name: &str) -> Result<StagedResource> {
        let target = self.resource_path(section, slug, name)?;
        let dir = self.record_dir(section, slug)?;
        let file = NamedTempFile::new_in(&dir)
            .map_err(|e| ContentError::io("error creating file on disk", e))?;
        Ok(StagedResource { file, target })
    }

    pub fn remove_resource(&self, section: &str, slug: &str, name: &str) -> Result<()> {
        let path = self.resource_path(section, slug, name)?;
        fs::remove_file(&path).map_err(|e| {
            ContentError::from_io_or_not_found("resource not found", "error removing resource", e)
        })
    }
}

/// A resource upload in progress
#[derive(Debug)]
pub struct StagedResource {
    file: NamedTempFile,
    target: PathBuf,
}

impl StagedResource {
    pub fn write_all(&mut self, data: &[u8]) -> Result<()> {
        self.file
            .write_all(data)
            .map_err(|e| ContentError::io("error copying attach content to disk", e))
    }

    /// Move the finished upload over the resource, replacing any previous version
    pub fn commit(mut self) -> Result<PathBuf> {
        self.file
            .flush()
            .map_err(|e| ContentError::io("error copying attach content to disk", e))?;
        self.file
            .persist(&self.target)
            .map_err(|e| ContentError::io("error moving upload into place", e.error))?;
        Ok(self.target)
    }
}

/// Reject names that would escape or alias the content tree
pub fn validate_segment(kind: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(ContentError::InvalidPath(format!("{} is empty", kind)));
    }
    if value.starts_with('.') {
        return Err(ContentError::InvalidPath(format!(
            "{} cannot start with a dot",
            kind
        )));
    }
    if value.contains(['/', '\\', '\0']) {
        return Err(ContentError::InvalidPath(format!(
            "{} contains invalid characters",
            kind
        )));
    }
    Ok(())
}

fn list_dirs(dir: &Path, not_found: &str) -> Result<Vec<String>> {
    let entries = fs::read_dir(dir).map_err(|e| {
        ContentError::from_io_or_not_found(not_found, "error listing directory", e)
    })?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| ContentError::io("error listing directory", e))?;
        let is_dir = entry
            .file_type()
            .map_err(|e| ContentError::io("error listing directory", e))?
            .is_dir();
        if is_dir {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dates::parse_date;
    use crate::models::ResourceRef;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn store() -> (TempDir, ContentStore) {
        let temp_dir = TempDir::new().unwrap();
        let store = ContentStore::new(temp_dir.path().join("content"));
        store.ensure_root().unwrap();
        (temp_dir, store)
    }

    #[test]
    fn test_save_and_load() {
        let (_tmp, store) = store();
        let mut record = ContentRecord::new("Hello, World!");
        record.body = "First post".to_string();
        record.resources.push(ResourceRef::new("logo.png"));

        let data = store.save(&mut record, "posts").unwrap();
        let on_disk = fs::read(store.root().join("posts/hello-world/index.md")).unwrap();
        assert_eq!(data, on_disk);

        let loaded = store.load("posts", "hello-world").unwrap();
        assert_eq!(loaded.title, "Hello, World!");
        assert_eq!(loaded.slug, "hello-world");
        assert_eq!(loaded.body, "First post");
        assert_eq!(loaded.resources, record.resources);
    }

    #[test]
    fn test_save_overwrites() {
        let (_tmp, store) = store();
        let mut record = ContentRecord::new("Page");
        store.save(&mut record, "docs").unwrap();
        record.body = "updated".to_string();
        store.save(&mut record, "docs").unwrap();

        assert_eq!(store.load("docs", "page").unwrap().body, "updated");
    }

    #[test]
    fn test_save_without_title_writes_nothing() {
        let (_tmp, store) = store();
        let mut record = ContentRecord::new("");
        record.slug = "nameless".to_string();

        assert!(matches!(
            store.save(&mut record, "posts"),
            Err(ContentError::Validation(_))
        ));
        assert!(!store.root().join("posts").exists());
    }

    #[test]
    fn test_save_publish_after_expiry_creates_nothing() {
        let (_tmp, store) = store();
        let mut record = ContentRecord::new("Backwards");
        record.publish_date = Some(parse_date("2024-02-01T00:00:00").unwrap());
        record.expiry_date = Some(parse_date("2024-01-01T00:00:00").unwrap());

        assert!(matches!(
            store.save(&mut record, "posts"),
            Err(ContentError::Validation(_))
        ));
        assert!(!store.root().join("posts/backwards").exists());
    }

    #[test]
    fn test_save_writes_date_params() {
        let (_tmp, store) = store();
        let mut record = ContentRecord::new("Dated");
        record.date = Some(parse_date("2024-05-01T12:00:00Z").unwrap());
        store.save(&mut record, "posts").unwrap();

        let loaded = store.load("posts", "dated").unwrap();
        assert!(loaded.params.contains_key("date"));
        assert!(loaded.date.is_none());
    }

    #[test]
    fn test_save_rejects_traversal_slug() {
        let (_tmp, store) = store();
        let mut record = ContentRecord::new("Sneaky");
        record.slug = "../escape".to_string();
        assert!(matches!(
            store.save(&mut record, "posts"),
            Err(ContentError::InvalidPath(_))
        ));
    }

    #[test]
    fn test_load_missing_is_not_found() {
        let (_tmp, store) = store();
        assert!(matches!(
            store.load("posts", "nothing"),
            Err(ContentError::NotFound(_))
        ));
    }

    #[test]
    fn test_load_fills_slug_from_directory() {
        let (_tmp, store) = store();
        let dir = store.root().join("notes/handmade");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(INDEX_FILE), "---\ntitle: Handmade\n---\nbody").unwrap();

        assert_eq!(store.load("notes", "handmade").unwrap().slug, "handmade");
    }

    #[test]
    fn test_remove_deletes_directory_and_resources() {
        let (_tmp, store) = store();
        let mut record = ContentRecord::new("Gone soon");
        store.save(&mut record, "posts").unwrap();
        fs::write(store.root().join("posts/gone-soon/file.pdf"), b"%PDF").unwrap();

        store.remove("posts", "gone-soon").unwrap();
        assert!(!store.root().join("posts/gone-soon").exists());
        assert!(store.root().join("posts").exists());
    }

    #[test]
    fn test_remove_with_empty_section_touches_nothing() {
        let (_tmp, store) = store();
        let mut record = ContentRecord::new("Keep");
        store.save(&mut record, "posts").unwrap();

        let err = store.remove("", "posts").unwrap_err();
        assert!(matches!(err, ContentError::InvalidPath(ref m) if m == "path incomplete"));
        assert!(store.root().join("posts/keep/index.md").exists());
    }

    #[test]
    fn test_remove_with_empty_slug_is_rejected() {
        let (_tmp, store) = store();
        let mut record = ContentRecord::new("Keep");
        store.save(&mut record, "posts").unwrap();

        assert!(store.remove("posts", "").is_err());
        assert!(store.root().join("posts/keep").exists());
    }

    #[test]
    fn test_remove_missing_is_not_found() {
        let (_tmp, store) = store();
        assert!(matches!(
            store.remove("posts", "ghost"),
            Err(ContentError::NotFound(_))
        ));
    }

    #[test]
    fn test_listing() {
        let (_tmp, store) = store();
        for (section, title) in [("posts", "Beta"), ("posts", "Alpha"), ("docs", "Guide")] {
            let mut record = ContentRecord::new(title);
            store.save(&mut record, section).unwrap();
        }
        fs::write(store.root().join("stray.txt"), b"not a section").unwrap();

        assert_eq!(store.list_sections().unwrap(), vec!["docs", "posts"]);
        assert_eq!(store.list_slugs("posts").unwrap(), vec!["alpha", "beta"]);
        assert!(matches!(
            store.list_slugs("missing"),
            Err(ContentError::NotFound(_))
        ));
    }

    #[test]
    fn test_resource_files() {
        let (_tmp, store) = store();
        let mut record = ContentRecord::new("With files");
        store.save(&mut record, "posts").unwrap();

        let mut staged = store.stage_resource("posts", "with-files", "a.pdf").unwrap();
        staged.write_all(b"%PDF-1.4").unwrap();
        staged.commit().unwrap();
        assert_eq!(
            fs::read(store.resource_path("posts", "with-files", "a.pdf").unwrap()).unwrap(),
            b"%PDF-1.4"
        );

        store.remove_resource("posts", "with-files", "a.pdf").unwrap();
        assert!(matches!(
            store.remove_resource("posts", "with-files", "a.pdf"),
            Err(ContentError::NotFound(_))
        ));
    }

    #[test]
    fn test_dropped_stage_keeps_previous_resource() {
        let (_tmp, store) = store();
        let mut record = ContentRecord::new("Staged");
        store.save(&mut record, "posts").unwrap();

        let mut staged = store.stage_resource("posts", "staged", "doc.pdf").unwrap();
        staged.write_all(b"%PDF-1.4 good").unwrap();
        staged.commit().unwrap();

        let mut staged = store.stage_resource("posts", "staged", "doc.pdf").unwrap();
        staged.write_all(b"%PDF-1.4 partial").unwrap();
        drop(staged);

        let dir = store.record_dir("posts", "staged").unwrap();
        assert_eq!(fs::read(dir.join("doc.pdf")).unwrap(), b"%PDF-1.4 good");
        let mut names: Vec<String> = fs::read_dir(&dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names, vec!["doc.pdf", "index.md"]);
    }

    #[test]
    fn test_resource_names_cannot_alias_index() {
        let (_tmp, store) = store();
        assert!(matches!(
            store.resource_path("posts", "x", INDEX_FILE),
            Err(ContentError::InvalidPath(_))
        ));
        assert!(store.resource_path("posts", "x", "../index.md").is_err());
        assert!(store.resource_path("posts", "x", ".hidden").is_err());
    }

    #[test]
    fn test_ensure_root_rejects_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("content");
        fs::write(&path, b"oops").unwrap();

        assert!(ContentStore::new(&path).ensure_root().is_err());
    }
}

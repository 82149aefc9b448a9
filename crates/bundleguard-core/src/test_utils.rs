//! Test utilities for building in-memory bundles.
//!
//! This module provides reusable helpers for creating in-memory test archives,
//! including entries with hostile names that regular archivers refuse to
//! produce.
//!
//! # Panics
//!
//! All functions in this module may panic on I/O errors since they are
//! designed for test use only where panics are acceptable.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::io::Cursor;
use std::io::Write;

use flate2::Compression;
use flate2::write::GzEncoder;

/// A manifest document with the given title and description.
///
/// # Examples
///
/// ```
/// use bundleguard_core::test_utils::manifest_json;
///
/// assert_eq!(
///     manifest_json("Demo", "A demo"),
///     r#"{"title":"Demo","description":"A demo"}"#
/// );
/// ```
#[must_use]
pub fn manifest_json(title: &str, description: &str) -> String {
    serde_json::json!({ "title": title, "description": description }).to_string()
}

/// A minimal publishable ZIP bundle wrapped in a `project/` folder.
///
/// # Examples
///
/// ```
/// use bundleguard_core::PublishPolicy;
/// use bundleguard_core::test_utils::valid_bundle;
/// use bundleguard_core::validate_bundle;
///
/// let result = validate_bundle(&valid_bundle(), &PublishPolicy::default());
/// assert!(result.is_valid());
/// ```
#[must_use]
pub fn valid_bundle() -> Vec<u8> {
    ZipTestBuilder::new()
        .add_directory("project/")
        .add_file("project/index.html", b"<!doctype html><h1>Demo</h1>")
        .add_file(
            "project/meta.json",
            br#"{"title":"Demo","description":"A demo","tech":["js"]}"#,
        )
        .build()
}

/// Creates an in-memory ZIP archive from a list of entries.
///
/// Each entry is a tuple of (path, content). Files are stored uncompressed
/// with mode 0o644.
///
/// # Examples
///
/// ```
/// use bundleguard_core::test_utils::create_test_zip;
///
/// let zip_data = create_test_zip(vec![("index.html", b"hello"), ("meta.json", b"{}")]);
/// assert!(zip_data.starts_with(b"PK"));
/// ```
#[must_use]
pub fn create_test_zip(entries: Vec<(&str, &[u8])>) -> Vec<u8> {
    entries
        .into_iter()
        .fold(ZipTestBuilder::new(), |builder, (path, data)| {
            builder.add_file(path, data)
        })
        .build()
}

/// Builder for creating TAR test archives with various entry types.
///
/// Entry names are written verbatim into the header, so traversal and
/// absolute names can be produced. Names are limited to 100 bytes.
///
/// # Examples
///
/// ```
/// use bundleguard_core::test_utils::TarTestBuilder;
///
/// let tar_data = TarTestBuilder::new()
///     .add_file("../escape.txt", b"content")
///     .add_directory("dir/")
///     .add_symlink("link", "/etc/passwd")
///     .build();
/// ```
pub struct TarTestBuilder {
    builder: tar::Builder<Vec<u8>>,
}

impl TarTestBuilder {
    /// Creates a new TAR test builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            builder: tar::Builder::new(Vec::new()),
        }
    }

    fn append(mut self, entry_type: tar::EntryType, path: &str, link: &str, data: &[u8]) -> Self {
        let mut header = tar::Header::new_gnu();
        {
            let old = header.as_old_mut();
            old.name[..path.len()].copy_from_slice(path.as_bytes());
            old.linkname[..link.len()].copy_from_slice(link.as_bytes());
        }
        header.set_size(data.len() as u64);
        header.set_mode(if entry_type.is_dir() { 0o755 } else { 0o644 });
        header.set_entry_type(entry_type);
        header.set_cksum();
        self.builder.append(&header, data).unwrap();
        self
    }

    /// Adds a regular file to the archive.
    #[must_use]
    pub fn add_file(self, path: &str, data: &[u8]) -> Self {
        self.append(tar::EntryType::Regular, path, "", data)
    }

    /// Adds a directory to the archive.
    #[must_use]
    pub fn add_directory(self, path: &str) -> Self {
        self.append(tar::EntryType::Directory, path, "", &[])
    }

    /// Adds a symlink to the archive.
    #[must_use]
    pub fn add_symlink(self, path: &str, target: &str) -> Self {
        self.append(tar::EntryType::Symlink, path, target, &[])
    }

    /// Adds a hardlink to the archive.
    #[must_use]
    pub fn add_hardlink(self, path: &str, target: &str) -> Self {
        self.append(tar::EntryType::Link, path, target, &[])
    }

    /// Builds and returns the TAR archive data.
    #[must_use]
    pub fn build(self) -> Vec<u8> {
        self.builder.into_inner().unwrap()
    }

    /// Builds the archive and gzip-compresses it.
    #[must_use]
    pub fn build_gz(self) -> Vec<u8> {
        let tar = self.build();
        let mut encoder = GzEncoder::new(Vec::new(), Compression::fast());
        encoder.write_all(&tar).unwrap();
        encoder.finish().unwrap()
    }
}

impl Default for TarTestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for creating ZIP test archives with various entry types.
///
/// # Examples
///
/// ```
/// use bundleguard_core::test_utils::ZipTestBuilder;
///
/// let zip_data = ZipTestBuilder::new()
///     .add_file("project/index.html", b"content")
///     .add_directory("project/assets/")
///     .build();
/// ```
pub struct ZipTestBuilder {
    zip: zip::ZipWriter<Cursor<Vec<u8>>>,
}

impl ZipTestBuilder {
    /// Creates a new ZIP test builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            zip: zip::ZipWriter::new(Cursor::new(Vec::new())),
        }
    }

    /// Adds a regular file to the archive.
    #[must_use]
    pub fn add_file(mut self, path: &str, data: &[u8]) -> Self {
        use zip::write::SimpleFileOptions;

        let options = SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Stored)
            .unix_permissions(0o644);

        self.zip.start_file(path, options).unwrap();
        self.zip.write_all(data).unwrap();
        self
    }

    /// Adds a deflate-compressed file to the archive.
    #[must_use]
    pub fn add_deflated_file(mut self, path: &str, data: &[u8]) -> Self {
        use zip::write::SimpleFileOptions;

        let options = SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Deflated)
            .unix_permissions(0o644);

        self.zip.start_file(path, options).unwrap();
        self.zip.write_all(data).unwrap();
        self
    }

    /// Adds a directory to the archive.
    #[must_use]
    pub fn add_directory(mut self, path: &str) -> Self {
        use zip::write::SimpleFileOptions;

        let options = SimpleFileOptions::default().unix_permissions(0o755);
        self.zip.add_directory(path, options).unwrap();
        self
    }

    /// Adds a symlink to the archive.
    #[must_use]
    pub fn add_symlink(mut self, path: &str, target: &str) -> Self {
        use zip::write::SimpleFileOptions;

        self.zip
            .add_symlink(path, target, SimpleFileOptions::default())
            .unwrap();
        self
    }

    /// Builds and returns the ZIP archive data.
    #[must_use]
    pub fn build(self) -> Vec<u8> {
        self.zip.finish().unwrap().into_inner()
    }
}

impl Default for ZipTestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

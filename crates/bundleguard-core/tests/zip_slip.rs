//! Zip-slip scenarios against validation and extraction.
//!
//! Each hostile archive must be rejected by validation, and extraction run
//! without validation must refuse it too, leaving nothing behind.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::fs;

use bundleguard_core::BundleError;
use bundleguard_core::NoopProgress;
use bundleguard_core::PublishPolicy;
use bundleguard_core::extract_bundle;
use bundleguard_core::extraction::SafeExtractor;
use bundleguard_core::slot::SequentialSlotIds;
use bundleguard_core::slot::SlotIdGenerator;
use bundleguard_core::test_utils::TarTestBuilder;
use bundleguard_core::test_utils::ZipTestBuilder;
use bundleguard_core::types::StorageRoot;
use bundleguard_core::validate_bundle;
use tempfile::TempDir;

fn assert_refused(buffer: &[u8]) {
    let temp = TempDir::new().expect("failed to create temp dir");
    let storage = StorageRoot::new(temp.path().join("slots")).unwrap();
    let policy = PublishPolicy::default();

    let validation = validate_bundle(buffer, &policy);
    assert!(!validation.is_valid());
    assert!(
        validation
            .errors()
            .iter()
            .any(|e| e.starts_with("invalid path detected")),
        "{:?}",
        validation.errors()
    );

    let slot = SequentialSlotIds::default().new_id().unwrap();
    let result = extract_bundle(buffer, &slot, &storage, &policy, &mut NoopProgress).unwrap();
    assert!(!result.success);
    assert!(!storage.slot_exists(&slot));

    // Nothing may appear anywhere next to the storage root either.
    let siblings: Vec<_> = fs::read_dir(temp.path()).unwrap().collect();
    assert_eq!(siblings.len(), 1);
}

#[test]
fn test_parent_traversal() {
    assert_refused(
        &ZipTestBuilder::new()
            .add_file("index.html", b"x")
            .add_file("a/../../etc/passwd", b"root:x:0:0")
            .build(),
    );
}

#[test]
fn test_leading_parent() {
    assert_refused(&ZipTestBuilder::new().add_file("../evil.sh", b"x").build());
}

#[test]
fn test_backslash_traversal() {
    assert_refused(
        &ZipTestBuilder::new()
            .add_file(r"project\..\..\evil.txt", b"x")
            .build(),
    );
}

#[test]
fn test_traversal_hidden_in_root() {
    assert_refused(
        &ZipTestBuilder::new()
            .add_file("project/index.html", b"x")
            .add_file("project/../escape.txt", b"x")
            .build(),
    );
}

#[test]
fn test_absolute_path() {
    assert_refused(&ZipTestBuilder::new().add_file("/tmp/evil.txt", b"x").build());
}

#[test]
fn test_drive_prefix() {
    assert_refused(
        &ZipTestBuilder::new()
            .add_file("C:/Windows/evil.dll", b"x")
            .build(),
    );
}

#[test]
fn test_tar_traversal() {
    assert_refused(
        &TarTestBuilder::new()
            .add_file("site/index.html", b"x")
            .add_file("site/../../evil", b"x")
            .build_gz(),
    );
}

#[test]
fn test_partial_output_removed() {
    let temp = TempDir::new().unwrap();
    let storage = StorageRoot::new(temp.path()).unwrap();
    let policy = PublishPolicy::default();
    let slot = SequentialSlotIds::default().new_id().unwrap();

    // Several good files are written before the hostile one is reached.
    let buffer = ZipTestBuilder::new()
        .add_file("index.html", b"x")
        .add_file("assets/a.js", b"x")
        .add_file("assets/b.js", b"x")
        .add_file("assets/../../x", b"x")
        .build();

    let result = SafeExtractor::new(&storage, &policy).extract(&buffer, &slot, &mut NoopProgress);
    assert!(matches!(result, Err(BundleError::PathTraversal { .. })));
    assert!(!storage.slot_exists(&slot));
}

#[test]
fn test_dotted_names_are_allowed() {
    let temp = TempDir::new().unwrap();
    let storage = StorageRoot::new(temp.path()).unwrap();
    let policy = PublishPolicy::default();
    let slot = SequentialSlotIds::default().new_id().unwrap();
    let buffer = ZipTestBuilder::new()
        .add_file("index.html", b"x")
        .add_file("release..notes/..hidden", b"x")
        .build();

    let result = extract_bundle(&buffer, &slot, &storage, &policy, &mut NoopProgress).unwrap();
    assert!(result.success, "{:?}", result.error);
    assert!(
        storage
            .slot_path(&slot)
            .join("release..notes/..hidden")
            .is_file()
    );
}

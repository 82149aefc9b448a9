//! Integration tests for bundleguard-cli.
//!
//! Note: Tests use `unwrap`/`expect` which is acceptable in test code.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use bundleguard_core::test_utils::TarTestBuilder;
use bundleguard_core::test_utils::ZipTestBuilder;
use bundleguard_core::test_utils::manifest_json;
use bundleguard_core::test_utils::valid_bundle;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use tempfile::TempDir;

fn bundleguard_cmd() -> Command {
    let mut cmd = cargo_bin_cmd!("bundleguard");
    cmd.env_remove("BUNDLEGUARD_STORAGE_ROOT");
    cmd.env_remove("RUST_LOG");
    cmd
}

fn write_bundle(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, bytes).expect("failed to write bundle");
    path
}

fn slot_dirs(root: &Path) -> Vec<PathBuf> {
    if !root.exists() {
        return Vec::new();
    }
    fs::read_dir(root)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect()
}

#[test]
fn test_version_flag() {
    bundleguard_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("bundleguard"));
}

#[test]
fn test_help_lists_subcommands() {
    bundleguard_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("validate"))
        .stdout(predicate::str::contains("publish"))
        .stdout(predicate::str::contains("remove"));
}

#[test]
fn test_validate_valid_bundle() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let bundle = write_bundle(temp.path(), "site.zip", &valid_bundle());

    bundleguard_cmd()
        .arg("validate")
        .arg(&bundle)
        .assert()
        .success()
        .stdout(predicate::str::contains("is valid"))
        .stdout(predicate::str::contains("Demo"));
}

#[test]
fn test_validate_invalid_bundle_exits_nonzero() {
    let temp = TempDir::new().unwrap();
    let bytes = ZipTestBuilder::new()
        .add_file("index.html", b"x")
        .add_file("meta.json", manifest_json("T", "D").as_bytes())
        .add_file(".env", b"SECRET=1")
        .build();
    let bundle = write_bundle(temp.path(), "bad.zip", &bytes);

    bundleguard_cmd()
        .arg("validate")
        .arg(&bundle)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("forbidden file detected: .env"))
        .stderr(predicate::str::contains("failed validation"));
}

#[test]
fn test_validate_json_output() {
    let temp = TempDir::new().unwrap();
    let bundle = write_bundle(temp.path(), "site.zip", &valid_bundle());

    let output = bundleguard_cmd()
        .arg("validate")
        .arg("--json")
        .arg(&bundle)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json: serde_json::Value = serde_json::from_slice(&output).expect("invalid JSON output");
    assert_eq!(json["operation"], "validate");
    assert_eq!(json["status"], "success");
    assert_eq!(json["data"]["isValid"], true);
    assert_eq!(json["data"]["metadata"]["title"], "Demo");
    assert_eq!(json["data"]["structure"]["rootFolder"], "project");
    assert_eq!(json["data"]["structure"]["format"], "zip");
}

#[test]
fn test_validate_json_reports_every_error() {
    let temp = TempDir::new().unwrap();
    let bytes = ZipTestBuilder::new()
        .add_file("../evil.sh", b"x")
        .add_file("node_modules/pkg/index.js", b"x")
        .build();
    let bundle = write_bundle(temp.path(), "bad.zip", &bytes);

    let output = bundleguard_cmd()
        .args(["--json", "validate"])
        .arg(&bundle)
        .assert()
        .code(1)
        .get_output()
        .stdout
        .clone();

    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(json["status"], "error");
    let errors: Vec<&str> = json["data"]["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e.as_str().unwrap())
        .collect();
    assert_eq!(
        errors,
        [
            "missing required file: index.html",
            "missing required file: meta.json",
            "invalid path detected: ../evil.sh",
            "forbidden folder detected: node_modules/pkg/index.js",
        ]
    );
}

#[test]
fn test_validate_json_keeps_null_metadata() {
    let temp = TempDir::new().unwrap();
    let bytes = ZipTestBuilder::new().add_file("index.html", b"x").build();
    let bundle = write_bundle(temp.path(), "partial.zip", &bytes);

    let output = bundleguard_cmd()
        .args(["--json", "validate"])
        .arg(&bundle)
        .assert()
        .code(1)
        .get_output()
        .stdout
        .clone();

    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert!(json["data"].as_object().unwrap().contains_key("metadata"));
    assert!(json["data"]["metadata"].is_null());
    assert_eq!(json["data"]["structure"]["fileCount"], 1);
}

#[test]
fn test_validate_empty_tar() {
    let temp = TempDir::new().unwrap();
    let bytes = TarTestBuilder::new().build();
    let bundle = write_bundle(temp.path(), "empty.tar", &bytes);

    bundleguard_cmd()
        .arg("validate")
        .arg(&bundle)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("archive is empty"))
        .stdout(predicate::str::contains("unsupported").not());
}

#[test]
fn test_validate_policy_flags() {
    let temp = TempDir::new().unwrap();
    let bundle = write_bundle(temp.path(), "site.zip", &valid_bundle());

    bundleguard_cmd()
        .arg("validate")
        .arg(&bundle)
        .args(["--require", "README.md"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("missing required file: README.md"));

    bundleguard_cmd()
        .arg("validate")
        .arg(&bundle)
        .args(["--max-size", "16"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("archive exceeds maximum size"));
}

#[test]
fn test_validate_policy_file() {
    let temp = TempDir::new().unwrap();
    let bundle = write_bundle(temp.path(), "site.zip", &valid_bundle());
    let policy = temp.path().join("policy.toml");
    fs::write(&policy, "forbidden_file_names = [\"index.html\"]\n").unwrap();

    bundleguard_cmd()
        .arg("validate")
        .arg(&bundle)
        .arg("--policy")
        .arg(&policy)
        .assert()
        .code(1)
        .stdout(predicate::str::contains(
            "forbidden file detected: project/index.html",
        ));
}

#[test]
fn test_validate_missing_file() {
    bundleguard_cmd()
        .arg("validate")
        .arg("/nonexistent/bundle.zip")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read bundle"));
}

#[test]
fn test_publish_creates_slot_and_record() {
    let temp = TempDir::new().unwrap();
    let bundle = write_bundle(temp.path(), "site.zip", &valid_bundle());
    let storage = temp.path().join("projects");
    let records = temp.path().join("records.jsonl");

    let output = bundleguard_cmd()
        .args(["publish", "--json", "--owner", "user-42"])
        .arg(&bundle)
        .arg("--storage-root")
        .arg(&storage)
        .arg("--records")
        .arg(&records)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(json["status"], "success");
    assert_eq!(json["data"]["success"], true);
    let slot_id = json["data"]["slotId"].as_str().unwrap();
    assert_eq!(slot_id.len(), 32);

    let slot = PathBuf::from(json["data"]["storagePath"].as_str().unwrap());
    assert!(slot.ends_with(slot_id));
    assert!(slot.join("index.html").is_file());
    assert!(slot.join("meta.json").is_file());

    let line = fs::read_to_string(&records).unwrap();
    let record: serde_json::Value = serde_json::from_str(line.trim()).unwrap();
    assert_eq!(record["slotId"], slot_id);
    assert_eq!(record["ownerReference"], "user-42");
    assert_eq!(record["published"], true);
}

#[test]
fn test_publish_storage_root_from_env() {
    let temp = TempDir::new().unwrap();
    let bundle = write_bundle(temp.path(), "site.zip", &valid_bundle());
    let storage = temp.path().join("uploads");

    bundleguard_cmd()
        .arg("publish")
        .arg(&bundle)
        .env("BUNDLEGUARD_STORAGE_ROOT", &storage)
        .assert()
        .success()
        .stdout(predicate::str::contains("Published \"Demo\""));

    assert_eq!(slot_dirs(&storage).len(), 1);
}

#[test]
fn test_publish_requires_storage_root() {
    let temp = TempDir::new().unwrap();
    let bundle = write_bundle(temp.path(), "site.zip", &valid_bundle());

    bundleguard_cmd()
        .arg("publish")
        .arg(&bundle)
        .assert()
        .failure()
        .stderr(predicate::str::contains("--storage-root"));
}

#[test]
fn test_publish_rejected_bundle_writes_nothing() {
    let temp = TempDir::new().unwrap();
    let bytes = ZipTestBuilder::new()
        .add_file("index.html", b"x")
        .add_file("meta.json", manifest_json("T", "D").as_bytes())
        .add_file("a/../../escape.txt", b"x")
        .build();
    let bundle = write_bundle(temp.path(), "slip.zip", &bytes);
    let storage = temp.path().join("projects");
    let records = temp.path().join("records.jsonl");

    bundleguard_cmd()
        .arg("publish")
        .arg(&bundle)
        .arg("--storage-root")
        .arg(&storage)
        .arg("--records")
        .arg(&records)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("invalid path detected"));

    assert!(slot_dirs(&storage).is_empty());
    assert!(!records.exists());
    assert!(!temp.path().join("escape.txt").exists());
}

#[test]
fn test_publish_file_folder_conflict_rejected() {
    let temp = TempDir::new().unwrap();
    let bytes = ZipTestBuilder::new()
        .add_file("index.html", b"x")
        .add_file("meta.json", manifest_json("T", "D").as_bytes())
        .add_file("a", b"file")
        .add_file("a/b", b"nested")
        .build();
    let bundle = write_bundle(temp.path(), "conflict.zip", &bytes);
    let storage = temp.path().join("projects");

    bundleguard_cmd()
        .arg("publish")
        .arg(&bundle)
        .arg("--storage-root")
        .arg(&storage)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("path used as both file and folder: a"));

    assert!(slot_dirs(&storage).is_empty());
}

#[test]
fn test_publish_store_failure_json_payload() {
    let temp = TempDir::new().unwrap();
    let bundle = write_bundle(temp.path(), "site.zip", &valid_bundle());
    let storage = temp.path().join("projects");
    let records = temp.path().join("records");
    fs::create_dir(&records).unwrap();

    let output = bundleguard_cmd()
        .args(["--json", "publish"])
        .arg(&bundle)
        .arg("--storage-root")
        .arg(&storage)
        .arg("--records")
        .arg(&records)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Could not record project"))
        .get_output()
        .stdout
        .clone();

    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(json["operation"], "publish");
    assert_eq!(json["status"], "error");
    assert_eq!(json["data"]["code"], "STORE_FAILURE");
    assert!(slot_dirs(&storage).is_empty());
}

#[test]
fn test_remove_published_slot() {
    let temp = TempDir::new().unwrap();
    let bundle = write_bundle(temp.path(), "site.zip", &valid_bundle());
    let storage = temp.path().join("projects");

    let output = bundleguard_cmd()
        .args(["--json", "publish"])
        .arg(&bundle)
        .arg("--storage-root")
        .arg(&storage)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    let slot_id = json["data"]["slotId"].as_str().unwrap().to_string();

    bundleguard_cmd()
        .args(["remove", &slot_id, "--storage-root"])
        .arg(&storage)
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed slot"));
    assert!(slot_dirs(&storage).is_empty());

    // Removing again is not an error
    bundleguard_cmd()
        .args(["remove", &slot_id, "--storage-root"])
        .arg(&storage)
        .assert()
        .success()
        .stdout(predicate::str::contains("does not exist"));
}

#[test]
fn test_remove_rejects_malformed_slot_id() {
    let temp = TempDir::new().unwrap();
    let victim = temp.path().join("keep");
    fs::create_dir(&victim).unwrap();

    bundleguard_cmd()
        .args(["remove", "../keep", "--storage-root"])
        .arg(temp.path().join("projects"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid slot id"));

    assert!(victim.is_dir());
}

#[test]
fn test_remove_does_not_create_storage_root() {
    let temp = TempDir::new().unwrap();
    let storage = temp.path().join("never-created");

    let output = bundleguard_cmd()
        .args(["--json", "remove", "00000000000000000000000000000001", "--storage-root"])
        .arg(&storage)
        .assert()
        .failure()
        .get_output()
        .stdout
        .clone();

    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(json["status"], "error");
    assert_eq!(json["data"]["code"], "IO_ERROR");
    assert!(!storage.exists());
}

#[test]
fn test_completion_bash() {
    bundleguard_cmd()
        .args(["completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("bundleguard"));
}

#[test]
fn test_verbose_and_quiet_conflict() {
    let temp = TempDir::new().unwrap();
    let bundle = write_bundle(temp.path(), "site.zip", &valid_bundle());

    bundleguard_cmd()
        .args(["--verbose", "--quiet", "validate"])
        .arg(&bundle)
        .assert()
        .failure();
}

//! Project store that appends records to a JSON lines file.

use bundleguard_core::BundleError;
use bundleguard_core::store::ProjectRecord;
use bundleguard_core::store::ProjectStore;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::debug;

/// Appends one JSON object per published project.
pub struct JsonLinesStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonLinesStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }
}

impl ProjectStore for JsonLinesStore {
    fn save(&self, record: &ProjectRecord) -> bundleguard_core::Result<()> {
        let failure = |reason: String| BundleError::Store { reason };

        let line = serde_json::to_string(record).map_err(|e| failure(e.to_string()))?;
        let _guard = self
            .lock
            .lock()
            .map_err(|_| failure("records lock poisoned".to_string()))?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| failure(format!("{}: {e}", self.path.display())))?;
        writeln!(file, "{line}").map_err(|e| failure(format!("{}: {e}", self.path.display())))?;
        debug!(slot = %record.slot_id, path = %self.path.display(), "appended project record");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use bundleguard_core::ProjectMetadata;
    use bundleguard_core::SlotId;
    use tempfile::TempDir;

    fn record(slot: &str) -> ProjectRecord {
        ProjectRecord {
            slot_id: SlotId::parse(slot).unwrap(),
            owner_reference: "owner-1".to_string(),
            metadata: ProjectMetadata {
                title: "Demo".to_string(),
                description: "A demo".to_string(),
                tech: vec!["rust".to_string()],
            },
            published: true,
        }
    }

    #[test]
    fn test_appends_one_line_per_record() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("records.jsonl");
        let store = JsonLinesStore::new(&path);

        store.save(&record("00000000000000000000000000000001")).unwrap();
        store.save(&record("00000000000000000000000000000002")).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<serde_json::Value> = contents
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["slotId"], "00000000000000000000000000000001");
        assert_eq!(lines[1]["ownerReference"], "owner-1");
        assert_eq!(lines[1]["metadata"]["tech"][0], "rust");
        assert_eq!(lines[1]["published"], true);
    }

    #[test]
    fn test_unwritable_path_is_store_error() {
        let temp = TempDir::new().unwrap();
        let store = JsonLinesStore::new(temp.path().join("missing/dir/records.jsonl"));

        let result = store.save(&record("00000000000000000000000000000001"));
        assert!(matches!(result, Err(BundleError::Store { .. })));
    }
}

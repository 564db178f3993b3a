use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::models::PageCapture;

/// On-disk snapshots of raw page captures.
///
/// A long fetch run snapshots periodically so the dataset can be rebuilt
/// from captured pages without re-fetching anything.
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        SnapshotStore { dir: dir.into() }
    }

    /// Write the full capture list to a fresh dated snapshot file.
    pub fn store(&self, captures: &[PageCapture]) -> Result<PathBuf> {
        let date = Utc::now().format("%Y/%m/%d").to_string();
        let file_dir = self.dir.join(date);
        fs::create_dir_all(&file_dir).with_context(|| {
            format!("Failed to create snapshot directory {}", file_dir.display())
        })?;

        let path = file_dir.join(format!("{}.json", Uuid::new_v4()));
        let json = serde_json::to_string(captures)?;
        fs::write(&path, json)
            .with_context(|| format!("Failed to write snapshot {}", path.display()))?;

        info!("Snapshotted {} captures to {}", captures.len(), path.display());
        Ok(path)
    }

    /// Load the most recently written snapshot.
    pub fn load_latest(&self) -> Result<Vec<PageCapture>> {
        let latest = self
            .latest_snapshot_file()?
            .ok_or_else(|| anyhow!("No snapshot files found under {}", self.dir.display()))?;

        info!("Loading captures from {}", latest.display());
        let json = fs::read_to_string(&latest)
            .with_context(|| format!("Failed to read snapshot {}", latest.display()))?;
        let captures: Vec<PageCapture> = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse snapshot {}", latest.display()))?;

        Ok(captures)
    }

    fn latest_snapshot_file(&self) -> Result<Option<PathBuf>> {
        if !self.dir.exists() {
            return Ok(None);
        }

        let mut newest: Option<(std::time::SystemTime, PathBuf)> = None;
        let mut stack = vec![self.dir.clone()];
        while let Some(dir) = stack.pop() {
            for entry in fs::read_dir(&dir)
                .with_context(|| format!("Failed to list snapshot directory {}", dir.display()))?
            {
                let entry = entry?;
                let path = entry.path();
                if path.is_dir() {
                    stack.push(path);
                } else if path.extension().map(|ext| ext == "json").unwrap_or(false) {
                    let modified = entry.metadata()?.modified()?;
                    if newest.as_ref().map(|(t, _)| modified > *t).unwrap_or(true) {
                        newest = Some((modified, path));
                    }
                }
            }
        }

        Ok(newest.map(|(_, path)| path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> SnapshotStore {
        let dir = std::env::temp_dir().join(format!("snapshot-store-{}", Uuid::new_v4()));
        SnapshotStore::new(dir)
    }

    fn capture(url: &str) -> PageCapture {
        PageCapture {
            url: url.to_string(),
            content: "<html><body>listing</body></html>".to_string(),
        }
    }

    #[test]
    fn test_store_and_load_roundtrip() {
        let store = temp_store();
        let captures = vec![capture("https://example.com/home/1"), capture("https://example.com/home/2")];

        store.store(&captures).unwrap();
        let loaded = store.load_latest().unwrap();

        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].url, "https://example.com/home/1");
        assert_eq!(loaded[1].content, captures[1].content);

        fs::remove_dir_all(&store.dir).unwrap();
    }

    #[test]
    fn test_load_without_snapshots_is_an_error() {
        let store = temp_store();
        assert!(store.load_latest().is_err());
    }

    #[test]
    fn test_load_picks_latest_snapshot() {
        let store = temp_store();

        store.store(&[capture("https://example.com/home/old")]).unwrap();
        // mtime resolution on some filesystems is a full second
        std::thread::sleep(std::time::Duration::from_millis(1100));
        store
            .store(&[
                capture("https://example.com/home/old"),
                capture("https://example.com/home/new"),
            ])
            .unwrap();

        let loaded = store.load_latest().unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[1].url, "https://example.com/home/new");

        fs::remove_dir_all(&store.dir).unwrap();
    }
}

use crate::domain::{History, RunSnapshot, SnapshotStore, StorageKeys};
use crate::error::Result;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{info, warn};

/// History kept as a single pretty-printed JSON array under the data dir.
pub struct FileSystemStore {
    data_dir: PathBuf,
    limit: usize,
    write_lock: Mutex<()>,
}

impl FileSystemStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self::with_limit(data_dir, StorageKeys::HISTORY_LIMIT)
    }

    pub fn with_limit(data_dir: impl Into<PathBuf>, limit: usize) -> Self {
        Self {
            data_dir: data_dir.into(),
            limit: limit.max(1),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.data_dir.join(format!("{}.json", StorageKeys::HISTORY))
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.data_dir.exists() {
            fs::create_dir_all(&self.data_dir)?;
        }
        Ok(())
    }

    fn read_history(path: &Path) -> Result<Option<History>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    /// Writes next to the target and renames over it, so readers only ever
    /// see the previous or the new history.
    fn write_history(&self, history: &History) -> Result<()> {
        self.ensure_dir()?;

        let path = self.path();
        let tmp_path = path.with_extension("json.tmp");
        let content = serde_json::to_string_pretty(history)?;

        if let Err(e) = fs::write(&tmp_path, content) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e.into());
        }
        if let Err(e) = fs::rename(&tmp_path, &path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e.into());
        }
        Ok(())
    }
}

impl SnapshotStore for FileSystemStore {
    fn append(&self, snapshot: &RunSnapshot) -> Result<()> {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let mut history = self.read_all();
        history.push(snapshot.clone());
        if history.len() > self.limit {
            let overflow = history.len() - self.limit;
            history.drain(..overflow);
        }

        self.write_history(&history)?;
        info!(
            "Stored snapshot {} ({} in history)",
            snapshot.timestamp.to_rfc3339(),
            history.len()
        );
        Ok(())
    }

    fn read_all(&self) -> History {
        let path = self.path();
        match Self::read_history(&path) {
            Ok(Some(history)) => history,
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(
                    "Unreadable history at {}, treating it as empty: {}",
                    path.display(),
                    e
                );
                Vec::new()
            }
        }
    }
}

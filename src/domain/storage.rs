use super::{History, RunSnapshot};
use crate::error::Result;

pub trait SnapshotStore: Send + Sync {
    /// Appends one snapshot and trims the history to its retention window.
    fn append(&self, snapshot: &RunSnapshot) -> Result<()>;
    /// The full history, or an empty one when nothing readable is stored.
    fn read_all(&self) -> History;

    fn read_latest(&self) -> Option<RunSnapshot> {
        self.read_all().pop()
    }
}

pub struct StorageKeys;

impl StorageKeys {
    pub const HISTORY: &'static str = "scraped_data";
    pub const HISTORY_LIMIT: usize = 100;
}

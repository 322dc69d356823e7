mod record;
mod snapshot;
pub(crate) mod storage;

pub use record::{PageKind, PageResult, Pagination, ProfileRecord, ProjectRecord};
pub use snapshot::{History, RunSnapshot, TimeSeriesPoint};
pub use storage::{SnapshotStore, StorageKeys};

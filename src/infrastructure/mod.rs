mod clients;
mod scrapers;
mod storage;

pub use clients::site::SiteClient;
pub use scrapers::{Extractor, ProfileStrategy, ProjectStrategy};
pub use storage::fs_store::FileSystemStore;

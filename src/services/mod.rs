pub mod aggregation;
pub mod harvest_service;
pub mod pagination;
pub mod scraping;

pub use aggregation::{aggregate, aggregate_at, dedup_profiles, dedup_projects};
pub use harvest_service::HarvestService;
pub use pagination::{merge_new_handles, Paginator};
pub use scraping::ScrapingService;

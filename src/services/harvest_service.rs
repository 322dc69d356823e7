use crate::config::Config;
use crate::domain::{RunSnapshot, SnapshotStore};
use crate::error::{HarvestError, Result};
use crate::infrastructure::{Extractor, SiteClient};
use crate::services::aggregation::aggregate;
use crate::services::pagination::Paginator;
use crate::services::scraping::ScrapingService;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{error, info};

/// One full run: discover profiles, walk the project listing, aggregate and
/// append the snapshot to the history.
pub struct HarvestService {
    paginator: Paginator,
    store: Arc<dyn SnapshotStore>,
    run_timeout: Duration,
    running: Mutex<()>,
}

impl HarvestService {
    pub fn new(paginator: Paginator, store: Arc<dyn SnapshotStore>, run_timeout: Duration) -> Self {
        Self {
            paginator,
            store,
            run_timeout,
            running: Mutex::new(()),
        }
    }

    pub fn from_config(config: &Config, store: Arc<dyn SnapshotStore>) -> Self {
        let scraping = ScrapingService::new(
            SiteClient::new(config.http_client.clone(), config.base_url.clone()),
            Extractor::new(config.site.clone()),
        );
        let paginator = Paginator::new(
            scraping,
            config.args.max_pages,
            Duration::from_millis(config.args.page_delay_ms),
        );

        Self::new(
            paginator,
            store,
            Duration::from_secs(config.args.run_timeout_secs),
        )
    }

    pub fn scraping(&self) -> &ScrapingService {
        self.paginator.scraping()
    }

    pub fn store(&self) -> &Arc<dyn SnapshotStore> {
        &self.store
    }

    /// Runs the pipeline and persists its snapshot. Fails fast when another
    /// run holds the lock; nothing is stored if the run times out or the
    /// write fails.
    pub async fn run(&self) -> Result<RunSnapshot> {
        let _running = self
            .running
            .try_lock()
            .map_err(|_| HarvestError::RunInProgress)?;

        info!("Starting harvest run");
        let snapshot = tokio::time::timeout(self.run_timeout, self.collect())
            .await
            .map_err(|_| HarvestError::Timeout(self.run_timeout.as_secs()))?;

        if let Err(e) = self.store.append(&snapshot) {
            error!("Harvest run could not be persisted: {}", e);
            return Err(e);
        }

        info!(
            "Harvest run completed: {} profiles, {} projects",
            snapshot.profile_count, snapshot.project_count
        );
        Ok(snapshot)
    }

    /// Scrapes and aggregates without touching the history.
    pub async fn collect(&self) -> RunSnapshot {
        let profiles = self.paginator.discover_profiles().await;
        info!("Profile discovery completed: {} profiles", profiles.len());

        let listing_path = self.scraping().site().projects_path.clone();
        let pages = self.paginator.traverse_project_pages(&listing_path).await;
        info!("Project traversal completed: {} pages", pages.len());

        aggregate(profiles, pages)
    }
}

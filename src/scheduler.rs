//! Periodic trigger for harvest runs.

use crate::error::Result;
use crate::services::HarvestService;
use std::sync::Arc;
use std::time::Duration;
use tokio_cron_scheduler::{Job, JobScheduler};

/// Builds and starts a scheduler firing one run every `interval`.
///
/// The returned handle must be kept alive; dropping it stops the job.
/// Overlapping ticks are rejected by the service's run guard and logged.
pub async fn build_scheduler(
    service: Arc<HarvestService>,
    interval: Duration,
) -> Result<JobScheduler> {
    let scheduler = JobScheduler::new().await?;

    let job = Job::new_repeated_async(interval, move |_uuid, _lock| {
        let service = Arc::clone(&service);

        Box::pin(async move {
            tracing::info!("scheduler: starting harvest run");
            run_and_log(&service).await;
        })
    })?;

    scheduler.add(job).await?;
    scheduler.start().await?;
    Ok(scheduler)
}

/// Runs once, logging instead of propagating the outcome.
pub async fn run_and_log(service: &HarvestService) {
    match service.run().await {
        Ok(snapshot) => tracing::info!(
            profiles = snapshot.profile_count,
            projects = snapshot.project_count,
            "scheduler: harvest run stored"
        ),
        Err(e) => tracing::error!(error = %e, "scheduler: harvest run failed"),
    }
}

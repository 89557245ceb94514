//! Scheduled sync runs using tokio-cron-scheduler.
//!
//! The scheduler is the external trigger of the pipeline: one job fires per
//! interval and invokes a full sync run. Overlap protection lives in the
//! store's advisory run lock, not here.

use std::sync::Arc;

use anyhow::Result;
use tokio_cron_scheduler::{Job, JobScheduler};

use catalog_sync::{SyncReport, SyncService};

/// Start the scheduler with the catalog sync job.
pub async fn start_scheduler(service: Arc<SyncService>, cron: &str) -> Result<JobScheduler> {
    let scheduler = JobScheduler::new().await?;

    let sync_service = service.clone();
    let sync_job = Job::new_async(cron, move |_uuid, _lock| {
        let service = sync_service.clone();
        Box::pin(async move {
            match service.run().await {
                Ok(SyncReport::Completed(summary)) => tracing::info!(
                    total = summary.counts.total(),
                    duration_ms = summary.duration_ms,
                    "scheduled sync completed"
                ),
                Ok(SyncReport::SkippedLocked) => {
                    tracing::warn!("scheduled sync skipped: previous run still in flight")
                }
                Err(e) => tracing::error!("Scheduled sync failed: {:#}", e),
            }
        })
    })?;

    scheduler.add(sync_job).await?;
    scheduler.start().await?;

    tracing::info!("Scheduled tasks started (catalog sync at '{}')", cron);
    Ok(scheduler)
}

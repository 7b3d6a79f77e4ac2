use chrono::Utc;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::{
    error::AppError,
    service::presence::{TrackerEvent, TrackerHandle},
};

/// Starts the presence sweep scheduler
///
/// Each run posts a sweep to the tracker, which heartbeats confirmed sessions,
/// expires unconfirmed sessions past the grace period and retries failed
/// store writes.
///
/// # Arguments
/// - `schedule`: Cron expression with a seconds field
/// - `tracker`: Handle of the presence tracker
///
/// # Returns
/// - `Ok(JobScheduler)` - Running scheduler, kept alive by the caller
/// - `Err(AppError::SchedulerErr)` - Invalid schedule or scheduler failure
pub async fn start_scheduler(
    schedule: &str,
    tracker: TrackerHandle,
) -> Result<JobScheduler, AppError> {
    let scheduler = JobScheduler::new().await?;

    let job = Job::new_async(schedule, move |_uuid, _lock| {
        let tracker = tracker.clone();

        Box::pin(async move {
            if let Err(e) = tracker.send(TrackerEvent::Sweep(Utc::now())).await {
                tracing::error!("Error posting presence sweep: {}", e);
            }
        })
    })?;

    scheduler.add(job).await?;
    scheduler.start().await?;

    tracing::info!("Presence sweep scheduler started ({})", schedule);

    Ok(scheduler)
}

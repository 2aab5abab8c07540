use std::sync::Arc;

use anyhow::Result;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::reports::{FlushOutcome, ReportFlusher};

/// Runs one flush right away, then every `flush_interval`. Each run stands on
/// its own: a failed send is logged and the next tick proceeds normally.
pub async fn configure_flush_job(
    flusher: Arc<ReportFlusher>,
    flush_interval: std::time::Duration,
) -> Result<JobScheduler> {
    run_flush(&flusher).await;

    let scheduler = JobScheduler::new().await?;
    let job = Job::new_repeated_async(flush_interval, move |_id, _l| {
        let flusher = flusher.clone();
        Box::pin(async move {
            tracing::debug!(target: "scheduler", "report flush triggered");
            run_flush(&flusher).await;
        })
    })?;
    scheduler.add(job).await?;
    tracing::info!(
        target: "scheduler",
        interval_secs = flush_interval.as_secs(),
        "report flush job registered"
    );
    scheduler.start().await?;
    Ok(scheduler)
}

pub async fn run_flush(flusher: &ReportFlusher) -> Option<FlushOutcome> {
    match flusher.flush().await {
        Ok(outcome) => Some(outcome),
        Err(err) => {
            tracing::error!(target: "scheduler", error = %err, "report flush failed");
            None
        }
    }
}

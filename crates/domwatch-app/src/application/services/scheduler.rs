use anyhow::{bail, Context, Result};
use log::{error, info};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_cron_scheduler::{Job, JobScheduler};

use super::monitor_service::MonitorService;

/// Accept 5-field (minute precision) or 6-field (leading seconds) cron.
/// A 5-field expression fires at second 0. A trailing year field is not
/// supported by the job scheduler and is rejected here.
pub fn normalize_cron_expression(expression: &str) -> Result<String> {
    let fields: Vec<&str> = expression.split_whitespace().collect();
    match fields.len() {
        5 => Ok(format!("0 {}", fields.join(" "))),
        6 => Ok(fields.join(" ")),
        n => bail!(
            "Invalid cron expression '{}': expected 5 or 6 fields, got {}",
            expression,
            n
        ),
    }
}

fn domain_check_job(monitor: Arc<MonitorService>, expression: &str) -> Result<Job> {
    Job::new_async(expression, move |_id, _scheduler| {
        let monitor = Arc::clone(&monitor);
        Box::pin(async move {
            info!("Scheduled domain check starting");
            if let Err(e) = monitor.check_all_domains().await {
                error!("Scheduled domain check failed: {}", e);
            }
        })
    })
    .with_context(|| format!("Invalid check schedule '{}'", expression))
}

/// Periodic trigger for the batch check
pub struct DomainCheckScheduler {
    scheduler: JobScheduler,
    job: Mutex<Option<Job>>,
    expression: String,
}

impl DomainCheckScheduler {
    /// Parses the schedule up front so a bad expression fails at startup,
    /// before anything is registered.
    pub async fn new(monitor: Arc<MonitorService>, expression: &str) -> Result<Self> {
        let expression = normalize_cron_expression(expression)?;
        let job = domain_check_job(monitor, &expression)?;
        let scheduler = JobScheduler::new()
            .await
            .context("Failed to create job scheduler")?;

        Ok(Self {
            scheduler,
            job: Mutex::new(Some(job)),
            expression,
        })
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    pub async fn start(&self) -> Result<()> {
        let Some(job) = self.job.lock().await.take() else {
            bail!("Domain check scheduler already started");
        };

        self.scheduler
            .add(job)
            .await
            .context("Failed to register domain check job")?;
        self.scheduler
            .start()
            .await
            .context("Failed to start job scheduler")?;

        info!("✅ Domain check scheduler started ({})", self.expression);
        Ok(())
    }

    pub async fn stop(&self) -> Result<()> {
        let mut scheduler = self.scheduler.clone();
        scheduler
            .shutdown()
            .await
            .context("Failed to stop job scheduler")?;
        info!("Domain check scheduler stopped");
        Ok(())
    }
}

use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result};
use reqwest::Client;
use tokio::time::timeout;
use tokio_cron_scheduler::JobScheduler;

use crate::{
    api::{SpamApi, SpamApiClient},
    config::AppConfig,
    domain::{AnnotatedItem, ContentItem, ReportAck, ReportRequest},
    error::Result as FilterResult,
    filter::{BatchClassifier, ClassificationCache, ClassificationPipeline},
    infrastructure::signals::shutdown_signal,
    reports::{FlushOutcome, ReportBuffer, ReportFlusher},
    store::{KeyValueStore, MemoryStore, RedisStore, SetStore},
    tasks::scheduler::configure_flush_job,
};

/// Everything a host needs: the classification pipeline and the report
/// buffer/flusher pair, wired to one store and one API client.
pub struct SpamFilterApp {
    config: Arc<AppConfig>,
    pipeline: ClassificationPipeline,
    reports: Arc<ReportBuffer>,
    flusher: Arc<ReportFlusher>,
}

impl SpamFilterApp {
    pub async fn initialize(config: AppConfig) -> Result<Self> {
        let config = Arc::new(config);

        let (kv, sets): (Arc<dyn KeyValueStore>, Arc<dyn SetStore>) = match &config.redis_url {
            Some(url) => {
                let store = Arc::new(
                    RedisStore::connect(url)
                        .await
                        .context("failed to connect to redis")?,
                );
                let kv: Arc<dyn KeyValueStore> = store.clone();
                let sets: Arc<dyn SetStore> = store;
                (kv, sets)
            }
            None => {
                tracing::warn!(target: "store", "REDIS_URL not set; using in-memory store");
                let store = Arc::new(MemoryStore::new());
                let kv: Arc<dyn KeyValueStore> = store.clone();
                let sets: Arc<dyn SetStore> = store;
                (kv, sets)
            }
        };

        let http_client = Client::builder()
            .user_agent(format!("spamfilter/{}", env!("CARGO_PKG_VERSION")))
            .build()?;
        let api: Arc<dyn SpamApi> =
            Arc::new(SpamApiClient::new(http_client, config.spam_api.clone()));

        Ok(Self::from_parts(config, kv, sets, api))
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        kv: Arc<dyn KeyValueStore>,
        sets: Arc<dyn SetStore>,
        api: Arc<dyn SpamApi>,
    ) -> Self {
        let pipeline = ClassificationPipeline::new(
            ClassificationCache::new(kv, config.cache.clone()),
            BatchClassifier::new(api.clone()),
        );
        let reports = Arc::new(ReportBuffer::new(sets, config.reports.clone()));
        let flusher = Arc::new(ReportFlusher::new(reports.clone(), api));

        Self {
            config,
            pipeline,
            reports,
            flusher,
        }
    }

    pub async fn classify_all<'a>(&self, items: &'a [ContentItem]) -> Vec<AnnotatedItem<'a>> {
        self.pipeline.classify_all(items).await
    }

    pub async fn submit_report(&self, request: ReportRequest) -> FilterResult<ReportAck> {
        self.reports.submit(request).await?;
        Ok(ReportAck::ok())
    }

    pub async fn flush(&self) -> FilterResult<FlushOutcome> {
        self.flusher.flush().await
    }

    pub fn pipeline(&self) -> &ClassificationPipeline {
        &self.pipeline
    }

    pub fn reports(&self) -> &ReportBuffer {
        &self.reports
    }

    /// Flushes once, schedules periodic flushes and waits for a shutdown
    /// signal.
    pub async fn run(self) -> Result<()> {
        tracing::info!(
            endpoint = %self.config.spam_api.endpoint,
            flush_secs = self.config.reports.flush_interval.as_secs(),
            "spam filter started"
        );

        let mut scheduler =
            configure_flush_job(self.flusher.clone(), self.config.reports.flush_interval).await?;

        shutdown_signal().await;
        tracing::info!("shutdown signal received");

        stop_scheduler(&mut scheduler, Duration::from_secs(5)).await;
        tracing::info!("spam filter stopped");
        Ok(())
    }
}

async fn stop_scheduler(scheduler: &mut JobScheduler, limit: Duration) {
    match timeout(limit, scheduler.shutdown()).await {
        Ok(Ok(())) => {}
        Ok(Err(err)) => {
            tracing::error!(target: "scheduler", ?err, "scheduler shutdown failed");
        }
        Err(_) => {
            tracing::warn!(
                target: "scheduler",
                "scheduler did not stop within {:?}",
                limit
            );
        }
    }
}

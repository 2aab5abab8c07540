use std::sync::Arc;

use crate::{
    config::ReportConfig,
    domain::{PendingReport, ReportAck, ReportRequest},
    error::{Result, SpamFilterError},
    store::SetStore,
};

/// Pending spam reports, deduplicated by their serialized form.
pub struct ReportBuffer {
    store: Arc<dyn SetStore>,
    config: ReportConfig,
}

impl ReportBuffer {
    pub fn new(store: Arc<dyn SetStore>, config: ReportConfig) -> Self {
        Self { store, config }
    }

    /// Queues a report. Returns false when an identical report was already
    /// pending.
    pub async fn submit(&self, request: ReportRequest) -> Result<bool> {
        let report = PendingReport::from_request(request, &self.config.reporter);
        let member = serde_json::to_string(&report)?;
        let added = self.store.add(&self.config.store_key, &member).await?;
        tracing::info!(
            target: "reports",
            uri = %report.uri,
            acct = %report.account.acct,
            duplicate = !added,
            "spam report queued"
        );
        Ok(added)
    }

    /// Accepts the raw inbound body and answers with the acknowledgement the
    /// report endpoint returns.
    pub async fn submit_json(&self, body: &str) -> Result<ReportAck> {
        let request: ReportRequest = serde_json::from_str(body)
            .map_err(|err| SpamFilterError::InvalidReport(err.to_string()))?;
        self.submit(request).await?;
        Ok(ReportAck::ok())
    }

    pub(crate) async fn drain(&self) -> Result<Vec<String>> {
        self.store.drain(&self.config.store_key).await
    }
}

use std::sync::Arc;

use serde_json::Value;

use crate::{api::SpamApi, error::Result};

use super::buffer::ReportBuffer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushOutcome {
    Empty,
    Sent(usize),
}

/// Drains the buffer and forwards it as one call. A failed send loses that
/// batch; reports are never put back.
pub struct ReportFlusher {
    buffer: Arc<ReportBuffer>,
    api: Arc<dyn SpamApi>,
}

impl ReportFlusher {
    pub fn new(buffer: Arc<ReportBuffer>, api: Arc<dyn SpamApi>) -> Self {
        Self { buffer, api }
    }

    pub async fn flush(&self) -> Result<FlushOutcome> {
        let members = self.buffer.drain().await?;
        if members.is_empty() {
            tracing::info!(target: "reports", "no report spams");
            return Ok(FlushOutcome::Empty);
        }

        let mut spams = Vec::with_capacity(members.len());
        for member in &members {
            match serde_json::from_str::<Value>(member) {
                Ok(value) => spams.push(value),
                Err(err) => {
                    tracing::warn!(target: "reports", error = %err, "skipping unreadable pending report")
                }
            }
        }
        if spams.is_empty() {
            return Ok(FlushOutcome::Empty);
        }

        if let Err(err) = self.api.report_spams(&spams).await {
            tracing::error!(
                target: "reports",
                error = %err,
                dropped = spams.len(),
                "spam report flush failed; batch discarded"
            );
            return Err(err);
        }

        tracing::info!(target: "reports", sent = spams.len(), "spam reports flushed");
        Ok(FlushOutcome::Sent(spams.len()))
    }
}

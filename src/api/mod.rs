pub mod client;
pub mod wire;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;

pub use client::SpamApiClient;
pub use wire::{ApiReply, ScoreEntry, TextEntry};

/// Remote scoring service. One call per batch, never one per text.
#[async_trait]
pub trait SpamApi: Send + Sync {
    async fn classify_texts(&self, texts: &[TextEntry]) -> Result<ApiReply>;

    async fn report_spams(&self, spams: &[Value]) -> Result<()>;
}

#[cfg(test)]
pub(crate) mod fake;

use std::{collections::HashMap, sync::Arc};

use crate::{
    api::{ApiReply, SpamApi, TextEntry},
    domain::{Fingerprint, SpamVerdict},
    error::Result,
};

use super::{grouper::ContentGroup, hasher::strip_line_breaks};

#[derive(Debug, Clone, PartialEq)]
pub enum BatchOutcome {
    /// Verdicts for the groups the service echoed back. Groups it skipped
    /// are simply absent.
    Classified(HashMap<Fingerprint, SpamVerdict>),
    /// The service refused the batch as a whole.
    Failed { reason: String },
}

pub struct BatchClassifier {
    api: Arc<dyn SpamApi>,
}

impl BatchClassifier {
    pub fn new(api: Arc<dyn SpamApi>) -> Self {
        Self { api }
    }

    /// Scores every group with a single remote call and matches the reply back
    /// to groups by a member uri (the representative's unless another group
    /// already uses it), never by position.
    pub async fn classify(&self, groups: &[ContentGroup<'_>]) -> Result<BatchOutcome> {
        let mut texts = Vec::with_capacity(groups.len());
        let mut by_uri: HashMap<&str, &Fingerprint> = HashMap::with_capacity(groups.len());

        for group in groups {
            let content = strip_line_breaks(group.text());
            // the service answers 500 on empty text
            if content.is_empty() {
                continue;
            }
            // a uri can only identify one group per request; fall back to the
            // next member whose uri is still free
            let Some(uri) = group
                .members
                .iter()
                .map(|member| member.uri.as_str())
                .find(|uri| !by_uri.contains_key(uri))
            else {
                tracing::warn!(
                    target: "classifier",
                    fingerprint = %group.fingerprint,
                    uri = %group.representative().uri,
                    "every member uri already names another group; leaving unclassified"
                );
                continue;
            };
            by_uri.insert(uri, &group.fingerprint);
            texts.push(TextEntry {
                uri: uri.to_string(),
                content,
            });
        }

        if texts.is_empty() {
            return Ok(BatchOutcome::Classified(HashMap::new()));
        }

        tracing::info!(target: "classifier", texts = texts.len(), "requesting spam scores");
        let scores = match self.api.classify_texts(&texts).await? {
            ApiReply::Scored(scores) => scores,
            ApiReply::Rejected {
                status,
                reason,
                body,
            } => {
                tracing::error!(target: "classifier", status, reason = %reason, body = %body, "spam api failed");
                return Ok(BatchOutcome::Failed {
                    reason: format!("status code {status}: {reason}"),
                });
            }
        };

        let mut verdicts: HashMap<Fingerprint, SpamVerdict> = HashMap::with_capacity(scores.len());
        for entry in scores {
            let Some(&fp) = by_uri.get(entry.uri.as_str()) else {
                tracing::warn!(target: "classifier", uri = %entry.uri, "uri mismatch; discarding score");
                continue;
            };
            if verdicts.contains_key(fp) {
                tracing::warn!(target: "classifier", uri = %entry.uri, "uri echoed twice; keeping first score");
                continue;
            }
            verdicts.insert(
                fp.clone(),
                SpamVerdict::from_scores(entry.uri, entry.bad, entry.good),
            );
        }

        for text in &texts {
            if let Some(fp) = by_uri.get(text.uri.as_str()) {
                if !verdicts.contains_key(*fp) {
                    tracing::warn!(target: "classifier", uri = %text.uri, "no score returned; leaving unclassified");
                }
            }
        }

        Ok(BatchOutcome::Classified(verdicts))
    }
}

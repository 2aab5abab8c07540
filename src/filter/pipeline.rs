use std::collections::HashMap;

use crate::domain::{
    AnnotatedItem, Annotation, ContentItem, Fingerprint, SpamVerdict, VerdictSource,
};

use super::{
    cache::ClassificationCache,
    classifier::{BatchClassifier, BatchOutcome},
    grouper::group_items,
};

/// Dedup, cache, batch-classify, write back.
pub struct ClassificationPipeline {
    cache: ClassificationCache,
    classifier: BatchClassifier,
}

impl ClassificationPipeline {
    pub fn new(cache: ClassificationCache, classifier: BatchClassifier) -> Self {
        Self { cache, classifier }
    }

    /// Returns every input item, in order, with the verdict this pass could
    /// find for it. Failures only leave items unannotated.
    pub async fn classify_all<'a>(&self, items: &'a [ContentItem]) -> Vec<AnnotatedItem<'a>> {
        let mut annotations: Vec<Option<Annotation>> = vec![None; items.len()];
        let groups = group_items(items);
        if groups.is_empty() {
            return annotate(items, annotations);
        }

        let fingerprints: Vec<Fingerprint> = groups.iter().map(|g| g.fingerprint.clone()).collect();
        let mut cached = self.cache.get_many(&fingerprints).await;

        let mut pending = Vec::with_capacity(groups.len());
        for group in groups {
            match cached.remove(&group.fingerprint) {
                Some(verdict) => {
                    for &pos in &group.positions {
                        annotations[pos] = Some(Annotation {
                            verdict: verdict.clone(),
                            source: VerdictSource::Cache,
                        });
                    }
                }
                None => pending.push(group),
            }
        }

        tracing::info!(
            target: "pipeline",
            items = items.len(),
            groups = fingerprints.len(),
            cache_hits = fingerprints.len() - pending.len(),
            "classifying statuses"
        );

        if pending.is_empty() {
            return annotate(items, annotations);
        }

        let mut verdicts = match self.classifier.classify(&pending).await {
            Ok(BatchOutcome::Classified(verdicts)) => verdicts,
            Ok(BatchOutcome::Failed { reason }) => {
                tracing::error!(target: "pipeline", reason = %reason, "spam api failed; batch left unclassified");
                return annotate(items, annotations);
            }
            Err(err) => {
                tracing::error!(target: "pipeline", error = %err, "spam api call failed; batch left unclassified");
                return annotate(items, annotations);
            }
        };

        let mut updates = Vec::with_capacity(verdicts.len());
        for group in &pending {
            let Some(verdict) = verdicts.remove(&group.fingerprint) else {
                continue;
            };
            for &pos in &group.positions {
                annotations[pos] = Some(Annotation {
                    verdict: verdict.clone(),
                    source: VerdictSource::Remote,
                });
            }
            updates.push((group.fingerprint.clone(), verdict));
        }

        self.cache.set_many(&updates).await;
        annotate(items, annotations)
    }

    /// Verdicts keyed by item uri, for hosts that attach them elsewhere.
    pub async fn verdicts_by_uri(
        &self,
        items: &[ContentItem],
    ) -> HashMap<String, SpamVerdict> {
        self.classify_all(items)
            .await
            .into_iter()
            .filter_map(|annotated| {
                let uri = annotated.item.uri.clone();
                annotated.annotation.map(|a| (uri, a.verdict))
            })
            .collect()
    }
}

fn annotate(items: &[ContentItem], annotations: Vec<Option<Annotation>>) -> Vec<AnnotatedItem<'_>> {
    items
        .iter()
        .zip(annotations)
        .map(|(item, annotation)| AnnotatedItem { item, annotation })
        .collect()
}

use std::{collections::HashMap, sync::Arc};

use crate::{
    config::CacheConfig,
    domain::{Fingerprint, SpamVerdict},
    store::KeyValueStore,
};

/// Fingerprint-keyed verdict cache. Every failure here degrades to a miss or
/// a dropped write; nothing is propagated to the pipeline.
pub struct ClassificationCache {
    store: Arc<dyn KeyValueStore>,
    config: CacheConfig,
}

impl ClassificationCache {
    pub fn new(store: Arc<dyn KeyValueStore>, config: CacheConfig) -> Self {
        Self { store, config }
    }

    pub async fn get_many(&self, fingerprints: &[Fingerprint]) -> HashMap<Fingerprint, SpamVerdict> {
        if fingerprints.is_empty() {
            return HashMap::new();
        }
        let keys: Vec<String> = fingerprints
            .iter()
            .map(|fp| self.config.key_for(fp.as_str()))
            .collect();

        let values = match self.store.get_many(&keys).await {
            Ok(values) => values,
            Err(err) => {
                tracing::warn!(target: "cache", error = %err, "cache read failed; treating as all-miss");
                return HashMap::new();
            }
        };

        let mut hits = HashMap::new();
        for (fp, value) in fingerprints.iter().zip(values) {
            let Some(raw) = value.filter(|raw| !raw.is_empty()) else {
                continue;
            };
            match serde_json::from_str::<SpamVerdict>(&raw) {
                Ok(verdict) => {
                    hits.insert(fp.clone(), verdict);
                }
                Err(err) => {
                    tracing::warn!(target: "cache", fingerprint = %fp, error = %err, "ignoring undecodable cache entry");
                }
            }
        }
        tracing::debug!(target: "cache", requested = fingerprints.len(), hits = hits.len(), "cache lookup");
        hits
    }

    pub async fn set_many(&self, verdicts: &[(Fingerprint, SpamVerdict)]) {
        if verdicts.is_empty() {
            return;
        }
        let mut entries = Vec::with_capacity(verdicts.len());
        for (fp, verdict) in verdicts {
            match serde_json::to_string(verdict) {
                Ok(json) => entries.push((self.config.key_for(fp.as_str()), json)),
                Err(err) => {
                    tracing::warn!(target: "cache", fingerprint = %fp, error = %err, "failed to encode verdict")
                }
            }
        }

        if let Err(err) = self.store.set_many(&entries, self.config.ttl).await {
            tracing::warn!(
                target: "cache",
                error = %err,
                entries = entries.len(),
                "cache write failed; dropping results"
            );
        }
    }
}

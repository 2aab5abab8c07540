use std::{
    collections::{BTreeSet, HashMap},
    sync::Arc,
    time::Duration,
};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use super::{KeyValueStore, SetStore};
use crate::error::Result;

pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

struct Entry {
    value: String,
    expires_at: DateTime<Utc>,
}

/// In-process store used when no Redis is configured and in tests.
pub struct MemoryStore {
    values: Mutex<HashMap<String, Entry>>,
    sets: Mutex<HashMap<String, BTreeSet<String>>>,
    clock: Clock,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(Utc::now))
    }

    pub fn with_clock(clock: Clock) -> Self {
        Self {
            values: Mutex::new(HashMap::new()),
            sets: Mutex::new(HashMap::new()),
            clock,
        }
    }

    #[cfg(test)]
    pub(crate) fn set_len(&self, key: &str) -> usize {
        self.sets.lock().get(key).map_or(0, BTreeSet::len)
    }

    #[cfg(test)]
    pub(crate) fn live_keys(&self) -> Vec<String> {
        let now = (self.clock)();
        let mut keys: Vec<String> = self
            .values
            .lock()
            .iter()
            .filter(|(_, entry)| entry.expires_at > now)
            .map(|(key, _)| key.clone())
            .collect();
        keys.sort();
        keys
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get_many(&self, keys: &[String]) -> Result<Vec<Option<String>>> {
        let now = (self.clock)();
        let mut values = self.values.lock();
        values.retain(|_, entry| entry.expires_at > now);
        Ok(keys
            .iter()
            .map(|key| values.get(key).map(|entry| entry.value.clone()))
            .collect())
    }

    async fn set_many(&self, entries: &[(String, String)], ttl: Duration) -> Result<()> {
        let ttl = chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::MAX);
        let expires_at = (self.clock)()
            .checked_add_signed(ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        let mut values = self.values.lock();
        for (key, value) in entries {
            values.insert(
                key.clone(),
                Entry {
                    value: value.clone(),
                    expires_at,
                },
            );
        }
        Ok(())
    }
}

#[async_trait]
impl SetStore for MemoryStore {
    async fn add(&self, key: &str, member: &str) -> Result<bool> {
        Ok(self
            .sets
            .lock()
            .entry(key.to_string())
            .or_default()
            .insert(member.to_string()))
    }

    async fn drain(&self, key: &str) -> Result<Vec<String>> {
        Ok(self
            .sets
            .lock()
            .remove(key)
            .map(|set| set.into_iter().collect())
            .unwrap_or_default())
    }
}

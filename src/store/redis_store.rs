use std::time::Duration;

use async_trait::async_trait;
use redis::{aio::ConnectionManager, Client};

use super::{KeyValueStore, SetStore};
use crate::error::Result;

/// Redis-backed store. `ConnectionManager` reconnects on its own and is cheap
/// to clone, so every call works on its own handle.
#[derive(Clone)]
pub struct RedisStore {
    manager: ConnectionManager,
}

impl RedisStore {
    pub async fn connect(url: &str) -> Result<Self> {
        let client = Client::open(url)?;
        let manager = ConnectionManager::new(client).await?;
        tracing::info!(target: "store", "connected to redis");
        Ok(Self { manager })
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn get_many(&self, keys: &[String]) -> Result<Vec<Option<String>>> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.manager.clone();
        let values: Vec<Option<String>> = redis::cmd("MGET").arg(keys).query_async(&mut conn).await?;
        Ok(values)
    }

    async fn set_many(&self, entries: &[(String, String)], ttl: Duration) -> Result<()> {
        if entries.is_empty() {
            return Ok(());
        }
        let ttl_secs = ttl.as_secs().max(1);
        let mut pipe = redis::pipe();
        pipe.atomic();
        for (key, value) in entries {
            pipe.cmd("SET")
                .arg(key)
                .arg(value)
                .arg("EX")
                .arg(ttl_secs)
                .ignore();
        }
        let mut conn = self.manager.clone();
        let (): () = pipe.query_async(&mut conn).await?;
        Ok(())
    }
}

#[async_trait]
impl SetStore for RedisStore {
    async fn add(&self, key: &str, member: &str) -> Result<bool> {
        let mut conn = self.manager.clone();
        let added: i64 = redis::cmd("SADD")
            .arg(key)
            .arg(member)
            .query_async(&mut conn)
            .await?;
        Ok(added > 0)
    }

    async fn drain(&self, key: &str) -> Result<Vec<String>> {
        let mut conn = self.manager.clone();
        let (members,): (Vec<String>,) = redis::pipe()
            .atomic()
            .cmd("SMEMBERS")
            .arg(key)
            .cmd("DEL")
            .arg(key)
            .ignore()
            .query_async(&mut conn)
            .await?;
        Ok(members)
    }
}

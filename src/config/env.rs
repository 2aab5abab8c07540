use std::time::Duration;

use thiserror::Error;
use url::Url;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub spam_api: SpamApiConfig,
    pub cache: CacheConfig,
    pub reports: ReportConfig,
    pub redis_url: Option<String>,
    pub directories: DirectoryConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone)]
pub struct SpamApiConfig {
    pub endpoint: Url,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Prefix of every cache key: `<namespace>:spam:<fingerprint>`.
    pub namespace: String,
    pub ttl: Duration,
}

#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub store_key: String,
    pub reporter: String,
    pub flush_interval: Duration,
}

#[derive(Debug, Clone)]
pub struct DirectoryConfig {
    pub logs_dir: String,
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

pub const DEFAULT_NAMESPACE: &str = "naumanni_spamfilter";
pub const DEFAULT_ENDPOINT: &str = "https://mstdn.onosendai.jp/ai/spam/";
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(6 * 60 * 60);
pub const DEFAULT_FLUSH_INTERVAL: Duration = Duration::from_secs(5 * 60);

impl CacheConfig {
    pub fn key_for(&self, fingerprint: &str) -> String {
        format!("{}:spam:{}", self.namespace, fingerprint)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            ttl: DEFAULT_CACHE_TTL,
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            store_key: format!("{DEFAULT_NAMESPACE}:report"),
            reporter: "shn@oppai.tokyo".to_string(),
            flush_interval: DEFAULT_FLUSH_INTERVAL,
        }
    }
}

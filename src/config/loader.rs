use std::{env, time::Duration};

use url::Url;

use super::env::{
    AppConfig, CacheConfig, ConfigError, DirectoryConfig, LoggingConfig, ReportConfig,
    SpamApiConfig, DEFAULT_CACHE_TTL, DEFAULT_ENDPOINT, DEFAULT_FLUSH_INTERVAL,
    DEFAULT_NAMESPACE,
};

pub fn load_config() -> Result<AppConfig, ConfigError> {
    AppConfig::from_lookup(|key| env::var(key).ok())
}

impl AppConfig {
    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let raw_endpoint = var("SPAM_API_ENDPOINT").unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        let endpoint = Url::parse(&raw_endpoint).map_err(|_| ConfigError::Invalid {
            key: "SPAM_API_ENDPOINT",
            value: raw_endpoint.clone(),
        })?;

        let spam_api = SpamApiConfig {
            endpoint,
            timeout: Duration::from_millis(parse_u64(&var, "SPAM_API_TIMEOUT_MS")?.unwrap_or(10_000)),
        };

        let namespace = var("CACHE_NAMESPACE").unwrap_or_else(|| DEFAULT_NAMESPACE.to_string());
        let cache = CacheConfig {
            ttl: parse_u64(&var, "CACHE_TTL_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_CACHE_TTL),
            namespace: namespace.clone(),
        };

        let reports = ReportConfig {
            store_key: var("REPORT_STORE_KEY").unwrap_or_else(|| format!("{namespace}:report")),
            reporter: var("SPAM_REPORTER").unwrap_or_else(|| ReportConfig::default().reporter),
            flush_interval: parse_u64(&var, "REPORT_FLUSH_INTERVAL_SECS")?
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_FLUSH_INTERVAL),
        };

        let directories = DirectoryConfig {
            logs_dir: var("LOGS_DIR").unwrap_or_else(|| "logs".to_string()),
        };

        let logging = LoggingConfig {
            level: var("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        };

        Ok(Self {
            spam_api,
            cache,
            reports,
            redis_url: var("REDIS_URL"),
            directories,
            logging,
        })
    }
}

fn parse_u64<F>(var: &F, key: &'static str) -> Result<Option<u64>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match var(key) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { key, value }),
    }
}

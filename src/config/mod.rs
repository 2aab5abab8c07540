pub mod env;
mod loader;

pub use env::{
    AppConfig, CacheConfig, ConfigError, DirectoryConfig, LoggingConfig, ReportConfig, SpamApiConfig,
};
pub use loader::load_config;

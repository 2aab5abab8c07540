//! Spam filtering for social-network posts backed by a remote scoring
//! service.
//!
//! Posts with identical text are scored once per pass, verdicts are cached by
//! content fingerprint for six hours, and user spam reports are buffered and
//! forwarded in periodic batches.

pub mod api;
pub mod app;
pub mod config;
pub mod domain;
pub mod error;
pub mod filter;
pub mod infrastructure;
pub mod reports;
pub mod store;
pub mod tasks;

pub use app::SpamFilterApp;
pub use error::{Result, SpamFilterError};

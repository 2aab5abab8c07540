use std::{fs, path::PathBuf};

use anyhow::{Context, Result};

use crate::config::DirectoryConfig;

/// Creates the log directory if needed and checks that it is writable.
pub fn ensure_logs_dir(cfg: &DirectoryConfig) -> Result<PathBuf> {
    let dir = PathBuf::from(&cfg.logs_dir);
    if !dir.exists() {
        fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create log directory {}", cfg.logs_dir))?;
    }

    let probe = dir.join(".write-test");
    fs::write(&probe, b"ok").with_context(|| format!("log directory {} is not writable", cfg.logs_dir))?;
    fs::remove_file(&probe)?;

    Ok(dir.canonicalize().unwrap_or(dir))
}

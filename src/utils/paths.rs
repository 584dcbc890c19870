//! Cross-Platform Path Utilities
//!
//! Functions for resolving application directories across platforms.
//! Settings live in ~/.webhook-sender/; the webhook registry lives in the
//! data directory (the working directory unless overridden).

use std::path::{Path, PathBuf};

use crate::utils::error::{AppError, AppResult};

/// File name of the persisted alias -> URL registry
pub const REGISTRY_FILE_NAME: &str = "webhooks.json";

/// Get the user's home directory
pub fn home_dir() -> AppResult<PathBuf> {
    dirs::home_dir().ok_or_else(|| AppError::config("Could not determine home directory"))
}

/// Get the application directory (~/.webhook-sender/)
pub fn app_dir() -> AppResult<PathBuf> {
    Ok(home_dir()?.join(".webhook-sender"))
}

/// Get the config file path (~/.webhook-sender/config.json)
pub fn config_path() -> AppResult<PathBuf> {
    Ok(app_dir()?.join("config.json"))
}

/// Get the registry file path inside a data directory
pub fn registry_path(data_dir: &Path) -> PathBuf {
    data_dir.join(REGISTRY_FILE_NAME)
}

/// Ensure a directory exists, creating it if necessary
pub fn ensure_dir(path: &Path) -> AppResult<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Get the application directory, creating if it doesn't exist
pub fn ensure_app_dir() -> AppResult<PathBuf> {
    let path = app_dir()?;
    ensure_dir(&path)?;
    Ok(path)
}

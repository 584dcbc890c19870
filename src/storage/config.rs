//! JSON Configuration Management
//!
//! Handles reading and writing the application configuration file.

use std::fs;
use std::path::{Path, PathBuf};

use crate::models::settings::{AppConfig, SettingsUpdate};
use crate::utils::error::{AppError, AppResult};
use crate::utils::paths::{config_path, ensure_app_dir, ensure_dir};

/// Configuration service for managing app settings
#[derive(Debug)]
pub struct ConfigService {
    config_path: PathBuf,
    config: AppConfig,
}

impl ConfigService {
    /// Load ~/.webhook-sender/config.json, creating it with defaults if absent
    pub fn new() -> AppResult<Self> {
        ensure_app_dir()?;
        Self::from_path(config_path()?)
    }

    /// Load an explicit config file, creating it with defaults if absent
    pub fn from_path(config_path: impl Into<PathBuf>) -> AppResult<Self> {
        let config_path = config_path.into();
        let config = if config_path.exists() {
            Self::load_from_file(&config_path)?
        } else {
            if let Some(parent) = config_path.parent() {
                if !parent.as_os_str().is_empty() {
                    ensure_dir(parent)?;
                }
            }
            let default_config = AppConfig::default();
            Self::save_to_file(&config_path, &default_config)?;
            tracing::info!("Wrote default config to {}", config_path.display());
            default_config
        };

        Ok(Self {
            config_path,
            config,
        })
    }

    /// Load configuration from a file
    fn load_from_file(path: &Path) -> AppResult<AppConfig> {
        let content = fs::read_to_string(path)?;
        let config: AppConfig = serde_json::from_str(&content)?;
        config.validate().map_err(AppError::validation)?;
        Ok(config)
    }

    /// Save configuration to a file with pretty formatting
    fn save_to_file(path: &Path, config: &AppConfig) -> AppResult<()> {
        config.validate().map_err(AppError::validation)?;
        let content = serde_json::to_string_pretty(config)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Get the current configuration
    pub fn get_config(&self) -> &AppConfig {
        &self.config
    }

    /// Apply a partial update to a copy of the current configuration.
    ///
    /// Nothing is written; the caller decides whether to `commit` the result.
    pub fn preview_update(&self, update: SettingsUpdate) -> AppResult<AppConfig> {
        let mut candidate = self.config.clone();
        candidate.apply_update(update);
        candidate.validate().map_err(AppError::validation)?;
        Ok(candidate)
    }

    /// Persist a configuration and make it current.
    ///
    /// The in-memory config only changes once the file has been written.
    pub fn commit(&mut self, config: AppConfig) -> AppResult<AppConfig> {
        Self::save_to_file(&self.config_path, &config)?;
        self.config = config;
        Ok(self.config.clone())
    }
}

//! Registry File Storage
//!
//! Reads and writes `webhooks.json`: a flat JSON object of alias -> URL,
//! pretty-printed with four-space indentation and non-ASCII kept literal.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::{Map, Value};

use crate::services::webhook::{WebhookError, WebhookRegistry};
use crate::utils::paths::registry_path;

/// File-backed persistence for the webhook registry.
#[derive(Debug, Clone)]
pub struct RegistryStore {
    path: PathBuf,
}

impl RegistryStore {
    /// Store for `webhooks.json` inside `data_dir`.
    pub fn in_dir(data_dir: &Path) -> Self {
        Self {
            path: registry_path(data_dir),
        }
    }

    /// Store for an explicit file path.
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the registry.
    ///
    /// A missing file is the first-run state and a file that does not decode
    /// as a JSON object is treated the same way: both yield an empty registry.
    /// Neither is an error. Inside an object, entries whose value is not a
    /// string are skipped so the remaining aliases survive the next save.
    pub fn load(&self) -> WebhookRegistry {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("No registry at {}, starting empty", self.path.display());
                return WebhookRegistry::new();
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to read registry {}: {}; starting empty",
                    self.path.display(),
                    e
                );
                return WebhookRegistry::new();
            }
        };

        let object = match serde_json::from_str::<Map<String, Value>>(&content) {
            Ok(object) => object,
            Err(e) => {
                tracing::warn!(
                    "Registry {} is not a JSON object ({}); starting empty",
                    self.path.display(),
                    e
                );
                return WebhookRegistry::new();
            }
        };

        let mut entries = BTreeMap::new();
        for (alias, value) in object {
            match value {
                Value::String(url) => {
                    entries.insert(alias, url);
                }
                other => tracing::warn!(
                    "Skipping registry entry '{}' in {}: expected a string, found {}",
                    alias,
                    self.path.display(),
                    other
                ),
            }
        }

        tracing::info!(
            "Loaded {} webhook(s) from {}",
            entries.len(),
            self.path.display()
        );
        WebhookRegistry::from_map(entries)
    }

    /// Rewrite the whole registry file.
    pub fn save(&self, registry: &WebhookRegistry) -> Result<(), WebhookError> {
        let content = Self::encode(registry)?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, content)?;
        tracing::info!(
            "Saved {} webhook(s) to {}",
            registry.len(),
            self.path.display()
        );
        Ok(())
    }

    /// Four-space indented JSON; serde_json leaves non-ASCII unescaped.
    fn encode(registry: &WebhookRegistry) -> Result<Vec<u8>, WebhookError> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        registry.as_map().serialize(&mut serializer)?;
        Ok(buf)
    }
}

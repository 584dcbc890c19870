//! Webhook Registry
//!
//! In-memory alias -> URL mapping. The registry is a plain owned value: the
//! storage layer loads and saves it, the command layer mutates it.

use std::collections::BTreeMap;

use super::types::{display_label, ValidationError, WebhookEntry};

/// Alias -> URL mapping with unique aliases.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WebhookRegistry {
    entries: BTreeMap<String, String>,
}

impl WebhookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an already-decoded mapping (e.g. the contents of webhooks.json).
    pub fn from_map(entries: BTreeMap<String, String>) -> Self {
        Self { entries }
    }

    pub fn as_map(&self) -> &BTreeMap<String, String> {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, alias: &str) -> Option<&str> {
        self.entries.get(alias).map(String::as_str)
    }

    /// Insert or overwrite an entry.
    ///
    /// Both fields are trimmed; blank values are rejected without touching the
    /// mapping. Returns the URL previously stored under the alias, if any.
    pub fn upsert(&mut self, alias: &str, url: &str) -> Result<Option<String>, ValidationError> {
        let alias = alias.trim();
        let url = url.trim();

        if alias.is_empty() {
            return Err(ValidationError::EmptyAlias);
        }
        if url.is_empty() {
            return Err(ValidationError::EmptyUrl);
        }

        Ok(self.entries.insert(alias.to_string(), url.to_string()))
    }

    /// Resolve a selection string to a destination URL.
    ///
    /// A selection starting with `"<alias> ("` for a known alias resolves to
    /// that alias's URL; anything else is taken literally as the URL. Aliases
    /// are unique, so at most one prefix can match in practice.
    pub fn resolve_destination(&self, selection: &str) -> String {
        let selection = selection.trim();
        for (alias, url) in &self.entries {
            if selection.starts_with(&format!("{} (", alias)) {
                return url.clone();
            }
        }
        selection.to_string()
    }

    /// Entries in alias order.
    pub fn entries(&self) -> impl Iterator<Item = WebhookEntry> + '_ {
        self.entries
            .iter()
            .map(|(alias, url)| WebhookEntry::new(alias.clone(), url.clone()))
    }

    /// Selection labels in alias order.
    pub fn labels(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|(alias, url)| display_label(alias, url))
            .collect()
    }
}

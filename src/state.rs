//! Application State
//!
//! Everything a user action needs: settings, the registry file, the loaded
//! registry and the dispatcher. The state is owned by the shell and handed
//! to commands by reference; nothing here is global.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::models::settings::{AppConfig, SettingsUpdate, MAX_REQUEST_TIMEOUT_SECS};
use crate::services::webhook::{HttpTransport, WebhookDispatcher, WebhookRegistry, WebhookTransport};
use crate::storage::{ConfigService, RegistryStore};
use crate::utils::error::{AppError, AppResult};

/// Startup options supplied by the shell
#[derive(Debug, Clone, Default)]
pub struct StateOptions {
    /// Directory holding webhooks.json
    pub data_dir: PathBuf,
    /// Explicit config file; defaults to ~/.webhook-sender/config.json
    pub config_path: Option<PathBuf>,
    /// Overrides `request_timeout_secs` for this run only
    pub timeout_override: Option<u64>,
    /// Proxy password, never persisted
    pub proxy_password: Option<String>,
}

/// Application state
pub struct AppState {
    options: StateOptions,
    config: ConfigService,
    store: RegistryStore,
    registry: WebhookRegistry,
    dispatcher: WebhookDispatcher,
    /// Transport supplied by the caller; survives settings updates
    injected: Option<Arc<dyn WebhookTransport>>,
}

impl AppState {
    /// Load settings and the registry, and build the HTTP transport
    pub fn initialize(options: StateOptions) -> AppResult<Self> {
        let config = match options.config_path {
            Some(ref path) => ConfigService::from_path(path.clone())?,
            None => ConfigService::new()?,
        };
        let transport = build_transport(config.get_config(), &options)?;
        let store = RegistryStore::in_dir(&options.data_dir);
        Ok(Self::assemble(options, config, store, transport, None))
    }

    /// Build state around a caller-provided transport.
    ///
    /// Settings updates are still validated against a freshly built HTTP
    /// client, but the dispatcher keeps posting through `transport`.
    pub fn with_transport(
        config: ConfigService,
        store: RegistryStore,
        transport: Arc<dyn WebhookTransport>,
    ) -> Self {
        let injected = Some(transport.clone());
        Self::assemble(StateOptions::default(), config, store, transport, injected)
    }

    fn assemble(
        options: StateOptions,
        config: ConfigService,
        store: RegistryStore,
        transport: Arc<dyn WebhookTransport>,
        injected: Option<Arc<dyn WebhookTransport>>,
    ) -> Self {
        let registry = store.load();
        Self {
            options,
            config,
            store,
            registry,
            dispatcher: WebhookDispatcher::new(transport),
            injected,
        }
    }

    pub fn registry(&self) -> &WebhookRegistry {
        &self.registry
    }

    pub fn store(&self) -> &RegistryStore {
        &self.store
    }

    pub fn dispatcher(&self) -> &WebhookDispatcher {
        &self.dispatcher
    }

    /// Get the current configuration
    pub fn get_config(&self) -> &AppConfig {
        self.config.get_config()
    }

    /// Swap in a registry that has already been persisted
    pub(crate) fn replace_registry(&mut self, registry: WebhookRegistry) {
        self.registry = registry;
    }

    /// Update the configuration and rebuild the HTTP transport from it.
    ///
    /// The transport is built before anything is written, so a config that
    /// reqwest rejects never reaches disk.
    pub fn update_config(&mut self, update: SettingsUpdate) -> AppResult<AppConfig> {
        let candidate = self.config.preview_update(update)?;
        let transport = build_transport(&candidate, &self.options)?;
        let updated = self.config.commit(candidate)?;
        let transport = self.injected.clone().unwrap_or(transport);
        self.dispatcher = WebhookDispatcher::new(transport);
        Ok(updated)
    }
}

/// Build the reqwest transport for a configuration plus run-time overrides
fn build_transport(
    config: &AppConfig,
    options: &StateOptions,
) -> AppResult<Arc<dyn WebhookTransport>> {
    let timeout = match options.timeout_override {
        Some(secs) if secs == 0 || secs > MAX_REQUEST_TIMEOUT_SECS => {
            return Err(AppError::config(format!(
                "timeout must be between 1 and {} seconds, got {}",
                MAX_REQUEST_TIMEOUT_SECS, secs
            )))
        }
        Some(secs) => Duration::from_secs(secs),
        None => config.request_timeout(),
    };

    let mut proxy = config.proxy.clone();
    if let Some(ref mut p) = proxy {
        if p.password.is_none() {
            p.password = options.proxy_password.clone();
        }
    }

    let transport = HttpTransport::from_settings(proxy.as_ref(), Some(timeout))?;
    Ok(Arc::new(transport))
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("registry_path", &self.store.path())
            .field("webhooks", &self.registry.len())
            .finish()
    }
}

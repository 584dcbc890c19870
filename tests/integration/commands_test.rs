//! Command Layer Integration Tests
//!
//! Drives save / list / send / settings through `AppState` with a counting
//! stub transport, the way the CLI shell does.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use webhook_sender::commands::{
    get_settings, list_webhooks, save_webhook, send_message, update_settings, SaveWebhookRequest,
    SendMessageRequest,
};
use webhook_sender::models::settings::SettingsUpdate;
use webhook_sender::services::webhook::{TransportFault, TransportResponse, WebhookTransport};
use webhook_sender::state::{AppState, StateOptions};
use webhook_sender::storage::{ConfigService, RegistryStore};
use webhook_sender_core::{ProxyConfig, ProxyProtocol};

// ============================================================================
// Helpers
// ============================================================================

/// Transport stub that counts calls and records the last request.
struct RecordingTransport {
    calls: AtomicUsize,
    requests: Mutex<Vec<(String, String)>>,
    outcome: Result<TransportResponse, TransportFault>,
}

impl RecordingTransport {
    fn new(outcome: Result<TransportResponse, TransportFault>) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
            outcome,
        })
    }

    fn ok() -> Arc<Self> {
        Self::new(Ok(TransportResponse {
            status: 200,
            body: String::new(),
        }))
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn last_request(&self) -> Option<(String, String)> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl WebhookTransport for RecordingTransport {
    async fn post_json(&self, url: &str, body: String) -> Result<TransportResponse, TransportFault> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push((url.to_string(), body));
        self.outcome.clone()
    }
}

fn create_state(dir: &std::path::Path, transport: Arc<RecordingTransport>) -> AppState {
    let config = ConfigService::from_path(dir.join("config.json")).unwrap();
    AppState::with_transport(config, RegistryStore::in_dir(dir), transport)
}

fn save(state: &mut AppState, alias: &str, url: &str) {
    let response = save_webhook(
        state,
        SaveWebhookRequest {
            alias: alias.to_string(),
            url: url.to_string(),
        },
    );
    assert!(response.success, "save failed: {:?}", response.error);
}

fn send_request(target: &str, content: &str) -> SendMessageRequest {
    SendMessageRequest {
        target: target.to_string(),
        content: content.to_string(),
    }
}

// ============================================================================
// Save / List
// ============================================================================

#[test]
fn test_save_then_list() {
    let temp_dir = tempfile::tempdir().unwrap();
    let mut state = create_state(temp_dir.path(), RecordingTransport::ok());

    save(&mut state, " ops ", " https://example.test/hook ");

    let listings = list_webhooks(&state).into_result().unwrap();
    assert_eq!(listings.len(), 1);
    assert_eq!(listings[0].alias, "ops");
    assert_eq!(listings[0].url, "https://example.test/hook");
    assert_eq!(listings[0].label, "ops (https://example.test/hook)");
}

#[test]
fn test_saved_webhooks_survive_restart() {
    let temp_dir = tempfile::tempdir().unwrap();
    {
        let mut state = create_state(temp_dir.path(), RecordingTransport::ok());
        save(&mut state, "ops", "https://example.test/hook");
        save(&mut state, "告警", "https://example.test/alerts");
    }

    let state = create_state(temp_dir.path(), RecordingTransport::ok());
    let labels: Vec<String> = list_webhooks(&state)
        .into_result()
        .unwrap()
        .into_iter()
        .map(|l| l.label)
        .collect();
    assert_eq!(
        labels,
        vec![
            "ops (https://example.test/hook)".to_string(),
            "告警 (https://example.test/alerts)".to_string(),
        ]
    );
}

#[test]
fn test_save_rejects_blank_fields() {
    let temp_dir = tempfile::tempdir().unwrap();
    let mut state = create_state(temp_dir.path(), RecordingTransport::ok());

    let response = save_webhook(
        &mut state,
        SaveWebhookRequest {
            alias: "  ".to_string(),
            url: "https://example.test/hook".to_string(),
        },
    );
    assert!(!response.success);
    assert_eq!(response.error.as_deref(), Some("Alias must not be empty"));

    let response = save_webhook(
        &mut state,
        SaveWebhookRequest {
            alias: "ops".to_string(),
            url: String::new(),
        },
    );
    assert_eq!(response.error.as_deref(), Some("Webhook URL must not be empty"));

    assert!(state.registry().is_empty());
    assert!(!temp_dir.path().join("webhooks.json").exists());
}

#[test]
fn test_failed_write_keeps_in_memory_registry() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config = ConfigService::from_path(temp_dir.path().join("config.json")).unwrap();
    // The registry path is a directory, so every write fails.
    let blocked = temp_dir.path().join("blocked");
    std::fs::create_dir(&blocked).unwrap();
    let mut state =
        AppState::with_transport(config, RegistryStore::at_path(&blocked), RecordingTransport::ok());

    let response = save_webhook(
        &mut state,
        SaveWebhookRequest {
            alias: "ops".to_string(),
            url: "https://example.test/hook".to_string(),
        },
    );
    assert!(!response.success);
    assert!(response
        .error
        .unwrap()
        .starts_with("Failed to persist webhooks"));
    assert!(state.registry().is_empty());
}

#[test]
fn test_save_keeps_string_entries_from_mixed_file() {
    let temp_dir = tempfile::tempdir().unwrap();
    std::fs::write(
        temp_dir.path().join("webhooks.json"),
        r#"{"ops": "https://example.test/hook", "note": null, "retries": 3}"#,
    )
    .unwrap();

    let mut state = create_state(temp_dir.path(), RecordingTransport::ok());
    assert_eq!(state.registry().get("ops"), Some("https://example.test/hook"));

    save(&mut state, "dev", "https://example.test/dev");

    let reloaded = RegistryStore::in_dir(temp_dir.path()).load();
    assert_eq!(reloaded.len(), 2);
    assert_eq!(reloaded.get("ops"), Some("https://example.test/hook"));
    assert_eq!(reloaded.get("dev"), Some("https://example.test/dev"));
}

// ============================================================================
// Send
// ============================================================================

#[tokio::test]
async fn test_send_resolves_label_to_saved_url() {
    let temp_dir = tempfile::tempdir().unwrap();
    let transport = RecordingTransport::ok();
    let mut state = create_state(temp_dir.path(), transport.clone());
    save(&mut state, "ops", "https://example.test/hook");

    let report = send_message(&state, send_request("ops (https://example.test/hook)", "hi"))
        .await
        .into_result()
        .unwrap();

    assert_eq!(report.status_code, 200);
    assert_eq!(report.destination, "https://example.test/hook");
    assert_eq!(
        transport.last_request(),
        Some((
            "https://example.test/hook".to_string(),
            r#"{"msgtype":"text","text":{"content":"hi"}}"#.to_string()
        ))
    );
}

#[tokio::test]
async fn test_send_to_raw_url() {
    let temp_dir = tempfile::tempdir().unwrap();
    let transport = RecordingTransport::ok();
    let state = create_state(temp_dir.path(), transport.clone());

    send_message(&state, send_request("https://other.test/hook", "hello"))
        .await
        .into_result()
        .unwrap();

    let (url, _) = transport.last_request().unwrap();
    assert_eq!(url, "https://other.test/hook");
}

#[tokio::test]
async fn test_send_validation_never_reaches_transport() {
    let temp_dir = tempfile::tempdir().unwrap();
    let transport = RecordingTransport::ok();
    let state = create_state(temp_dir.path(), transport.clone());

    let response = send_message(&state, send_request("", "hi")).await;
    assert_eq!(response.error.as_deref(), Some("Webhook URL must not be empty"));

    let response = send_message(&state, send_request("https://example.test/hook", " \n ")).await;
    assert_eq!(
        response.error.as_deref(),
        Some("Message content must not be empty")
    );

    assert_eq!(transport.calls(), 0);
}

#[tokio::test]
async fn test_send_reports_http_failure() {
    let temp_dir = tempfile::tempdir().unwrap();
    let transport = RecordingTransport::new(Ok(TransportResponse {
        status: 500,
        body: "bad".to_string(),
    }));
    let state = create_state(temp_dir.path(), transport.clone());

    let response = send_message(&state, send_request("https://example.test/hook", "hi")).await;

    assert!(!response.success);
    assert_eq!(
        response.error.as_deref(),
        Some("Send failed: status code: 500\nresponse: bad")
    );
    assert_eq!(transport.calls(), 1);
}

#[tokio::test]
async fn test_send_reports_transport_fault() {
    let temp_dir = tempfile::tempdir().unwrap();
    let transport = RecordingTransport::new(Err(TransportFault(
        "error sending request: connection refused".to_string(),
    )));
    let state = create_state(temp_dir.path(), transport.clone());

    let response = send_message(&state, send_request("https://example.test/hook", "hi")).await;

    let error = response.error.unwrap();
    assert!(error.starts_with("Send failed: request error:"));
    assert!(error.contains("connection refused"));
    // No retry
    assert_eq!(transport.calls(), 1);
}

#[tokio::test]
async fn test_failed_send_does_not_affect_next_action() {
    let temp_dir = tempfile::tempdir().unwrap();
    let transport = RecordingTransport::new(Err(TransportFault("dns error".to_string())));
    let mut state = create_state(temp_dir.path(), transport);

    let response = send_message(&state, send_request("https://nowhere.test", "hi")).await;
    assert!(!response.success);

    save(&mut state, "ops", "https://example.test/hook");
    assert_eq!(state.registry().len(), 1);
}

// ============================================================================
// Settings
// ============================================================================

#[test]
fn test_settings_round_trip() {
    let temp_dir = tempfile::tempdir().unwrap();
    let mut state = create_state(temp_dir.path(), RecordingTransport::ok());

    let settings = get_settings(&state).into_result().unwrap();
    assert_eq!(settings.request_timeout_secs, 30);

    let updated = update_settings(
        &mut state,
        SettingsUpdate {
            request_timeout_secs: Some(10),
            ..Default::default()
        },
    )
    .into_result()
    .unwrap();
    assert_eq!(updated.request_timeout_secs, 10);

    let response = update_settings(
        &mut state,
        SettingsUpdate {
            request_timeout_secs: Some(0),
            ..Default::default()
        },
    );
    assert!(!response.success);
    assert_eq!(get_settings(&state).into_result().unwrap().request_timeout_secs, 10);
}

#[tokio::test]
async fn test_rejected_proxy_does_not_block_later_runs() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config_path = temp_dir.path().join("config.json");
    let transport = RecordingTransport::ok();
    let mut state = create_state(temp_dir.path(), transport.clone());
    let before = std::fs::read_to_string(&config_path).unwrap();

    let response = update_settings(
        &mut state,
        SettingsUpdate {
            proxy: Some(ProxyConfig {
                protocol: ProxyProtocol::Http,
                host: "bad host".to_string(),
                port: 8080,
                username: None,
                password: None,
            }),
            ..Default::default()
        },
    );
    assert!(!response.success);
    assert!(get_settings(&state).into_result().unwrap().proxy.is_none());
    assert_eq!(std::fs::read_to_string(&config_path).unwrap(), before);

    // The next run starts and can still change settings.
    let mut next = AppState::initialize(StateOptions {
        data_dir: temp_dir.path().to_path_buf(),
        config_path: Some(config_path.clone()),
        ..Default::default()
    })
    .unwrap();
    let updated = update_settings(
        &mut next,
        SettingsUpdate {
            clear_proxy: true,
            ..Default::default()
        },
    )
    .into_result()
    .unwrap();
    assert!(updated.proxy.is_none());

    // This state keeps its injected transport across a successful update.
    update_settings(
        &mut state,
        SettingsUpdate {
            request_timeout_secs: Some(5),
            ..Default::default()
        },
    )
    .into_result()
    .unwrap();
    send_message(&state, send_request("https://example.test/hook", "hi"))
        .await
        .into_result()
        .unwrap();
    assert_eq!(transport.calls(), 1);
}

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use netops_agent::transport::{
    AgentConfig, AgentHealth, AgentHealthState, AgentRunState, AgentRunStatus, AnsibleCollection,
    InventoryDevice, PlaybookAccepted, PlaybookSubmission, ValidationReport,
};
use netops_agent::{AgentConnector, AgentEndpoint, AgentError, AgentTransport};
use netops_api::config::{LogFormat, ServerConfig};
use netops_api::router::build_app_router;
use netops_api::state::AppState;
use netops_core::crypto::{Cipher, EncryptionKey};
use tower::ServiceExt;

pub const TENANT: &str = "acme";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 5,
        dispatch_timeout_secs: 2,
        status_poll_interval_secs: 3600,
        status_poll_max_failures: 5,
        audit_journal_capacity: 100,
        log_format: LogFormat::Pretty,
    }
}

// ---------------------------------------------------------------------------
// Fake agent
// ---------------------------------------------------------------------------

/// In-process agent shared by every transport the connector hands out.
#[derive(Default)]
pub struct FakeAgent {
    pub calls: AtomicUsize,
    /// Answer every call with HTTP 503.
    pub down: AtomicBool,
    pub submissions: Mutex<Vec<PlaybookSubmission>>,
    pub devices: Mutex<Vec<InventoryDevice>>,
}

impl FakeAgent {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn enter(&self) -> Result<(), AgentError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.down.load(Ordering::SeqCst) {
            return Err(AgentError::Api {
                status: 503,
                body: "agent offline".into(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl AgentTransport for FakeAgent {
    async fn execute_playbook(
        &self,
        submission: &PlaybookSubmission,
    ) -> Result<PlaybookAccepted, AgentError> {
        self.enter()?;
        self.submissions.lock().unwrap().push(submission.clone());
        Ok(PlaybookAccepted {
            execution_id: format!("run-{}", self.submissions.lock().unwrap().len()),
        })
    }

    async fn validate_playbook(&self, content: &str) -> Result<ValidationReport, AgentError> {
        self.enter()?;
        let valid = content.contains("hosts:");
        Ok(ValidationReport {
            valid,
            errors: if valid {
                Vec::new()
            } else {
                vec!["'hosts' is required".into()]
            },
        })
    }

    async fn add_device_to_inventory(&self, device: &InventoryDevice) -> Result<(), AgentError> {
        self.enter()?;
        self.devices.lock().unwrap().push(device.clone());
        Ok(())
    }

    async fn get_playbook_status(&self, _: &str) -> Result<AgentRunStatus, AgentError> {
        self.enter()?;
        Ok(AgentRunStatus {
            status: AgentRunState::Completed,
            output: Some("ok=2".into()),
            error: None,
        })
    }

    async fn get_health(&self) -> Result<AgentHealth, AgentError> {
        self.enter()?;
        Ok(AgentHealth {
            status: AgentHealthState::Healthy,
            version: "1.4.0".into(),
            last_seen: None,
        })
    }

    async fn get_config(&self) -> Result<AgentConfig, AgentError> {
        self.enter()?;
        Ok(AgentConfig {
            ansible_version: "2.16.3".into(),
            collections: vec![AnsibleCollection {
                name: "cisco.ios".into(),
                version: "5.3.0".into(),
            }],
            supported_platforms: vec!["ios".into(), "junos".into()],
        })
    }
}

/// Hands out the same [`FakeAgent`] for every registration.
pub struct FakeConnector {
    pub agent: Arc<FakeAgent>,
}

impl AgentConnector for FakeConnector {
    fn connect(&self, _: &AgentEndpoint) -> Arc<dyn AgentTransport> {
        Arc::clone(&self.agent) as Arc<dyn AgentTransport>
    }
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub agent: Arc<FakeAgent>,
}

/// Build the full application router with all middleware layers, backed by
/// a fresh key and a [`FakeAgent`].
pub fn build_test_app() -> TestApp {
    let agent = Arc::new(FakeAgent::default());
    let connector = Arc::new(FakeConnector {
        agent: Arc::clone(&agent),
    });
    let state = AppState::new(
        test_config(),
        Cipher::new(EncryptionKey::generate()),
        connector,
    );
    state.spawn_journal();
    let router = build_app_router(state.clone()).unwrap();
    TestApp {
        router,
        state,
        agent,
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    tenant: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(tenant) = tenant {
        builder = builder.header("x-tenant-id", tenant);
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(TENANT), None).await
}

pub async fn post_json(app: &Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(TENANT), Some(body)).await
}

pub async fn put_json(app: &Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::PUT, uri, Some(TENANT), Some(body)).await
}

pub async fn delete(app: &Router, uri: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(TENANT), None).await
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Register the fake agent for [`TENANT`].
pub async fn register_agent(app: &Router) {
    let response = put_json(
        app,
        "/api/v1/agent",
        serde_json::json!({
            "url": "http://agent.acme.internal:8080",
            "platform": "linux",
            "version": "1.4.0",
            "token": "agent-bearer-token",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

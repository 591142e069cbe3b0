//! HTTP/JSON client for a remote execution agent.
//!
//! Default [`AgentTransport`] implementation, built on [`reqwest`]. Paths
//! are relative to the endpoint URL given at registration.

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::transport::{
    AgentConfig, AgentError, AgentHealth, AgentRunStatus, AgentTransport, InventoryDevice,
    PlaybookAccepted, PlaybookSubmission, ValidationReport,
};

/// HTTP client for a single agent.
pub struct HttpAgentClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl HttpAgentClient {
    /// Create a client for the agent at `base_url`, e.g. `http://10.0.0.5:8080`.
    pub fn new(base_url: &str, token: Option<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, token)
    }

    /// Create a client reusing an existing [`reqwest::Client`]
    /// (connection pooling across tenants).
    pub fn with_client(client: reqwest::Client, base_url: &str, token: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ---- private helpers ----

    /// `base_url` with `segments` appended, each percent-encoded as a
    /// single path segment.
    fn url(&self, segments: &[&str]) -> Result<reqwest::Url, AgentError> {
        let mut url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| AgentError::Unavailable(format!("invalid agent url: {e}")))?;
        url.path_segments_mut()
            .map_err(|()| AgentError::Unavailable("agent url cannot carry a path".into()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(
        &self,
        method: reqwest::Method,
        segments: &[&str],
    ) -> Result<reqwest::RequestBuilder, AgentError> {
        let builder = self.client.request(method, self.url(segments)?);
        Ok(match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    /// Send the request. A failure to connect at all is reported as
    /// [`AgentError::Unavailable`]; anything later stays a request error.
    async fn send(builder: reqwest::RequestBuilder) -> Result<reqwest::Response, AgentError> {
        builder.send().await.map_err(|e| {
            if e.is_connect() {
                AgentError::Unavailable(e.to_string())
            } else {
                AgentError::Request(e)
            }
        })
    }

    /// Ensure the response has a success status code. Returns the
    /// response unchanged on success, or an [`AgentError::Api`] carrying
    /// the status and body text on failure.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, AgentError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(AgentError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, AgentError> {
        let response = Self::ensure_success(response).await?;
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| AgentError::Decode(e.to_string()))
    }
}

#[async_trait]
impl AgentTransport for HttpAgentClient {
    async fn execute_playbook(
        &self,
        submission: &PlaybookSubmission,
    ) -> Result<PlaybookAccepted, AgentError> {
        let request = self
            .request(reqwest::Method::POST, &["playbooks", "execute"])?
            .json(submission);

        Self::parse_response(Self::send(request).await?).await
    }

    async fn validate_playbook(&self, content: &str) -> Result<ValidationReport, AgentError> {
        let request = self
            .request(reqwest::Method::POST, &["playbooks", "validate"])?
            .json(&serde_json::json!({ "content": content }));

        Self::parse_response(Self::send(request).await?).await
    }

    async fn add_device_to_inventory(&self, device: &InventoryDevice) -> Result<(), AgentError> {
        let request = self
            .request(reqwest::Method::POST, &["inventory", "devices"])?
            .json(device);

        Self::ensure_success(Self::send(request).await?).await?;
        Ok(())
    }

    async fn get_playbook_status(
        &self,
        agent_execution_id: &str,
    ) -> Result<AgentRunStatus, AgentError> {
        let request = self.request(
            reqwest::Method::GET,
            &["playbooks", "executions", agent_execution_id],
        )?;

        Self::parse_response(Self::send(request).await?).await
    }

    async fn get_health(&self) -> Result<AgentHealth, AgentError> {
        let request = self.request(reqwest::Method::GET, &["health"])?;
        Self::parse_response(Self::send(request).await?).await
    }

    async fn get_config(&self) -> Result<AgentConfig, AgentError> {
        let request = self.request(reqwest::Method::GET, &["config"])?;
        Self::parse_response(Self::send(request).await?).await
    }
}

//! Background status tracking for running playbooks.
//!
//! One watcher task per acknowledged run. It polls the agent on a fixed
//! interval and applies the first terminal report to the stored record.

use std::sync::Arc;
use std::time::Duration;

use netops_agent::transport::{AgentRunState, AgentRunStatus};
use netops_agent::AgentTransport;
use netops_core::execution::{ErrorSummary, FailureKind};
use netops_core::types::{ExecutionId, TenantId};
use serde_json::json;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::orchestrator::summarize;
use crate::redact::Redactor;
use crate::store::ExecutionStore;

/// Polls one run until it finishes, contact is lost, or shutdown.
pub(crate) struct StatusWatcher {
    pub store: Arc<ExecutionStore>,
    pub transport: Arc<dyn AgentTransport>,
    pub tenant_id: TenantId,
    pub execution_id: ExecutionId,
    pub agent_execution_id: String,
    pub interval: Duration,
    /// Per-poll deadline.
    pub timeout: Duration,
    /// Consecutive failed polls tolerated before the run is marked failed.
    pub max_failures: u32,
    /// Secrets revealed for the submit; agent reports may echo them.
    pub redactor: Redactor,
}

impl StatusWatcher {
    pub async fn run(self, cancel: CancellationToken) {
        let start = tokio::time::Instant::now() + self.interval;
        let mut ticker = tokio::time::interval_at(start, self.interval);
        // A slow poll must not be followed by a burst of catch-up polls.
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut failures: u32 = 0;

        tracing::debug!(
            tenant_id = %self.tenant_id,
            execution_id = %self.execution_id,
            agent_execution_id = %self.agent_execution_id,
            interval = ?self.interval,
            "Status watcher started",
        );

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::debug!(execution_id = %self.execution_id, "Status watcher stopping");
                    break;
                }
                _ = ticker.tick() => {
                    match self.poll().await {
                        Ok(status) => {
                            failures = 0;
                            if self.apply(status).await {
                                break;
                            }
                        }
                        Err(summary) => {
                            failures += 1;
                            tracing::warn!(
                                execution_id = %self.execution_id,
                                failures,
                                error = %summary.message,
                                "Status poll failed",
                            );
                            if failures >= self.max_failures {
                                let summary = self.redactor.summary(
                                    summary.kind,
                                    &format!(
                                        "lost contact with agent after {failures} failed status checks: {}",
                                        summary.message
                                    ),
                                );
                                self.finish(Err(summary)).await;
                                break;
                            }
                        }
                    }
                }
            }
        }
    }

    async fn poll(&self) -> Result<AgentRunStatus, ErrorSummary> {
        let call = self.transport.get_playbook_status(&self.agent_execution_id);
        match tokio::time::timeout(self.timeout, call).await {
            Ok(Ok(status)) => Ok(status),
            Ok(Err(e)) => Err(summarize(&e, &self.redactor)),
            Err(_) => Err(ErrorSummary::new(
                FailureKind::Timeout,
                "status check timed out",
            )),
        }
    }

    /// Returns `true` once the run is terminal.
    async fn apply(&self, status: AgentRunStatus) -> bool {
        match status.status {
            AgentRunState::Running => false,
            AgentRunState::Completed => {
                self.finish(Ok(json!({ "output": status.output }))).await;
                true
            }
            AgentRunState::Failed => {
                let message = status.error.as_deref().unwrap_or("agent reported failure");
                self.finish(Err(self.redactor.summary(FailureKind::Agent, message)))
                    .await;
                true
            }
        }
    }

    async fn finish(&self, outcome: Result<serde_json::Value, ErrorSummary>) {
        let state = if outcome.is_ok() { "completed" } else { "failed" };
        let result = self
            .store
            .transition(self.execution_id, |record| match outcome {
                Ok(value) => record.complete(Some(value)),
                Err(summary) => record.fail(summary),
            })
            .await;

        match result {
            Ok(_) => tracing::info!(
                tenant_id = %self.tenant_id,
                execution_id = %self.execution_id,
                state,
                "Playbook run finished",
            ),
            Err(e) => tracing::error!(
                execution_id = %self.execution_id,
                error = %e,
                "Failed to record playbook outcome",
            ),
        }
    }
}

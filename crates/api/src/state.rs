use std::sync::Arc;

use netops_agent::{AgentConnector, AgentRegistry};
use netops_core::crypto::Cipher;
use netops_dispatch::Orchestrator;
use netops_events::{AuditJournal, EventBus};
use netops_vault::CredentialVault;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    /// Encrypted credential store.
    pub vault: Arc<CredentialVault>,
    /// Tenant -> agent ownership table.
    pub registry: Arc<AgentRegistry>,
    /// Composes vault and registry into agent dispatches.
    pub orchestrator: Arc<Orchestrator>,
    /// Recent audit events, fed from `event_bus`.
    pub journal: Arc<AuditJournal>,
    pub event_bus: Arc<EventBus>,
}

impl AppState {
    /// Wire up every component. The journal is not yet subscribed; call
    /// [`AppState::spawn_journal`] before serving.
    pub fn new(config: ServerConfig, cipher: Cipher, connector: Arc<dyn AgentConnector>) -> Self {
        let event_bus = Arc::new(EventBus::default());
        let vault = Arc::new(CredentialVault::new(Arc::new(cipher), Arc::clone(&event_bus)));
        let registry = Arc::new(AgentRegistry::new(connector, Arc::clone(&event_bus)));
        let orchestrator = Arc::new(Orchestrator::new(
            Arc::clone(&registry),
            Arc::clone(&vault),
            config.dispatch_config(),
        ));
        let journal = Arc::new(AuditJournal::new(config.audit_journal_capacity));

        Self {
            config: Arc::new(config),
            vault,
            registry,
            orchestrator,
            journal,
            event_bus,
        }
    }

    /// Start feeding the audit journal from the event bus. The task ends
    /// once every holder of the bus has been dropped.
    pub fn spawn_journal(&self) -> tokio::task::JoinHandle<()> {
        let journal = Arc::clone(&self.journal);
        let receiver = self.event_bus.subscribe();
        tokio::spawn(async move { journal.run(receiver).await })
    }
}

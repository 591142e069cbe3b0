//! Scrubbing of revealed secret values from agent-supplied text.
//!
//! An agent may echo back whatever it was sent: a rejected login, a failed
//! task's stderr, a proxy error page. Everything the agent says that ends up
//! in an [`ErrorSummary`] goes through a [`Redactor`] built from the
//! credentials revealed for that dispatch.

use std::fmt;

use netops_core::credential::RevealedCredential;
use netops_core::execution::{ErrorSummary, FailureKind};

const PLACEHOLDER: &str = "[redacted]";

/// The secret values of one dispatch. Empty for operations that reveal no
/// credentials.
#[derive(Clone, Default)]
pub(crate) struct Redactor {
    /// Longest first, so a secret that contains another is replaced whole.
    secrets: Vec<String>,
}

impl Redactor {
    pub fn new(credentials: &[RevealedCredential]) -> Self {
        let mut secrets: Vec<String> = credentials
            .iter()
            .flat_map(|c| c.secrets.values().map(|(_, v)| v.to_string()))
            .filter(|v| !v.is_empty())
            .collect();
        secrets.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        secrets.dedup();
        Self { secrets }
    }

    /// `text` with every secret value replaced.
    pub fn scrub(&self, text: &str) -> String {
        let mut out = text.to_string();
        for secret in &self.secrets {
            if out.contains(secret.as_str()) {
                out = out.replace(secret.as_str(), PLACEHOLDER);
            }
        }
        out
    }

    /// Build a summary from agent-supplied text. Scrubs before
    /// [`ErrorSummary::new`] truncates, so a cut never leaves half a secret.
    pub fn summary(&self, kind: FailureKind, message: &str) -> ErrorSummary {
        ErrorSummary::new(kind, self.scrub(message))
    }
}

impl fmt::Debug for Redactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Redactor")
            .field("secrets", &self.secrets.len())
            .finish()
    }
}

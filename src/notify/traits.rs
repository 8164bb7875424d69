// Notification dispatcher trait: the SMS-equivalent alert channel.
//
// Implementations: ConsoleDispatcher (prints the alert, no delivery) and
// WebhookDispatcher (POSTs the alert to an SMS gateway).

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// What happened to an alert once it was handed to the channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DispatchOutcome {
    Sent,
    /// The user (or gateway) backed out before sending
    Cancelled,
    Failed,
}

impl DispatchOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            DispatchOutcome::Sent => "sent",
            DispatchOutcome::Cancelled => "cancelled",
            DispatchOutcome::Failed => "failed",
        }
    }
}

impl std::fmt::Display for DispatchOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    /// Send `body` to every recipient address. An `Err` means the channel
    /// itself was unreachable; a delivered-but-rejected alert is
    /// `Ok(DispatchOutcome::Failed)`.
    async fn dispatch(&self, recipients: &[String], body: &str) -> Result<DispatchOutcome>;
}

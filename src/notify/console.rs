// ConsoleDispatcher: prints the alert instead of delivering it.
//
// Used when no SMS gateway is configured, so `guardia sos` still shows
// exactly what would have been sent.

use anyhow::Result;
use async_trait::async_trait;
use colored::Colorize;
use tracing::info;

use super::traits::{DispatchOutcome, NotificationDispatcher};

pub struct ConsoleDispatcher;

#[async_trait]
impl NotificationDispatcher for ConsoleDispatcher {
    async fn dispatch(&self, recipients: &[String], body: &str) -> Result<DispatchOutcome> {
        info!(
            recipients = recipients.len(),
            "No SMS gateway configured, printing alert"
        );
        println!("\n{}", "--- Alert (not delivered) ---".dimmed());
        println!("To: {}", recipients.join(", "));
        println!("{body}");
        println!("{}", "-----------------------------".dimmed());
        Ok(DispatchOutcome::Sent)
    }
}

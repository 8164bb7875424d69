// WebhookDispatcher: hands the alert to an HTTP SMS gateway.
//
// The gateway receives `{"recipients": [...], "message": "..."}` and may
// answer with `{"result": "sent" | "cancelled" | "failed"}`. A 2xx response
// with an empty body counts as sent; any other body must parse, or the alert
// counts as failed.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::traits::{DispatchOutcome, NotificationDispatcher};

pub struct WebhookDispatcher {
    client: Client,
    url: String,
}

impl WebhookDispatcher {
    pub fn new(url: String) -> Self {
        Self {
            client: Client::new(),
            url,
        }
    }
}

#[async_trait]
impl NotificationDispatcher for WebhookDispatcher {
    async fn dispatch(&self, recipients: &[String], body: &str) -> Result<DispatchOutcome> {
        let request = AlertRequest {
            recipients,
            message: body,
        };

        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .context("Failed to reach SMS gateway")?;

        let status = response.status();
        let text = response.text().await.unwrap_or_default();

        if !status.is_success() {
            warn!(%status, body = %text, "SMS gateway rejected alert");
            return Ok(DispatchOutcome::Failed);
        }

        let outcome = parse_gateway_response(&text);
        debug!(%status, outcome = %outcome, "SMS gateway accepted alert");
        Ok(outcome)
    }
}

/// Read the gateway's verdict from a 2xx response body.
fn parse_gateway_response(text: &str) -> DispatchOutcome {
    if text.trim().is_empty() {
        return DispatchOutcome::Sent;
    }
    match serde_json::from_str::<AlertResponse>(text) {
        Ok(response) => response.result,
        Err(e) => {
            warn!(error = %e, body = %text, "Unrecognized SMS gateway response");
            DispatchOutcome::Failed
        }
    }
}

// --- Gateway request/response types ---

#[derive(Serialize)]
struct AlertRequest<'a> {
    recipients: &'a [String],
    message: &'a str,
}

#[derive(Deserialize)]
struct AlertResponse {
    result: DispatchOutcome,
}

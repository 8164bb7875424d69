// SOS pipeline: contacts -> location -> score -> log -> alert.
//
// Stages run in order because each needs the previous one's output, but
// their failures are handled independently:
//   - no contacts, or no location fix: abort, nothing is sent
//   - history unavailable: score without it (see assess::fetch_history)
//   - incident log write fails: warn and keep going
//   - no emergency contacts among the list: abort after logging
//   - gateway unreachable: surface the error

use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{info, warn};

use super::assess;
use crate::contacts::emergency_contacts;
use crate::db::models::{IncidentRecord, LocationSample, ScoreResult};
use crate::db::Database;
use crate::location::maps_link;
use crate::location::traits::LocationProvider;
use crate::notify::build_emergency_message;
use crate::notify::traits::{DispatchOutcome, NotificationDispatcher};
use crate::scoring::risk::RiskScorer;

/// Everything that happened during one SOS run.
#[derive(Debug, Clone)]
pub struct SosReport {
    pub sample: LocationSample,
    pub result: ScoreResult,
    /// False if the incident couldn't be written to history
    pub incident_logged: bool,
    pub maps_link: String,
    pub recipients: usize,
    pub outcome: DispatchOutcome,
}

impl SosReport {
    /// Error unless the alert channel confirmed delivery.
    pub fn ensure_delivered(&self) -> Result<()> {
        if self.outcome != DispatchOutcome::Sent {
            anyhow::bail!("SMS sending was cancelled or failed ({}).", self.outcome);
        }
        Ok(())
    }
}

/// Run the full SOS flow for `user_id`.
pub async fn run(
    db: &dyn Database,
    location: &dyn LocationProvider,
    dispatcher: &dyn NotificationDispatcher,
    scorer: &RiskScorer,
    user_id: &str,
    location_timeout: Duration,
) -> Result<SosReport> {
    // Stage 1: contacts
    let contacts = db
        .list_contacts(user_id)
        .await
        .context("Failed to load contacts")?;
    if contacts.is_empty() {
        anyhow::bail!(
            "No emergency contacts. Add at least one with `guardia contacts add` before using SOS."
        );
    }

    // Stage 2 and 3: location fix, history, score
    let assess::Assessment { sample, result } =
        assess::run(location, db, scorer, user_id, location_timeout).await?;

    // Stage 4: incident log (must not block the alert)
    let record = IncidentRecord::from_assessment(&sample, &result);
    let incident_logged = match db.append_incident(user_id, &record).await {
        Ok(()) => {
            info!("SOS event logged");
            true
        }
        Err(e) => {
            warn!(error = %e, "Failed to log SOS event");
            false
        }
    };

    // Stage 5: alert
    let link = maps_link(sample.latitude, sample.longitude);
    let recipients: Vec<String> = emergency_contacts(&contacts)
        .into_iter()
        .map(|c| c.phone.clone())
        .collect();
    if recipients.is_empty() {
        anyhow::bail!("Add at least one emergency contact before using SOS.");
    }

    let message = build_emergency_message(&link, Some(&result));
    let outcome = dispatcher
        .dispatch(&recipients, &message)
        .await
        .context("Failed to send SOS alert")?;

    info!(recipients = recipients.len(), outcome = %outcome, "SOS alert dispatched");

    Ok(SosReport {
        sample,
        result,
        incident_logged,
        maps_link: link,
        recipients: recipients.len(),
        outcome,
    })
}

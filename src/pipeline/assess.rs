// Assessment pipeline: location -> history -> danger score.
//
// This is the read-only half of SOS, also used on its own to show the
// current danger level. History is best-effort: if the store can't be read
// the score is computed without the proximity factor.

use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::db::models::{IncidentRecord, LocationSample, ScoreResult};
use crate::db::Database;
use crate::location::traits::{sample_with_timeout, LocationProvider};
use crate::scoring::risk::{RiskScorer, HISTORY_LIMIT};

/// A scored location sample.
#[derive(Debug, Clone)]
pub struct Assessment {
    pub sample: LocationSample,
    pub result: ScoreResult,
}

/// Fetch the user's recent incidents, or an empty list if the store fails.
pub async fn fetch_history(db: &dyn Database, user_id: &str) -> Vec<IncidentRecord> {
    match db.fetch_recent_incidents(user_id, HISTORY_LIMIT).await {
        Ok(history) => history,
        Err(e) => {
            warn!(error = %e, "Incident history unavailable, scoring without it");
            Vec::new()
        }
    }
}

/// Take a location fix and score it against the user's history.
///
/// Fails only if no location could be obtained; the scorer is not invoked
/// in that case.
pub async fn run(
    location: &dyn LocationProvider,
    db: &dyn Database,
    scorer: &RiskScorer,
    user_id: &str,
    location_timeout: Duration,
) -> Result<Assessment> {
    let sample = sample_with_timeout(location, location_timeout)
        .await
        .context("Unable to get your location")?;

    let history = fetch_history(db, user_id).await;
    let result = scorer.score(&sample, &history);

    info!(
        score = result.score,
        level = %result.level,
        history = history.len(),
        "Danger score computed"
    );

    Ok(Assessment { sample, result })
}

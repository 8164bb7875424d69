use std::env;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::FixedOffset;

use crate::clock::LocalZone;
use crate::location::traits::DEFAULT_LOCATION_TIMEOUT;

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy.
pub struct Config {
    pub db_path: String,
    /// Owner of the incident history and contact list
    pub user_id: String,
    /// Time zone used for the time-of-day risk factor and for display
    pub zone: LocalZone,
    /// SMS gateway endpoint. When unset, alerts are printed, not sent.
    pub sms_webhook_url: Option<String>,
    pub location_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Everything has a default; only malformed values are errors.
    pub fn load() -> Result<Self> {
        let zone = match env::var("GUARDIA_UTC_OFFSET_MINUTES") {
            Ok(raw) => LocalZone::Fixed(parse_utc_offset(&raw)?),
            Err(_) => LocalZone::System,
        };

        let location_timeout = match env::var("GUARDIA_LOCATION_TIMEOUT_SECS") {
            Ok(raw) => Duration::from_secs(
                raw.trim()
                    .parse()
                    .with_context(|| format!("GUARDIA_LOCATION_TIMEOUT_SECS is not a number: {raw}"))?,
            ),
            Err(_) => DEFAULT_LOCATION_TIMEOUT,
        };

        Ok(Self {
            db_path: env::var("GUARDIA_DB_PATH").unwrap_or_else(|_| "./guardia.db".to_string()),
            user_id: env::var("GUARDIA_USER_ID")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| "local".to_string()),
            zone,
            sms_webhook_url: env::var("GUARDIA_SMS_WEBHOOK_URL")
                .ok()
                .filter(|s| !s.trim().is_empty()),
            location_timeout,
        })
    }

    /// Check that the SMS gateway is configured.
    /// Call this before any operation that must actually deliver an alert.
    pub fn require_webhook(&self) -> Result<&str> {
        match self.sms_webhook_url.as_deref() {
            Some(url) => Ok(url),
            None => anyhow::bail!(
                "GUARDIA_SMS_WEBHOOK_URL not set. Add it to your .env file,\n\
                 or drop --deliver to print the alert instead."
            ),
        }
    }
}

/// Parse a signed minute offset from UTC (e.g. "330" for IST, "-300" for EST).
fn parse_utc_offset(raw: &str) -> Result<FixedOffset> {
    let minutes: i32 = raw
        .trim()
        .parse()
        .with_context(|| format!("GUARDIA_UTC_OFFSET_MINUTES is not a number: {raw}"))?;
    minutes
        .checked_mul(60)
        .and_then(FixedOffset::east_opt)
        .with_context(|| format!("GUARDIA_UTC_OFFSET_MINUTES out of range: {minutes}"))
}

// Location provider trait: where location samples come from.
//
// On a phone this wraps the platform GPS API. On the command line the sample
// is supplied by the user (FixedLocationProvider). Either way the rest of the
// pipeline only sees a LocationSample or an error.

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;

use crate::db::models::LocationSample;

/// Default wait for a position fix before giving up.
pub const DEFAULT_LOCATION_TIMEOUT: Duration = Duration::from_secs(15);

#[async_trait]
pub trait LocationProvider: Send + Sync {
    /// Take a fresh reading. Fails when permission is denied or no fix is
    /// available.
    async fn current_sample(&self) -> Result<LocationSample>;
}

/// Ask the provider for a sample, failing if it takes longer than `timeout`.
pub async fn sample_with_timeout(
    provider: &dyn LocationProvider,
    timeout: Duration,
) -> Result<LocationSample> {
    match tokio::time::timeout(timeout, provider.current_sample()).await {
        Ok(result) => result,
        Err(_) => anyhow::bail!(
            "Location timeout after {}s, unable to get a GPS fix.",
            timeout.as_secs()
        ),
    }
}

// FixedLocationProvider: a location supplied up front (CLI flags, tests).

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;

use super::traits::LocationProvider;
use crate::db::models::LocationSample;

/// Returns the same position every time. When no timestamp was given, the
/// sample is stamped with the time of the call, like a live GPS fix.
pub struct FixedLocationProvider {
    latitude: f64,
    longitude: f64,
    accuracy: Option<f64>,
    speed: Option<f64>,
    timestamp: Option<i64>,
}

impl FixedLocationProvider {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            accuracy: None,
            speed: None,
            timestamp: None,
        }
    }

    pub fn with_speed(mut self, speed: Option<f64>) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_accuracy(mut self, accuracy: Option<f64>) -> Self {
        self.accuracy = accuracy;
        self
    }

    /// Pin the sample to a specific time (epoch milliseconds).
    pub fn at(mut self, timestamp: Option<i64>) -> Self {
        self.timestamp = timestamp;
        self
    }
}

#[async_trait]
impl LocationProvider for FixedLocationProvider {
    async fn current_sample(&self) -> Result<LocationSample> {
        let sample = LocationSample {
            latitude: self.latitude,
            longitude: self.longitude,
            accuracy: self.accuracy,
            timestamp: self
                .timestamp
                .unwrap_or_else(|| Utc::now().timestamp_millis()),
            speed: self.speed,
        };
        sample.validate()?;
        Ok(sample)
    }
}

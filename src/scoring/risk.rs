// Danger score formula.
//
// The score is additive: each factor that fires contributes a fixed number
// of points and a human-readable reason. Factors are independent, so the sum
// doesn't depend on evaluation order, but the reasons list does.
//
// Factors, in evaluation order:
//   1. time of day (late night, or early morning)
//   2. speed above 25 km/h
//   3. not inside a known safe zone
//   4. a previous SOS incident within 500 m

use chrono::{FixedOffset, Timelike};
use tracing::debug;

use super::geo::haversine_km;
use crate::clock::LocalZone;
use crate::db::models::{DangerLevel, IncidentRecord, LocationSample, ScoreResult};

pub const REASON_LATE_NIGHT: &str = "Late night (11 PM–4 AM)";
pub const REASON_EARLY_MORNING: &str = "Early morning (4 AM–6 AM)";
pub const REASON_OUTSIDE_SAFE_ZONE: &str = "Outside known safe zone";
pub const REASON_INCIDENT_NEARBY: &str = "Previous SOS incident nearby";

/// Speed above which the high-speed factor fires, in km/h.
pub const HIGH_SPEED_KMH: f64 = 25.0;

/// Past incidents at or within this distance count as nearby.
pub const INCIDENT_RADIUS_KM: f64 = 0.5;

/// How many past incidents callers should fetch for the proximity check.
pub const HISTORY_LIMIT: u32 = 10;

const MAX_SCORE: u32 = 100;

/// Points contributed by each risk factor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RiskWeights {
    /// Hour in [23, 4) local time (default 25)
    pub late_night: u32,
    /// Hour in [4, 6) local time (default 15)
    pub early_morning: u32,
    /// Moving faster than 25 km/h (default 20)
    pub high_speed: u32,
    /// Not inside any known safe zone (default 15)
    pub safe_zone_absent: u32,
    /// An earlier SOS within 500 m (default 20)
    pub incident_nearby: u32,
}

impl Default for RiskWeights {
    fn default() -> Self {
        Self {
            late_night: 25,
            early_morning: 15,
            high_speed: 20,
            safe_zone_absent: 15,
            incident_nearby: 20,
        }
    }
}

/// A circular area the user considers safe (home, work).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SafeZone {
    pub latitude: f64,
    pub longitude: f64,
    pub radius_km: f64,
}

impl SafeZone {
    pub fn contains(&self, sample: &LocationSample) -> bool {
        haversine_km(
            self.latitude,
            self.longitude,
            sample.latitude,
            sample.longitude,
        ) <= self.radius_km
    }
}

/// Computes danger scores. Holds only immutable configuration, so one
/// scorer can be shared across any number of concurrent callers.
///
/// Safe zones: there is no zone registry yet, and the scorer starts with an
/// empty zone list. With no zones every sample is "outside known safe zone",
/// so the safe-zone weight is added to every score. `with_safe_zones` is the
/// hook for per-user zones once they exist.
#[derive(Debug, Clone)]
pub struct RiskScorer {
    weights: RiskWeights,
    zone: LocalZone,
    safe_zones: Vec<SafeZone>,
}

impl Default for RiskScorer {
    fn default() -> Self {
        Self::new(RiskWeights::default())
    }
}

impl RiskScorer {
    /// Create a scorer that reads the hour of day in the system time zone,
    /// with the offset in effect at each sample's timestamp.
    pub fn new(weights: RiskWeights) -> Self {
        Self {
            weights,
            zone: LocalZone::System,
            safe_zones: Vec::new(),
        }
    }

    pub fn with_zone(mut self, zone: LocalZone) -> Self {
        self.zone = zone;
        self
    }

    /// Read the hour of day at a fixed UTC offset instead of system local time.
    pub fn with_utc_offset(self, offset: FixedOffset) -> Self {
        self.with_zone(LocalZone::Fixed(offset))
    }

    pub fn with_safe_zones(mut self, zones: Vec<SafeZone>) -> Self {
        self.safe_zones = zones;
        self
    }

    /// Score a location sample against the user's recent incident history.
    ///
    /// `history` is whatever the caller managed to fetch (newest first, at
    /// most `HISTORY_LIMIT`); pass an empty slice when the fetch failed.
    /// Scoring itself never fails.
    pub fn score(&self, sample: &LocationSample, history: &[IncidentRecord]) -> ScoreResult {
        let mut score = 0u32;
        let mut reasons = Vec::new();

        match self.local_hour(sample.timestamp) {
            Some(hour) if hour >= 23 || hour < 4 => {
                score = score.saturating_add(self.weights.late_night);
                reasons.push(REASON_LATE_NIGHT.to_string());
            }
            Some(hour) if (4..6).contains(&hour) => {
                score = score.saturating_add(self.weights.early_morning);
                reasons.push(REASON_EARLY_MORNING.to_string());
            }
            _ => {}
        }

        let speed_kmh = sample.speed.unwrap_or(0.0) * 3.6;
        if speed_kmh > HIGH_SPEED_KMH {
            score = score.saturating_add(self.weights.high_speed);
            reasons.push(format!("High speed ({speed_kmh:.1} km/h)"));
        }

        if !self.safe_zones.iter().any(|zone| zone.contains(sample)) {
            score = score.saturating_add(self.weights.safe_zone_absent);
            reasons.push(REASON_OUTSIDE_SAFE_ZONE.to_string());
        }

        // One contribution no matter how many incidents qualify
        if has_incident_nearby(sample, history) {
            score = score.saturating_add(self.weights.incident_nearby);
            reasons.push(REASON_INCIDENT_NEARBY.to_string());
        }

        let score = score.min(MAX_SCORE);
        let level = DangerLevel::from_score(score);
        debug!(score, level = %level, factors = reasons.len(), "Computed danger score");

        ScoreResult {
            score,
            level,
            reasons,
        }
    }

    fn local_hour(&self, timestamp_ms: i64) -> Option<u32> {
        self.zone.local_time(timestamp_ms).map(|t| t.hour())
    }
}

/// True if any past incident lies within `INCIDENT_RADIUS_KM` of the sample.
pub fn has_incident_nearby(sample: &LocationSample, history: &[IncidentRecord]) -> bool {
    history.iter().any(|incident| {
        within_incident_radius(haversine_km(
            sample.latitude,
            sample.longitude,
            incident.latitude,
            incident.longitude,
        ))
    })
}

/// The radius is inclusive: an incident exactly 500 m away counts.
pub fn within_incident_radius(distance_km: f64) -> bool {
    distance_km <= INCIDENT_RADIUS_KM
}

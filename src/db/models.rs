// Data models: the values that flow between the location provider, the
// scorer, and the incident store.
//
// These are kept separate from the database queries so the scoring code can
// use them without depending on rusqlite directly.

use serde::{Deserialize, Serialize};

/// A single location/motion reading taken at SOS or check-in time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationSample {
    /// Degrees, -90..90
    pub latitude: f64,
    /// Degrees, -180..180
    pub longitude: f64,
    /// Horizontal accuracy in meters, when the provider reports one
    pub accuracy: Option<f64>,
    /// Epoch milliseconds
    pub timestamp: i64,
    /// Meters per second. Providers report no speed as `None`.
    pub speed: Option<f64>,
}

impl LocationSample {
    /// Reject coordinates outside the valid lat/lng ranges.
    ///
    /// The scorer trusts its input; this is the upstream check callers run
    /// on samples that didn't come from a real location provider.
    pub fn validate(&self) -> anyhow::Result<()> {
        if !(-90.0..=90.0).contains(&self.latitude) {
            anyhow::bail!("Latitude {} is out of range (-90..90)", self.latitude);
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            anyhow::bail!("Longitude {} is out of range (-180..180)", self.longitude);
        }
        Ok(())
    }
}

/// Danger level bands for a risk score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DangerLevel {
    Safe,
    Caution,
    High,
}

impl DangerLevel {
    /// Determine the level from a risk score (0-100).
    ///
    /// Upper bounds are inclusive: 30 is still Safe, 60 is still Caution.
    pub fn from_score(score: u32) -> Self {
        match score {
            s if s <= 30 => DangerLevel::Safe,
            s if s <= 60 => DangerLevel::Caution,
            _ => DangerLevel::High,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DangerLevel::Safe => "SAFE",
            DangerLevel::Caution => "CAUTION",
            DangerLevel::High => "HIGH",
        }
    }

    /// Parse the stored representation back into a level.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "SAFE" => Some(DangerLevel::Safe),
            "CAUTION" => Some(DangerLevel::Caution),
            "HIGH" => Some(DangerLevel::High),
            _ => None,
        }
    }
}

impl std::fmt::Display for DangerLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The output of one scoring call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreResult {
    /// 0 to 100
    pub score: u32,
    pub level: DangerLevel,
    /// Contributing factors, in the order they were evaluated
    pub reasons: Vec<String>,
}

/// A logged SOS event: where it happened and how risky it looked at the time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncidentRecord {
    pub timestamp: i64,
    pub latitude: f64,
    pub longitude: f64,
    /// m/s, 0.0 when the provider reported no speed
    pub speed: f64,
    pub accuracy: Option<f64>,
    pub score: u32,
    pub level: DangerLevel,
    pub reasons: Vec<String>,
}

impl IncidentRecord {
    /// Build the record persisted for an SOS event from its sample and score.
    pub fn from_assessment(sample: &LocationSample, result: &ScoreResult) -> Self {
        Self {
            timestamp: sample.timestamp,
            latitude: sample.latitude,
            longitude: sample.longitude,
            speed: sample.speed.unwrap_or(0.0),
            accuracy: sample.accuracy,
            score: result.score,
            level: result.level,
            reasons: result.reasons.clone(),
        }
    }

    /// Recover the score portion of the record.
    pub fn score_result(&self) -> ScoreResult {
        ScoreResult {
            score: self.score,
            level: self.level,
            reasons: self.reasons.clone(),
        }
    }
}

/// Someone to alert when SOS fires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: String,
    pub name: String,
    pub phone: String,
    /// Only emergency contacts receive SOS alerts
    pub is_emergency: bool,
}

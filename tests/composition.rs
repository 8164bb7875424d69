// Composition tests: the scorer, the store, and the SOS pipeline together.
//
// Storage is an in-memory SQLite database behind the Database trait. The
// location provider, alert channel, and failure modes of the store are
// small hand-written fakes.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{FixedOffset, TimeZone, Utc};
use rusqlite::Connection;

use guardia::db::models::{Contact, DangerLevel, IncidentRecord, LocationSample};
use guardia::db::schema::create_tables;
use guardia::db::sqlite::SqliteDatabase;
use guardia::db::Database;
use guardia::location::fixed::FixedLocationProvider;
use guardia::location::traits::LocationProvider;
use guardia::notify::traits::{DispatchOutcome, NotificationDispatcher};
use guardia::pipeline::{assess, sos};
use guardia::scoring::risk::{RiskScorer, REASON_INCIDENT_NEARBY};

const USER: &str = "user-1";
const TIMEOUT: Duration = Duration::from_secs(5);

// ============================================================
// Fakes
// ============================================================

/// SQLite-backed store whose history reads and incident writes can be made
/// to fail.
struct FlakyDb {
    inner: SqliteDatabase,
    fail_history: AtomicBool,
    fail_append: AtomicBool,
}

impl FlakyDb {
    fn new() -> Self {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();
        Self {
            inner: SqliteDatabase::new(conn),
            fail_history: AtomicBool::new(false),
            fail_append: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl Database for FlakyDb {
    async fn table_count(&self) -> Result<i64> {
        self.inner.table_count().await
    }

    async fn fetch_recent_incidents(&self, user_id: &str, limit: u32) -> Result<Vec<IncidentRecord>> {
        if self.fail_history.load(Ordering::SeqCst) {
            anyhow::bail!("history store offline");
        }
        self.inner.fetch_recent_incidents(user_id, limit).await
    }

    async fn append_incident(&self, user_id: &str, record: &IncidentRecord) -> Result<()> {
        if self.fail_append.load(Ordering::SeqCst) {
            anyhow::bail!("incident sink offline");
        }
        self.inner.append_incident(user_id, record).await
    }

    async fn count_incidents(&self, user_id: &str) -> Result<i64> {
        self.inner.count_incidents(user_id).await
    }

    async fn list_contacts(&self, user_id: &str) -> Result<Vec<Contact>> {
        self.inner.list_contacts(user_id).await
    }

    async fn upsert_contact(&self, user_id: &str, contact: &Contact) -> Result<()> {
        self.inner.upsert_contact(user_id, contact).await
    }

    async fn delete_contact(&self, user_id: &str, id: &str) -> Result<bool> {
        self.inner.delete_contact(user_id, id).await
    }
}

/// Records every alert it is asked to send.
struct RecordingDispatcher {
    outcome: DispatchOutcome,
    sent: Mutex<Vec<(Vec<String>, String)>>,
}

impl RecordingDispatcher {
    fn new(outcome: DispatchOutcome) -> Self {
        Self {
            outcome,
            sent: Mutex::new(Vec::new()),
        }
    }

    fn sent(&self) -> Vec<(Vec<String>, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationDispatcher for RecordingDispatcher {
    async fn dispatch(&self, recipients: &[String], body: &str) -> Result<DispatchOutcome> {
        self.sent
            .lock()
            .unwrap()
            .push((recipients.to_vec(), body.to_string()));
        Ok(self.outcome)
    }
}

/// Always denies permission, and counts how often it was asked.
#[derive(Default)]
struct DeniedLocation {
    calls: AtomicUsize,
}

#[async_trait]
impl LocationProvider for DeniedLocation {
    async fn current_sample(&self) -> Result<LocationSample> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        anyhow::bail!("Location permission denied")
    }
}

fn scorer() -> RiskScorer {
    RiskScorer::default().with_utc_offset(FixedOffset::east_opt(0).unwrap())
}

fn at_2am() -> i64 {
    Utc.with_ymd_and_hms(2024, 6, 1, 2, 0, 0)
        .unwrap()
        .timestamp_millis()
}

fn at_noon() -> i64 {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0)
        .unwrap()
        .timestamp_millis()
}

fn location(timestamp: i64) -> FixedLocationProvider {
    FixedLocationProvider::new(12.9716, 77.5946)
        .with_speed(Some(0.0))
        .with_accuracy(Some(10.0))
        .at(Some(timestamp))
}

fn contact(id: &str, phone: &str, is_emergency: bool) -> Contact {
    Contact {
        id: id.to_string(),
        name: format!("Contact {id}"),
        phone: phone.to_string(),
        is_emergency,
    }
}

async fn db_with_contacts() -> FlakyDb {
    let db = FlakyDb::new();
    db.upsert_contact(USER, &contact("a", "+15550000001", true))
        .await
        .unwrap();
    db.upsert_contact(USER, &contact("b", "+15550000002", false))
        .await
        .unwrap();
    db
}

// ============================================================
// Score -> IncidentRecord -> store -> read back
// ============================================================

#[tokio::test]
async fn score_survives_storage_roundtrip() {
    let db = FlakyDb::new();
    let sample = LocationSample {
        latitude: -33.8688,
        longitude: 151.2093,
        accuracy: Some(4.0),
        timestamp: at_2am(),
        speed: Some(10.0),
    };
    let result = scorer().score(&sample, &[]);
    assert_eq!(result.score, 60);

    let record = IncidentRecord::from_assessment(&sample, &result);
    db.append_incident(USER, &record).await.unwrap();

    let history = db.fetch_recent_incidents(USER, 10).await.unwrap();
    assert_eq!(history.len(), 1);
    let restored = history[0].score_result();
    assert_eq!(restored.score, result.score);
    assert_eq!(restored.level, result.level);
    assert_eq!(restored.reasons, result.reasons);
}

#[tokio::test]
async fn stored_incident_feeds_next_score() {
    let db = FlakyDb::new();
    let first = assess::run(&location(at_noon()), &db, &scorer(), USER, TIMEOUT)
        .await
        .unwrap();
    assert_eq!(first.result.score, 15);
    db.append_incident(
        USER,
        &IncidentRecord::from_assessment(&first.sample, &first.result),
    )
    .await
    .unwrap();

    let second = assess::run(&location(at_noon()), &db, &scorer(), USER, TIMEOUT)
        .await
        .unwrap();
    assert_eq!(second.result.score, 35);
    assert_eq!(second.result.reasons.last().unwrap(), REASON_INCIDENT_NEARBY);
}

#[tokio::test]
async fn history_failure_degrades_to_empty_history() {
    let db = FlakyDb::new();
    // An incident right here, which would normally add 20 points
    let here = location(at_noon()).current_sample().await.unwrap();
    let record = IncidentRecord::from_assessment(&here, &scorer().score(&here, &[]));
    db.append_incident(USER, &record).await.unwrap();

    db.fail_history.store(true, Ordering::SeqCst);
    let degraded = assess::run(&location(at_noon()), &db, &scorer(), USER, TIMEOUT)
        .await
        .unwrap();
    assert_eq!(degraded.result, scorer().score(&here, &[]));
    assert_eq!(degraded.result.score, 15);
}

#[tokio::test]
async fn location_failure_skips_scoring() {
    let db = FlakyDb::new();
    let denied = DeniedLocation::default();
    let err = assess::run(&denied, &db, &scorer(), USER, TIMEOUT)
        .await
        .unwrap_err();
    assert!(format!("{err:#}").contains("permission denied"), "{err:#}");
}

// ============================================================
// SOS pipeline
// ============================================================

#[tokio::test]
async fn sos_logs_and_alerts_emergency_contacts_only() {
    let db = db_with_contacts().await;
    let dispatcher = RecordingDispatcher::new(DispatchOutcome::Sent);

    let report = sos::run(&db, &location(at_2am()), &dispatcher, &scorer(), USER, TIMEOUT)
        .await
        .unwrap();

    assert_eq!(report.result.score, 40);
    assert_eq!(report.result.level, DangerLevel::Caution);
    assert!(report.incident_logged);
    assert_eq!(report.recipients, 1);
    assert_eq!(report.outcome, DispatchOutcome::Sent);
    assert_eq!(report.maps_link, "https://maps.google.com/?q=12.9716,77.5946");
    report.ensure_delivered().unwrap();

    let sent = dispatcher.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, vec!["+15550000001".to_string()]);
    assert!(sent[0].1.starts_with("🚨 EMERGENCY ALERT!"));
    assert!(sent[0].1.contains(&report.maps_link));
    assert!(sent[0].1.contains("Risk: CAUTION (40/100)"));

    let history = db.fetch_recent_incidents(USER, 10).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].score_result(), report.result);
}

#[tokio::test]
async fn sos_continues_when_incident_log_fails() {
    let db = db_with_contacts().await;
    db.fail_append.store(true, Ordering::SeqCst);
    let dispatcher = RecordingDispatcher::new(DispatchOutcome::Sent);

    let report = sos::run(&db, &location(at_noon()), &dispatcher, &scorer(), USER, TIMEOUT)
        .await
        .unwrap();

    assert!(!report.incident_logged);
    assert_eq!(dispatcher.sent().len(), 1);
    assert_eq!(db.count_incidents(USER).await.unwrap(), 0);
}

#[tokio::test]
async fn sos_continues_when_history_unavailable() {
    let db = db_with_contacts().await;
    db.fail_history.store(true, Ordering::SeqCst);
    let dispatcher = RecordingDispatcher::new(DispatchOutcome::Sent);

    let report = sos::run(&db, &location(at_noon()), &dispatcher, &scorer(), USER, TIMEOUT)
        .await
        .unwrap();

    assert_eq!(report.result.score, 15);
    assert!(report.incident_logged);
    assert_eq!(dispatcher.sent().len(), 1);
}

#[tokio::test]
async fn sos_without_contacts_never_asks_for_location() {
    let db = FlakyDb::new();
    let denied = DeniedLocation::default();
    let dispatcher = RecordingDispatcher::new(DispatchOutcome::Sent);

    let err = sos::run(&db, &denied, &dispatcher, &scorer(), USER, TIMEOUT)
        .await
        .unwrap_err();

    assert!(err.to_string().contains("No emergency contacts"), "{err}");
    assert_eq!(denied.calls.load(Ordering::SeqCst), 0);
    assert!(dispatcher.sent().is_empty());
}

#[tokio::test]
async fn sos_location_failure_sends_nothing() {
    let db = db_with_contacts().await;
    let denied = DeniedLocation::default();
    let dispatcher = RecordingDispatcher::new(DispatchOutcome::Sent);

    assert!(sos::run(&db, &denied, &dispatcher, &scorer(), USER, TIMEOUT)
        .await
        .is_err());
    assert!(dispatcher.sent().is_empty());
    assert_eq!(db.count_incidents(USER).await.unwrap(), 0);
}

#[tokio::test]
async fn sos_without_emergency_contacts_still_logs() {
    let db = FlakyDb::new();
    db.upsert_contact(USER, &contact("b", "+15550000002", false))
        .await
        .unwrap();
    let dispatcher = RecordingDispatcher::new(DispatchOutcome::Sent);

    let err = sos::run(&db, &location(at_noon()), &dispatcher, &scorer(), USER, TIMEOUT)
        .await
        .unwrap_err();

    assert!(err.to_string().contains("emergency contact"), "{err}");
    assert!(dispatcher.sent().is_empty());
    assert_eq!(db.count_incidents(USER).await.unwrap(), 1);
}

#[tokio::test]
async fn sos_reports_cancelled_dispatch() {
    let db = db_with_contacts().await;
    let dispatcher = RecordingDispatcher::new(DispatchOutcome::Cancelled);

    let report = sos::run(&db, &location(at_noon()), &dispatcher, &scorer(), USER, TIMEOUT)
        .await
        .unwrap();
    assert_eq!(report.outcome, DispatchOutcome::Cancelled);
    let err = report.ensure_delivered().unwrap_err();
    assert!(err.to_string().contains("cancelled or failed"), "{err}");
}

#[tokio::test]
async fn sos_failed_dispatch_is_not_delivered() {
    let db = db_with_contacts().await;
    let dispatcher = RecordingDispatcher::new(DispatchOutcome::Failed);

    let report = sos::run(&db, &location(at_noon()), &dispatcher, &scorer(), USER, TIMEOUT)
        .await
        .unwrap();
    assert!(report.incident_logged);
    assert!(report.ensure_delivered().is_err());
}

#[tokio::test]
async fn repeated_sos_raises_score_through_history() {
    let db = db_with_contacts().await;
    let dispatcher = RecordingDispatcher::new(DispatchOutcome::Sent);

    let first = sos::run(&db, &location(at_2am()), &dispatcher, &scorer(), USER, TIMEOUT)
        .await
        .unwrap();
    let second = sos::run(&db, &location(at_2am()), &dispatcher, &scorer(), USER, TIMEOUT)
        .await
        .unwrap();

    assert_eq!(first.result.score, 40);
    assert_eq!(second.result.score, 60);
    assert_eq!(second.result.level, DangerLevel::Caution);
    assert_eq!(db.count_incidents(USER).await.unwrap(), 2);
}

// Database queries: CRUD operations for SOS logs and contacts.
//
// Every database interaction goes through this module. This keeps SQL
// contained in one place and gives the rest of the app clean Rust interfaces.

use anyhow::Result;
use rusqlite::types::Type;
use rusqlite::{params, Connection};

use super::models::{Contact, DangerLevel, IncidentRecord};

// --- SOS logs ---

/// Append an SOS event to the user's history and return its row id.
pub fn append_incident(conn: &Connection, user_id: &str, record: &IncidentRecord) -> Result<i64> {
    let reasons_json = serde_json::to_string(&record.reasons)?;
    conn.execute(
        "INSERT INTO sos_logs
            (user_id, timestamp, lat, lng, speed, accuracy,
             danger_score, danger_level, danger_reasons)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            user_id,
            record.timestamp,
            record.latitude,
            record.longitude,
            record.speed,
            record.accuracy,
            record.score,
            record.level.as_str(),
            reasons_json,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Get the user's most recent SOS events, newest first.
pub fn fetch_recent_incidents(
    conn: &Connection,
    user_id: &str,
    limit: u32,
) -> Result<Vec<IncidentRecord>> {
    let mut stmt = conn.prepare(
        "SELECT timestamp, lat, lng, speed, accuracy, danger_score, danger_level, danger_reasons
         FROM sos_logs
         WHERE user_id = ?1
         ORDER BY timestamp DESC, id DESC
         LIMIT ?2",
    )?;

    let rows = stmt.query_map(params![user_id, limit], |row| {
        let score: u32 = row.get(5)?;
        let level_str: String = row.get(6)?;
        let reasons_json: String = row.get(7)?;
        let level = DangerLevel::parse(&level_str).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                6,
                Type::Text,
                format!("unknown danger level: {level_str}").into(),
            )
        })?;
        let reasons = serde_json::from_str(&reasons_json)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(7, Type::Text, Box::new(e)))?;
        Ok(IncidentRecord {
            timestamp: row.get(0)?,
            latitude: row.get(1)?,
            longitude: row.get(2)?,
            speed: row.get(3)?,
            accuracy: row.get(4)?,
            score,
            level,
            reasons,
        })
    })?;

    let mut incidents = Vec::new();
    for row in rows {
        incidents.push(row?);
    }
    Ok(incidents)
}

/// Count all SOS events logged for a user.
pub fn count_incidents(conn: &Connection, user_id: &str) -> Result<i64> {
    let count = conn.query_row(
        "SELECT COUNT(*) FROM sos_logs WHERE user_id = ?1",
        params![user_id],
        |row| row.get(0),
    )?;
    Ok(count)
}

// --- Contacts ---

/// Save or update a contact (keyed by user and contact id).
pub fn upsert_contact(conn: &Connection, user_id: &str, contact: &Contact) -> Result<()> {
    conn.execute(
        "INSERT INTO contacts (user_id, id, name, phone, is_emergency)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(user_id, id) DO UPDATE SET
            name = ?3,
            phone = ?4,
            is_emergency = ?5",
        params![
            user_id,
            contact.id,
            contact.name,
            contact.phone,
            contact.is_emergency as i32,
        ],
    )?;
    Ok(())
}

/// List a user's contacts in name order.
pub fn list_contacts(conn: &Connection, user_id: &str) -> Result<Vec<Contact>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, phone, is_emergency
         FROM contacts
         WHERE user_id = ?1
         ORDER BY name COLLATE NOCASE, id",
    )?;

    let rows = stmt.query_map(params![user_id], |row| {
        Ok(Contact {
            id: row.get(0)?,
            name: row.get(1)?,
            phone: row.get(2)?,
            is_emergency: row.get::<_, i32>(3)? != 0,
        })
    })?;

    let mut contacts = Vec::new();
    for row in rows {
        contacts.push(row?);
    }
    Ok(contacts)
}

/// Delete a contact. Returns false if it didn't exist.
pub fn delete_contact(conn: &Connection, user_id: &str, id: &str) -> Result<bool> {
    let deleted = conn.execute(
        "DELETE FROM contacts WHERE user_id = ?1 AND id = ?2",
        params![user_id, id],
    )?;
    Ok(deleted > 0)
}

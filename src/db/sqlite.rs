// SqliteDatabase: rusqlite backend implementing the Database trait.
//
// The Connection is wrapped in tokio::sync::Mutex because Connection is !Sync.
// Trait methods lock the mutex, do synchronous rusqlite work, and return.

use anyhow::Result;
use async_trait::async_trait;
use rusqlite::Connection;
use tokio::sync::Mutex;

use super::models::{Contact, IncidentRecord};
use super::traits::Database;

pub struct SqliteDatabase {
    conn: Mutex<Connection>,
}

impl SqliteDatabase {
    /// Wrap an already-opened rusqlite Connection.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }
}

#[async_trait]
impl Database for SqliteDatabase {
    async fn table_count(&self) -> Result<i64> {
        let conn = self.conn.lock().await;
        super::schema::table_count(&conn)
    }

    async fn fetch_recent_incidents(
        &self,
        user_id: &str,
        limit: u32,
    ) -> Result<Vec<IncidentRecord>> {
        let conn = self.conn.lock().await;
        super::queries::fetch_recent_incidents(&conn, user_id, limit)
    }

    async fn append_incident(&self, user_id: &str, record: &IncidentRecord) -> Result<()> {
        let conn = self.conn.lock().await;
        super::queries::append_incident(&conn, user_id, record)?;
        Ok(())
    }

    async fn count_incidents(&self, user_id: &str) -> Result<i64> {
        let conn = self.conn.lock().await;
        super::queries::count_incidents(&conn, user_id)
    }

    async fn list_contacts(&self, user_id: &str) -> Result<Vec<Contact>> {
        let conn = self.conn.lock().await;
        super::queries::list_contacts(&conn, user_id)
    }

    async fn upsert_contact(&self, user_id: &str, contact: &Contact) -> Result<()> {
        let conn = self.conn.lock().await;
        super::queries::upsert_contact(&conn, user_id, contact)
    }

    async fn delete_contact(&self, user_id: &str, id: &str) -> Result<bool> {
        let conn = self.conn.lock().await;
        super::queries::delete_contact(&conn, user_id, id)
    }
}

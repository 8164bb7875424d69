// Database trait: backend-agnostic async interface for all storage.
//
// It covers three collaborators of the SOS flow: the history store the
// scorer reads from, the incident sink SOS events are appended to, and the
// contact list alerts are sent to. Methods are async so a remote document
// store fits behind the same interface as the bundled SQLite backend.

use anyhow::Result;
use async_trait::async_trait;

use super::models::{Contact, IncidentRecord};

#[async_trait]
pub trait Database: Send + Sync {
    // --- Lifecycle ---

    /// Count the number of user-created tables in the database.
    async fn table_count(&self) -> Result<i64>;

    // --- Incident history ---

    /// The user's most recent SOS events, newest first, at most `limit`.
    async fn fetch_recent_incidents(&self, user_id: &str, limit: u32)
        -> Result<Vec<IncidentRecord>>;

    /// Append an SOS event to the user's history. Records are never updated.
    async fn append_incident(&self, user_id: &str, record: &IncidentRecord) -> Result<()>;

    /// Total SOS events logged for the user.
    async fn count_incidents(&self, user_id: &str) -> Result<i64>;

    // --- Contacts ---

    async fn list_contacts(&self, user_id: &str) -> Result<Vec<Contact>>;

    /// Save or update a contact.
    async fn upsert_contact(&self, user_id: &str, contact: &Contact) -> Result<()>;

    /// Delete a contact. Returns false if it didn't exist.
    async fn delete_contact(&self, user_id: &str, id: &str) -> Result<bool>;
}

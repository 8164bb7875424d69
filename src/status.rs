// System status display: shows DB stats, contacts, and the last SOS event.

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

use crate::clock::LocalZone;
use crate::db::Database;

/// Display system status to the terminal.
pub async fn show(
    db: &Arc<dyn Database>,
    db_display_path: &str,
    user_id: &str,
    zone: &LocalZone,
) -> Result<()> {
    let file_size = std::fs::metadata(db_display_path)
        .map(|m| format_bytes(m.len()))
        .unwrap_or_else(|_| "unknown".to_string());
    println!("Database: {} ({})", db_display_path, file_size);
    println!("User: {}", user_id);

    let contacts = db.list_contacts(user_id).await?;
    let emergency = contacts.iter().filter(|c| c.is_emergency).count();
    println!(
        "Contacts: {} total, {} emergency",
        contacts.len(),
        emergency
    );
    if emergency == 0 {
        println!("  Run `guardia contacts add` so SOS has someone to alert");
    }

    let total = db.count_incidents(user_id).await?;
    match db.fetch_recent_incidents(user_id, 1).await?.first() {
        Some(last) => println!(
            "SOS events: {} logged, last at {} ({} {})",
            total,
            crate::output::format_timestamp(last.timestamp, zone),
            last.level,
            last.score
        ),
        None => println!("SOS events: none logged"),
    }

    Ok(())
}

/// Whether the database file exists yet.
pub fn is_initialized(db_path: &str) -> bool {
    Path::new(db_path).exists()
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

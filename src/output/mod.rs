// Output formatting: terminal display.

pub mod terminal;

use crate::clock::LocalZone;

/// Render an epoch-millisecond timestamp in the given zone, e.g.
/// "2023-11-15 02:00". Out-of-range values render as the raw number.
pub fn format_timestamp(timestamp_ms: i64, zone: &LocalZone) -> String {
    match zone.local_time(timestamp_ms) {
        Some(local) => local.format("%Y-%m-%d %H:%M").to_string(),
        None => timestamp_ms.to_string(),
    }
}

// Alert dispatch: message building and swappable delivery channels.

pub mod console;
pub mod traits;
pub mod webhook;

use crate::db::models::ScoreResult;

/// The SOS text sent to emergency contacts.
///
/// When a risk assessment is available it is appended as one extra line so
/// the recipient knows how bad things looked.
pub fn build_emergency_message(maps_link: &str, risk: Option<&ScoreResult>) -> String {
    let mut lines = vec![
        "🚨 EMERGENCY ALERT!".to_string(),
        "I need immediate help.".to_string(),
        String::new(),
        "My live location:".to_string(),
        maps_link.to_string(),
    ];
    if let Some(result) = risk {
        lines.push(String::new());
        lines.push(format!("Risk: {} ({}/100)", result.level, result.score));
    }
    lines.join("\n")
}

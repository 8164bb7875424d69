// Colored terminal output for danger scores, history, and contacts.
//
// This module handles all terminal-specific formatting. The main.rs command
// handlers delegate here.

use colored::Colorize;

use crate::clock::LocalZone;
use crate::db::models::{Contact, DangerLevel, IncidentRecord, LocationSample, ScoreResult};
use crate::helplines::Helpline;
use crate::notify::traits::DispatchOutcome;
use crate::pipeline::sos::SosReport;

/// Display a danger score with its contributing factors.
pub fn display_score(sample: &LocationSample, result: &ScoreResult, zone: &LocalZone) {
    let title = match result.level {
        DangerLevel::Safe => "You are Safe".to_string(),
        level => format!("Risk Level: {level}"),
    };
    println!("\n{}", format!("=== {title} ===").bold());
    println!("  Level: {}", colorize_level(result.level));
    println!("  Score: {}/100", result.score);
    println!(
        "  Location: {:.5}, {:.5} at {}",
        sample.latitude,
        sample.longitude,
        super::format_timestamp(sample.timestamp, zone)
    );
    if let Some(speed) = sample.speed {
        println!("  Speed: {:.1} km/h", speed * 3.6);
    }

    if !result.reasons.is_empty() {
        println!("\n  Contributing factors:");
        for reason in &result.reasons {
            println!("    - {}", reason);
        }
    }
}

/// Display the user's recent SOS history, newest first.
pub fn display_history(incidents: &[IncidentRecord], zone: &LocalZone) {
    if incidents.is_empty() {
        println!("No SOS events logged yet.");
        return;
    }

    println!(
        "\n{}",
        format!("=== SOS History ({} events) ===", incidents.len()).bold()
    );
    println!();
    println!(
        "  {:<17}  {:>10}  {:>11}  {:>5}  {:<8}",
        "When".dimmed(),
        "Lat".dimmed(),
        "Lng".dimmed(),
        "Score".dimmed(),
        "Level".dimmed(),
    );
    println!("  {}", "-".repeat(60).dimmed());

    for incident in incidents {
        println!(
            "  {:<17}  {:>10.5}  {:>11.5}  {:>5}  {:<8}",
            super::format_timestamp(incident.timestamp, zone),
            incident.latitude,
            incident.longitude,
            incident.score,
            colorize_level(incident.level),
        );
        if !incident.reasons.is_empty() {
            println!("  {}", incident.reasons.join(", ").dimmed());
        }
    }
}

/// Display a contact list.
pub fn display_contacts(contacts: &[Contact]) {
    if contacts.is_empty() {
        println!("No contacts yet. Add one with `guardia contacts add`.");
        return;
    }

    println!("\n{}", format!("=== Contacts ({}) ===", contacts.len()).bold());
    for contact in contacts {
        let marker = if contact.is_emergency {
            "SOS".red().bold().to_string()
        } else {
            "   ".to_string()
        };
        println!(
            "  {}  {:<24} {:<18} {}",
            marker,
            contact.name,
            contact.phone,
            format!("[{}]", contact.id).dimmed()
        );
    }
}

/// Summarize a completed SOS run.
pub fn display_sos_report(report: &SosReport, zone: &LocalZone) {
    display_score(&report.sample, &report.result, zone);

    println!();
    if report.incident_logged {
        println!("  Incident logged: {}", "yes".green());
    } else {
        println!("  Incident logged: {}", "no (history write failed)".yellow());
    }
    println!("  Map: {}", report.maps_link);

    let outcome = match report.outcome {
        DispatchOutcome::Sent => "sent".green().bold(),
        DispatchOutcome::Cancelled => "cancelled".yellow(),
        DispatchOutcome::Failed => "failed".red().bold(),
    };
    println!(
        "  Alert to {} emergency contact(s): {}",
        report.recipients, outcome
    );
}

/// Display the emergency helpline directory.
pub fn display_helplines(helplines: &[Helpline]) {
    println!("\n{}", "=== Emergency Helplines ===".bold());
    for h in helplines {
        println!("  {:<20} {}", h.name, h.number.bold());
    }
}

/// Colorize a danger level.
fn colorize_level(level: DangerLevel) -> colored::ColoredString {
    match level {
        DangerLevel::High => level.as_str().red().bold(),
        DangerLevel::Caution => level.as_str().yellow(),
        DangerLevel::Safe => level.as_str().green(),
    }
}

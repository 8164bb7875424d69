// Contact validation: phone number normalization and duplicate checks.
//
// Numbers are stored as the user typed them; comparisons always go through
// normalize_phone so "+91 98765-43210" and "+919876543210" are the same.

use std::sync::LazyLock;

use regex_lite::Regex;

use crate::db::models::Contact;

/// Optional leading +, then 7 to 15 digits (E.164 allows at most 15).
static PHONE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9]{7,15}$").expect("phone pattern is valid"));

/// Strip spaces and dashes.
pub fn normalize_phone(phone: &str) -> String {
    phone
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect()
}

pub fn is_valid_phone_number(phone: &str) -> bool {
    PHONE_PATTERN.is_match(&normalize_phone(phone))
}

/// True if any existing contact has the same number after normalization.
pub fn has_duplicate_phone(contacts: &[Contact], phone: &str) -> bool {
    let target = normalize_phone(phone);
    contacts.iter().any(|c| normalize_phone(&c.phone) == target)
}

/// Contacts that should receive an SOS alert.
pub fn emergency_contacts(contacts: &[Contact]) -> Vec<&Contact> {
    contacts.iter().filter(|c| c.is_emergency).collect()
}

/// Build a new contact after validating the number against the existing list.
///
/// The normalized number doubles as the contact id, so it is stable across
/// re-adds and unique per user.
pub fn new_contact(
    existing: &[Contact],
    name: &str,
    phone: &str,
    is_emergency: bool,
) -> anyhow::Result<Contact> {
    let name = name.trim();
    if name.is_empty() {
        anyhow::bail!("Contact name cannot be empty.");
    }
    if !is_valid_phone_number(phone) {
        anyhow::bail!(
            "'{}' is not a valid phone number (7-15 digits, optional leading +).",
            phone
        );
    }
    if has_duplicate_phone(existing, phone) {
        anyhow::bail!("A contact with phone number {} already exists.", phone);
    }

    Ok(Contact {
        id: normalize_phone(phone),
        name: name.to_string(),
        phone: phone.trim().to_string(),
        is_emergency,
    })
}

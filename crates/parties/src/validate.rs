//! Identity field validation.

use posada_core::{DomainError, DomainResult};

use crate::client::DocumentKind;

/// Names (and nationalities) are letters and spaces only.
pub fn name(value: &str, field: &str) -> DomainResult<()> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation(format!("{field} cannot be empty")));
    }
    if trimmed.chars().any(|c| c.is_ascii_digit()) {
        return Err(DomainError::validation(format!(
            "{field} cannot contain digits"
        )));
    }
    if !trimmed
        .chars()
        .all(|c| c.is_alphabetic() || c.is_whitespace())
    {
        return Err(DomainError::validation(format!(
            "{field} may only contain letters and spaces"
        )));
    }
    Ok(())
}

/// National id documents (CC/TI/CE) are numeric with at most 10 digits;
/// passports are free-form.
pub fn document(number: &str, kind: DocumentKind) -> DomainResult<()> {
    if number.trim().is_empty() {
        return Err(DomainError::validation("document number cannot be empty"));
    }
    if kind.numeric() {
        if number.len() > 10 {
            return Err(DomainError::validation(
                "document number cannot exceed 10 digits",
            ));
        }
        if !number.chars().all(|c| c.is_ascii_digit()) {
            return Err(DomainError::validation(
                "document number may only contain digits",
            ));
        }
    }
    Ok(())
}

/// Phones are exactly 10 digits once separators are stripped.
pub fn phone(value: &str) -> DomainResult<()> {
    if value.trim().is_empty() {
        return Err(DomainError::validation("phone cannot be empty"));
    }
    let digits: String = value
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')' | '+'))
        .collect();
    if digits.len() != 10 {
        return Err(DomainError::validation("phone must have exactly 10 digits"));
    }
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(DomainError::validation("phone may only contain digits"));
    }
    Ok(())
}

pub fn nationality(value: &str) -> DomainResult<()> {
    name(value, "nationality")
}

/// Emails are optional; when present they need a plausible shape.
pub fn email(value: &str) -> DomainResult<()> {
    if value.trim().is_empty() {
        return Ok(());
    }
    if value.contains(char::is_whitespace) || value.matches('@').count() != 1 {
        return Err(DomainError::validation("email format is invalid"));
    }
    let (local, domain) = value.split_once('@').unwrap_or(("", ""));
    if local.is_empty()
        || domain.is_empty()
        || !domain.contains('.')
        || domain.starts_with('.')
        || domain.ends_with('.')
    {
        return Err(DomainError::validation("email format is invalid"));
    }
    Ok(())
}

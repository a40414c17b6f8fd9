//! Field validators shared by the profile surfaces.
use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::ModelError;

/// International phone format: leading `+`, country code starting with a
/// non-zero digit, then digits separated by single spaces
/// (e.g. `+421 123 456 789`).
static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+[1-9][0-9]{0,2}(?: ?[0-9]+)+$").unwrap());

pub const PHONE_MAX_LEN: usize = 32;

/// Validate a phone number. Empty values are accepted; the fields are
/// optional and stored as empty strings.
pub fn validate_phone_number(value: &str) -> Result<(), ModelError> {
    if value.is_empty() {
        return Ok(());
    }
    if value.len() > PHONE_MAX_LEN {
        return Err(ModelError::Validation(format!(
            "phone number longer than {} characters",
            PHONE_MAX_LEN
        )));
    }
    if !PHONE_RE.is_match(value) {
        return Err(ModelError::Validation(
            "phone number must be in international format (e.g. +421 123 456 789)".into(),
        ));
    }
    let digits = value.chars().filter(|c| c.is_ascii_digit()).count();
    if !(6..=15).contains(&digits) {
        return Err(ModelError::Validation(
            "phone number must contain 6 to 15 digits".into(),
        ));
    }
    Ok(())
}

use lazy_static::lazy_static;
use regex::Regex;
use std::borrow::Cow;
use std::collections::HashSet;
use validator::{ValidationError, ValidationErrors};

lazy_static! {
    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();
}

/// Input clean-up applied to request bodies before validation.
pub trait Normalize {
    fn normalize(&mut self);
}

/// Trim and collapse internal whitespace runs to a single space.
pub fn collapse_whitespace(value: &str) -> String {
    WHITESPACE_RUN.replace_all(value.trim(), " ").into_owned()
}

pub(crate) fn trim_in_place(value: &mut String) {
    let trimmed = value.trim();
    if trimmed.len() != value.len() {
        *value = trimmed.to_string();
    }
}

pub(crate) fn error_with_message(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

/// Team members must be non-empty and unique.
pub fn validate_team_members(members: &[String]) -> Result<(), ValidationError> {
    if members.iter().any(|m| m.trim().is_empty()) {
        return Err(error_with_message(
            "team_member_empty",
            "Team members cannot be empty",
        ));
    }

    let unique: HashSet<&str> = members.iter().map(|m| m.as_str()).collect();
    if unique.len() != members.len() {
        return Err(error_with_message(
            "team_member_duplicate",
            "Duplicate team members are not allowed",
        ));
    }

    Ok(())
}

/// Pick one human-readable message out of a validation failure.
///
/// Fields are visited in name order so the answer is stable across runs.
pub fn first_validation_message(errors: &ValidationErrors) -> String {
    let mut fields: Vec<(String, String)> = errors
        .field_errors()
        .into_iter()
        .filter_map(|(field, errs)| {
            errs.first().map(|e| {
                let message = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid value for {}", field));
                (field.to_string(), message)
            })
        })
        .collect();
    fields.sort();

    fields
        .into_iter()
        .next()
        .map(|(_, message)| message)
        .unwrap_or_else(|| "Invalid request body".to_string())
}

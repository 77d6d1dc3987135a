//! Internal helpers for input validation.
//!
//! These utilities are **not** part of the public API. They centralize
//! normalization so the engine enforces the same invariants on every path.

use crate::{EngineError, ResultEngine};

pub(crate) const CATEGORY_NAME_MAX: usize = 50;
pub(crate) const USER_NAME_MAX: usize = 100;
pub(crate) const DESCRIPTION_MAX: usize = 200;
pub(crate) const PASSWORD_MIN: usize = 6;

/// Trim `value` and reject empty or too long names.
pub(crate) fn normalize_required_name(value: &str, label: &str, max: usize) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidName(format!(
            "{label} name must not be empty"
        )));
    }
    if trimmed.chars().count() > max {
        return Err(EngineError::InvalidName(format!(
            "{label} name must be at most {max} characters"
        )));
    }
    Ok(trimmed.to_string())
}

/// Trim an optional description; blank means "no description".
pub(crate) fn normalize_description(value: Option<&str>) -> ResultEngine<Option<String>> {
    let Some(trimmed) = value.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    if trimmed.chars().count() > DESCRIPTION_MAX {
        return Err(EngineError::InvalidName(format!(
            "description must be at most {DESCRIPTION_MAX} characters"
        )));
    }
    Ok(Some(trimmed.to_string()))
}

pub(crate) fn normalize_email(value: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    let valid = trimmed
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && !domain.is_empty());
    if !valid {
        return Err(EngineError::InvalidName(format!("invalid email: {trimmed}")));
    }
    Ok(trimmed.to_string())
}

pub(crate) fn validate_password(value: &str) -> ResultEngine<()> {
    if value.chars().count() < PASSWORD_MIN {
        return Err(EngineError::InvalidName(format!(
            "password must be at least {PASSWORD_MIN} characters"
        )));
    }
    Ok(())
}

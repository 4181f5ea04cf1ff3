//! # Request Validation
//!
//! Shape and range checks applied to query strings and JSON bodies before a
//! handler acquires a database connection.

use thiserror::Error;
use validator::ValidateEmail;

/// A single rejected field.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Implemented by every request type that has constraints beyond its shape.
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

pub(crate) fn max_len(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    let len = value.chars().count();
    if len > max {
        return Err(ValidationError::new(
            field,
            format!("must be at most {} characters (got {})", max, len),
        ));
    }
    Ok(())
}

pub(crate) fn opt_max_len(field: &'static str, value: Option<&str>, max: usize) -> Result<(), ValidationError> {
    value.map_or(Ok(()), |v| max_len(field, v, max))
}

pub(crate) fn positive_id(field: &'static str, value: i64) -> Result<(), ValidationError> {
    if value <= 0 {
        return Err(ValidationError::new(field, "must be greater than 0"));
    }
    Ok(())
}

pub(crate) fn positive_amount(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ValidationError::new(field, "must be greater than 0"));
    }
    Ok(())
}

/// HTML5 address syntax via `validator`, narrowed to a dot-atom local part
/// and a dotted domain.
pub(crate) fn email(field: &'static str, value: &str) -> Result<(), ValidationError> {
    max_len(field, value, 255)?;

    let dot_atom = value.rsplit_once('@').is_some_and(|(local, domain)| {
        !local.starts_with('.') && !local.ends_with('.') && !local.contains("..") && domain.contains('.')
    });

    if !dot_atom || !value.validate_email() {
        return Err(ValidationError::new(field, "is not a valid email address"));
    }
    Ok(())
}

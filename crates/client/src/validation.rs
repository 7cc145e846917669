//! Form-level validation.
//!
//! Every form is checked before anything goes over the network. A
//! `ValidationError` therefore always means "nothing was sent".

use meal_planner_core::{Email, EmailError};
use thiserror::Error;

/// A form field failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is empty.
    #[error("{0} is required")]
    Required(&'static str),

    /// The email field is malformed.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// A numeric field is below its minimum.
    #[error("{field} must be at least {min}")]
    BelowMinimum { field: &'static str, min: u32 },

    /// A numeric field is outside its allowed range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange {
        field: &'static str,
        min: u32,
        max: u32,
    },
}

/// Require a non-blank value, returning it trimmed.
///
/// # Errors
///
/// Returns `ValidationError::Required` if the value is empty or whitespace.
pub fn required<'a>(field: &'static str, value: &'a str) -> Result<&'a str, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Required(field));
    }
    Ok(trimmed)
}

/// Require a well-formed email address.
///
/// # Errors
///
/// Returns `ValidationError::Required` for a blank value and
/// `ValidationError::InvalidEmail` for a malformed one.
pub fn email(value: &str) -> Result<Email, ValidationError> {
    let value = required("email", value)?;
    Ok(Email::parse(value)?)
}

/// Require `min <= value <= max`.
///
/// # Errors
///
/// Returns `ValidationError::OutOfRange` otherwise.
pub fn in_range(field: &'static str, value: u32, min: u32, max: u32) -> Result<u32, ValidationError> {
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(ValidationError::OutOfRange { field, min, max })
    }
}

/// Require `value >= min`.
///
/// # Errors
///
/// Returns `ValidationError::BelowMinimum` otherwise.
pub const fn at_least(field: &'static str, value: u32, min: u32) -> Result<u32, ValidationError> {
    if value >= min {
        Ok(value)
    } else {
        Err(ValidationError::BelowMinimum { field, min })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_required() {
        assert_eq!(required("username", "  bob "), Ok("bob"));
        assert_eq!(
            required("username", "   "),
            Err(ValidationError::Required("username"))
        );
    }

    #[test]
    fn test_email() {
        assert!(email("a@b.com").is_ok());
        assert_eq!(email(""), Err(ValidationError::Required("email")));
        assert!(matches!(
            email("nope"),
            Err(ValidationError::InvalidEmail(EmailError::MissingAtSymbol))
        ));
    }

    #[test]
    fn test_at_least() {
        assert_eq!(at_least("calories per day", 1000, 1000), Ok(1000));
        assert_eq!(
            at_least("calories per day", 999, 1000).unwrap_err().to_string(),
            "calories per day must be at least 1000"
        );
    }

    #[test]
    fn test_in_range() {
        assert_eq!(in_range("meals per day", 3, 1, 10), Ok(3));
        assert_eq!(
            in_range("meals per day", 11, 1, 10).unwrap_err().to_string(),
            "meals per day must be between 1 and 10"
        );
    }
}

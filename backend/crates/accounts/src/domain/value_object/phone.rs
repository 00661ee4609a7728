//! Phone Value Object
//!
//! Represents a normalized phone number. Formatting characters (spaces,
//! dashes, dots, parentheses) are stripped; an optional leading `+` is kept.
//! No carrier lookup is performed - this is an input-shape check only.

use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Minimum digits in a phone number
const PHONE_MIN_DIGITS: usize = 7;

/// Maximum digits in a phone number (E.164)
const PHONE_MAX_DIGITS: usize = 15;

/// Phone number value object
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Phone(String);

impl Phone {
    /// Create a new phone number with normalization and validation
    pub fn new(phone: impl Into<String>) -> AppResult<Self> {
        let raw = phone.into();
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            return Err(AppError::bad_request("Phone number cannot be empty"));
        }

        let international = trimmed.starts_with('+');

        let mut digits = String::new();
        for c in trimmed.chars().skip(usize::from(international)) {
            match c {
                '0'..='9' => digits.push(c),
                ' ' | '-' | '.' | '(' | ')' => {}
                _ => {
                    return Err(AppError::bad_request(format!(
                        "Phone number contains invalid character '{c}'"
                    )));
                }
            }
        }

        if digits.len() < PHONE_MIN_DIGITS {
            return Err(AppError::bad_request(format!(
                "Phone number must have at least {} digits",
                PHONE_MIN_DIGITS
            )));
        }

        if digits.len() > PHONE_MAX_DIGITS {
            return Err(AppError::bad_request(format!(
                "Phone number must have at most {} digits",
                PHONE_MAX_DIGITS
            )));
        }

        let normalized = if international {
            format!("+{digits}")
        } else {
            digits
        };

        Ok(Self(normalized))
    }

    /// Create from database value (assumed already normalized)
    pub fn from_db(phone: impl Into<String>) -> Self {
        Self(phone.into())
    }

    /// Get the normalized phone number
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Phone {
    type Err = AppError;

    fn from_str(s: &str) -> AppResult<Self> {
        Phone::new(s)
    }
}

impl std::fmt::Display for Phone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_valid() {
        assert_eq!(Phone::new("0241234567").unwrap().as_str(), "0241234567");
        assert_eq!(
            Phone::new("+233 24 123 4567").unwrap().as_str(),
            "+233241234567"
        );
        assert_eq!(
            Phone::new("(024) 123-4567").unwrap().as_str(),
            "0241234567"
        );
    }

    #[test]
    fn test_phone_invalid() {
        assert!(Phone::new("").is_err());
        assert!(Phone::new("   ").is_err());
        assert!(Phone::new("12345").is_err()); // too short
        assert!(Phone::new("1234567890123456").is_err()); // too long
        assert!(Phone::new("024-ABC-4567").is_err()); // letters
    }

    #[test]
    fn test_phone_plus_only_prefix() {
        // `+` is only meaningful at the start
        assert!(Phone::new("024+1234567").is_err());
    }
}

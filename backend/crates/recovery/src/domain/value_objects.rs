//! Domain Value Objects

/// Re-export the shared client fingerprint type
pub use platform::client::ClientFingerprint;

/// Number of digits in a reset code
pub const CODE_LENGTH: usize = 6;

/// One-time numeric reset code
///
/// Only ever held in memory on its way to the mail notifier; persistence
/// stores an HMAC digest, never the code itself.
#[derive(Clone, PartialEq, Eq)]
pub struct ResetCode(String);

impl ResetCode {
    /// Generate a fresh random code
    pub fn generate() -> Self {
        Self(platform::crypto::numeric_code(CODE_LENGTH))
    }

    /// Parse a user-submitted code, rejecting anything that is not
    /// exactly six ASCII digits
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.len() == CODE_LENGTH && trimmed.bytes().all(|b| b.is_ascii_digit()) {
            Some(Self(trimmed.to_string()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Keep codes out of debug output
impl std::fmt::Debug for ResetCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ResetCode(******)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_code_is_six_digits() {
        let code = ResetCode::generate();
        assert_eq!(code.as_str().len(), CODE_LENGTH);
        assert!(code.as_str().bytes().all(|b| b.is_ascii_digit()));
    }

    #[test]
    fn parse_trims_and_validates() {
        assert!(ResetCode::parse(" 123456 ").is_some());
        assert!(ResetCode::parse("12345").is_none());
        assert!(ResetCode::parse("1234567").is_none());
        assert!(ResetCode::parse("12a456").is_none());
        assert!(ResetCode::parse("").is_none());
    }

    #[test]
    fn debug_masks_the_code() {
        let code = ResetCode::parse("123456").unwrap();
        assert!(!format!("{code:?}").contains("123456"));
    }
}

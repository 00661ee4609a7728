//! Application Configuration
//!
//! Configuration for the recovery application layer.

use std::time::Duration;

/// Recovery application configuration
#[derive(Debug, Clone)]
pub struct RecoveryConfig {
    /// Secret key for keying code digests (32 bytes)
    pub code_secret: [u8; 32],
    /// Validity window of an individual code (10 minutes)
    pub code_ttl: Duration,
    /// Overall flow lifetime (30 minutes)
    pub flow_ttl: Duration,
    /// Cooldown before a code can be resent (60 seconds)
    pub resend_cooldown: Duration,
    /// Max recovery requests per client per window
    pub rate_limit_max_requests: u32,
    /// Rate limit window (15 minutes)
    pub rate_limit_window: Duration,
    /// Password pepper, shared with the accounts module
    pub password_pepper: Option<Vec<u8>>,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            code_secret: [0u8; 32],
            code_ttl: Duration::from_secs(10 * 60),
            flow_ttl: Duration::from_secs(30 * 60),
            resend_cooldown: Duration::from_secs(60),
            rate_limit_max_requests: 5,
            rate_limit_window: Duration::from_secs(15 * 60),
            password_pepper: None,
        }
    }
}

impl RecoveryConfig {
    /// Create config with a random code secret (for development)
    pub fn with_random_secret() -> Self {
        use rand::RngCore;
        let mut secret = [0u8; 32];
        rand::rngs::OsRng.fill_bytes(&mut secret);
        Self {
            code_secret: secret,
            ..Default::default()
        }
    }

    pub fn code_ttl_ms(&self) -> i64 {
        self.code_ttl.as_millis() as i64
    }

    pub fn code_ttl_minutes(&self) -> i64 {
        (self.code_ttl.as_secs() / 60) as i64
    }

    pub fn flow_ttl_chrono(&self) -> chrono::Duration {
        chrono::Duration::milliseconds(self.flow_ttl.as_millis() as i64)
    }

    pub fn resend_cooldown_ms(&self) -> i64 {
        self.resend_cooldown.as_millis() as i64
    }

    pub fn rate_limit_window_ms(&self) -> i64 {
        self.rate_limit_window.as_millis() as i64
    }

    /// Get password pepper as slice
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }
}

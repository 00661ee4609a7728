//! Domain Entities
//!
//! The recovery flow is a persisted state machine. Every transition is an
//! explicit method that validates the current step, so a client can never
//! reach code entry without requesting a code, or the password form
//! without a verified code.

use crate::domain::value_objects::ClientFingerprint;
use crate::error::{RecoveryError, RecoveryResult};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Steps of the recovery flow, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryStep {
    /// Email submitted, no code dispatched yet
    EnterEmail,
    /// Code dispatched, awaiting verification
    EnterCode,
    /// Code verified, awaiting the new password
    ResetPassword,
}

impl RecoveryStep {
    pub fn id(&self) -> i16 {
        match self {
            RecoveryStep::EnterEmail => 0,
            RecoveryStep::EnterCode => 1,
            RecoveryStep::ResetPassword => 2,
        }
    }

    pub fn from_id(id: i16) -> Option<Self> {
        match id {
            0 => Some(RecoveryStep::EnterEmail),
            1 => Some(RecoveryStep::EnterCode),
            2 => Some(RecoveryStep::ResetPassword),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RecoveryStep::EnterEmail => "enter-email",
            RecoveryStep::EnterCode => "enter-code",
            RecoveryStep::ResetPassword => "reset-password",
        }
    }
}

/// A password recovery flow bound to one account and one client
#[derive(Debug, Clone)]
pub struct RecoveryFlow {
    pub flow_id: Uuid,
    pub user_id: Uuid,
    pub email: String,
    pub step: RecoveryStep,
    /// HMAC digest of the current code, empty until a code is armed
    pub code_hash: Vec<u8>,
    pub code_expires_at_ms: i64,
    /// Earliest moment a resend is allowed
    pub resend_available_at_ms: i64,
    pub failed_attempts: i16,
    /// Overall flow lifetime, independent of the per-code window
    pub expires_at_ms: i64,
    pub client_fingerprint_hash: Vec<u8>,
    pub client_ip: Option<std::net::IpAddr>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Maximum wrong codes before the flow is burned
pub const MAX_CODE_ATTEMPTS: i16 = 5;

impl RecoveryFlow {
    /// Start a new flow at the enter-email step
    pub fn new(
        user_id: Uuid,
        email: String,
        fingerprint: &ClientFingerprint,
        flow_ttl: chrono::Duration,
    ) -> Self {
        let now = Utc::now();
        Self {
            flow_id: Uuid::new_v4(),
            user_id,
            email,
            step: RecoveryStep::EnterEmail,
            code_hash: Vec::new(),
            code_expires_at_ms: 0,
            resend_available_at_ms: 0,
            failed_attempts: 0,
            expires_at_ms: (now + flow_ttl).timestamp_millis(),
            client_fingerprint_hash: fingerprint.hash_vec(),
            client_ip: fingerprint.ip,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_expired(&self, now_ms: i64) -> bool {
        self.expires_at_ms <= now_ms
    }

    pub fn is_code_expired(&self, now_ms: i64) -> bool {
        self.code_expires_at_ms <= now_ms
    }

    /// Whether this flow was started by the given client
    pub fn belongs_to(&self, fingerprint: &ClientFingerprint) -> bool {
        platform::crypto::constant_time_eq(&self.client_fingerprint_hash, &fingerprint.hash)
    }

    /// Seconds until a resend is allowed, `None` when it already is
    pub fn resend_wait_secs(&self, now_ms: i64) -> Option<i64> {
        let remaining_ms = self.resend_available_at_ms - now_ms;
        (remaining_ms > 0).then(|| (remaining_ms as u64).div_ceil(1000) as i64)
    }

    /// Arm a freshly dispatched code: enter-email -> enter-code, or a
    /// resend while already at enter-code. Resets the attempt counter.
    pub fn arm_code(
        &mut self,
        code_hash: Vec<u8>,
        now_ms: i64,
        code_ttl_ms: i64,
        resend_cooldown_ms: i64,
    ) -> RecoveryResult<()> {
        match self.step {
            RecoveryStep::EnterEmail | RecoveryStep::EnterCode => {
                self.step = RecoveryStep::EnterCode;
                self.code_hash = code_hash;
                self.code_expires_at_ms = now_ms + code_ttl_ms;
                self.resend_available_at_ms = now_ms + resend_cooldown_ms;
                self.failed_attempts = 0;
                self.updated_at = Utc::now();
                Ok(())
            }
            RecoveryStep::ResetPassword => Err(RecoveryError::InvalidStep),
        }
    }

    /// Advance after a successful verification: enter-code -> reset-password
    pub fn advance_to_reset(&mut self) -> RecoveryResult<()> {
        match self.step {
            RecoveryStep::EnterCode => {
                self.step = RecoveryStep::ResetPassword;
                self.code_hash = Vec::new();
                self.updated_at = Utc::now();
                Ok(())
            }
            _ => Err(RecoveryError::InvalidStep),
        }
    }

    /// Record a wrong code; returns `true` when the flow just hit the
    /// attempt limit
    pub fn record_failed_attempt(&mut self) -> bool {
        self.failed_attempts += 1;
        self.updated_at = Utc::now();
        self.failed_attempts >= MAX_CODE_ATTEMPTS
    }

    pub fn attempts_exhausted(&self) -> bool {
        self.failed_attempts >= MAX_CODE_ATTEMPTS
    }
}

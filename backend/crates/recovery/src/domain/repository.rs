//! Repository Traits
//!
//! Persistence ports implemented by `infra::postgres`.

use crate::domain::entities::RecoveryFlow;
use crate::domain::value_objects::ClientFingerprint;
use crate::error::RecoveryResult;
use uuid::Uuid;

/// Recovery flow storage
#[trait_variant::make(RecoveryFlowRepository: Send)]
pub trait LocalRecoveryFlowRepository {
    async fn create(&self, flow: &RecoveryFlow) -> RecoveryResult<()>;

    async fn find_by_id(&self, flow_id: Uuid) -> RecoveryResult<Option<RecoveryFlow>>;

    async fn update(&self, flow: &RecoveryFlow) -> RecoveryResult<()>;

    async fn delete(&self, flow_id: Uuid) -> RecoveryResult<()>;
}

/// Per-client rate limiting for recovery requests
#[trait_variant::make(RecoveryRateLimitRepository: Send)]
pub trait LocalRecoveryRateLimitRepository {
    /// Record one request and report whether the client is still within
    /// `max_requests` for the current window
    async fn check(
        &self,
        fingerprint: &ClientFingerprint,
        max_requests: u32,
        window_ms: i64,
    ) -> RecoveryResult<bool>;
}

/// Minimal view of an account as recovery needs it
#[derive(Debug, Clone)]
pub struct RecoveryAccount {
    pub user_id: Uuid,
    pub email: String,
    pub display_name: String,
}

/// Gateway to account storage
///
/// Recovery only reads account identity and writes a replacement
/// password hash; everything else about accounts stays out of reach.
#[trait_variant::make(AccountGateway: Send)]
pub trait LocalAccountGateway {
    /// Look up an active account by email
    async fn find_account_by_email(&self, email: &str) -> RecoveryResult<Option<RecoveryAccount>>;

    /// Replace the stored password hash and clear any login lockout
    async fn replace_password_hash(&self, user_id: Uuid, phc: &str) -> RecoveryResult<()>;

    /// Revoke every live session of the account
    async fn revoke_sessions(&self, user_id: Uuid) -> RecoveryResult<u64>;
}

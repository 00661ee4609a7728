//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use crate::domain::entity::{
    credential::Credential, session::AuthSession, user::User, vendor_profile::VendorProfile,
};
use crate::domain::value_object::{email::Email, user_id::UserId};
use crate::error::AccountResult;
use uuid::Uuid;

/// User repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Create a new user
    async fn create(&self, user: &User) -> AccountResult<()>;

    /// Find user by ID
    async fn find_by_id(&self, user_id: &UserId) -> AccountResult<Option<User>>;

    /// Find user by email
    async fn find_by_email(&self, email: &Email) -> AccountResult<Option<User>>;

    /// Check if email is already registered
    async fn exists_by_email(&self, email: &Email) -> AccountResult<bool>;

    /// Update user
    async fn update(&self, user: &User) -> AccountResult<()>;
}

/// Vendor profile repository trait
#[trait_variant::make(VendorProfileRepository: Send)]
pub trait LocalVendorProfileRepository {
    /// Create a vendor profile
    async fn create(&self, profile: &VendorProfile) -> AccountResult<()>;

    /// Find profile by user ID
    async fn find_by_user_id(&self, user_id: &UserId) -> AccountResult<Option<VendorProfile>>;
}

/// Credential repository trait
#[trait_variant::make(CredentialRepository: Send)]
pub trait LocalCredentialRepository {
    /// Create credentials
    async fn create(&self, credential: &Credential) -> AccountResult<()>;

    /// Find credentials by user ID
    async fn find_by_user_id(&self, user_id: &UserId) -> AccountResult<Option<Credential>>;

    /// Update credentials
    async fn update(&self, credential: &Credential) -> AccountResult<()>;
}

/// Auth session repository trait
#[trait_variant::make(SessionRepository: Send)]
pub trait LocalSessionRepository {
    /// Create a new session
    async fn create(&self, session: &AuthSession) -> AccountResult<()>;

    /// Find session by ID and verify fingerprint
    async fn find_by_id(
        &self,
        session_id: Uuid,
        fingerprint_hash: &[u8],
    ) -> AccountResult<Option<AuthSession>>;

    /// Update session (e.g., last activity)
    async fn update(&self, session: &AuthSession) -> AccountResult<()>;

    /// Delete a session
    async fn delete(&self, session_id: Uuid) -> AccountResult<()>;

    /// Delete all sessions for a user
    async fn delete_all_for_user(&self, user_id: &UserId) -> AccountResult<u64>;

    /// Clean up expired sessions
    async fn cleanup_expired(&self) -> AccountResult<u64>;
}

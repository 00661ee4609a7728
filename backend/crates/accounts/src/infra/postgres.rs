//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use nid::Nanoid;
use sqlx::PgPool;
use std::str::FromStr;
use uuid::Uuid;

use crate::domain::entity::{
    credential::Credential, session::AuthSession, user::User, vendor_profile::VendorProfile,
};
use crate::domain::repository::{
    CredentialRepository, SessionRepository, UserRepository, VendorProfileRepository,
};
use crate::domain::value_object::{
    email::Email, geo_point::GeoPoint, phone::Phone, public_id::PublicId, user_id::UserId,
    user_password::UserPassword, user_role::UserRole, user_status::UserStatus,
};
use crate::error::{AccountError, AccountResult};

/// PostgreSQL-backed account repository
#[derive(Clone)]
pub struct PgAccountRepository {
    pool: PgPool,
}

impl PgAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Clean up expired sessions
    pub async fn cleanup_expired(&self) -> AccountResult<u64> {
        let now_ms = Utc::now().timestamp_millis();

        let deleted = sqlx::query("DELETE FROM auth_sessions WHERE expires_at_ms < $1")
            .bind(now_ms)
            .execute(&self.pool)
            .await?
            .rows_affected();

        tracing::info!(sessions_deleted = deleted, "Cleaned up expired auth sessions");

        Ok(deleted)
    }
}

// ============================================================================
// User Repository Implementation
// ============================================================================

impl UserRepository for PgAccountRepository {
    async fn create(&self, user: &User) -> AccountResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (
                user_id,
                public_id,
                display_name,
                email,
                phone,
                role,
                status,
                location_lat,
                location_lng,
                location_address,
                last_login_at,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(user.user_id.as_uuid())
        .bind(user.public_id.as_str())
        .bind(&user.display_name)
        .bind(user.email.as_str())
        .bind(user.phone.as_str())
        .bind(user.role.id())
        .bind(user.status.id())
        .bind(user.location.lat())
        .bind(user.location.lng())
        .bind(user.location.address())
        .bind(user.last_login_at)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, user_id: &UserId) -> AccountResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT
                user_id,
                public_id,
                display_name,
                email,
                phone,
                role,
                status,
                location_lat,
                location_lng,
                location_address,
                last_login_at,
                created_at,
                updated_at
            FROM users
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_user()).transpose()
    }

    async fn find_by_email(&self, email: &Email) -> AccountResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT
                user_id,
                public_id,
                display_name,
                email,
                phone,
                role,
                status,
                location_lat,
                location_lng,
                location_address,
                last_login_at,
                created_at,
                updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_user()).transpose()
    }

    async fn exists_by_email(&self, email: &Email) -> AccountResult<bool> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
                .bind(email.as_str())
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    async fn update(&self, user: &User) -> AccountResult<()> {
        sqlx::query(
            r#"
            UPDATE users SET
                display_name = $2,
                email = $3,
                phone = $4,
                role = $5,
                status = $6,
                location_lat = $7,
                location_lng = $8,
                location_address = $9,
                last_login_at = $10,
                updated_at = $11
            WHERE user_id = $1
            "#,
        )
        .bind(user.user_id.as_uuid())
        .bind(&user.display_name)
        .bind(user.email.as_str())
        .bind(user.phone.as_str())
        .bind(user.role.id())
        .bind(user.status.id())
        .bind(user.location.lat())
        .bind(user.location.lng())
        .bind(user.location.address())
        .bind(user.last_login_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

// ============================================================================
// Vendor Profile Repository Implementation
// ============================================================================

impl VendorProfileRepository for PgAccountRepository {
    async fn create(&self, profile: &VendorProfile) -> AccountResult<()> {
        sqlx::query(
            r#"
            INSERT INTO vendor_profiles (
                user_id,
                business_name,
                business_description,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(profile.user_id.as_uuid())
        .bind(&profile.business_name)
        .bind(&profile.business_description)
        .bind(profile.created_at)
        .bind(profile.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_user_id(&self, user_id: &UserId) -> AccountResult<Option<VendorProfile>> {
        let row = sqlx::query_as::<_, VendorProfileRow>(
            r#"
            SELECT
                user_id,
                business_name,
                business_description,
                created_at,
                updated_at
            FROM vendor_profiles
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_profile()))
    }
}

// ============================================================================
// Credential Repository Implementation
// ============================================================================

impl CredentialRepository for PgAccountRepository {
    async fn create(&self, credential: &Credential) -> AccountResult<()> {
        sqlx::query(
            r#"
            INSERT INTO credentials (
                user_id,
                password_hash,
                login_failed_count,
                last_failed_at,
                locked_until,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(credential.user_id.as_uuid())
        .bind(credential.password_hash.as_phc_string())
        .bind(credential.login_failed_count as i16)
        .bind(credential.last_failed_at)
        .bind(credential.locked_until)
        .bind(credential.created_at)
        .bind(credential.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_user_id(&self, user_id: &UserId) -> AccountResult<Option<Credential>> {
        let row = sqlx::query_as::<_, CredentialRow>(
            r#"
            SELECT
                user_id,
                password_hash,
                login_failed_count,
                last_failed_at,
                locked_until,
                created_at,
                updated_at
            FROM credentials
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_credential()).transpose()
    }

    async fn update(&self, credential: &Credential) -> AccountResult<()> {
        sqlx::query(
            r#"
            UPDATE credentials SET
                password_hash = $2,
                login_failed_count = $3,
                last_failed_at = $4,
                locked_until = $5,
                updated_at = $6
            WHERE user_id = $1
            "#,
        )
        .bind(credential.user_id.as_uuid())
        .bind(credential.password_hash.as_phc_string())
        .bind(credential.login_failed_count as i16)
        .bind(credential.last_failed_at)
        .bind(credential.locked_until)
        .bind(credential.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

// ============================================================================
// Session Repository Implementation
// ============================================================================

impl SessionRepository for PgAccountRepository {
    async fn create(&self, session: &AuthSession) -> AccountResult<()> {
        sqlx::query(
            r#"
            INSERT INTO auth_sessions (
                session_id,
                user_id,
                public_id,
                role,
                expires_at_ms,
                client_fingerprint_hash,
                client_ip,
                user_agent,
                created_at,
                last_activity_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(session.session_id)
        .bind(session.user_id.as_uuid())
        .bind(session.public_id.as_str())
        .bind(session.role.id())
        .bind(session.expires_at_ms)
        .bind(&session.client_fingerprint_hash)
        .bind(&session.client_ip)
        .bind(&session.user_agent)
        .bind(session.created_at)
        .bind(session.last_activity_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(
        &self,
        session_id: Uuid,
        fingerprint_hash: &[u8],
    ) -> AccountResult<Option<AuthSession>> {
        let now_ms = Utc::now().timestamp_millis();

        let row = sqlx::query_as::<_, AuthSessionRow>(
            r#"
            SELECT
                session_id,
                user_id,
                public_id,
                role,
                expires_at_ms,
                client_fingerprint_hash,
                client_ip,
                user_agent,
                created_at,
                last_activity_at
            FROM auth_sessions
            WHERE session_id = $1 AND expires_at_ms > $2
            "#,
        )
        .bind(session_id)
        .bind(now_ms)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(r) => {
                // A stolen token presented from a different client is
                // treated as no session at all.
                if r.client_fingerprint_hash != fingerprint_hash {
                    tracing::warn!(
                        session_id = %session_id,
                        "Auth session fingerprint mismatch"
                    );
                    return Err(AccountError::SessionInvalid);
                }
                Ok(Some(r.into_session()?))
            }
            None => Ok(None),
        }
    }

    async fn update(&self, session: &AuthSession) -> AccountResult<()> {
        sqlx::query(
            r#"
            UPDATE auth_sessions SET
                expires_at_ms = $2,
                last_activity_at = $3
            WHERE session_id = $1
            "#,
        )
        .bind(session.session_id)
        .bind(session.expires_at_ms)
        .bind(session.last_activity_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, session_id: Uuid) -> AccountResult<()> {
        sqlx::query("DELETE FROM auth_sessions WHERE session_id = $1")
            .bind(session_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn delete_all_for_user(&self, user_id: &UserId) -> AccountResult<u64> {
        let deleted = sqlx::query("DELETE FROM auth_sessions WHERE user_id = $1")
            .bind(user_id.as_uuid())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted)
    }

    async fn cleanup_expired(&self) -> AccountResult<u64> {
        PgAccountRepository::cleanup_expired(self).await
    }
}

// ============================================================================
// Row Types for sqlx mapping
// ============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    user_id: Uuid,
    public_id: String,
    display_name: String,
    email: String,
    phone: String,
    role: i16,
    status: i16,
    location_lat: f64,
    location_lng: f64,
    location_address: String,
    last_login_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> AccountResult<User> {
        let public_id = PublicId::from_nanoid(
            Nanoid::from_str(&self.public_id)
                .map_err(|e| AccountError::Internal(format!("Invalid public_id: {}", e)))?,
        );

        let role = UserRole::from_id(self.role)
            .ok_or_else(|| AccountError::Internal(format!("Unknown role id: {}", self.role)))?;

        let location = GeoPoint::new(self.location_lat, self.location_lng, self.location_address)
            .map_err(|e| AccountError::Internal(format!("Invalid location: {}", e.message())))?;

        Ok(User {
            user_id: UserId::from_uuid(self.user_id),
            public_id,
            display_name: self.display_name,
            email: Email::from_db(self.email),
            phone: Phone::from_db(self.phone),
            role,
            status: UserStatus::from_id(self.status).unwrap_or_default(),
            location,
            last_login_at: self.last_login_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct VendorProfileRow {
    user_id: Uuid,
    business_name: String,
    business_description: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl VendorProfileRow {
    fn into_profile(self) -> VendorProfile {
        VendorProfile {
            user_id: UserId::from_uuid(self.user_id),
            business_name: self.business_name,
            business_description: self.business_description,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct CredentialRow {
    user_id: Uuid,
    password_hash: String,
    login_failed_count: i16,
    last_failed_at: Option<DateTime<Utc>>,
    locked_until: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CredentialRow {
    fn into_credential(self) -> AccountResult<Credential> {
        let password_hash = UserPassword::from_phc_string(self.password_hash)
            .map_err(|e| AccountError::Internal(e.message().to_string()))?;

        Ok(Credential {
            user_id: UserId::from_uuid(self.user_id),
            password_hash,
            login_failed_count: self.login_failed_count as u16,
            last_failed_at: self.last_failed_at,
            locked_until: self.locked_until,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct AuthSessionRow {
    session_id: Uuid,
    user_id: Uuid,
    public_id: String,
    role: i16,
    expires_at_ms: i64,
    client_fingerprint_hash: Vec<u8>,
    client_ip: Option<String>,
    user_agent: Option<String>,
    created_at: DateTime<Utc>,
    last_activity_at: DateTime<Utc>,
}

impl AuthSessionRow {
    fn into_session(self) -> AccountResult<AuthSession> {
        let public_id = PublicId::from_nanoid(
            Nanoid::from_str(&self.public_id)
                .map_err(|e| AccountError::Internal(format!("Invalid public_id: {}", e)))?,
        );

        let role = UserRole::from_id(self.role)
            .ok_or_else(|| AccountError::Internal(format!("Unknown role id: {}", self.role)))?;

        Ok(AuthSession {
            session_id: self.session_id,
            user_id: UserId::from_uuid(self.user_id),
            public_id,
            role,
            expires_at_ms: self.expires_at_ms,
            client_fingerprint_hash: self.client_fingerprint_hash,
            client_ip: self.client_ip,
            user_agent: self.user_agent,
            created_at: self.created_at,
            last_activity_at: self.last_activity_at,
        })
    }
}

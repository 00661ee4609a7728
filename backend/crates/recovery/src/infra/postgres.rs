//! PostgreSQL Repository Implementations

use crate::domain::entities::{RecoveryFlow, RecoveryStep};
use crate::domain::repository::{
    AccountGateway, RecoveryAccount, RecoveryFlowRepository, RecoveryRateLimitRepository,
};
use crate::domain::value_objects::ClientFingerprint;
use crate::error::{RecoveryError, RecoveryResult};
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

const OLD_WINDOW_MS: i64 = 3600_000; // 1 hour

/// PostgreSQL-backed repository
#[derive(Clone)]
pub struct PgRecoveryRepository {
    pool: PgPool,
}

impl PgRecoveryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Clean up expired flows and stale rate limit windows
    pub async fn cleanup_expired(&self) -> RecoveryResult<(u64, u64)> {
        let now_ms = Utc::now().timestamp_millis();
        let old_window_ms = now_ms - OLD_WINDOW_MS;

        let flows_deleted = sqlx::query("DELETE FROM recovery_flows WHERE expires_at_ms < $1")
            .bind(now_ms)
            .execute(&self.pool)
            .await?
            .rows_affected();

        let rate_limits_deleted =
            sqlx::query("DELETE FROM recovery_rate_limits WHERE window_start_ms < $1")
                .bind(old_window_ms)
                .execute(&self.pool)
                .await?
                .rows_affected();

        tracing::info!(
            flows = flows_deleted,
            rate_limits = rate_limits_deleted,
            "Cleaned up expired recovery data"
        );

        Ok((flows_deleted, rate_limits_deleted))
    }
}

impl RecoveryFlowRepository for PgRecoveryRepository {
    async fn create(&self, flow: &RecoveryFlow) -> RecoveryResult<()> {
        sqlx::query(
            r#"
            INSERT INTO recovery_flows (
                flow_id,
                user_id,
                email,
                step,
                code_hash,
                code_expires_at_ms,
                resend_available_at_ms,
                failed_attempts,
                expires_at_ms,
                client_fingerprint_hash,
                client_ip,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11::inet, $12, $13)
            "#,
        )
        .bind(flow.flow_id)
        .bind(flow.user_id)
        .bind(&flow.email)
        .bind(flow.step.id())
        .bind(&flow.code_hash)
        .bind(flow.code_expires_at_ms)
        .bind(flow.resend_available_at_ms)
        .bind(flow.failed_attempts)
        .bind(flow.expires_at_ms)
        .bind(&flow.client_fingerprint_hash)
        .bind(flow.client_ip.as_ref().map(|ip| ip.to_string()))
        .bind(flow.created_at)
        .bind(flow.updated_at)
        .execute(&self.pool)
        .await?;

        tracing::info!(flow_id = %flow.flow_id, "Recovery flow created");

        Ok(())
    }

    async fn find_by_id(&self, flow_id: Uuid) -> RecoveryResult<Option<RecoveryFlow>> {
        let row = sqlx::query_as::<_, RecoveryFlowRow>(
            r#"
            SELECT
                flow_id,
                user_id,
                email,
                step,
                code_hash,
                code_expires_at_ms,
                resend_available_at_ms,
                failed_attempts,
                expires_at_ms,
                client_fingerprint_hash,
                client_ip::TEXT,
                created_at,
                updated_at
            FROM recovery_flows
            WHERE flow_id = $1
            "#,
        )
        .bind(flow_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_flow()).transpose()
    }

    async fn update(&self, flow: &RecoveryFlow) -> RecoveryResult<()> {
        sqlx::query(
            r#"
            UPDATE recovery_flows SET
                step = $2,
                code_hash = $3,
                code_expires_at_ms = $4,
                resend_available_at_ms = $5,
                failed_attempts = $6,
                updated_at = $7
            WHERE flow_id = $1
            "#,
        )
        .bind(flow.flow_id)
        .bind(flow.step.id())
        .bind(&flow.code_hash)
        .bind(flow.code_expires_at_ms)
        .bind(flow.resend_available_at_ms)
        .bind(flow.failed_attempts)
        .bind(flow.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, flow_id: Uuid) -> RecoveryResult<()> {
        sqlx::query("DELETE FROM recovery_flows WHERE flow_id = $1")
            .bind(flow_id)
            .execute(&self.pool)
            .await?;

        tracing::info!(flow_id = %flow_id, "Recovery flow deleted");
        Ok(())
    }
}

impl RecoveryRateLimitRepository for PgRecoveryRepository {
    async fn check(
        &self,
        fingerprint: &ClientFingerprint,
        max_requests: u32,
        window_ms: i64,
    ) -> RecoveryResult<bool> {
        let now_ms = Utc::now().timestamp_millis();
        let window_start = (now_ms / window_ms) * window_ms;

        let row = sqlx::query_as::<_, (i32,)>(
            r#"
            INSERT INTO recovery_rate_limits (client_fingerprint_hash, window_start_ms, request_count)
            VALUES ($1, $2, 1)
            ON CONFLICT (client_fingerprint_hash, window_start_ms)
            DO UPDATE SET request_count = recovery_rate_limits.request_count + 1
            RETURNING request_count
            "#,
        )
        .bind(fingerprint.hash.as_slice())
        .bind(window_start)
        .fetch_one(&self.pool)
        .await?;

        let count = row.0 as u32;
        let allowed = count <= max_requests;

        if !allowed {
            tracing::warn!(count = count, max = max_requests, "Recovery rate limit exceeded");
        }

        Ok(allowed)
    }
}

impl AccountGateway for PgRecoveryRepository {
    async fn find_account_by_email(&self, email: &str) -> RecoveryResult<Option<RecoveryAccount>> {
        let row = sqlx::query_as::<_, (Uuid, String, String)>(
            r#"
            SELECT user_id, email, display_name
            FROM users
            WHERE email = $1 AND status = 0
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(user_id, email, display_name)| RecoveryAccount {
            user_id,
            email,
            display_name,
        }))
    }

    async fn replace_password_hash(&self, user_id: Uuid, phc: &str) -> RecoveryResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE credentials SET
                password_hash = $2,
                login_failed_count = 0,
                last_failed_at = NULL,
                locked_until = NULL,
                updated_at = NOW()
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .bind(phc)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RecoveryError::Internal(format!(
                "No credential row for user {user_id}"
            )));
        }

        tracing::info!(user_id = %user_id, "Password hash replaced");
        Ok(())
    }

    async fn revoke_sessions(&self, user_id: Uuid) -> RecoveryResult<u64> {
        let revoked = sqlx::query("DELETE FROM auth_sessions WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        tracing::info!(user_id = %user_id, revoked = revoked, "Sessions revoked");
        Ok(revoked)
    }
}

// Internal row type for sqlx mapping
#[derive(sqlx::FromRow)]
struct RecoveryFlowRow {
    flow_id: Uuid,
    user_id: Uuid,
    email: String,
    step: i16,
    code_hash: Vec<u8>,
    code_expires_at_ms: i64,
    resend_available_at_ms: i64,
    failed_attempts: i16,
    expires_at_ms: i64,
    client_fingerprint_hash: Vec<u8>,
    client_ip: Option<String>,
    created_at: chrono::DateTime<Utc>,
    updated_at: chrono::DateTime<Utc>,
}

impl RecoveryFlowRow {
    fn into_flow(self) -> RecoveryResult<RecoveryFlow> {
        let step = RecoveryStep::from_id(self.step)
            .ok_or_else(|| RecoveryError::Internal(format!("Unknown recovery step {}", self.step)))?;

        Ok(RecoveryFlow {
            flow_id: self.flow_id,
            user_id: self.user_id,
            email: self.email,
            step,
            code_hash: self.code_hash,
            code_expires_at_ms: self.code_expires_at_ms,
            resend_available_at_ms: self.resend_available_at_ms,
            failed_attempts: self.failed_attempts,
            expires_at_ms: self.expires_at_ms,
            client_fingerprint_hash: self.client_fingerprint_hash,
            client_ip: self.client_ip.and_then(|s| s.parse().ok()),
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

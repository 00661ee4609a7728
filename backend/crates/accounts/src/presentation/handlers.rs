//! HTTP Handlers

use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use std::sync::Arc;

use platform::client::{extract_client_ip, extract_fingerprint};
use platform::cookie::CookieConfig;

use crate::application::config::AccountConfig;
use crate::application::{
    CheckSessionUseCase, RegisterInput, RegisterUseCase, SignInInput, SignInUseCase,
    SignOutUseCase,
};
use crate::domain::repository::{
    CredentialRepository, SessionRepository, UserRepository, VendorProfileRepository,
};
use crate::error::AccountResult;
use crate::presentation::dto::{
    LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, SessionStatusResponse,
};
use crate::presentation::middleware::{UserCookiePayload, decode_user_cookie, encode_user_cookie};

/// Shared state for account handlers
#[derive(Clone)]
pub struct AccountAppState<R>
where
    R: UserRepository
        + VendorProfileRepository
        + CredentialRepository
        + SessionRepository
        + Clone
        + Send
        + Sync
        + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<AccountConfig>,
}

/// POST /api/accounts/register
pub async fn register<R>(
    State(state): State<AccountAppState<R>>,
    Json(req): Json<RegisterRequest>,
) -> AccountResult<Json<RegisterResponse>>
where
    R: UserRepository
        + VendorProfileRepository
        + CredentialRepository
        + SessionRepository
        + Clone
        + Send
        + Sync
        + 'static,
{
    let use_case = RegisterUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.repo.clone(),
        state.config.clone(),
    );

    let (location_lat, location_lng, location_address) = match req.location {
        Some(loc) => (loc.lat, loc.lng, loc.address),
        None => (None, None, None),
    };

    let input = RegisterInput {
        name: req.name,
        email: req.email,
        phone: req.phone,
        password: req.password,
        confirm_password: req.confirm_password,
        role: req.role,
        business_name: req.business_name,
        business_description: req.business_description,
        location_lat,
        location_lng,
        location_address,
        agree_to_terms: req.agree_to_terms,
    };

    let output = use_case.execute(input).await?;

    Ok(Json(RegisterResponse {
        public_id: output.public_id,
        redirect_to: output.redirect_to.to_string(),
    }))
}

/// POST /api/accounts/login
pub async fn login<R>(
    State(state): State<AccountAppState<R>>,
    headers: HeaderMap,
    axum::extract::ConnectInfo(addr): axum::extract::ConnectInfo<std::net::SocketAddr>,
    Json(req): Json<LoginRequest>,
) -> AccountResult<impl IntoResponse>
where
    R: UserRepository
        + VendorProfileRepository
        + CredentialRepository
        + SessionRepository
        + Clone
        + Send
        + Sync
        + 'static,
{
    let client_ip = extract_client_ip(&headers, Some(addr.ip()));
    let fingerprint = extract_fingerprint(&headers, client_ip)?;

    let use_case = SignInUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.repo.clone(),
        state.config.clone(),
    );

    let input = SignInInput {
        email: req.email,
        password: req.password,
    };

    let output = use_case.execute(input, fingerprint).await?;

    let payload = UserCookiePayload {
        role: output.role.code().to_string(),
        token: Some(output.session_token.clone()),
    };
    let cookie =
        session_cookie_config(&state.config).build_set_cookie(&encode_user_cookie(&payload));

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(LoginResponse {
            public_id: output.public_id,
            role: output.role.code().to_string(),
            redirect_to: output.redirect_to.to_string(),
        }),
    ))
}

/// POST /api/accounts/logout
pub async fn logout<R>(
    State(state): State<AccountAppState<R>>,
    headers: HeaderMap,
) -> AccountResult<impl IntoResponse>
where
    R: UserRepository
        + VendorProfileRepository
        + CredentialRepository
        + SessionRepository
        + Clone
        + Send
        + Sync
        + 'static,
{
    if let Some(token) = extract_session_token(&headers, &state.config) {
        let use_case = SignOutUseCase::new(state.repo.clone(), state.config.clone());
        // Ignore errors - the cookie is cleared regardless
        let _ = use_case.execute(&token).await;
    }

    let cookie = session_cookie_config(&state.config).build_delete_cookie();

    Ok((StatusCode::NO_CONTENT, [(header::SET_COOKIE, cookie)]))
}

/// GET /api/accounts/status
pub async fn session_status<R>(
    State(state): State<AccountAppState<R>>,
    headers: HeaderMap,
    axum::extract::ConnectInfo(addr): axum::extract::ConnectInfo<std::net::SocketAddr>,
) -> AccountResult<Json<SessionStatusResponse>>
where
    R: UserRepository
        + VendorProfileRepository
        + CredentialRepository
        + SessionRepository
        + Clone
        + Send
        + Sync
        + 'static,
{
    let client_ip = extract_client_ip(&headers, Some(addr.ip()));
    let fingerprint = extract_fingerprint(&headers, client_ip)?;

    let use_case = CheckSessionUseCase::new(state.repo.clone(), state.config.clone());

    let session_info = if let Some(token) = extract_session_token(&headers, &state.config) {
        use_case.execute(&token, &fingerprint.hash).await.ok()
    } else {
        None
    };

    match session_info {
        Some(info) => Ok(Json(SessionStatusResponse {
            authenticated: true,
            public_id: Some(info.public_id),
            role: Some(info.role),
            expires_at_ms: Some(info.expires_at_ms),
        })),
        None => Ok(Json(SessionStatusResponse {
            authenticated: false,
            public_id: None,
            role: None,
            expires_at_ms: None,
        })),
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Pull the signed session token out of the `user` cookie payload
fn extract_session_token(headers: &HeaderMap, config: &AccountConfig) -> Option<String> {
    let value = platform::cookie::extract_cookie(headers, &config.session_cookie_name)?;
    decode_user_cookie(&value)?.token
}

fn session_cookie_config(config: &AccountConfig) -> CookieConfig {
    CookieConfig {
        name: config.session_cookie_name.clone(),
        secure: config.cookie_secure,
        http_only: true,
        same_site: config.cookie_same_site,
        path: "/".to_string(),
        max_age_secs: Some(config.session_ttl.as_secs() as i64),
    }
}

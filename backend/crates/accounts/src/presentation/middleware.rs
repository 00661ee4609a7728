//! Route Access Guard
//!
//! Gates the privileged admin section on the role claim carried in the
//! `user` cookie. The decision itself is a pure function of
//! (path, cookie value) so it can be tested without a running server;
//! the axum middleware is a thin adapter around it.

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::domain::value_object::user_role::UserRole;

/// Cookie inspected by the guard
pub const USER_COOKIE_NAME: &str = "user";

/// Admin-only path prefix
pub const SUPER_ADMIN_PREFIX: &str = "/super-admin";

/// Admin login page (exact match)
pub const ADMIN_LOGIN_PATH: &str = "/login-admin";

/// Dashboard the guard sends authenticated admins to
pub const SUPER_ADMIN_DASHBOARD: &str = "/super-admin/dashboard";

/// Payload carried in the `user` cookie
///
/// The JSON is base64url-encoded to stay within the cookie value
/// charset. The guard only reads `role`; `token` is the signed session
/// reference consumed by the session endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCookiePayload {
    /// Role code ("user", "vendor", "super-admin")
    pub role: String,
    /// Signed session token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

/// Encode the cookie payload for Set-Cookie
pub fn encode_user_cookie(payload: &UserCookiePayload) -> String {
    // Serialization of this struct cannot fail.
    let json = serde_json::to_vec(payload).unwrap_or_default();
    platform::crypto::to_base64_url(&json)
}

/// Decode a presented cookie value
///
/// Returns `None` on any malformation; callers treat that as an
/// absent/invalid cookie.
pub fn decode_user_cookie(value: &str) -> Option<UserCookiePayload> {
    let json = platform::crypto::from_base64_url(value).ok()?;
    serde_json::from_slice(&json).ok()
}

/// Guard verdict for one request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// Request passes through unmodified
    Pass,
    /// Redirect to the given path (303)
    Redirect(&'static str),
}

/// Pure access decision for (path, cookie value)
///
/// Rules:
/// - Paths outside `/super-admin` and `/login-admin` always pass.
/// - `/super-admin/*` without a parsable cookie redirects to the admin
///   login page (fail closed).
/// - `/super-admin/*` with a non-admin role redirects to that role's
///   own dashboard; an unknown role fails closed.
/// - `/login-admin` redirects an already-authenticated admin to the
///   admin dashboard; everyone else may see the login page.
pub fn decide(path: &str, cookie: Option<&str>) -> GuardDecision {
    let is_admin_area = path == SUPER_ADMIN_PREFIX
        || path.strip_prefix(SUPER_ADMIN_PREFIX).is_some_and(|rest| rest.starts_with('/'));
    let is_admin_login = path == ADMIN_LOGIN_PATH;

    if !is_admin_area && !is_admin_login {
        return GuardDecision::Pass;
    }

    let role = cookie
        .and_then(decode_user_cookie)
        .and_then(|payload| UserRole::from_code(&payload.role));

    if is_admin_login {
        // Prevent re-login for an authenticated admin.
        return match role {
            Some(role) if role.is_super_admin() => GuardDecision::Redirect(SUPER_ADMIN_DASHBOARD),
            _ => GuardDecision::Pass,
        };
    }

    match role {
        Some(role) if role.is_super_admin() => GuardDecision::Pass,
        Some(role) => GuardDecision::Redirect(role.dashboard_path()),
        None => GuardDecision::Redirect(ADMIN_LOGIN_PATH),
    }
}

/// Axum middleware adapter around [`decide`]
pub async fn route_guard(req: Request<Body>, next: Next) -> Response {
    let cookie = platform::cookie::extract_cookie(req.headers(), USER_COOKIE_NAME);

    match decide(req.uri().path(), cookie.as_deref()) {
        GuardDecision::Pass => next.run(req).await,
        GuardDecision::Redirect(target) => {
            tracing::debug!(path = %req.uri().path(), target, "Route guard redirect");
            (StatusCode::SEE_OTHER, [(header::LOCATION, target)]).into_response()
        }
    }
}

//! Session Token Signing
//!
//! Tokens are `<session_id>.<signature>` where the signature is an
//! HMAC-SHA256 over the UUID string, base64url-encoded. The database
//! holds the session row; the signature only proves the token was
//! issued by this server.

use platform::crypto::{from_base64_url, hmac_sha256, hmac_sha256_verify};
use uuid::Uuid;

/// Sign a session id into a cookie-safe token
pub fn sign_session_token(session_id: Uuid, secret: &[u8; 32]) -> String {
    let session_id = session_id.to_string();
    let signature = hmac_sha256(secret, session_id.as_bytes());
    format!(
        "{}.{}",
        session_id,
        platform::crypto::to_base64_url(&signature)
    )
}

/// Parse and verify a session token
///
/// Returns `None` on any malformation or signature mismatch.
pub fn parse_session_token(token: &str, secret: &[u8; 32]) -> Option<Uuid> {
    let (session_id, signature) = token.split_once('.')?;
    let signature = from_base64_url(signature).ok()?;

    if !hmac_sha256_verify(secret, session_id.as_bytes(), &signature) {
        return None;
    }

    Uuid::parse_str(session_id).ok()
}

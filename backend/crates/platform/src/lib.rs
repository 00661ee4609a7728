//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (SHA-256, HMAC, Base64, numeric codes)
//! - Password hashing (Argon2id, NIST SP 800-63B compliant)
//! - Cookie management
//! - Client identification (fingerprint, IP extraction)

pub mod client;
pub mod cookie;
pub mod crypto;
pub mod password;

//! Application layer - Use cases

pub mod config;
pub mod request_code;
pub mod resend_code;
pub mod reset_password;
pub mod verify_code;

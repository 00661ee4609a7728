//! Application layer (use cases)

pub mod check_session;
pub mod config;
pub mod register;
pub mod session_token;
pub mod sign_in;
pub mod sign_out;

pub use check_session::CheckSessionUseCase;
pub use config::AccountConfig;
pub use register::{RegisterInput, RegisterOutput, RegisterUseCase};
pub use sign_in::{SignInInput, SignInOutput, SignInUseCase};
pub use sign_out::SignOutUseCase;

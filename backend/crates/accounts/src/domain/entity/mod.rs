//! Domain entities

pub mod credential;
pub mod session;
pub mod user;
pub mod vendor_profile;

pub use credential::Credential;
pub use session::AuthSession;
pub use user::User;
pub use vendor_profile::VendorProfile;

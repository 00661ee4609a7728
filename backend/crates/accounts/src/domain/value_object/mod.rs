//! Value Objects

pub mod email;
pub mod geo_point;
pub mod phone;
pub mod public_id;
pub mod user_id;
pub mod user_password;
pub mod user_role;
pub mod user_status;

pub use email::Email;
pub use geo_point::GeoPoint;
pub use phone::Phone;
pub use public_id::PublicId;
pub use user_id::UserId;
pub use user_password::{RawPassword, UserPassword};
pub use user_role::UserRole;
pub use user_status::UserStatus;

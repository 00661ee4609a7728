//! Infrastructure layer

pub mod email;
pub mod postgres;

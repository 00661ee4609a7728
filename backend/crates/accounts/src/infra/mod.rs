//! Infrastructure layer

pub mod postgres;

pub use postgres::PgAccountRepository;

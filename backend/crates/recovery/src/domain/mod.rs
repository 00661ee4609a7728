//! Domain layer

pub mod entities;
pub mod notifier;
pub mod repository;
pub mod services;
pub mod value_objects;

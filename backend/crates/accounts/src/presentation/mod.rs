//! Presentation layer (HTTP)

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod router;

pub use middleware::{GuardDecision, decide, route_guard};
pub use router::{account_router, account_router_generic};

//! HTTP API surface
//!
//! Three endpoints: unauthenticated login and info, bearer-protected
//! prediction.

pub mod handlers;
pub mod models;
pub mod routes;

pub use routes::router;

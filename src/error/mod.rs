//! Error handling
//!
//! Defines error types and handling for the coral bleaching API server.

pub mod handlers;
pub mod types;

pub use types::*;

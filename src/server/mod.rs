//! Server core functionality
//!
//! Startup orchestration and the shared application state.

pub mod core;
pub mod state;

pub use core::Server;
pub use state::AppState;

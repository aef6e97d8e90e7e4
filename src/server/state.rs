//! Shared application state
//!
//! Everything on the request path is read-only after startup, so the
//! state is a bundle of `Arc`s safe for unsynchronized concurrent reads.

use std::sync::Arc;

use crate::auth::{TokenIssuer, UserStore};
use crate::model::BleachingModel;

/// Read-only state shared by all request handlers
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<UserStore>,
    pub tokens: Arc<TokenIssuer>,
    pub model: Arc<BleachingModel>,
    /// Re-verify the token subject against the user store on every
    /// protected request (see `auth.recheck_user_status` in config)
    pub recheck_user_status: bool,
}

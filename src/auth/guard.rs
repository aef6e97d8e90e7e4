//! Identity guard for protected endpoints
//!
//! Extracts the bearer token from the request, verifies it, and resolves
//! the subject against the user store. Every failure path collapses into
//! the same unauthorized response; the specific cause only reaches the
//! log.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;
use log::{debug, warn};

use crate::auth::credentials::User;
use crate::error::{ApiError, AuthError};
use crate::server::AppState;

/// The authenticated user resolved from a request's bearer token
///
/// Any handler taking this extractor is unreachable without a valid
/// token whose subject is a known user.
pub struct AuthUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let bearer = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "));

        let token = match bearer {
            Some(token) => token,
            None => {
                debug!("Request rejected: missing or non-bearer Authorization header");
                return Err(ApiError::Unauthorized);
            }
        };

        let subject = match state.tokens.verify(token) {
            Ok(subject) => subject,
            Err(e) => {
                warn!("Token rejected: {}", e);
                return Err(ApiError::Unauthorized);
            }
        };

        let user = match state.users.get(&subject) {
            Some(user) => user,
            None => {
                warn!("{}", AuthError::UnknownUser(subject));
                return Err(ApiError::Unauthorized);
            }
        };

        if state.recheck_user_status && user.disabled {
            warn!("{}", AuthError::Disabled(subject));
            return Err(ApiError::Unauthorized);
        }

        Ok(AuthUser(user.clone()))
    }
}

//! Error handlers
//!
//! Maps internal error types onto HTTP responses.

use axum::Json;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::error::types::ApiError;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Unauthorized => {
                // Uniform body regardless of which auth sub-check failed
                let body = Json(json!({ "error": "Incorrect or missing credentials" }));
                let mut response = (StatusCode::UNAUTHORIZED, body).into_response();
                response.headers_mut().insert(
                    header::WWW_AUTHENTICATE,
                    HeaderValue::from_static("Bearer"),
                );
                response
            }
            ApiError::Internal(_) => {
                let body = Json(json!({ "error": "Internal server error" }));
                (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
            }
        }
    }
}

/// Convert an error to its HTTP status code
pub fn error_to_status(err: &ApiError) -> StatusCode {
    match err {
        ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
        ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized_sets_challenge_header() {
        let response = ApiError::Unauthorized.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Bearer"
        );
    }

    #[test]
    fn test_internal_maps_to_500() {
        let response = ApiError::Internal("boom".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            error_to_status(&ApiError::Unauthorized),
            StatusCode::UNAUTHORIZED
        );
    }
}

//! HTTP request handlers

use axum::extract::State;
use axum::{Form, Json};
use log::{info, warn};

use crate::api::models::{
    InfoResponse, LoginForm, PredictionRequest, PredictionResponse, TokenResponse,
};
use crate::auth::AuthUser;
use crate::auth::password;
use crate::error::{ApiError, AuthError};
use crate::server::AppState;

/// `POST /token`: exchange username and password for an access token
///
/// Unknown usernames and wrong passwords are indistinguishable to the
/// client; both produce the same unauthorized response.
pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Json<TokenResponse>, ApiError> {
    let valid = state
        .users
        .get(&form.username)
        .map(|user| !user.disabled && password::verify_password(&form.password, &user.hashed_password))
        .unwrap_or(false);

    if !valid {
        warn!(
            "Login failed for '{}': {}",
            form.username,
            AuthError::InvalidCredentials
        );
        return Err(ApiError::Unauthorized);
    }

    let access_token = state.tokens.issue(&form.username).map_err(|e| {
        warn!("Token issue failed for '{}': {}", form.username, e);
        ApiError::Internal(e.to_string())
    })?;

    info!("Issued access token for '{}'", form.username);
    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
    }))
}

/// `POST /predict`: run the bleaching classifier for an authenticated
/// caller
pub async fn predict(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(input): Json<PredictionRequest>,
) -> Json<PredictionResponse> {
    let features = input.feature_vector();
    let prediction = state.model.predict(&features);

    info!("Prediction {} for user '{}'", prediction, user.username);
    Json(PredictionResponse {
        prediction,
        user: user.username,
    })
}

/// `GET /`: unauthenticated service info
pub async fn root() -> Json<InfoResponse> {
    Json(InfoResponse {
        message: "Welcome to the Coral API! POST /token to log in, then POST /predict.".to_string(),
    })
}

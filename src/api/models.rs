//! Request and response bodies for the HTTP API

use serde::{Deserialize, Serialize};

use crate::model::forest::FEATURE_COUNT;

/// Form body for `POST /token`
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Response body for `POST /token`
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

/// JSON body for `POST /predict`
///
/// All five fields are required and numeric; schema violations are
/// rejected before the model is touched.
#[derive(Debug, Deserialize)]
pub struct PredictionRequest {
    #[serde(rename = "Turbidity")]
    pub turbidity: f64,
    #[serde(rename = "Depth_m")]
    pub depth_m: f64,
    #[serde(rename = "Temperature_Maximum")]
    pub temperature_maximum: f64,
    #[serde(rename = "SSTA_DHW")]
    pub ssta_dhw: f64,
    #[serde(rename = "TSA_DHW")]
    pub tsa_dhw: f64,
}

impl PredictionRequest {
    /// Assemble the feature vector in the exact training column order:
    /// SSTA_DHW, TSA_DHW, Temperature_Maximum, Turbidity, Depth_m.
    ///
    /// JSON key order in the request body is irrelevant; this mapping is
    /// the only place request fields meet model input positions.
    pub fn feature_vector(&self) -> [f64; FEATURE_COUNT] {
        [
            self.ssta_dhw,
            self.tsa_dhw,
            self.temperature_maximum,
            self.turbidity,
            self.depth_m,
        ]
    }
}

/// Response body for `POST /predict`
#[derive(Debug, Serialize)]
pub struct PredictionResponse {
    pub prediction: u8,
    pub user: String,
}

/// Response body for `GET /`
#[derive(Debug, Serialize)]
pub struct InfoResponse {
    pub message: String,
}

//! Access token issuing and verification
//!
//! Signed, self-contained HS256 tokens carrying the subject username and
//! an absolute expiry. Validity is decided entirely by signature and
//! expiry; there is no server-side session state and no revocation.

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::AuthError;

/// Claims embedded in an access token
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject username
    pub sub: String,
    /// Expiry (unix timestamp, seconds)
    pub exp: u64,
    /// Issued at (unix timestamp, seconds)
    pub iat: u64,
}

/// Issues and verifies access tokens with a fixed secret and TTL
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenIssuer {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        // Zero leeway: a token is valid through its expiry second and
        // rejected strictly after it.
        let mut validation = Validation::default();
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        }
    }

    /// Issue a signed token for the given subject, expiring after the
    /// configured TTL
    pub fn issue(&self, subject: &str) -> Result<String, jsonwebtoken::errors::Error> {
        let now = jsonwebtoken::get_current_timestamp();
        let claims = Claims {
            sub: subject.to_string(),
            exp: now + self.ttl.as_secs(),
            iat: now,
        };
        encode(&Header::default(), &claims, &self.encoding_key)
    }

    /// Verify a token and return its subject
    pub fn verify(&self, token: &str) -> Result<String, AuthError> {
        match decode::<Claims>(token, &self.decoding_key, &self.validation) {
            Ok(data) => Ok(data.claims.sub),
            Err(e) => match e.kind() {
                ErrorKind::ExpiredSignature => Err(AuthError::Expired),
                ErrorKind::InvalidSignature => Err(AuthError::InvalidSignature),
                _ => Err(AuthError::Malformed),
            },
        }
    }
}

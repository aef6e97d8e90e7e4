//! Configuration management for the coral bleaching API server
//!
//! All startup state lives here: HTTP bind settings, token signing
//! parameters, the model artifact candidate list, and the user store
//! entries. Loaded once at startup; nothing is mutated afterwards.

use config::{Config, Environment, File};
use serde::Deserialize;
use std::time::Duration;

/// Complete server configuration loaded from config.toml
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub server: HttpConfig,
    pub auth: AuthConfig,
    pub model: ModelConfig,
    pub users: Vec<UserEntry>,
}

/// HTTP listener settings
#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    /// IP address to bind the HTTP listener
    pub bind_address: String,

    /// Port for the HTTP listener
    pub port: u16,
}

/// Token issuing and verification settings
#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    /// Secret key used to sign access tokens
    pub token_secret: String,

    /// Lifetime of an issued access token, in minutes
    pub token_ttl_minutes: u64,

    /// Re-check that the token subject still exists and is not disabled
    /// on every protected request, instead of trusting token validity
    /// alone. Off by default: a token issued before a user was disabled
    /// stays usable until it expires.
    #[serde(default)]
    pub recheck_user_status: bool,
}

/// Model artifact settings
#[derive(Debug, Deserialize, Clone)]
pub struct ModelConfig {
    /// Candidate artifact paths, tried in order; the first existing
    /// file wins
    pub paths: Vec<String>,
}

/// One user record as written in config.toml
///
/// Carries either `password_hash` (a bcrypt hash, preferred) or a
/// plaintext `password` that gets hashed during startup.
#[derive(Debug, Deserialize, Clone)]
pub struct UserEntry {
    pub username: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub password_hash: Option<String>,
}

impl ServerConfig {
    /// Load configuration from config.toml with environment overrides
    pub fn load() -> Result<Self, config::ConfigError> {
        // Try the container path first, then the local development path
        let config_paths = vec![
            "coral-server/config", // Docker: /app/coral-server/config.toml
            "config",              // Local development: ./config.toml
        ];

        let mut last_error = None;

        for config_path in &config_paths {
            match Config::builder()
                .add_source(File::with_name(config_path))
                .add_source(Environment::with_prefix("CORAL").separator("_"))
                .build()
            {
                Ok(settings) => {
                    let config: ServerConfig = settings.try_deserialize()?;
                    config.validate()?;
                    return Ok(config);
                }
                Err(e) => {
                    last_error = Some(e);
                    continue;
                }
            }
        }

        panic!(
            "Failed to load config.toml from any location. Tried: {config_paths:?}. Last error: {last_error:?}"
        );
    }

    /// Validation for all configuration values
    fn validate(&self) -> Result<(), config::ConfigError> {
        if self.server.port == 0 {
            return Err(config::ConfigError::Message(
                "Listener port cannot be 0".into(),
            ));
        }

        if self.auth.token_secret.is_empty() {
            return Err(config::ConfigError::Message(
                "token_secret cannot be empty".into(),
            ));
        }

        if self.auth.token_ttl_minutes == 0 {
            return Err(config::ConfigError::Message(
                "token_ttl_minutes must be greater than 0".into(),
            ));
        }

        if self.model.paths.is_empty() {
            return Err(config::ConfigError::Message(
                "model.paths must list at least one artifact candidate".into(),
            ));
        }

        if self.users.is_empty() {
            return Err(config::ConfigError::Message(
                "at least one user must be configured".into(),
            ));
        }

        for user in &self.users {
            if user.username.is_empty() {
                return Err(config::ConfigError::Message(
                    "user entries must have a username".into(),
                ));
            }
            if user.password.is_none() && user.password_hash.is_none() {
                return Err(config::ConfigError::Message(format!(
                    "user '{}' has neither password_hash nor password",
                    user.username
                )));
            }
        }

        Ok(())
    }
}

impl HttpConfig {
    /// Get bind address and port as a socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

impl AuthConfig {
    /// Get the token lifetime as a Duration
    pub fn token_ttl(&self) -> Duration {
        Duration::from_secs(self.token_ttl_minutes * 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> ServerConfig {
        ServerConfig {
            server: HttpConfig {
                bind_address: "127.0.0.1".to_string(),
                port: 8000,
            },
            auth: AuthConfig {
                token_secret: "unit-test-secret".to_string(),
                token_ttl_minutes: 30,
                recheck_user_status: false,
            },
            model: ModelConfig {
                paths: vec!["model.json".to_string()],
            },
            users: vec![UserEntry {
                username: "johndoe".to_string(),
                full_name: "John Doe".to_string(),
                email: "johndoe@example.com".to_string(),
                disabled: false,
                password: Some("secretpassword".to_string()),
                password_hash: None,
            }],
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn test_empty_secret_rejected() {
        let mut config = base_config();
        config.auth.token_secret.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_ttl_rejected() {
        let mut config = base_config();
        config.auth.token_ttl_minutes = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_no_model_candidates_rejected() {
        let mut config = base_config();
        config.model.paths.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_user_without_any_password_rejected() {
        let mut config = base_config();
        config.users[0].password = None;
        config.users[0].password_hash = None;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_token_ttl_duration() {
        let config = base_config();
        assert_eq!(config.auth.token_ttl(), Duration::from_secs(30 * 60));
    }

    #[test]
    fn test_socket_addr_format() {
        assert_eq!(base_config().server.socket_addr(), "127.0.0.1:8000");
    }
}

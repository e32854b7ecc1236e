// SPDX-License-Identifier: MIT

//! Application configuration loaded from environment variables.
//!
//! Everything is read once at startup; a missing required variable is a
//! fatal startup condition.

use std::env;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// GCP project ID for Firestore
    pub gcp_project_id: String,
    /// Server port
    pub port: u16,
    /// JWT signing secret for session tokens (raw bytes)
    pub jwt_secret: Vec<u8>,
    /// Origins allowed to make cross-origin requests
    pub allowed_origins: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// `JWT_SECRET` is required; everything else has a local-dev default.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .map_err(|_| ConfigError::Invalid("PORT"))?,
            jwt_secret: env::var("JWT_SECRET")
                .map_err(|_| ConfigError::Missing("JWT_SECRET"))?
                .into_bytes(),
            allowed_origins: env::var("ALLOWED_ORIGINS")
                .unwrap_or_else(|_| "http://localhost:5173".to_string())
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        })
    }

    /// Fixed config for tests.
    pub fn test_default() -> Self {
        Self {
            gcp_project_id: "test-project".to_string(),
            port: 8080,
            jwt_secret: b"test_jwt_secret_32_bytes_minimum".to_vec(),
            allowed_origins: vec!["http://localhost:5173".to_string()],
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        env::set_var("JWT_SECRET", "test_jwt_secret_32_bytes_minimum");
        env::set_var("ALLOWED_ORIGINS", "https://app.example.com, http://localhost:5173");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.port, 8080);
        assert_eq!(config.jwt_secret, b"test_jwt_secret_32_bytes_minimum");
        assert_eq!(
            config.allowed_origins,
            vec!["https://app.example.com", "http://localhost:5173"]
        );
    }
}

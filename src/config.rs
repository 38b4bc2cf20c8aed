//! Provider configuration
//!
//! Credentials are passed in explicitly at construction; the only ambient
//! lookup is `from_env`, which fails fast naming the missing variable.

use crate::FareError;

/// Default Amadeus Self-Service host (the sandbox environment)
pub const AMADEUS_TEST_HOST: &str = "https://test.api.amadeus.com";

/// Default Travelpayouts data API host
pub const TRAVELPAYOUTS_HOST: &str = "https://api.travelpayouts.com";

/// Credentials and host for the Amadeus Self-Service API
#[derive(Debug, Clone)]
pub struct AmadeusConfig {
    pub client_id: String,
    pub client_secret: String,
    pub base_url: String,
}

impl AmadeusConfig {
    pub fn new(client_id: &str, client_secret: &str) -> Self {
        Self {
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            base_url: AMADEUS_TEST_HOST.to_string(),
        }
    }

    /// Point the client at a different host, e.g. the production environment
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Load credentials from `AMADEUS_CLIENT_ID` and `AMADEUS_CLIENT_SECRET`
    pub fn from_env() -> Result<Self, FareError> {
        let client_id = require_env("AMADEUS_CLIENT_ID")?;
        let client_secret = require_env("AMADEUS_CLIENT_SECRET")?;
        Ok(Self::new(&client_id, &client_secret))
    }
}

/// Token and host for the Travelpayouts price-calendar API
#[derive(Debug, Clone)]
pub struct TravelpayoutsConfig {
    pub token: String,
    pub base_url: String,
}

impl TravelpayoutsConfig {
    pub fn new(token: &str) -> Self {
        Self {
            token: token.to_string(),
            base_url: TRAVELPAYOUTS_HOST.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Load the token from `TRAVELPAYOUTS_TOKEN`
    pub fn from_env() -> Result<Self, FareError> {
        let token = require_env("TRAVELPAYOUTS_TOKEN")?;
        Ok(Self::new(&token))
    }
}

fn require_env(name: &str) -> Result<String, FareError> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(FareError::Config(format!(
            "environment variable {} is not set",
            name
        ))),
    }
}

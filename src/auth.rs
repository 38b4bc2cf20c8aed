//! OAuth2 client-credentials token provider
//!
//! Exchanges the configured id/secret for a bearer token and keeps it for a
//! bounded interval so repeated searches do not re-authenticate. There is no
//! retry on transient failure: the caller sees the error directly.

use std::time::{Duration, Instant};

use reqwest::StatusCode;
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::config::AmadeusConfig;
use crate::FareError;

/// Tokens are refreshed after 25 minutes, inside the provider's own window
const TOKEN_TTL: Duration = Duration::from_secs(25 * 60);

const TOKEN_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

struct CachedToken {
    value: String,
    deadline: Instant,
}

/// Owns the bearer token and its lifecycle; never persisted anywhere
pub struct TokenProvider {
    http: reqwest::Client,
    config: AmadeusConfig,
    cached: Mutex<Option<CachedToken>>,
}

impl TokenProvider {
    pub fn new(config: AmadeusConfig) -> Result<Self, FareError> {
        let http = reqwest::Client::builder().timeout(TOKEN_TIMEOUT).build()?;
        Ok(Self::with_client(http, config))
    }

    /// Reuse an existing HTTP client instead of building a dedicated one
    pub(crate) fn with_client(http: reqwest::Client, config: AmadeusConfig) -> Self {
        Self {
            http,
            config,
            cached: Mutex::new(None),
        }
    }

    /// Current bearer token, fetched on first use and re-fetched on expiry
    pub async fn bearer(&self) -> Result<String, FareError> {
        let mut guard = self.cached.lock().await;
        if let Some(token) = guard.as_ref() {
            if token.deadline > Instant::now() {
                debug!("reusing cached access token");
                return Ok(token.value.clone());
            }
        }

        let url = format!("{}/v1/security/oauth2/token", self.config.base_url);
        info!(url = %url, "requesting access token");
        let response = self
            .http
            .post(&url)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
            ])
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;

        let token = interpret_token_response(status, &body)?;
        *guard = Some(CachedToken {
            value: token.clone(),
            deadline: Instant::now() + TOKEN_TTL,
        });
        Ok(token)
    }

    /// Drop the cached token so the next call re-authenticates
    pub async fn invalidate(&self) {
        *self.cached.lock().await = None;
    }
}

/// Turn a token-endpoint response into a bearer string or an auth error
fn interpret_token_response(status: StatusCode, body: &str) -> Result<String, FareError> {
    if !status.is_success() {
        warn!(status = %status, "token exchange rejected");
        return Err(FareError::Auth {
            status: status.as_u16(),
            body: body.to_string(),
        });
    }

    let parsed: TokenResponse =
        serde_json::from_str(body).map_err(|e| FareError::MalformedToken(e.to_string()))?;
    if parsed.access_token.is_empty() {
        return Err(FareError::MalformedToken(
            "access_token field is empty".to_string(),
        ));
    }
    if let Some(expires_in) = parsed.expires_in {
        debug!(expires_in, "token issued");
    }
    Ok(parsed.access_token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_successful_exchange() {
        let body = r#"{"access_token":"abc123","token_type":"Bearer","expires_in":1799}"#;
        let token = interpret_token_response(StatusCode::OK, body).unwrap();
        assert_eq!(token, "abc123");
    }

    #[test]
    fn test_unauthorized_is_auth_error() {
        let body = r#"{"error":"invalid_client"}"#;
        let result = interpret_token_response(StatusCode::UNAUTHORIZED, body);
        match result {
            Err(FareError::Auth { status, body }) => {
                assert_eq!(status, 401);
                assert!(body.contains("invalid_client"));
            }
            other => panic!("expected Auth error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_access_token_is_malformed() {
        let body = r#"{"token_type":"Bearer"}"#;
        assert!(matches!(
            interpret_token_response(StatusCode::OK, body),
            Err(FareError::MalformedToken(_))
        ));
    }

    #[test]
    fn test_non_json_body_is_malformed() {
        assert!(matches!(
            interpret_token_response(StatusCode::OK, "<html>oops</html>"),
            Err(FareError::MalformedToken(_))
        ));
    }

    #[test]
    fn test_empty_access_token_is_malformed() {
        let body = r#"{"access_token":""}"#;
        assert!(matches!(
            interpret_token_response(StatusCode::OK, body),
            Err(FareError::MalformedToken(_))
        ));
    }
}

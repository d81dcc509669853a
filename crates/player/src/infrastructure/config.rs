//! Client configuration

use std::env;
use std::time::Duration;

use underworld_domain::{Credential, GameId, Session};
use url::Url;

/// Default game server URL.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:8080";

/// Default request timeout in milliseconds (30 seconds)
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid server URL '{url}': {reason}")]
    InvalidServerUrl { url: String, reason: String },
}

/// Client configuration loaded from environment
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base of the game API, `<server>/api/`
    pub api_base: Url,
    /// Per-request timeout; there are no retries
    pub request_timeout: Duration,
    /// Session seed: game to play
    pub game_id: Option<GameId>,
    /// Session seed: API token
    pub credential: Option<Credential>,
}

impl ClientConfig {
    pub fn new(server_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            api_base: api_base(server_url)?,
            request_timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
            game_id: None,
            credential: None,
        })
    }

    /// Load configuration from environment variables
    ///
    /// Reads `UNDERWORLD_URL`, `UNDERWORLD_REQUEST_TIMEOUT_MS`,
    /// `UNDERWORLD_GAME_ID` and `UNDERWORLD_TOKEN`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup` instead of the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let server_url = lookup("UNDERWORLD_URL").unwrap_or_else(|| DEFAULT_SERVER_URL.to_string());
        let timeout_ms = lookup("UNDERWORLD_REQUEST_TIMEOUT_MS")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_MS);

        Ok(Self {
            api_base: api_base(&server_url)?,
            request_timeout: Duration::from_millis(timeout_ms),
            game_id: non_empty(lookup("UNDERWORLD_GAME_ID")).map(GameId::from),
            credential: non_empty(lookup("UNDERWORLD_TOKEN")).map(Credential::new),
        })
    }

    /// The session these settings seed.
    pub fn session(&self) -> Session {
        Session {
            game_id: self.game_id.clone(),
            credential: self.credential.clone(),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn api_base(server_url: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidServerUrl {
        url: server_url.to_string(),
        reason,
    };

    let base = format!("{}/api/", server_url.trim().trim_end_matches('/'));
    let url = Url::parse(&base).map_err(|e| invalid(e.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(invalid("URL cannot be used as a base".to_string()));
    }
    Ok(url)
}

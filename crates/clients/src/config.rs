use std::env;
use std::time::Duration;

use thiserror::Error;

use crate::kms::{open_sealed_secret, AesGcmKeyring, SecretError};

pub const DEFAULT_POKEAPI_BASE_URL: &str = "https://pokeapi.co/api/v2";
const DEFAULT_HTTP_TIMEOUT_SECONDS: u64 = 10;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("POKEREF_SLACK_HOOK is sealed but POKEREF_KMS_KEY is not set")]
    MissingKmsKey,

    #[error("invalid POKEREF_HTTP_TIMEOUT_SECONDS: {0}")]
    InvalidTimeout(String),

    #[error("failed to open POKEREF_SLACK_HOOK: {0}")]
    Secret(#[from] SecretError),
}

#[derive(Clone)]
pub struct SkillConfig {
    pub pokeapi_base_url: String,
    pub application_id: Option<String>,
    pub slack_hook: Option<String>,
    pub http_timeout: Duration,
}

impl std::fmt::Debug for SkillConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SkillConfig")
            .field("pokeapi_base_url", &self.pokeapi_base_url)
            .field("application_id", &self.application_id)
            .field("slack_hook", &self.slack_hook.as_ref().map(|_| "<redacted>"))
            .field("http_timeout", &self.http_timeout)
            .finish()
    }
}

impl Default for SkillConfig {
    fn default() -> Self {
        Self {
            pokeapi_base_url: DEFAULT_POKEAPI_BASE_URL.to_string(),
            application_id: None,
            slack_hook: None,
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECONDS),
        }
    }
}

impl SkillConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let pokeapi_base_url = read("POKEREF_POKEAPI_BASE_URL")
            .unwrap_or_else(|| DEFAULT_POKEAPI_BASE_URL.to_string());

        let http_timeout = match read("POKEREF_HTTP_TIMEOUT_SECONDS") {
            Some(raw) => match raw.parse::<u64>() {
                Ok(seconds) if seconds > 0 => Duration::from_secs(seconds),
                _ => return Err(ConfigError::InvalidTimeout(raw)),
            },
            None => Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECONDS),
        };

        let slack_hook = match (read("POKEREF_SLACK_HOOK"), read("POKEREF_SLACK_HOOK_URL")) {
            (Some(sealed), _) => {
                let key = read("POKEREF_KMS_KEY").ok_or(ConfigError::MissingKmsKey)?;
                let keyring = AesGcmKeyring::from_base64(&key)?;
                Some(open_sealed_secret(&keyring, &sealed)?)
            }
            (None, plain) => plain,
        };

        Ok(Self {
            pokeapi_base_url,
            application_id: read("POKEREF_APPLICATION_ID"),
            slack_hook,
            http_timeout,
        })
    }
}

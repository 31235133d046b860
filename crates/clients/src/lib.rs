pub mod config;
pub mod kms;
mod memory;
mod pokeapi;
mod slack;

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use config::{ConfigError, SkillConfig};
pub use kms::{open_sealed_secret, seal_secret, AesGcmKeyring, KeyManagement, SecretError};
pub use memory::{MemoryDirectory, RecordingForwarder};
pub use pokeapi::PokeApiClient;
pub use slack::SlackWebhook;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error("unexpected payload from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("url cannot carry path segments: {0}")]
    NotABase(String),

    #[error("no record for {0}")]
    NotFound(String),

    #[error("chat forwarding is not configured")]
    NotConfigured,

    #[error("chat forwarding rejected")]
    Rejected,

    #[error("failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PokemonRecord {
    #[serde(default)]
    pub id: Option<u32>,
    #[serde(default)]
    pub name: Option<String>,
    pub height: f64,
    #[serde(default)]
    pub weight: Option<u32>,
}

pub trait PokemonDirectory: Send + Sync {
    async fn fetch(&self, identifier: &str) -> Result<PokemonRecord, ClientError>;
}

pub trait ChatForwarder: Send + Sync {
    async fn post(&self, text: &str) -> Result<(), ClientError>;

    fn is_configured(&self) -> bool;
}

pub fn build_http_client(timeout: Duration) -> Result<Client, ClientError> {
    Client::builder()
        .connect_timeout(CONNECT_TIMEOUT.min(timeout))
        .timeout(timeout)
        .build()
        .map_err(ClientError::Build)
}

pub fn http_collaborators(
    config: &SkillConfig,
) -> Result<(PokeApiClient, SlackWebhook), ClientError> {
    let http = build_http_client(config.http_timeout)?;
    let directory = PokeApiClient::new(http.clone(), &config.pokeapi_base_url)?;
    let webhook = SlackWebhook::new(http, config.slack_hook.as_deref())?;
    Ok((directory, webhook))
}

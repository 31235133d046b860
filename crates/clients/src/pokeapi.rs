use reqwest::Client;
use tracing::debug;
use url::Url;

use crate::{ClientError, PokemonDirectory, PokemonRecord};

#[derive(Debug, Clone)]
pub struct PokeApiClient {
    http: Client,
    base_url: Url,
}

impl PokeApiClient {
    pub fn new(http: Client, base_url: &str) -> Result<Self, ClientError> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::NotABase(base_url.to_string()));
        }
        Ok(Self { http, base_url })
    }

    pub fn pokemon_url(&self, identifier: &str) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::NotABase(self.base_url.to_string()))?
            .pop_if_empty()
            .push("pokemon")
            .push(identifier);
        Ok(url)
    }
}

impl PokemonDirectory for PokeApiClient {
    async fn fetch(&self, identifier: &str) -> Result<PokemonRecord, ClientError> {
        let url = self.pokemon_url(identifier)?;
        debug!(url = %url, "fetching pokemon");

        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|source| ClientError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response
            .json::<PokemonRecord>()
            .await
            .map_err(|source| ClientError::Decode {
                url: url.to_string(),
                source,
            })
    }
}

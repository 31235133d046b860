use reqwest::Client;
use serde::Serialize;
use url::Url;

use crate::{ChatForwarder, ClientError};

#[derive(Debug, Serialize)]
struct WebhookMessage<'a> {
    text: &'a str,
}

#[derive(Clone)]
pub struct SlackWebhook {
    http: Client,
    url: Option<Url>,
}

impl std::fmt::Debug for SlackWebhook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // the webhook URL is a credential
        f.debug_struct("SlackWebhook")
            .field("configured", &self.url.is_some())
            .finish()
    }
}

impl SlackWebhook {
    pub fn new(http: Client, url: Option<&str>) -> Result<Self, ClientError> {
        let url = url.map(Url::parse).transpose()?;
        Ok(Self { http, url })
    }
}

impl ChatForwarder for SlackWebhook {
    async fn post(&self, text: &str) -> Result<(), ClientError> {
        let Some(url) = self.url.as_ref() else {
            return Err(ClientError::NotConfigured);
        };

        let response = self
            .http
            .post(url.clone())
            .json(&WebhookMessage { text })
            .send()
            .await
            // reqwest errors render the full request URL
            .map_err(|source| ClientError::Transport {
                url: redacted(url),
                source: source.without_url(),
            })?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(ClientError::Status {
                url: redacted(url),
                status: status.as_u16(),
            })
        }
    }

    fn is_configured(&self) -> bool {
        self.url.is_some()
    }
}

fn redacted(url: &Url) -> String {
    format!("{}://{}/…", url.scheme(), url.host_str().unwrap_or_default())
}

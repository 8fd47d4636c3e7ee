//! Anthropic Messages API client.

use std::{sync::Arc, time::Duration};

use anyhow::Context as _;
use async_trait::async_trait;
use reqwest::{
    Client, Url,
    header::{HeaderMap, HeaderValue},
};
use serde::{Deserialize, Serialize};
use tokio::time::timeout;
use tracing::{debug, info, instrument};

use crate::base::{
    config::Config,
    types::{Res, Secret},
};

use super::{GenericLlmClient, LlmClient};

// Extra methods on `LlmClient` applied by the anthropic implementation.

impl LlmClient {
    pub fn anthropic(config: &Config, api_key: &Secret) -> Res<Self> {
        let client = AnthropicLlmClient::new(config, api_key)?;
        Ok(Self { inner: Arc::new(client) })
    }
}

// Wire types.

#[derive(Debug, Serialize)]
pub struct MessagesRequest<'a> {
    pub model: &'a str,
    pub max_tokens: u32,
    pub messages: Vec<RequestMessage<'a>>,
}

#[derive(Debug, Serialize)]
pub struct RequestMessage<'a> {
    pub role: &'static str,
    pub content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct MessagesResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub stop_reason: Option<String>,
    pub content: Vec<ResponseContent>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResponseContent {
    Text {
        text: String,
    },
    #[serde(other)]
    Other,
}

// Specific implementations.

/// Anthropic LLM client implementation.
#[derive(Clone)]
pub struct AnthropicLlmClient {
    client: Client,
    base_url: Url,
    headers: HeaderMap,
    model: String,
    max_tokens: u32,
    timeout: Duration,
}

impl AnthropicLlmClient {
    /// Create a new Anthropic LLM client.
    #[instrument(name = "AnthropicLlmClient::new", skip_all)]
    pub fn new(config: &Config, api_key: &Secret) -> Res<Self> {
        // `join` drops the last path segment unless the base ends with a slash.
        let base_url = format!("{}/", config.anthropic_base_url.trim_end_matches('/'));
        let base_url = Url::parse(&base_url).with_context(|| format!("Failed to parse Anthropic base URL: {base_url}"))?;

        let mut api_key = HeaderValue::from_str(api_key.expose()).context("ANTHROPIC_API_KEY is not a valid header value")?;
        api_key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert("x-api-key", api_key);
        headers.insert(
            "anthropic-version",
            HeaderValue::from_str(&config.anthropic_version).context("Invalid Anthropic version header")?,
        );

        Ok(Self {
            client: Client::builder().build()?,
            base_url,
            headers,
            model: config.anthropic_model.clone(),
            max_tokens: config.anthropic_max_tokens,
            timeout: Duration::from_secs(config.anthropic_timeout_secs),
        })
    }

    fn build_request<'a>(&'a self, prompt: &'a str) -> MessagesRequest<'a> {
        MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            messages: vec![RequestMessage { role: "user", content: prompt }],
        }
    }

    /// Make a single Messages API call, bounded by the configured timeout.
    async fn call_anthropic_api(&self, request: &MessagesRequest<'_>) -> Res<MessagesResponse> {
        timeout(self.timeout, self.send_request(request))
            .await
            .map_err(|_| anyhow::anyhow!("Anthropic API call timed out after {} seconds", self.timeout.as_secs()))?
    }

    async fn send_request(&self, request: &MessagesRequest<'_>) -> Res<MessagesResponse> {
        let url = self.base_url.join("messages")?;
        let response = self.client.post(url).headers(self.headers.clone()).json(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = describe_error_body(response.text().await);
            return Err(anyhow::anyhow!("Anthropic API error ({status}): {error_text}"));
        }

        Ok(response.json::<MessagesResponse>().await?)
    }
}

#[async_trait]
impl GenericLlmClient for AnthropicLlmClient {
    #[instrument(name = "AnthropicLlmClient::get_analysis", skip_all)]
    async fn get_analysis(&self, prompt: &str) -> Res<String> {
        debug!("Requesting analysis from `{}`", self.model);

        let request = self.build_request(prompt);
        let response = self.call_anthropic_api(&request).await?;

        info!("Anthropic response received (id: {:?}, stop reason: {:?}).", response.id, response.stop_reason);

        parse_anthropic_response(response)
    }
}

/// Render an error response body for a message, keeping read failures visible.
fn describe_error_body(body: reqwest::Result<String>) -> String {
    body.unwrap_or_else(|e| format!("<unreadable body: {e}>"))
}

/// Pull the text of the first content block out of a response.
pub fn parse_anthropic_response(response: MessagesResponse) -> Res<String> {
    match response.content.into_iter().next() {
        Some(ResponseContent::Text { text }) => Ok(text),
        Some(ResponseContent::Other) => Err(anyhow::anyhow!("Anthropic response started with a non-text content block.")),
        None => Err(anyhow::anyhow!("Anthropic response had no content.")),
    }
}

// Tests.

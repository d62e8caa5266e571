//! OpenAI-compatible chat provider
//!
//! Implements the `ChatProvider` port against any `/chat/completions`
//! endpoint that speaks the OpenAI wire format.

use super::types::{WireResponse, from_wire_response, to_wire_request};
use crate::config::FileProviderConfig;
use agentm_application::{ChatProvider, ChatRequest, ChatResponse, ProviderError};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info};

pub struct OpenAiChatProvider {
    http_client: Client,
    base_url: String,
    api_key: String,
    organization: Option<String>,
    project: Option<String>,
    structured_output_models: Vec<String>,
}

impl OpenAiChatProvider {
    /// Build a provider from the `[provider]` config section.
    ///
    /// Fails with `MissingCredentials` when no API key can be resolved.
    pub fn new(config: &FileProviderConfig) -> Result<Self, ProviderError> {
        let api_key = config.resolve_api_key().ok_or_else(|| {
            ProviderError::MissingCredentials(format!(
                "set {} or provider.api_key",
                config.api_key_env
            ))
        })?;

        let mut builder = Client::builder();
        if let Some(seconds) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(seconds));
        }
        let http_client = builder
            .build()
            .map_err(|e| ProviderError::ConnectionError(e.to_string()))?;

        info!(base_url = %config.base_url, model = %config.model, "OpenAI provider initialized");

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            organization: config.organization.clone().filter(|o| !o.is_empty()),
            project: config.project.clone().filter(|p| !p.is_empty()),
            structured_output_models: config.structured_output_models.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

fn transport_error(err: reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Timeout
    } else if err.is_decode() {
        ProviderError::Decode(err.to_string())
    } else {
        ProviderError::ConnectionError(err.to_string())
    }
}

#[async_trait]
impl ChatProvider for OpenAiChatProvider {
    fn supports_structured_output(&self, model: &str) -> bool {
        self.structured_output_models.iter().any(|m| m == model)
    }

    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, ProviderError> {
        let body = to_wire_request(&request);
        debug!(
            model = %request.model,
            messages = request.messages.len(),
            "Sending chat completion request"
        );

        let mut builder = self
            .http_client
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(&body);
        if let Some(organization) = &self.organization {
            builder = builder.header("OpenAI-Organization", organization);
        }
        if let Some(project) = &self.project {
            builder = builder.header("OpenAI-Project", project);
        }

        let response = builder.send().await.map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let wire = response
            .json::<WireResponse>()
            .await
            .map_err(transport_error)?;
        Ok(from_wire_response(wire))
    }
}

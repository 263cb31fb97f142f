use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};

use crate::config::{CompletionOptions, Endpoint, Settings};
use crate::error::ProviderError;

/// One prompt plus the sampling options to send it with.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub prompt: String,
    pub options: CompletionOptions,
}

/// A text-completion backend. Returns the full completion text of one request.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderError>;
}

// Structures matching the chat-completions endpoint
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    temperature: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    stream: bool, // We want the full response, not a stream
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize, Debug)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize, Debug)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize, Debug)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Chat-completions client for OpenAI and Azure OpenAI deployments.
pub struct ChatCompletionClient {
    client: Client,
    endpoint: Endpoint,
    api_key: String,
}

impl ChatCompletionClient {
    pub fn new(endpoint: Endpoint, api_key: String) -> Self {
        Self {
            client: Client::new(),
            endpoint,
            api_key,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.endpoint.clone(), settings.api_key.clone())
    }
}

#[async_trait]
impl CompletionProvider for ChatCompletionClient {
    #[instrument(skip(self, request), fields(model = %request.options.model))]
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderError> {
        let url = self.endpoint.chat_completions_url();
        let payload = ChatRequest {
            model: &request.options.model,
            messages: [ChatMessage {
                role: "user",
                content: &request.prompt,
            }],
            temperature: request.options.temperature,
            top_p: request.options.top_p,
            max_tokens: request.options.max_tokens,
            stream: false,
        };

        let builder = self.client.post(&url).json(&payload);
        let builder = match &self.endpoint {
            Endpoint::OpenAi { .. } => builder.bearer_auth(&self.api_key),
            Endpoint::Azure { .. } => builder.header("api-key", &self.api_key),
        };

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(%status, %error_body, "Chat completion request failed");
            return Err(status_error(status, &error_body));
        }

        let body = response.text().await?;
        let chat_response: ChatResponse = serde_json::from_str(&body)
            .map_err(|e| ProviderError::MalformedResponse(e.to_string()))?;

        let content = chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(ProviderError::EmptyCompletion)?;

        debug!(response = %content, "Received chat completion");
        Ok(content)
    }
}

fn status_error(status: StatusCode, body: &str) -> ProviderError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ProviderError::Unauthorized,
        StatusCode::TOO_MANY_REQUESTS => ProviderError::RateLimited,
        _ => {
            let message = serde_json::from_str::<ErrorEnvelope>(body)
                .map(|envelope| envelope.error.message)
                .unwrap_or_else(|_| body.trim().to_string());
            ProviderError::Api {
                status: status.as_u16(),
                message,
            }
        }
    }
}

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{AdviceError, AdviceProvider, ChatMessage, CoachContext};

const TEMPERATURE: f32 = 0.7;

/// Chat-completions client for OpenAI-compatible endpoints.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

impl OpenAiClient {
    pub fn new(
        base_url: &str,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, AdviceError> {
        let payload = CompletionRequest {
            model: &self.model,
            messages,
            temperature: TEMPERATURE,
        };

        let res = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = res.status();
        if status.is_success() {
            let body = res.json::<CompletionResponse>().await?;
            return body
                .choices
                .into_iter()
                .next()
                .and_then(|choice| choice.message.content)
                .map(|content| content.trim().to_string())
                .filter(|content| !content.is_empty())
                .ok_or(AdviceError::EmptyResponse);
        }

        let message = res
            .json::<ErrorEnvelope>()
            .await
            .map(|envelope| envelope.error.message)
            .unwrap_or_else(|_| "unknown error".to_string());

        let err = match status.as_u16() {
            401 | 403 => AdviceError::Unauthorized,
            429 => AdviceError::RateLimited,
            code => AdviceError::Upstream {
                status: code,
                message,
            },
        };
        Err(err)
    }
}

impl AdviceProvider for OpenAiClient {
    async fn get_advice(
        &self,
        messages: &[ChatMessage],
        context: &CoachContext,
    ) -> Result<String, AdviceError> {
        debug!(
            model = %self.model,
            messages = messages.len(),
            score = context.score,
            "requesting chat completion"
        );
        self.complete(messages).await
    }
}

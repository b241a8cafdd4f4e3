use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::endpoints::decode_error;
use crate::{Client, ClientError, RequestDescriptor, Response, ResponseEnvelope, Result};

/// Language model and image generation endpoints.
pub struct Ai<'a> {
    client: &'a Client,
}

/// One chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Body of `POST /completion`.
///
/// `model` is either a hosted model id or a custom model handle
/// (`@cognima/<name>`).
#[derive(Debug, Clone, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl CompletionRequest {
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            model: model.into(),
            messages,
            max_tokens: None,
            temperature: None,
        }
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// Token accounting reported next to `data`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenUsage {
    #[serde(default)]
    pub prompt_tokens: Option<u64>,
    #[serde(default)]
    pub completion_tokens: Option<u64>,
    #[serde(default)]
    pub total_tokens: u64,
    #[serde(default)]
    pub estimated_cost: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    pub message: ChatMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// A completed chat.
#[derive(Debug, Clone, Deserialize)]
pub struct Completion {
    pub model: String,
    pub choices: Vec<Choice>,
    /// Filled from the envelope's `usage` field.
    #[serde(skip)]
    pub usage: Option<TokenUsage>,
}

impl Completion {
    /// Content of the first choice.
    pub fn text(&self) -> Option<&str> {
        self.choices.first().map(|c| c.message.content.as_str())
    }
}

/// Body of `POST /generate`.
#[derive(Debug, Clone, Serialize)]
pub struct ImageRequest {
    pub model: String,
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeneratedImage {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImageGeneration {
    pub data: Vec<GeneratedImage>,
    #[serde(skip)]
    pub usage: Option<TokenUsage>,
}

/// Body of `POST /custom`.
#[derive(Debug, Clone, Serialize)]
pub struct CustomModelRequest {
    pub name: String,
    pub display_name: String,
    pub description: String,
    pub personality_summary: String,
    pub base_model: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CustomModel {
    /// Opaque identifier; the service has used both numbers and strings.
    pub id: Value,
    /// Handle to pass as `model`, e.g. `@cognima/js-mentor`.
    pub full_name: String,
}

impl<'a> Ai<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// `POST /completion`
    pub async fn completion(&self, request: &CompletionRequest) -> Result<Response<Completion>> {
        let descriptor = RequestDescriptor::post("/completion").with_json(request)?;
        let response = self.client.request_json(descriptor).await?;

        response.try_map(|envelope, raw_body, status| {
            let usage = usage_of(&envelope);
            let mut completion: Completion = envelope.into_data(raw_body, status)?;
            completion.usage = usage;
            Ok::<_, ClientError>(completion)
        })
    }

    /// `POST /generate`
    pub async fn generate_image(
        &self,
        request: &ImageRequest,
    ) -> Result<Response<ImageGeneration>> {
        let descriptor = RequestDescriptor::post("/generate").with_json(request)?;
        let response = self.client.request_json(descriptor).await?;

        response.try_map(|envelope, raw_body, status| {
            let usage = usage_of(&envelope);
            let mut generation: ImageGeneration = envelope.into_data(raw_body, status)?;
            if generation.data.is_empty() {
                return Err(decode_error(raw_body, status, "no images returned".to_string()));
            }
            generation.usage = usage;
            Ok(generation)
        })
    }

    /// `POST /custom`
    pub async fn create_custom_model(
        &self,
        request: &CustomModelRequest,
    ) -> Result<Response<CustomModel>> {
        self.client.post("/custom", request).await
    }
}

fn usage_of(envelope: &ResponseEnvelope) -> Option<TokenUsage> {
    envelope
        .meta("usage")
        .and_then(|usage| serde_json::from_value(usage.clone()).ok())
}

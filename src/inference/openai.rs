use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Completer, Transcriber};
use crate::audio::mime_for_filename;
use crate::error::{Error, Result};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const REQUEST_TIMEOUT_SECS: u64 = 120;

/// Settings for the OpenAI-compatible inference endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    pub base_url: String,
    pub transcribe_model: String,
    pub chat_model: String,
    /// ISO 639-1 language hint passed to transcription, if any.
    pub language: Option<String>,
    /// Guidance prompt steering the transcription model's interpretation.
    pub guidance: Option<String>,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            transcribe_model: "gpt-4o-transcribe".to_string(),
            chat_model: "gpt-4o".to_string(),
            language: None,
            guidance: None,
        }
    }
}

/// Client for an OpenAI-compatible inference API.
///
/// Implements both capabilities: multipart `audio/transcriptions` for
/// speech-to-text and `chat/completions` for note generation and summaries.
pub struct OpenAiClient {
    http: reqwest::Client,
    config: InferenceConfig,
    api_key: String,
}

impl OpenAiClient {
    pub fn new(config: InferenceConfig, api_key: String) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            http,
            config,
            api_key,
        }
    }

    /// Read the API key from `OPENAI_API_KEY`.
    pub fn from_env(config: InferenceConfig) -> anyhow::Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| anyhow::anyhow!("OPENAI_API_KEY is not set"))?;
        Ok(Self::new(config, api_key))
    }
}

#[derive(Deserialize)]
struct TranscriptionResponse {
    text: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

#[async_trait::async_trait]
impl Transcriber for OpenAiClient {
    async fn transcribe(&self, audio: &[u8], filename: &str) -> Result<String> {
        let url = format!("{}/audio/transcriptions", self.config.base_url);

        let file_part = reqwest::multipart::Part::bytes(audio.to_vec())
            .file_name(filename.to_string())
            .mime_str(mime_for_filename(filename))
            .map_err(|e| Error::TranscriptionFailed(e.to_string()))?;

        let mut form = reqwest::multipart::Form::new()
            .part("file", file_part)
            .text("model", self.config.transcribe_model.clone());
        if let Some(language) = &self.config.language {
            form = form.text("language", language.clone());
        }
        if let Some(guidance) = &self.config.guidance {
            form = form.text("prompt", guidance.clone());
        }

        debug!("Transcribing {} ({} bytes)", filename, audio.len());

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| Error::TranscriptionFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::TranscriptionFailed(format!(
                "transcription endpoint returned {}: {}",
                status, body
            )));
        }

        let parsed: TranscriptionResponse = response
            .json()
            .await
            .map_err(|e| Error::TranscriptionFailed(e.to_string()))?;

        Ok(parsed.text.trim().to_string())
    }
}

#[async_trait::async_trait]
impl Completer for OpenAiClient {
    async fn complete(&self, system: &str, user: &str, json_mode: bool) -> Result<String> {
        let url = format!("{}/chat/completions", self.config.base_url);

        let request = ChatRequest {
            model: &self.config.chat_model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature: if json_mode { 0.3 } else { 0.4 },
            response_format: json_mode.then_some(ResponseFormat { kind: "json_object" }),
        };

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::SummarizationFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::SummarizationFailed(format!(
                "completion endpoint returned {}: {}",
                status, body
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| Error::SummarizationFailed(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|content| !content.is_empty())
            .ok_or_else(|| Error::SummarizationFailed("empty completion response".to_string()))
    }
}

//! OpenAI-compatible HTTP provider for the capability traits.
//!
//! One client drives all three capabilities against the same endpoint
//! family: multipart `audio/transcriptions` for speech, a chat completion
//! with an inline `data:` image URL for verbatim image description, and a
//! JSON-mode chat completion for excerpt planning. The excerpt call pins
//! `temperature` to 0 and a fixed seed so repeated planning over the same
//! document stays stable.

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::config::CapabilityConfig;
use crate::error::CapabilityError;
use crate::types::ExcerptCandidate;

use super::{ExcerptPlanner, ImageDescriber, SpeechTranscriber};

const IMAGE_SYSTEM_PROMPT: &str =
    "Extract text from images verbatim for document transcription.";

const EXCERPT_SYSTEM_PROMPT: &str = "You segment documents for lesson generation. \
Given a document, propose an ordered list of excerpts covering its substantive \
content. Reply with a JSON object {\"excerpts\": [{\"title\", \"start\", \"end\"}]} \
where start and end are short verbatim snippets from the document marking each \
excerpt's boundaries.";

/// Capability provider backed by an OpenAI-compatible HTTP API.
pub struct OpenAiCapabilities {
    client: Client,
    config: CapabilityConfig,
}

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct ExcerptPlan {
    excerpts: Vec<ExcerptCandidate>,
}

impl OpenAiCapabilities {
    /// Create a provider with its own HTTP client.
    pub fn new(config: CapabilityConfig) -> Self {
        let client = Client::builder()
            .build()
            .expect("failed to build HTTP client");
        Self { client, config }
    }

    /// Create a provider reusing an existing client (connection pooling).
    pub fn with_client(client: Client, config: CapabilityConfig) -> Self {
        Self { client, config }
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.api_base.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    async fn chat(&self, body: serde_json::Value) -> Result<String, CapabilityError> {
        let response = self
            .client
            .post(self.endpoint("chat/completions"))
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CapabilityError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response.json().await?;
        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or(CapabilityError::MalformedResponse)
    }
}

#[async_trait]
impl SpeechTranscriber for OpenAiCapabilities {
    async fn transcribe(
        &self,
        audio: Vec<u8>,
        file_name: &str,
    ) -> Result<String, CapabilityError> {
        debug!(bytes = audio.len(), model = %self.config.transcription_model, "transcribing audio");

        let part = reqwest::multipart::Part::bytes(audio).file_name(file_name.to_string());
        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("model", self.config.transcription_model.clone());

        let response = self
            .client
            .post(self.endpoint("audio/transcriptions"))
            .bearer_auth(&self.config.api_key)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CapabilityError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: TranscriptionResponse = response.json().await?;
        Ok(parsed.text)
    }
}

#[async_trait]
impl ImageDescriber for OpenAiCapabilities {
    async fn describe(&self, image: Vec<u8>, mime_type: &str) -> Result<String, CapabilityError> {
        debug!(bytes = image.len(), mime_type, "describing embedded image");

        let data_url = format!("data:{mime_type};base64,{}", BASE64.encode(&image));
        let body = json!({
            "model": self.config.vision_model,
            "messages": [
                {"role": "system", "content": IMAGE_SYSTEM_PROMPT},
                {"role": "user", "content": [
                    {"type": "text", "text": "Here is the image:"},
                    {"type": "image_url", "image_url": {"url": data_url}},
                ]},
            ],
        });

        self.chat(body).await
    }
}

#[async_trait]
impl ExcerptPlanner for OpenAiCapabilities {
    async fn propose_excerpts(
        &self,
        document: &str,
    ) -> Result<Vec<ExcerptCandidate>, CapabilityError> {
        let user_payload = serde_json::to_string(&json!({ "document": document }))?;
        let body = json!({
            "model": self.config.excerpt_model,
            "temperature": 0,
            "seed": 1337,
            "response_format": {"type": "json_object"},
            "messages": [
                {"role": "system", "content": EXCERPT_SYSTEM_PROMPT},
                {"role": "user", "content": user_payload},
            ],
        });

        let content = self.chat(body).await?;
        let plan: ExcerptPlan = serde_json::from_str(&content)?;
        Ok(plan.excerpts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn provider_for(server: &MockServer) -> OpenAiCapabilities {
        let config = CapabilityConfig::new("sk-test").with_api_base(server.url(""));
        OpenAiCapabilities::new(config)
    }

    #[tokio::test]
    async fn transcribe_parses_text_field() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/audio/transcriptions");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"text": "hello from the tape"}"#);
        });

        let provider = provider_for(&server);
        let text = provider
            .transcribe(b"fake-mp3".to_vec(), "audio.mp3")
            .await
            .unwrap();

        mock.assert();
        assert_eq!(text, "hello from the tape");
    }

    #[tokio::test]
    async fn describe_returns_first_choice_content() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/chat/completions");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"choices": [{"message": {"content": "A slide reading Q3 Results"}}]}"#);
        });

        let provider = provider_for(&server);
        let description = provider
            .describe(vec![0x89, 0x50, 0x4e, 0x47], "image/png")
            .await
            .unwrap();
        assert_eq!(description, "A slide reading Q3 Results");
    }

    #[tokio::test]
    async fn propose_excerpts_parses_json_plan() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/chat/completions");
            then.status(200)
                .header("content-type", "application/json")
                .body(
                    r#"{"choices": [{"message": {"content":
                    "{\"excerpts\": [{\"title\": \"T1\", \"start\": \"Alpha\", \"end\": \"beta\"}]}"
                    }}]}"#,
                );
        });

        let provider = provider_for(&server);
        let excerpts = provider.propose_excerpts("Alpha beta").await.unwrap();
        assert_eq!(excerpts.len(), 1);
        assert_eq!(excerpts[0].title, "T1");
    }

    #[tokio::test]
    async fn api_errors_surface_status_and_body() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/chat/completions");
            then.status(429).body("rate limited");
        });

        let provider = provider_for(&server);
        let err = provider.describe(vec![1, 2, 3], "image/png").await.unwrap_err();
        match err {
            CapabilityError::Api { status, body } => {
                assert_eq!(status, 429);
                assert_eq!(body, "rate limited");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }
}

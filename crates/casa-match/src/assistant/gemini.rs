//! Gemini streaming chat adapter.
//!
//! Replies are requested with `alt=sse`; each `data:` line carries a JSON
//! chunk whose candidate parts hold the next text fragments.

use std::time::Duration;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::AssistantConfig;

use super::provider::{AssistantError, AssistantProvider, ChatRole, ChatTurn, FragmentStream};
use super::SYSTEM_INSTRUCTION;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
const TEMPERATURE: f32 = 0.7;

pub struct GeminiProvider {
    api_key: String,
    model: String,
    base_url: String,
    client: Client,
}

impl GeminiProvider {
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, AssistantError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| {
                AssistantError::Network(format!("failed to build HTTP client: {err}"))
            })?;

        Ok(Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    /// `None` when no API key is configured.
    pub fn from_config(config: &AssistantConfig) -> Result<Option<Self>, AssistantError> {
        match &config.api_key {
            Some(key) => {
                Self::new(key.clone(), config.model.clone(), config.base_url.clone()).map(Some)
            }
            None => Ok(None),
        }
    }

    fn stream_url(&self) -> String {
        format!(
            "{}/models/{}:streamGenerateContent?alt=sse",
            self.base_url, self.model
        )
    }

    fn build_request(&self, history: &[ChatTurn], message: &str) -> GenerateRequest {
        let mut contents: Vec<Content> = history
            .iter()
            .map(|turn| Content::text(turn.role, &turn.text))
            .collect();
        contents.push(Content::text(ChatRole::User, message));

        GenerateRequest {
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: Some(SYSTEM_INSTRUCTION.to_string()),
                }],
            },
            contents,
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
            },
        }
    }
}

#[async_trait]
impl AssistantProvider for GeminiProvider {
    async fn stream_reply(
        &self,
        history: &[ChatTurn],
        message: &str,
    ) -> Result<FragmentStream, AssistantError> {
        let request = self.build_request(history, message);
        debug!(
            model = %self.model,
            turns = request.contents.len(),
            "requesting assistant reply"
        );

        let response = self
            .client
            .post(self.stream_url())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    AssistantError::Network(format!(
                        "request timed out after {}s",
                        REQUEST_TIMEOUT.as_secs()
                    ))
                } else {
                    AssistantError::Network(err.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(match status.as_u16() {
                401 | 403 => AssistantError::AuthenticationFailed,
                code => AssistantError::Status {
                    status: code,
                    message: body,
                },
            });
        }

        let body = Box::pin(response.bytes_stream());
        let fragments = stream::unfold(
            (body, Some(SseDecoder::default())),
            |(mut body, decoder)| async move {
                let mut decoder = decoder?;
                match body.next().await {
                    Some(Ok(bytes)) => {
                        let items = decoder.push(&bytes);
                        Some((items, (body, Some(decoder))))
                    }
                    Some(Err(err)) => {
                        let items = vec![Err(AssistantError::Network(err.to_string()))];
                        Some((items, (body, Some(decoder))))
                    }
                    // The last event may arrive without a trailing newline.
                    None => Some((decoder.finish(), (body, None))),
                }
            },
        )
        .flat_map(stream::iter);

        Ok(Box::pin(fragments))
    }
}

/// Splits an SSE byte stream into text fragments, buffering partial lines.
#[derive(Debug, Default)]
pub(crate) struct SseDecoder {
    pending: Vec<u8>,
}

impl SseDecoder {
    pub(crate) fn push(&mut self, bytes: &[u8]) -> Vec<Result<String, AssistantError>> {
        self.pending.extend_from_slice(bytes);
        let mut fragments = Vec::new();

        while let Some(newline) = self.pending.iter().position(|&byte| byte == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=newline).collect();
            let line = String::from_utf8_lossy(&line);
            let Some(data) = line.trim_end().strip_prefix("data:") else {
                continue;
            };
            let data = data.trim();
            if data.is_empty() {
                continue;
            }

            match serde_json::from_str::<StreamChunk>(data) {
                Ok(chunk) => fragments.extend(chunk.into_text().map(Ok)),
                Err(err) => fragments.push(Err(AssistantError::Parse(err.to_string()))),
            }
        }

        fragments
    }

    /// Decode whatever is still buffered once the byte stream has ended.
    pub(crate) fn finish(mut self) -> Vec<Result<String, AssistantError>> {
        if self.pending.iter().all(u8::is_ascii_whitespace) {
            return Vec::new();
        }
        self.push(b"\n")
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    system_instruction: Content,
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

impl Content {
    fn text(role: ChatRole, text: &str) -> Self {
        let role = match role {
            ChatRole::User => "user",
            ChatRole::Model => "model",
        };
        Self {
            role: Some(role.to_string()),
            parts: vec![Part {
                text: Some(text.to_string()),
            }],
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StreamChunk {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

impl StreamChunk {
    fn into_text(self) -> impl Iterator<Item = String> {
        self.candidates
            .into_iter()
            .take(1)
            .filter_map(|candidate| candidate.content)
            .flat_map(|content| content.parts)
            .filter_map(|part| part.text)
            .filter(|text| !text.is_empty())
    }
}

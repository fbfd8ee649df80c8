use serde::{Deserialize, Serialize};
use serde_json::Value;
use textbrief_common::{Result, TextBriefError};

use crate::adapter::{ProviderAdapter, UpstreamCall, UpstreamRequest};

use super::{MISTRAL, OPENAI};

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ChatChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// OpenAI-style chat completions: bearer auth, system message in the list,
/// result at `choices[0].message.content`
#[derive(Debug, Clone)]
pub struct ChatCompletionsAdapter {
    id: &'static str,
    endpoint: String,
    model: String,
}

impl ChatCompletionsAdapter {
    pub fn new(id: &'static str, endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            id,
            endpoint: endpoint.into(),
            model: model.into(),
        }
    }

    pub fn openai(endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        Self::new(OPENAI, endpoint, model)
    }

    pub fn mistral(endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        Self::new(MISTRAL, endpoint, model)
    }
}

impl ProviderAdapter for ChatCompletionsAdapter {
    fn id(&self) -> &'static str {
        self.id
    }

    fn build_request(&self, api_key: &str, call: &UpstreamCall<'_>) -> Result<UpstreamRequest> {
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: call.system,
                },
                ChatMessage {
                    role: "user",
                    content: call.prompt.as_str(),
                },
            ],
            temperature: call.temperature,
            max_tokens: call.max_tokens,
        };

        Ok(UpstreamRequest {
            url: self.endpoint.clone(),
            headers: vec![
                ("Content-Type".to_string(), "application/json".to_string()),
                ("Authorization".to_string(), format!("Bearer {}", api_key)),
            ],
            body: serde_json::to_value(body)?,
        })
    }

    fn extract_result(&self, body: &Value) -> Result<String> {
        let response: ChatResponse = serde_json::from_value(body.clone()).map_err(|e| {
            TextBriefError::malformed(format!("{}: unexpected response shape: {}", self.id, e))
        })?;

        let content = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| TextBriefError::malformed(format!("{}: empty choices list", self.id)))?
            .message
            .and_then(|m| m.content)
            .ok_or_else(|| {
                TextBriefError::malformed(format!("{}: missing choices[0].message.content", self.id))
            })?;

        if content.trim().is_empty() {
            return Err(TextBriefError::malformed(format!("{}: empty content", self.id)));
        }

        Ok(content)
    }
}

use serde::{Deserialize, Serialize};
use serde_json::Value;
use textbrief_common::{Result, TextBriefError};

use crate::adapter::{ProviderAdapter, UpstreamCall, UpstreamRequest};

use super::ANTHROPIC;

/// Messages API accepts temperatures in [0, 1]
const MAX_TEMPERATURE: f32 = 1.0;

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<Message<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    text: Option<String>,
}

/// Anthropic messages API: `x-api-key` plus version header, top-level `system`,
/// result at `content[0].text`
#[derive(Debug, Clone)]
pub struct AnthropicAdapter {
    endpoint: String,
    model: String,
    version: String,
}

impl AnthropicAdapter {
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            model: model.into(),
            version: version.into(),
        }
    }
}

impl ProviderAdapter for AnthropicAdapter {
    fn id(&self) -> &'static str {
        ANTHROPIC
    }

    fn build_request(&self, api_key: &str, call: &UpstreamCall<'_>) -> Result<UpstreamRequest> {
        let body = MessagesRequest {
            model: &self.model,
            max_tokens: call.max_tokens,
            system: call.system,
            messages: vec![Message {
                role: "user",
                content: call.prompt.as_str(),
            }],
            temperature: call.temperature.map(|t| t.clamp(0.0, MAX_TEMPERATURE)),
        };

        Ok(UpstreamRequest {
            url: self.endpoint.clone(),
            headers: vec![
                ("Content-Type".to_string(), "application/json".to_string()),
                ("x-api-key".to_string(), api_key.to_string()),
                ("anthropic-version".to_string(), self.version.clone()),
            ],
            body: serde_json::to_value(body)?,
        })
    }

    fn extract_result(&self, body: &Value) -> Result<String> {
        let response: MessagesResponse = serde_json::from_value(body.clone()).map_err(|e| {
            TextBriefError::malformed(format!("anthropic: unexpected response shape: {}", e))
        })?;

        let text = response
            .content
            .into_iter()
            .next()
            .ok_or_else(|| TextBriefError::malformed("anthropic: empty content list"))?
            .text
            .ok_or_else(|| TextBriefError::malformed("anthropic: missing content[0].text"))?;

        if text.trim().is_empty() {
            return Err(TextBriefError::malformed("anthropic: empty text"));
        }

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SummarizationRequest;
    use serde_json::json;

    #[test]
    fn test_build_request() {
        let adapter = AnthropicAdapter::new("https://api.anthropic.com/v1/messages", "claude-2", "2023-06-01");
        let prompt = crate::prompts::normalize(&SummarizationRequest::grammar("teh cat").unwrap());
        let call = UpstreamCall {
            system: "editor",
            prompt: &prompt,
            max_tokens: 1024,
            temperature: None,
        };

        let request = adapter.build_request("ak-123", &call).unwrap();
        assert_eq!(request.header("x-api-key"), Some("ak-123"));
        assert_eq!(request.header("anthropic-version"), Some("2023-06-01"));
        assert_eq!(request.header("authorization"), None);
        assert_eq!(request.body["system"], "editor");
        assert_eq!(request.body["max_tokens"], 1024);
        assert_eq!(
            request.body["messages"],
            json!([{"role": "user", "content": prompt.as_str()}])
        );
    }

    #[test]
    fn test_temperature_is_clamped() {
        let adapter = AnthropicAdapter::new("https://example.test", "m", "v");
        let prompt = crate::prompts::normalize(
            &SummarizationRequest::new("The cat sat.", "paragraph", 0.5, None).unwrap(),
        );
        let call = |temperature| UpstreamCall {
            system: "summarizer",
            prompt: &prompt,
            max_tokens: 6,
            temperature: Some(temperature),
        };

        let request = adapter.build_request("ak", &call(1.6)).unwrap();
        assert_eq!(request.body["temperature"], 1.0);

        let request = adapter.build_request("ak", &call(0.5)).unwrap();
        assert_eq!(request.body["temperature"], 0.5);
    }

    #[test]
    fn test_extract_result() {
        let adapter = AnthropicAdapter::new("https://example.test", "m", "v");
        let body = json!({"id": "msg_1", "type": "message", "content": [{"type": "text", "text": "Fixed text."}]});
        assert_eq!(adapter.extract_result(&body).unwrap(), "Fixed text.");
    }

    #[test]
    fn test_extract_result_malformed() {
        let adapter = AnthropicAdapter::new("https://example.test", "m", "v");
        // chat-completions shape is not accepted here
        let body = json!({"choices": [{"message": {"content": "x"}}]});
        assert!(matches!(
            adapter.extract_result(&body),
            Err(TextBriefError::MalformedUpstreamResponse(_))
        ));
        let body = json!({"content": [{"type": "tool_use"}]});
        assert!(matches!(
            adapter.extract_result(&body),
            Err(TextBriefError::MalformedUpstreamResponse(_))
        ));
    }
}

use serde_json::Value;
use textbrief_common::Result;

use crate::types::NormalizedPrompt;

/// Everything an adapter needs to shape one upstream call
#[derive(Debug, Clone)]
pub struct UpstreamCall<'a> {
    pub system: &'a str,
    pub prompt: &'a NormalizedPrompt,
    pub max_tokens: u32,
    /// `None` leaves the vendor default in place
    pub temperature: Option<f32>,
}

/// A fully shaped vendor request
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Value,
}

impl UpstreamRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Raw vendor response: status plus undecoded body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamResponse {
    pub status: u16,
    pub body: String,
}

impl UpstreamResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Per-vendor translation between a normalized prompt and the vendor wire format
pub trait ProviderAdapter: Send + Sync {
    /// Identifier used for registration and lookup (e.g. "openai")
    fn id(&self) -> &'static str;

    /// Build the vendor-specific HTTP request
    fn build_request(&self, api_key: &str, call: &UpstreamCall<'_>) -> Result<UpstreamRequest>;

    /// Pull the result text out of a successful response body
    fn extract_result(&self, body: &Value) -> Result<String>;

    /// Pull a human-readable message out of an error body
    fn extract_error(&self, body: &str) -> Option<String> {
        default_error_message(body)
    }
}

const MAX_ERROR_BODY_CHARS: usize = 500;

/// Vendors share `{"error": {"message": ..}}` or `{"error": ".."}`; fall back to
/// the truncated raw body
pub fn default_error_message(body: &str) -> Option<String> {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        let error = &value["error"];
        if let Some(message) = error["message"].as_str().or_else(|| error.as_str()) {
            return Some(message.to_string());
        }
        if let Some(message) = value["message"].as_str() {
            return Some(message.to_string());
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.chars().take(MAX_ERROR_BODY_CHARS).collect())
    }
}

use serde::{Deserialize, Serialize};

fn default_length() -> f64 {
    0.5
}

/// Provider selection sent by the browser alongside each summarize call
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiSettings {
    #[serde(default)]
    pub provider: String,

    #[serde(default)]
    pub api_key: String,
}

/// POST /summarize body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummarizeRequest {
    #[serde(default)]
    pub text: String,

    /// paragraph | bullet | custom | grammar
    #[serde(default)]
    pub mode: String,

    /// Length factor in (0, 1]
    #[serde(default = "default_length")]
    pub length: f64,

    pub custom_instructions: Option<String>,

    #[serde(default)]
    pub api_settings: ApiSettings,
}

/// POST /grammar-check body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrammarCheckRequest {
    #[serde(default)]
    pub text: String,

    #[serde(default)]
    pub api_key: String,

    #[serde(default)]
    pub provider: String,
}

#[derive(Debug, Serialize)]
pub struct SummarizeResponse {
    pub summary: String,
}

#[derive(Debug, Serialize)]
pub struct GrammarCheckResponse {
    pub result: String,
}

#[derive(Debug, Serialize)]
pub struct ExtractTextResponse {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub providers: Vec<&'static str>,
}

/// Error body for every failed request
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

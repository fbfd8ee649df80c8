use actix_web::{post, web, HttpResponse};
use std::sync::Arc;
use textbrief_common::TextBriefError;
use textbrief_llm::{CancellationToken, ProviderCredentials, SummarizationRequest};
use tracing::info;

use crate::error::ApiError;
use crate::state::AppState;
use crate::types::{SummarizeRequest, SummarizeResponse};

/// Summarize text with the caller's provider and key
#[post("/summarize")]
pub async fn summarize(
    req: web::Json<SummarizeRequest>,
    state: web::Data<Arc<AppState>>,
) -> Result<HttpResponse, ApiError> {
    let req = req.into_inner();

    if req.api_settings.api_key.trim().is_empty() {
        return Err(TextBriefError::MissingCredentials.into());
    }

    let request = SummarizationRequest::new(req.text, &req.mode, req.length, req.custom_instructions)?;
    let credentials = ProviderCredentials::new(req.api_settings.provider, req.api_settings.api_key);

    info!(
        "Summarize requested - Provider: {}, Mode: {}, Length: {}, Text length: {}",
        credentials.provider,
        request.mode,
        request.length,
        request.text.len()
    );

    let summary = state
        .router
        .summarize(&credentials, &request, CancellationToken::new())
        .await?;

    Ok(HttpResponse::Ok().json(SummarizeResponse { summary }))
}

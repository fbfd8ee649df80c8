use actix_web::{post, web, HttpResponse};
use std::sync::Arc;
use textbrief_common::TextBriefError;
use textbrief_llm::{CancellationToken, ProviderCredentials, SummarizationRequest};
use tracing::info;

use crate::error::ApiError;
use crate::state::AppState;
use crate::types::{GrammarCheckRequest, GrammarCheckResponse};

/// Check grammar, spelling and style.
/// Anything other than a bad request is reported as 500.
#[post("/grammar-check")]
pub async fn grammar_check(
    req: web::Json<GrammarCheckRequest>,
    state: web::Data<Arc<AppState>>,
) -> Result<HttpResponse, ApiError> {
    let req = req.into_inner();

    let request = SummarizationRequest::grammar(req.text).map_err(ApiError::server_side)?;
    if req.api_key.trim().is_empty() {
        return Err(ApiError::server_side(TextBriefError::MissingCredentials));
    }
    let credentials = ProviderCredentials::new(req.provider, req.api_key);

    info!(
        "Grammar check requested - Provider: {}, Text length: {}",
        credentials.provider,
        request.text.len()
    );

    let result = state
        .router
        .summarize(&credentials, &request, CancellationToken::new())
        .await
        .map_err(ApiError::server_side)?;

    Ok(HttpResponse::Ok().json(GrammarCheckResponse { result }))
}

use actix_multipart::Multipart;
use actix_web::{post, web, HttpResponse};
use futures_util::StreamExt;
use std::sync::Arc;
use textbrief_common::TextBriefError;
use tracing::info;

use crate::error::ApiError;
use crate::state::AppState;
use crate::types::{ErrorResponse, ExtractTextResponse};

struct Upload {
    filename: String,
    content_type: Option<String>,
    data: Vec<u8>,
}

/// Extract plain text from the multipart `file` field
#[post("/extract-text")]
pub async fn extract_text(
    mut payload: Multipart,
    state: web::Data<Arc<AppState>>,
) -> Result<HttpResponse, ApiError> {
    let max_bytes = state.config.max_upload_bytes;
    let mut upload = None;

    while let Some(field) = payload.next().await {
        let mut field = field
            .map_err(|e| TextBriefError::invalid_input(format!("Invalid multipart body: {}", e)))?;

        let content_disposition = field.content_disposition();
        if content_disposition.get_name() != Some("file") {
            while let Some(chunk) = field.next().await {
                chunk.map_err(|e| TextBriefError::invalid_input(format!("Invalid multipart body: {}", e)))?;
            }
            continue;
        }

        let filename = content_disposition
            .get_filename()
            .unwrap_or("unknown")
            .to_string();
        let content_type = field.content_type().map(|m| m.essence_str().to_string());

        let mut data = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk
                .map_err(|e| TextBriefError::invalid_input(format!("Failed to read upload: {}", e)))?;
            if data.len() + chunk.len() > max_bytes {
                return Err(TextBriefError::invalid_input(format!(
                    "File exceeds the upload limit of {} bytes",
                    max_bytes
                ))
                .into());
            }
            data.extend_from_slice(&chunk);
        }

        upload = Some(Upload {
            filename,
            content_type,
            data,
        });
    }

    let Some(upload) = upload else {
        return Ok(HttpResponse::BadRequest().json(ErrorResponse {
            error: "No file provided".to_string(),
        }));
    };

    info!(
        "File received - Name: {}, Type: {:?}, Size: {} bytes",
        upload.filename,
        upload.content_type,
        upload.data.len()
    );

    let text = state
        .extractor
        .extract(upload.data, &upload.filename, upload.content_type.as_deref())
        .await?;

    Ok(HttpResponse::Ok().json(ExtractTextResponse { text }))
}

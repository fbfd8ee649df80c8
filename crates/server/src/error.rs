use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use std::fmt;
use textbrief_common::TextBriefError;

use crate::types::ErrorResponse;

/// Typed error rendered as `{error}` with a status derived from the taxonomy
#[derive(Debug)]
pub struct ApiError {
    inner: TextBriefError,
    status: u16,
}

impl ApiError {
    /// Keep 400s, collapse everything else to 500
    pub fn server_side(inner: TextBriefError) -> Self {
        let status = if inner.is_client_error() { 400 } else { 500 };
        Self { inner, status }
    }
}

impl From<TextBriefError> for ApiError {
    fn from(inner: TextBriefError) -> Self {
        let status = inner.status_code();
        Self { inner, status }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.inner.fmt(f)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.inner.to_string(),
        })
    }
}

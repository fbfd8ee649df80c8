//! TextBrief HTTP server
//!
//! Actix-web boundary over the provider router and the document extractor

pub mod error;
pub mod routes;
pub mod state;
pub mod types;

use actix_cors::Cors;
use actix_web::{error::InternalError, web, App, HttpResponse, HttpServer};
use std::sync::Arc;
use textbrief_common::{AppConfig, Result};
use tracing::info;
use tracing_actix_web::TracingLogger;

pub use error::ApiError;
pub use state::AppState;

use crate::types::ErrorResponse;

/// JSON extractor config: size limit plus `{error}` bodies for unparsable input
fn json_config(limit: usize) -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(limit)
        .error_handler(|err, _req| {
            let response = HttpResponse::BadRequest().json(ErrorResponse {
                error: format!("Invalid request body: {}", err),
            });
            InternalError::from_response(err, response).into()
        })
}

/// Register state and routes on an app
pub fn configure(state: Arc<AppState>) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg: &mut web::ServiceConfig| {
        let limit = state.config.max_upload_bytes;
        cfg.app_data(web::Data::new(state))
            .app_data(json_config(limit))
            .service(routes::summarize)
            .service(routes::grammar_check)
            .service(routes::extract_text)
            .service(routes::health);
    }
}

/// Bind and run the HTTP server until shutdown
pub async fn start_server(config: AppConfig) -> Result<()> {
    let bind_addr = config.server_bind_address();
    let state = Arc::new(AppState::new(config)?);

    info!("Starting HTTP server on {}", bind_addr);

    HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .wrap(Cors::permissive())
            .configure(configure(state.clone()))
    })
    .bind(&bind_addr)?
    .run()
    .await?;

    info!("HTTP server stopped");
    Ok(())
}

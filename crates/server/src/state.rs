use std::sync::Arc;
use textbrief_common::{AppConfig, Result};
use textbrief_extract::DocumentExtractor;
use textbrief_llm::ProviderRouter;

/// Shared application state
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,

    /// Provider router (stateless across calls)
    pub router: Arc<ProviderRouter>,

    /// Uploaded document parser
    pub extractor: DocumentExtractor,
}

impl AppState {
    /// Create state with the built-in vendors over reqwest
    pub fn new(config: AppConfig) -> Result<Self> {
        let router = ProviderRouter::from_config(&config)?;
        Ok(Self::with_router(config, router))
    }

    /// Create state around an already-built router
    pub fn with_router(config: AppConfig, router: ProviderRouter) -> Self {
        let extractor = DocumentExtractor::new(config.extraction_timeout());
        Self {
            config,
            router: Arc::new(router),
            extractor,
        }
    }
}

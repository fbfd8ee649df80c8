use std::time::Duration;

use textbrief_common::{Result, TextBriefError};
use tracing::{debug, info, warn};

use crate::pdf::extract_pdf;
use crate::types::DocumentKind;
use crate::word::extract_word;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Dispatches an uploaded file to the parser for its kind
#[derive(Debug, Clone)]
pub struct DocumentExtractor {
    timeout: Duration,
}

impl Default for DocumentExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

impl DocumentExtractor {
    /// Create extractor; `timeout` bounds each PDF/Word parse
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Extract plain text from an uploaded file.
    ///
    /// Blank results are an error (`EmptyExtraction`), never an empty success.
    pub async fn extract(
        &self,
        bytes: Vec<u8>,
        name: &str,
        mime_type: Option<&str>,
    ) -> Result<String> {
        let kind = DocumentKind::detect(name, mime_type)?;
        info!("Extracting text - File: {}, Kind: {}, Size: {} bytes", name, kind, bytes.len());

        let text = match kind {
            DocumentKind::Text => String::from_utf8_lossy(&bytes).into_owned(),
            DocumentKind::Pdf => self.parse_blocking(name, bytes, extract_pdf).await?,
            DocumentKind::Word => self.parse_blocking(name, bytes, extract_word).await?,
        };

        if text.trim().is_empty() {
            warn!("No text extracted from {}", name);
            return Err(TextBriefError::EmptyExtraction(name.to_string()));
        }

        debug!("Text extracted - File: {}, Length: {} chars", name, text.chars().count());
        Ok(text)
    }

    /// Run a parser on the blocking pool under the extraction timeout.
    /// A panicking parser surfaces as `ExtractionFailed`.
    async fn parse_blocking(
        &self,
        name: &str,
        bytes: Vec<u8>,
        parse: fn(&[u8]) -> Result<String>,
    ) -> Result<String> {
        let task = tokio::task::spawn_blocking(move || parse(&bytes));

        let text = tokio::time::timeout(self.timeout, task)
            .await
            .map_err(|_| {
                TextBriefError::extraction(format!(
                    "{} timed out after {:?}",
                    name, self.timeout
                ))
            })?
            .map_err(|e| TextBriefError::extraction(format!("parser crashed on {}: {}", name, e)))??;

        Ok(text.trim_end().to_string())
    }
}

use textbrief_common::{Result, TextBriefError};

/// Extract the text layer of a PDF held in memory
pub(crate) fn extract_pdf(bytes: &[u8]) -> Result<String> {
    pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| TextBriefError::extraction(format!("Failed to parse PDF file: {}", e)))
}

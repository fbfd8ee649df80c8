use serde::Serialize;
use std::fmt;
use std::path::Path;
use textbrief_common::{Result, TextBriefError};

/// Document formats the extractor understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Text,
    Pdf,
    Word,
}

impl DocumentKind {
    /// Resolve the kind from the file name suffix (case-insensitive).
    ///
    /// The declared MIME type is consulted only when the name has no suffix at all.
    pub fn detect(name: &str, mime_type: Option<&str>) -> Result<Self> {
        let extension = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("txt") => Ok(Self::Text),
            Some("pdf") => Ok(Self::Pdf),
            Some("doc") | Some("docx") => Ok(Self::Word),
            Some(_) => Err(TextBriefError::UnsupportedFileType(name.to_string())),
            None => mime_type
                .and_then(Self::from_mime)
                .ok_or_else(|| TextBriefError::UnsupportedFileType(name.to_string())),
        }
    }

    fn from_mime(mime_type: &str) -> Option<Self> {
        let essence = mime_type.split(';').next().unwrap_or("").trim();
        match essence {
            "text/plain" => Some(Self::Text),
            "application/pdf" => Some(Self::Pdf),
            "application/msword"
            | "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => {
                Some(Self::Word)
            }
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Pdf => "pdf",
            Self::Word => "word",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use textbrief_common::{Result, TextBriefError};

/// Summarization style selected by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Paragraph,
    Bullet,
    Custom,
    Grammar,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Paragraph => "paragraph",
            Mode::Bullet => "bullet",
            Mode::Custom => "custom",
            Mode::Grammar => "grammar",
        }
    }

    /// Grammar checks ignore the length slider
    pub fn is_grammar(&self) -> bool {
        matches!(self, Mode::Grammar)
    }
}

impl FromStr for Mode {
    type Err = TextBriefError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "paragraph" => Ok(Mode::Paragraph),
            "bullet" => Ok(Mode::Bullet),
            "custom" => Ok(Mode::Custom),
            "grammar" => Ok(Mode::Grammar),
            other => Err(TextBriefError::InvalidMode(other.to_string())),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated summarization or grammar-check request
#[derive(Debug, Clone, PartialEq)]
pub struct SummarizationRequest {
    pub text: String,
    pub mode: Mode,
    /// Length factor in (0, 1]
    pub length: f64,
    /// Only meaningful for `Mode::Custom`
    pub custom_instructions: Option<String>,
}

impl SummarizationRequest {
    /// Build a request from raw user input
    ///
    /// Fails with `MissingText` for blank text, `InvalidMode` for an unknown mode,
    /// and `InvalidInput` when a non-grammar length falls outside (0, 1].
    pub fn new(
        text: impl Into<String>,
        mode: &str,
        length: f64,
        custom_instructions: Option<String>,
    ) -> Result<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(TextBriefError::MissingText);
        }

        let mode: Mode = mode.parse()?;

        if !mode.is_grammar() && !(length.is_finite() && length > 0.0 && length <= 1.0) {
            return Err(TextBriefError::invalid_input(format!(
                "length must be within (0, 1], got {}",
                length
            )));
        }

        let custom_instructions = match mode {
            Mode::Custom => custom_instructions,
            _ => None,
        };

        Ok(Self {
            text,
            mode,
            length,
            custom_instructions,
        })
    }

    /// Build a grammar-check request; length is irrelevant for this mode
    pub fn grammar(text: impl Into<String>) -> Result<Self> {
        Self::new(text, Mode::Grammar.as_str(), 1.0, None)
    }
}

/// Provider selection plus the user-supplied key; never persisted by the core
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderCredentials {
    pub provider: String,
    pub api_key: String,
}

impl ProviderCredentials {
    pub fn new(provider: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            api_key: api_key.into(),
        }
    }
}

impl fmt::Debug for ProviderCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderCredentials")
            .field("provider", &self.provider)
            .field("api_key", &textbrief_common::logger::mask_secret(&self.api_key))
            .finish()
    }
}

/// Vendor-agnostic instruction string derived from a request
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedPrompt(String);

impl NormalizedPrompt {
    pub(crate) fn new(prompt: String) -> Self {
        Self(prompt)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for NormalizedPrompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Map the four-stop UI slider (0..=3) to a length factor
pub fn length_from_slider(step: u8) -> f64 {
    (f64::from(step.min(3)) + 1.0) * 0.25
}

/// Word and sentence counts shown next to the input pane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TextStats {
    pub words: usize,
    pub sentences: usize,
}

impl TextStats {
    pub fn of(text: &str) -> Self {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Self {
                words: 0,
                sentences: 0,
            };
        }

        Self {
            words: trimmed.split_whitespace().count(),
            sentences: trimmed
                .split(['.', '!', '?'])
                .filter(|s| !s.is_empty())
                .count(),
        }
    }
}

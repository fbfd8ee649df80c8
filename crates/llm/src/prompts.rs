//! Prompt templates for summarization and grammar checks

use crate::types::{Mode, NormalizedPrompt, SummarizationRequest};

/// System persona for every summarization mode
pub const SUMMARY_SYSTEM_PROMPT: &str =
    "You are a helpful AI assistant that specializes in summarizing text.";

/// System persona for grammar checks
pub const GRAMMAR_SYSTEM_PROMPT: &str = "You are a professional editor. Your task is to check the text for grammar, spelling, and style issues. Provide corrections and explanations in a clear, concise format.";

/// Used when a custom request arrives without instructions
pub const DEFAULT_CUSTOM_INSTRUCTIONS: &str = "Summarize the following text in a creative way";

/// Pick one of three qualifiers for a length factor.
/// Bounds are strict: exactly 0.3 and exactly 0.7 both land in the middle band.
fn length_qualifier(
    length: f64,
    low: &'static str,
    middle: &'static str,
    high: &'static str,
) -> &'static str {
    if length < 0.3 {
        low
    } else if length > 0.7 {
        high
    } else {
        middle
    }
}

/// Turn a request into the provider-agnostic prompt.
///
/// Pure: identical requests always produce identical prompts.
pub fn normalize(request: &SummarizationRequest) -> NormalizedPrompt {
    let text = &request.text;
    let length = request.length;

    let prompt = match request.mode {
        Mode::Paragraph => format!(
            "Summarize the following text in a single paragraph. Make the summary {}:\n\n{}",
            length_qualifier(length, "very concise", "moderate in length", "detailed"),
            text
        ),
        Mode::Bullet => format!(
            "Summarize the following text in bullet points. Provide {} key points:\n\n{}",
            length_qualifier(length, "few", "some", "many"),
            text
        ),
        Mode::Custom => {
            let instructions = request
                .custom_instructions
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .unwrap_or(DEFAULT_CUSTOM_INSTRUCTIONS);
            format!(
                "{}. The summary should be {}:\n\n{}",
                instructions,
                length_qualifier(length, "very brief", "balanced", "comprehensive"),
                text
            )
        }
        Mode::Grammar => grammar_prompt(text),
    };

    NormalizedPrompt::new(prompt)
}

/// Fixed grammar-check template, independent of the length slider
pub fn grammar_prompt(text: &str) -> String {
    format!(
        "Please check this text for grammar and style issues: \"{}\"",
        text
    )
}

/// System persona that accompanies the prompt for a given mode
pub fn system_prompt(mode: Mode) -> &'static str {
    match mode {
        Mode::Grammar => GRAMMAR_SYSTEM_PROMPT,
        _ => SUMMARY_SYSTEM_PROMPT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(mode: &str, length: f64, custom: Option<&str>) -> SummarizationRequest {
        SummarizationRequest::new("Some text.", mode, length, custom.map(String::from)).unwrap()
    }

    #[test]
    fn test_paragraph_thresholds() {
        for length in [0.05, 0.25, 0.29] {
            assert!(normalize(&request("paragraph", length, None))
                .as_str()
                .contains("very concise"));
        }
        for length in [0.3, 0.5, 0.7] {
            assert!(normalize(&request("paragraph", length, None))
                .as_str()
                .contains("moderate in length"));
        }
        for length in [0.71, 0.75, 1.0] {
            assert!(normalize(&request("paragraph", length, None))
                .as_str()
                .contains("detailed"));
        }
    }

    #[test]
    fn test_bullet_thresholds() {
        assert!(normalize(&request("bullet", 0.25, None)).as_str().contains("Provide few key points"));
        assert!(normalize(&request("bullet", 0.5, None)).as_str().contains("Provide some key points"));
        assert!(normalize(&request("bullet", 1.0, None)).as_str().contains("Provide many key points"));
    }

    #[test]
    fn test_custom_instructions_and_default() {
        let prompt = normalize(&request("custom", 0.25, Some("Explain it to a child")));
        assert!(prompt
            .as_str()
            .starts_with("Explain it to a child. The summary should be very brief:"));

        let prompt = normalize(&request("custom", 0.5, Some("   ")));
        assert!(prompt.as_str().starts_with(DEFAULT_CUSTOM_INSTRUCTIONS));
        assert!(prompt.as_str().contains("balanced"));

        let prompt = normalize(&request("custom", 0.9, None));
        assert!(prompt.as_str().starts_with(DEFAULT_CUSTOM_INSTRUCTIONS));
        assert!(prompt.as_str().contains("comprehensive"));
    }

    #[test]
    fn test_grammar_ignores_length() {
        let short = normalize(&request("grammar", 0.1, None));
        let long = normalize(&request("grammar", 1.0, None));
        assert_eq!(short, long);
        assert_eq!(
            short.as_str(),
            "Please check this text for grammar and style issues: \"Some text.\""
        );
    }

    #[test]
    fn test_normalize_is_deterministic() {
        for mode in ["paragraph", "bullet", "custom", "grammar"] {
            let req = request(mode, 0.6, Some("Keep names"));
            assert_eq!(normalize(&req), normalize(&req.clone()));
        }
    }

    #[test]
    fn test_prompt_ends_with_text() {
        let prompt = normalize(&request("paragraph", 0.5, None));
        assert!(prompt.as_str().ends_with(":\n\nSome text."));
    }

    #[test]
    fn test_system_prompt() {
        assert_eq!(system_prompt(Mode::Grammar), GRAMMAR_SYSTEM_PROMPT);
        assert_eq!(system_prompt(Mode::Bullet), SUMMARY_SYSTEM_PROMPT);
    }
}

use textbrief_common::AppConfig;

use crate::types::SummarizationRequest;

/// Output-length heuristic handed to adapters as `max_tokens`.
///
/// The length-derived budget counts characters, not tokens; it is a heuristic
/// and the bounds exist so it can be tuned per deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BudgetPolicy {
    pub grammar_max_tokens: u32,
    pub min_tokens: u32,
    pub max_tokens: Option<u32>,
}

impl Default for BudgetPolicy {
    fn default() -> Self {
        Self {
            grammar_max_tokens: 1024,
            min_tokens: 1,
            max_tokens: None,
        }
    }
}

impl BudgetPolicy {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            grammar_max_tokens: config.grammar_max_tokens,
            min_tokens: config.min_output_tokens,
            max_tokens: config.max_output_tokens,
        }
    }

    /// `floor(chars(text) * length)` clamped to the policy bounds,
    /// or the fixed grammar budget
    pub fn budget_for(&self, request: &SummarizationRequest) -> u32 {
        if request.mode.is_grammar() {
            return self.grammar_max_tokens;
        }

        let chars = request.text.chars().count() as f64;
        let raw = (chars * request.length).floor();
        let raw = if raw >= f64::from(u32::MAX) {
            u32::MAX
        } else {
            raw as u32
        };

        let bounded = raw.max(self.min_tokens);
        match self.max_tokens {
            Some(max) => bounded.min(max),
            None => bounded,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_derived_budget() {
        let policy = BudgetPolicy::default();
        let req = SummarizationRequest::new("a".repeat(1000), "paragraph", 0.25, None).unwrap();
        assert_eq!(policy.budget_for(&req), 250);

        // floor, not round
        let req = SummarizationRequest::new("abc", "bullet", 0.5, None).unwrap();
        assert_eq!(policy.budget_for(&req), 1);
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        let policy = BudgetPolicy::default();
        let req = SummarizationRequest::new("ééééé", "paragraph", 1.0, None).unwrap();
        assert_eq!(policy.budget_for(&req), 5);
    }

    #[test]
    fn test_bounds() {
        let policy = BudgetPolicy {
            grammar_max_tokens: 512,
            min_tokens: 16,
            max_tokens: Some(100),
        };
        let tiny = SummarizationRequest::new("hi", "paragraph", 0.25, None).unwrap();
        assert_eq!(policy.budget_for(&tiny), 16);

        let huge = SummarizationRequest::new("x".repeat(10_000), "paragraph", 1.0, None).unwrap();
        assert_eq!(policy.budget_for(&huge), 100);
    }

    #[test]
    fn test_grammar_uses_fixed_budget() {
        let policy = BudgetPolicy::default();
        let req = SummarizationRequest::grammar("x".repeat(10_000)).unwrap();
        assert_eq!(policy.budget_for(&req), 1024);
    }
}

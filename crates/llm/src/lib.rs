//! TextBrief LLM integration
//!
//! Request normalization, per-vendor adapters and the provider router

mod adapter;
mod budget;
mod prompts;
pub mod providers;
mod router;
mod transport;
mod types;

pub use adapter::{default_error_message, ProviderAdapter, UpstreamCall, UpstreamRequest, UpstreamResponse};
pub use budget::BudgetPolicy;
pub use prompts::{
    grammar_prompt, normalize, system_prompt, DEFAULT_CUSTOM_INSTRUCTIONS, GRAMMAR_SYSTEM_PROMPT,
    SUMMARY_SYSTEM_PROMPT,
};
pub use router::ProviderRouter;
pub use transport::{HttpTransport, ReqwestTransport};
pub use types::{
    length_from_slider, Mode, NormalizedPrompt, ProviderCredentials, SummarizationRequest,
    TextStats,
};

pub use tokio_util::sync::CancellationToken;

//! Provider adapters
//!
//! ```text
//! chat_completions.rs  <- OpenAI and Mistral (same chat-completions wire format)
//! anthropic.rs         <- Anthropic messages API
//! ```

mod anthropic;
mod chat_completions;

pub use anthropic::AnthropicAdapter;
pub use chat_completions::ChatCompletionsAdapter;

pub const OPENAI: &str = "openai";
pub const MISTRAL: &str = "mistral";
pub const ANTHROPIC: &str = "anthropic";

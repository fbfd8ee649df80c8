mod extract;
mod grammar;
mod summary;
mod system;

pub use extract::extract_text;
pub use grammar::grammar_check;
pub use summary::summarize;
pub use system::health;

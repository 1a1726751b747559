//! WorldForge LLM
//!
//! Narrow text-generation capability used by the world interview engine:
//! - `TextGenerator` - the one-method `generate(prompt) -> text` seam
//! - `OpenAICompatibleClient` - chat-completions HTTP implementation
//!
//! No streaming and no structured-output guarantee. Callers impose structure
//! through prompt instructions and validate whatever comes back.

pub mod http_client;
pub mod openai;
pub mod provider;
pub mod types;

// Re-export main types
pub use http_client::build_http_client;
pub use openai::OpenAICompatibleClient;
pub use provider::TextGenerator;
pub use types::*;

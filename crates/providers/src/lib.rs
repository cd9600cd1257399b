pub mod adapter;
pub mod mock;
pub mod prompts;
pub mod types;

pub use adapter::{PerplexityProvider, Provider, ProviderFactory, complete_with_timeout};
pub use mock::{MockProvider, MockResponse};
pub use prompts::{DEFAULT_SYSTEM_PROMPT, DEFAULT_TEMPERATURE, build_request, system_prompt};
pub use types::{Answer, ChatMessage, ChatRequest, ChatRequestBuilder, Role};

pub use duet_core::{Error, Result};

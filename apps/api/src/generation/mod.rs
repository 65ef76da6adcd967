// Tweet thread generation engine.
// Pipeline: tone template → model call → parse → enforce constraints.
// All model calls go through llm_client::ModelClient — no direct HTTP here.

pub mod constraints;
pub mod generator;
pub mod handlers;
pub mod parser;
pub mod prompts;

// Re-export the public API consumed by handlers and state.
pub use generator::{generate_thread, GenerationError, GenerationRequest, GenerationResult};
pub use prompts::PromptRegistry;

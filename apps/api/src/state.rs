use std::sync::Arc;

use sqlx::PgPool;

use crate::auth::JwtKeys;
use crate::config::Config;
use crate::generation::PromptRegistry;
use crate::llm_client::ModelClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Model collaborator. Default: `LlmClient`; tests inject a stub.
    pub model: Arc<dyn ModelClient>,
    /// Tone → template table, built once at startup and never mutated.
    pub prompts: Arc<PromptRegistry>,
    pub jwt: Arc<JwtKeys>,
    pub config: Config,
}

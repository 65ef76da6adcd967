//! Thread generation — orchestrates the generation pipeline.
//!
//! Flow: validate → resolve tone template → model call → parse_tweets →
//!       enforce_constraints → GenerationResult.
//!
//! Stateless: the only shared input is the read-only `PromptRegistry`.
//! Persistence and timeouts belong to the caller (see `handlers`).

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::generation::constraints::enforce_constraints;
use crate::generation::parser::{parse_tweets, ParseError};
use crate::generation::prompts::{user_instruction, PromptRegistry};
use crate::llm_client::{LlmError, ModelClient};

pub const MIN_TOPIC_CHARS: usize = 10;
pub const MIN_TWEETS: i64 = 1;
pub const MAX_TWEETS: i64 = 20;
pub const DEFAULT_MAX_TWEETS: i64 = 5;
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

// ────────────────────────────────────────────────────────────────────────────
// Errors
// ────────────────────────────────────────────────────────────────────────────

/// Caller-supplied input violates a precondition. Checked before any model call.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Topic must be at least 10 characters long")]
    TopicTooShort,

    #[error("max_tweets must be between 1 and 20")]
    TweetCountOutOfRange(i64),

    #[error("temperature must be between 0.0 and 1.0")]
    TemperatureOutOfRange(f32),
}

/// Everything that can cross the orchestrator boundary.
/// Model and parse failures stay distinct so callers can tell them apart.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("model call failed: {0}")]
    Model(#[from] LlmError),

    #[error("{0}")]
    Parse(#[from] ParseError),

    #[error("model call timed out after {0}s")]
    TimedOut(u64),
}

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// One generation call's inputs.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub topic: String,
    pub tone: Option<String>,
    pub max_tweets: i64,
    pub add_numbering: bool,
    pub temperature: f32,
}

impl GenerationRequest {
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            tone: None,
            max_tweets: DEFAULT_MAX_TWEETS,
            add_numbering: true,
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    /// Preconditions in their fixed order: topic, count, temperature.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.topic.trim().chars().count() < MIN_TOPIC_CHARS {
            return Err(ValidationError::TopicTooShort);
        }
        if !(MIN_TWEETS..=MAX_TWEETS).contains(&self.max_tweets) {
            return Err(ValidationError::TweetCountOutOfRange(self.max_tweets));
        }
        if !(0.0..=1.0).contains(&self.temperature) {
            return Err(ValidationError::TemperatureOutOfRange(self.temperature));
        }
        Ok(())
    }
}

/// The pipeline's output. `tweet_count` always equals `tweets.len()`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub tweets: Vec<String>,
    pub tweet_count: usize,
    pub tone: String,
    pub topic: String,
}

impl GenerationResult {
    fn new(tweets: Vec<String>, tone: &str, topic: String) -> Self {
        Self {
            tweet_count: tweets.len(),
            tweets,
            tone: tone.to_string(),
            topic,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Pipeline
// ────────────────────────────────────────────────────────────────────────────

/// Runs one generation: validate, prompt, call the model once, parse, enforce.
///
/// No retry and no partial state: any failure after validation surfaces as
/// `GenerationError::Model` or `GenerationError::Parse`.
pub async fn generate_thread(
    registry: &PromptRegistry,
    model: &dyn ModelClient,
    request: GenerationRequest,
) -> Result<GenerationResult, GenerationError> {
    request.validate()?;

    // In 1..=20 once validated
    let tweet_count = request.max_tweets as u32;

    let template = registry.lookup(request.tone.as_deref());
    let system = template.render(&request.topic, tweet_count);
    let user = user_instruction(&request.topic, tweet_count);

    debug!(
        "Generating {} tweets with tone={}",
        request.max_tweets,
        template.tone.as_str()
    );

    let completion = model.invoke(&system, &user, request.temperature).await?;
    let parsed = parse_tweets(&completion)?;

    debug!("Parsed {} tweets from completion", parsed.len());

    let tweets = enforce_constraints(parsed, request.add_numbering, tweet_count as usize);

    Ok(GenerationResult::new(
        tweets,
        template.tone.as_str(),
        request.topic,
    ))
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

//! Axum route handlers for the Generation API.

use std::time::{Duration, Instant};

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::errors::AppError;
use crate::generation::generator::{DEFAULT_MAX_TWEETS, DEFAULT_TEMPERATURE};
use crate::generation::{generate_thread, GenerationError, GenerationRequest, GenerationResult};
use crate::state::AppState;
use crate::threads::store::{record_failed_generation, save_generated_thread};

const MAX_TOPIC_CHARS: usize = 500;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct GenerateTweetsRequest {
    pub topic: String,
    pub tone: Option<String>,
    pub max_tweets: Option<i64>,
    pub add_numbering: Option<bool>,
    pub temperature: Option<f32>,
}

impl GenerateTweetsRequest {
    fn into_generation_request(self) -> Result<GenerationRequest, AppError> {
        if self.topic.chars().count() > MAX_TOPIC_CHARS {
            return Err(AppError::Validation(
                "Topic must be at most 500 characters long".to_string(),
            ));
        }

        Ok(GenerationRequest {
            topic: self.topic,
            tone: self.tone,
            max_tweets: self.max_tweets.unwrap_or(DEFAULT_MAX_TWEETS),
            add_numbering: self.add_numbering.unwrap_or(true),
            temperature: self.temperature.unwrap_or(DEFAULT_TEMPERATURE),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct GenerateTweetsResponse {
    pub tweets: Vec<String>,
    pub tweet_count: usize,
    pub topic: String,
}

impl From<GenerationResult> for GenerateTweetsResponse {
    fn from(result: GenerationResult) -> Self {
        Self {
            tweets: result.tweets,
            tweet_count: result.tweet_count,
            topic: result.topic,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/tweets/generate
///
/// Runs one generation under the configured deadline, persists the thread and
/// a history row, and returns 201. Validation failures return 400 and record
/// nothing; other failures record a `failed` history row and return 500.
pub async fn handle_generate(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<GenerateTweetsRequest>,
) -> Result<(StatusCode, Json<GenerateTweetsResponse>), AppError> {
    let request = request.into_generation_request()?;
    let max_tweets = request.max_tweets;
    let temperature = request.temperature;

    let started = Instant::now();
    let deadline = state.config.generation_timeout_secs;
    let outcome = tokio::time::timeout(
        Duration::from_secs(deadline),
        generate_thread(&state.prompts, state.model.as_ref(), request),
    )
    .await
    .unwrap_or(Err(GenerationError::TimedOut(deadline)));

    let result = match outcome {
        Ok(result) => result,
        Err(GenerationError::Validation(e)) => return Err(AppError::Validation(e.to_string())),
        Err(e) => {
            record_failure(&state, user.id, &e).await;
            return Err(e.into());
        }
    };

    let processing_time_ms = i32::try_from(started.elapsed().as_millis()).unwrap_or(i32::MAX);
    let params = json!({
        "tone": result.tone,
        "max_tweets": max_tweets,
        "temperature": temperature,
    });

    let thread =
        save_generated_thread(&state.db, user.id, &result, &params, processing_time_ms).await?;

    info!(
        "Generated thread {} with {} tweets for user {} in {}ms",
        thread.id, result.tweet_count, user.id, processing_time_ms
    );

    Ok((StatusCode::CREATED, Json(result.into())))
}

/// Best effort: a failure to record the failure is logged, never surfaced.
async fn record_failure(state: &AppState, user_id: Uuid, error: &GenerationError) {
    if let Err(e) = record_failed_generation(&state.db, user_id, &error.to_string()).await {
        warn!("Could not record failed generation for user {user_id}: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(topic: &str) -> GenerateTweetsRequest {
        serde_json::from_value(json!({ "topic": topic })).unwrap()
    }

    #[test]
    fn test_defaults_applied() {
        let generation = request("Exploring AI ethics and governance")
            .into_generation_request()
            .unwrap();
        assert_eq!(generation.max_tweets, 5);
        assert!(generation.add_numbering);
        assert_eq!(generation.temperature, 0.7);
        assert!(generation.tone.is_none());
    }

    #[test]
    fn test_explicit_fields_pass_through() {
        let body: GenerateTweetsRequest = serde_json::from_value(json!({
            "topic": "Exploring AI ethics and governance",
            "tone": "casual",
            "max_tweets": 8,
            "add_numbering": false,
            "temperature": 0.3
        }))
        .unwrap();
        let generation = body.into_generation_request().unwrap();
        assert_eq!(generation.tone.as_deref(), Some("casual"));
        assert_eq!(generation.max_tweets, 8);
        assert!(!generation.add_numbering);
        assert_eq!(generation.temperature, 0.3);
    }

    #[test]
    fn test_topic_over_500_chars_rejected() {
        let err = request(&"t".repeat(501)).into_generation_request().unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(request(&"t".repeat(500)).into_generation_request().is_ok());
    }

    #[test]
    fn test_negative_tweet_count_reaches_validation() {
        let body: GenerateTweetsRequest = serde_json::from_value(json!({
            "topic": "Exploring AI ethics and governance",
            "max_tweets": -1
        }))
        .unwrap();
        let generation = body.into_generation_request().unwrap();
        assert_eq!(generation.max_tweets, -1);

        let err: AppError = GenerationError::from(generation.validate().unwrap_err()).into();
        assert!(matches!(
            err,
            AppError::Validation(ref m) if m == "max_tweets must be between 1 and 20"
        ));
    }

    #[test]
    fn test_response_drops_tone() {
        let body = serde_json::to_value(GenerateTweetsResponse::from(GenerationResult {
            tweets: vec!["[1/1] hi".to_string()],
            tweet_count: 1,
            tone: "engaging".to_string(),
            topic: "Exploring AI ethics and governance".to_string(),
        }))
        .unwrap();
        assert_eq!(
            body,
            json!({
                "tweets": ["[1/1] hi"],
                "tweet_count": 1,
                "topic": "Exploring AI ethics and governance"
            })
        );
    }
}

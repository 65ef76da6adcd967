use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tracing::warn;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TweetThreadRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub topic: String,
    /// JSON-encoded `Vec<String>`.
    pub thread_content: String,
    pub tweet_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A stored thread with its tweets decoded.
#[derive(Debug, Clone, Serialize)]
pub struct TweetThreadResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub topic: String,
    pub tweets: Vec<String>,
    pub tweet_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<TweetThreadRow> for TweetThreadResponse {
    fn from(row: TweetThreadRow) -> Self {
        let tweets = decode_thread_content(&row.thread_content).unwrap_or_else(|e| {
            warn!("Thread {} has undecodable content: {e}", row.id);
            Vec::new()
        });

        Self {
            id: row.id,
            user_id: row.user_id,
            topic: row.topic,
            tweets,
            tweet_count: row.tweet_count,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

pub fn encode_thread_content(tweets: &[String]) -> serde_json::Result<String> {
    serde_json::to_string(tweets)
}

pub fn decode_thread_content(content: &str) -> serde_json::Result<Vec<String>> {
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(content)
}

//! Persistence for generated threads and their generation history.

use anyhow::Context;
use serde::Serialize;
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::generation::GenerationResult;
use crate::models::thread::{encode_thread_content, TweetThreadRow};

const STATUS_SUCCESS: &str = "success";
const STATUS_FAILED: &str = "failed";

/// Stores a successful generation: the thread row plus a `success` history
/// row, in one transaction.
pub async fn save_generated_thread(
    pool: &PgPool,
    user_id: Uuid,
    result: &GenerationResult,
    generation_params: &Value,
    processing_time_ms: i32,
) -> Result<TweetThreadRow, AppError> {
    let thread_content =
        encode_thread_content(&result.tweets).context("Failed to encode thread content")?;
    let tweet_count = i32::try_from(result.tweet_count).context("tweet_count overflows i32")?;

    let mut tx = pool.begin().await?;

    let thread = sqlx::query_as::<_, TweetThreadRow>(
        r#"
        INSERT INTO tweet_threads (id, user_id, topic, thread_content, tweet_count)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(&result.topic)
    .bind(&thread_content)
    .bind(tweet_count)
    .fetch_one(&mut *tx)
    .await?;

    insert_history(
        &mut *tx,
        Some(thread.id),
        user_id,
        generation_params,
        Some(processing_time_ms),
        STATUS_SUCCESS,
    )
    .await?;

    tx.commit().await?;
    Ok(thread)
}

/// Records a failed generation. No thread row exists for it.
pub async fn record_failed_generation(
    pool: &PgPool,
    user_id: Uuid,
    error_message: &str,
) -> Result<(), sqlx::Error> {
    let params = serde_json::json!({ "error": error_message });
    insert_history(pool, None, user_id, &params, Some(0), STATUS_FAILED).await
}

async fn insert_history<'e, E>(
    executor: E,
    thread_id: Option<Uuid>,
    user_id: Uuid,
    generation_params: &Value,
    processing_time_ms: Option<i32>,
    status: &str,
) -> Result<(), sqlx::Error>
where
    E: sqlx::PgExecutor<'e>,
{
    sqlx::query(
        r#"
        INSERT INTO tweet_histories
            (id, thread_id, user_id, generation_params, processing_time, status)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(thread_id)
    .bind(user_id)
    .bind(generation_params)
    .bind(processing_time_ms)
    .bind(status)
    .execute(executor)
    .await?;
    Ok(())
}

/// One page of a user's threads, newest first, plus the user's total thread count.
pub async fn list_threads(
    pool: &PgPool,
    user_id: Uuid,
    page: i64,
    page_size: i64,
) -> Result<(Vec<TweetThreadRow>, i64), sqlx::Error> {
    let offset = (page - 1).saturating_mul(page_size);

    let threads = sqlx::query_as::<_, TweetThreadRow>(
        r#"
        SELECT * FROM tweet_threads
        WHERE user_id = $1
        ORDER BY created_at DESC
        OFFSET $2 LIMIT $3
        "#,
    )
    .bind(user_id)
    .bind(offset)
    .bind(page_size)
    .fetch_all(pool)
    .await?;

    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tweet_threads WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(pool)
        .await?;

    Ok((threads, total))
}

pub async fn find_thread(pool: &PgPool, thread_id: Uuid) -> sqlx::Result<Option<TweetThreadRow>> {
    sqlx::query_as::<_, TweetThreadRow>("SELECT * FROM tweet_threads WHERE id = $1")
        .bind(thread_id)
        .fetch_optional(pool)
        .await
}

/// History rows go with the thread via `ON DELETE CASCADE`.
pub async fn delete_thread(pool: &PgPool, thread_id: Uuid) -> sqlx::Result<()> {
    sqlx::query("DELETE FROM tweet_threads WHERE id = $1")
        .bind(thread_id)
        .execute(pool)
        .await?;
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Analytics
// ────────────────────────────────────────────────────────────────────────────

/// Raw per-user counters as read from the database.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StatsCounters {
    pub total_threads: i64,
    pub total_tweets: i64,
    pub total_generations: i64,
    pub successful_generations: i64,
    pub failed_generations: i64,
    pub avg_processing_time_ms: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserStats {
    pub total_threads: i64,
    pub total_tweets: i64,
    pub total_generations: i64,
    pub successful_generations: i64,
    pub failed_generations: i64,
    /// Percent, two decimals; 0 when nothing has been generated.
    pub success_rate: f64,
    pub avg_processing_time_ms: f64,
}

impl From<StatsCounters> for UserStats {
    fn from(c: StatsCounters) -> Self {
        let success_rate = if c.total_generations > 0 {
            round2(c.successful_generations as f64 / c.total_generations as f64 * 100.0)
        } else {
            0.0
        };

        Self {
            total_threads: c.total_threads,
            total_tweets: c.total_tweets,
            total_generations: c.total_generations,
            successful_generations: c.successful_generations,
            failed_generations: c.failed_generations,
            success_rate,
            avg_processing_time_ms: round2(c.avg_processing_time_ms.unwrap_or(0.0)),
        }
    }
}

pub async fn load_stats(pool: &PgPool, user_id: Uuid) -> sqlx::Result<UserStats> {
    let (total_threads, total_tweets): (i64, i64) = sqlx::query_as(
        r#"
        SELECT COUNT(*), COALESCE(SUM(tweet_count), 0)::BIGINT
        FROM tweet_threads
        WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    let (total_generations, successful_generations, failed_generations, avg_processing_time_ms): (
        i64,
        i64,
        i64,
        Option<f64>,
    ) = sqlx::query_as(
        r#"
        SELECT
            COUNT(*),
            COUNT(*) FILTER (WHERE status = 'success'),
            COUNT(*) FILTER (WHERE status = 'failed'),
            (AVG(processing_time) FILTER (WHERE status = 'success'))::DOUBLE PRECISION
        FROM tweet_histories
        WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(UserStats::from(StatsCounters {
        total_threads,
        total_tweets,
        total_generations,
        successful_generations,
        failed_generations,
        avg_processing_time_ms,
    }))
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

//! Axum route handlers for stored threads: history, lookup, deletion, stats.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::errors::AppError;
use crate::models::thread::{TweetThreadResponse, TweetThreadRow};
use crate::state::AppState;
use crate::threads::store::{delete_thread, find_thread, list_threads, load_stats, UserStats};

const DEFAULT_PAGE_SIZE: i64 = 10;
const MAX_PAGE_SIZE: i64 = 100;

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

impl HistoryQuery {
    /// Returns `(page, page_size)` with defaults applied and bounds checked.
    fn resolve(&self) -> Result<(i64, i64), AppError> {
        let page = self.page.unwrap_or(1);
        let page_size = self.page_size.unwrap_or(DEFAULT_PAGE_SIZE);

        if page < 1 {
            return Err(AppError::Validation("page must be at least 1".to_string()));
        }
        if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
            return Err(AppError::Validation(
                "page_size must be between 1 and 100".to_string(),
            ));
        }
        // OFFSET must stay representable
        if (page - 1).checked_mul(page_size).is_none() {
            return Err(AppError::Validation("page is too large".to_string()));
        }
        Ok((page, page_size))
    }
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub threads: Vec<TweetThreadResponse>,
    pub total_count: i64,
    pub page: i64,
    pub page_size: i64,
}

/// GET /api/tweets/history
pub async fn handle_history(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<HistoryResponse>, AppError> {
    let (page, page_size) = query.resolve()?;
    let (rows, total_count) = list_threads(&state.db, user.id, page, page_size).await?;

    Ok(Json(HistoryResponse {
        threads: rows.into_iter().map(TweetThreadResponse::from).collect(),
        total_count,
        page,
        page_size,
    }))
}

/// GET /api/tweets/:thread_id
pub async fn handle_get_thread(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(thread_id): Path<Uuid>,
) -> Result<Json<TweetThreadResponse>, AppError> {
    let thread = owned_thread(&state, user.id, thread_id, "access").await?;
    Ok(Json(TweetThreadResponse::from(thread)))
}

/// DELETE /api/tweets/:thread_id
pub async fn handle_delete_thread(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(thread_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    owned_thread(&state, user.id, thread_id, "delete").await?;
    delete_thread(&state.db, thread_id).await?;

    info!("Deleted thread {thread_id} for user {}", user.id);
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/tweets/analytics/stats
pub async fn handle_stats(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<UserStats>, AppError> {
    Ok(Json(load_stats(&state.db, user.id).await?))
}

/// GET /api/tweets/health
pub async fn handle_tweets_health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "Tweet Generator API",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Loads a thread and checks that `user_id` owns it.
async fn owned_thread(
    state: &AppState,
    user_id: Uuid,
    thread_id: Uuid,
    action: &str,
) -> Result<TweetThreadRow, AppError> {
    let thread = find_thread(&state.db, thread_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Tweet thread with ID {thread_id} not found")))?;

    if thread.user_id != user_id {
        return Err(AppError::Forbidden(format!(
            "You don't have permission to {action} this tweet thread"
        )));
    }
    Ok(thread)
}

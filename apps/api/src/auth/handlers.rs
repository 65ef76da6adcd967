//! Axum route handlers for the Auth API.

use axum::{extract::State, http::StatusCode, Form, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

use crate::auth::password::{hash_password, verify_password};
use crate::auth::users::{find_user_by_email, find_user_by_username, insert_user};
use crate::auth::CurrentUser;
use crate::errors::AppError;
use crate::models::user::{User, UserResponse};
use crate::state::AppState;

const MIN_USERNAME_CHARS: usize = 3;
const MAX_USERNAME_CHARS: usize = 50;
const MIN_PASSWORD_CHARS: usize = 8;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl RegisterRequest {
    fn validate(&self) -> Result<(), AppError> {
        let username_len = self.username.trim().chars().count();
        if !(MIN_USERNAME_CHARS..=MAX_USERNAME_CHARS).contains(&username_len) {
            return Err(AppError::Validation(
                "Username must be between 3 and 50 characters".to_string(),
            ));
        }
        if !is_valid_email(self.email.trim()) {
            return Err(AppError::Validation("A valid email address is required".to_string()));
        }
        if self.password.chars().count() < MIN_PASSWORD_CHARS {
            return Err(AppError::Validation(
                "Password must be at least 8 characters long".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// OAuth2 password-flow form. `username` carries the email.
#[derive(Debug, Deserialize)]
pub struct TokenForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/auth/register
pub async fn handle_register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    request.validate()?;
    let username = request.username.trim().to_string();
    let email = request.email.trim().to_string();

    if find_user_by_email(&state.db, &email).await?.is_some() {
        return Err(AppError::Validation("Email already registered".to_string()));
    }
    if find_user_by_username(&state.db, &username).await?.is_some() {
        return Err(AppError::Validation("Username already taken".to_string()));
    }

    let password = request.password;
    let hashed = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hashing task failed: {e}")))?
        .map_err(|e| AppError::Internal(e.into()))?;

    // A concurrent registration can still win the race past the checks above.
    let user = insert_user(&state.db, &username, &email, &hashed)
        .await
        .map_err(map_unique_violation)?;

    info!("Registered user {}", user.id);
    Ok((StatusCode::CREATED, Json(UserResponse::from(&user))))
}

/// POST /api/auth/login
pub async fn handle_login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    issue_token_for(&state, &request.email, request.password).await
}

/// POST /api/auth/token
///
/// OAuth2-compatible form login for API tooling.
pub async fn handle_token(
    State(state): State<AppState>,
    Form(form): Form<TokenForm>,
) -> Result<Json<TokenResponse>, AppError> {
    issue_token_for(&state, &form.username, form.password).await
}

/// GET /api/auth/me
pub async fn handle_me(CurrentUser(user): CurrentUser) -> Json<UserResponse> {
    Json(UserResponse::from(&user))
}

/// GET /api/auth/verify
pub async fn handle_verify(CurrentUser(user): CurrentUser) -> Json<Value> {
    Json(json!({
        "status": "success",
        "message": "Token is valid",
        "user_id": user.id,
        "email": user.email,
    }))
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

async fn issue_token_for(
    state: &AppState,
    email: &str,
    password: String,
) -> Result<Json<TokenResponse>, AppError> {
    let user = authenticate(state, email.trim(), password)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Incorrect email or password".to_string()))?;

    if !user.is_active {
        return Err(AppError::Forbidden("User account is inactive".to_string()));
    }

    let access_token = state
        .jwt
        .issue(&user.email, user.id)
        .map_err(|e| AppError::Internal(e.into()))?;

    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer",
    }))
}

/// Returns the user when the email exists and the password matches.
async fn authenticate(
    state: &AppState,
    email: &str,
    password: String,
) -> Result<Option<User>, AppError> {
    let Some(user) = find_user_by_email(&state.db, email).await? else {
        return Ok(None);
    };

    let hashed = user.hashed_password.clone();
    let matches = tokio::task::spawn_blocking(move || verify_password(&password, &hashed))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Password check task failed: {e}")))?;

    Ok(matches.then_some(user))
}

fn map_unique_violation(err: sqlx::Error) -> AppError {
    let constraint = err
        .as_database_error()
        .filter(|db| db.is_unique_violation())
        .map(|db| db.constraint().unwrap_or_default().to_string());

    match constraint {
        Some(c) if c.contains("email") => {
            AppError::Validation("Email already registered".to_string())
        }
        Some(_) => AppError::Validation("Username already taken".to_string()),
        None => AppError::Database(err),
    }
}

/// Structural check only: one `@`, non-empty local part, dotted domain, no whitespace.
/// Looser than RFC 5322; quoted local parts and address literals are not understood.
fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && domain.split('.').all(|label| !label.is_empty())
}

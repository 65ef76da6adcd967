use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use tracing::debug;

use crate::auth::users::find_user_by_email;
use crate::errors::AppError;
use crate::models::user::User;
use crate::state::AppState;

const CREDENTIALS_ERROR: &str = "Could not validate credentials";

/// The authenticated, active caller. Resolved from `Authorization: Bearer <jwt>`.
pub struct CurrentUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        let token = bearer_token(&parts.headers).ok_or_else(credentials_error)?;

        let claims = state.jwt.verify(token).map_err(|e| {
            debug!("Rejected access token: {e}");
            credentials_error()
        })?;

        let user = find_user_by_email(&state.db, &claims.sub)
            .await?
            .filter(|user| user.id == claims.user_id)
            .ok_or_else(credentials_error)?;

        if !user.is_active {
            return Err(AppError::Forbidden("User account is inactive".to_string()));
        }

        Ok(CurrentUser(user))
    }
}

fn credentials_error() -> AppError {
    AppError::Unauthorized(CREDENTIALS_ERROR.to_string())
}

/// Extracts the token from a `Bearer` authorization header. Scheme is case-insensitive.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token_extracted() {
        assert_eq!(bearer_token(&headers("Bearer abc.def.ghi")), Some("abc.def.ghi"));
        assert_eq!(bearer_token(&headers("bearer   abc.def.ghi ")), Some("abc.def.ghi"));
    }

    #[test]
    fn test_other_schemes_and_empty_tokens_rejected() {
        assert_eq!(bearer_token(&headers("Basic dXNlcjpwYXNz")), None);
        assert_eq!(bearer_token(&headers("Bearer ")), None);
        assert_eq!(bearer_token(&headers("abc.def.ghi")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }
}

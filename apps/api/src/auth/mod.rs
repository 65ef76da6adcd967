// Authentication: Argon2 password hashes, JWT bearer tokens, and the
// `CurrentUser` extractor that guards every private route.

pub mod extractor;
pub mod handlers;
pub mod jwt;
pub mod password;
pub mod users;

use thiserror::Error;

pub use extractor::CurrentUser;
pub use jwt::JwtKeys;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("password hashing failed: {0}")]
    Hash(String),
}

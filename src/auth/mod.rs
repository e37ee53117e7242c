use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::errors::{AuthError, AuthResult};

/// Authenticated caller, resolved from an issued token.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Principal {
    pub user_id: i32,
    pub username: String,
}

impl Principal {
    pub fn new(user_id: i32, username: impl Into<String>) -> Self {
        Self {
            user_id,
            username: username.into(),
        }
    }
}

/// New opaque token key handed to the client exactly once
pub fn generate_token_key() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Hex SHA-256 of a token key; only this is stored
pub fn token_digest(key: &str) -> String {
    format!("{:x}", Sha256::digest(key.as_bytes()))
}

/// Extract the key from an `Authorization` header value.
///
/// Accepts `Token <key>` and `Bearer <key>`, scheme case-insensitive.
pub fn parse_authorization(header: &str) -> AuthResult<&str> {
    let (scheme, key) = header
        .trim()
        .split_once(char::is_whitespace)
        .ok_or(AuthError::MissingCredentials)?;

    if !scheme.eq_ignore_ascii_case("token") && !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::MissingCredentials);
    }

    let key = key.trim();
    if key.is_empty() || key.contains(char::is_whitespace) {
        return Err(AuthError::InvalidToken);
    }

    Ok(key)
}

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use super::app::AppState;
use super::error::ApiError;
use crate::auth::{parse_authorization, Principal};
use crate::errors::AuthError;
use crate::services::AuthService;

/// Handlers taking a `Principal` argument require a valid token.
#[axum::async_trait]
impl FromRequestParts<AppState> for Principal {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(AuthError::MissingCredentials)?
            .to_str()
            .map_err(|_| AuthError::MissingCredentials)?;

        let key = parse_authorization(header)?;
        let principal = AuthService::new(state.db.clone()).authenticate(key).await?;
        Ok(principal)
    }
}

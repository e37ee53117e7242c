use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::Principal;
use crate::database::entities::users;
use crate::errors::AuthError;
use crate::server::app::AppState;
use crate::server::error::ApiError;
use crate::services::{AuthService, IssuedToken, ProfileUpdate, RegisterInput};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ProfileRequest {
    pub name: Option<String>,
    pub email: Option<String>,
}

fn user_body(user: &users::Model) -> Value {
    json!({
        "user_id": user.id,
        "username": user.username,
        "email": user.email,
        "name": user.name(),
        "role": "Farmer",
    })
}

fn token_body(issued: &IssuedToken) -> Value {
    let mut body = user_body(&issued.user);
    body["token"] = json!(issued.key);
    body
}

fn required(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (username, email, password) = match (
        required(request.username),
        required(request.email),
        required(request.password),
    ) {
        (Some(username), Some(email), Some(password)) => (username, email, password),
        _ => {
            return Err(AuthError::Validation(
                "Username, password, and email are required".to_string(),
            )
            .into())
        }
    };

    let issued = AuthService::new(state.db.clone())
        .register(RegisterInput {
            username,
            email,
            password,
            name: request.name,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(token_body(&issued))))
}

pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let username = request.username.unwrap_or_default();
    let password = request.password.unwrap_or_default();

    let issued = AuthService::new(state.db.clone())
        .login(&username, &password)
        .await?;

    Ok(Json(token_body(&issued)))
}

pub async fn logout(
    State(state): State<AppState>,
    principal: Principal,
) -> Result<impl IntoResponse, ApiError> {
    AuthService::new(state.db.clone()).logout(&principal).await?;
    Ok(Json(json!({ "message": "Successfully logged out" })))
}

pub async fn get_profile(
    State(state): State<AppState>,
    principal: Principal,
) -> Result<impl IntoResponse, ApiError> {
    let user = AuthService::new(state.db.clone()).profile(&principal).await?;
    Ok(Json(user_body(&user)))
}

pub async fn update_profile(
    State(state): State<AppState>,
    principal: Principal,
    Json(request): Json<ProfileRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = AuthService::new(state.db.clone())
        .update_profile(
            &principal,
            ProfileUpdate {
                name: request.name,
                email: request.email,
            },
        )
        .await?;
    Ok(Json(user_body(&user)))
}

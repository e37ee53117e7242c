use anyhow::{anyhow, Result};
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use sea_orm::DatabaseConnection;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers::{auth, health, snapshot, sync};
use crate::config::ServerConfig;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
}

pub fn create_app(db: DatabaseConnection, config: &ServerConfig) -> Result<Router> {
    let state = AppState { db };

    let cors = match config.cors_origin.as_deref() {
        Some(origin) if origin != "*" => CorsLayer::new().allow_origin(
            origin
                .parse::<HeaderValue>()
                .map_err(|e| anyhow!("Invalid CORS origin: {}", e))?,
        ),
        _ => CorsLayer::new().allow_origin(Any),
    }
    .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
    .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
    .allow_credentials(false);

    let app = Router::new()
        // Health check endpoint
        .route("/health", get(health::health_check))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route(
            "/auth/profile",
            get(auth::get_profile).put(auth::update_profile),
        )
        .route("/import", post(snapshot::import_snapshot))
        .route("/export", get(snapshot::export_snapshot))
        .route("/sync/blob", get(sync::load_blob).post(sync::save_blob))
        // Paths used by older clients
        .route("/sync/localstorage/save", post(sync::save_blob))
        .route("/sync/localstorage/load", get(sync::load_blob))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state);

    Ok(app)
}

pub mod auth;
pub mod common;
pub mod config;
pub mod database;
pub mod errors;
pub mod services;
pub mod snapshot;

#[cfg(feature = "server")]
pub mod server;

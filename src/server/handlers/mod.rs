pub mod auth;
pub mod health;
pub mod snapshot;
pub mod sync;

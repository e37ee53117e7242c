pub mod auth_service;
pub mod blob_service;
pub mod export_service;
pub mod import_service;

pub use auth_service::*;
pub use blob_service::*;
pub use export_service::*;
pub use import_service::*;

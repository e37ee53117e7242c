pub mod auth_tokens;
pub mod crop_plan_events;
pub mod emission_sources;
pub mod energy_records;
pub mod farms;
pub mod fertilizer_history;
pub mod fuel_records;
pub mod harvest_history;
pub mod issues;
pub mod livestock;
pub mod plan_items;
pub mod sequestration_activities;
pub mod soil_records;
pub mod tasks;
pub mod user_blobs;
pub mod users;
pub mod water_history;

pub use plan_items::PlanCategory;

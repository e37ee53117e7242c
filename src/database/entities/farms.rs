use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Root of the farm dataset.
///
/// The primary key is assigned by the client, never by the database: flat
/// records in a snapshot reference farms by this value.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "farms")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i64,
    /// Index in the snapshot `farms` array; export order follows it
    pub position: i32,
    pub name: String,
    pub size: String,
    pub crop: String,
    pub soil_type: String,
    pub slope_ratio: Option<f64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::water_history::Entity")]
    WaterHistory,
    #[sea_orm(has_many = "super::fertilizer_history::Entity")]
    FertilizerHistory,
    #[sea_orm(has_many = "super::harvest_history::Entity")]
    HarvestHistory,
    #[sea_orm(has_many = "super::fuel_records::Entity")]
    FuelRecords,
    #[sea_orm(has_many = "super::soil_records::Entity")]
    SoilRecords,
    #[sea_orm(has_many = "super::emission_sources::Entity")]
    EmissionSources,
    #[sea_orm(has_many = "super::sequestration_activities::Entity")]
    SequestrationActivities,
    #[sea_orm(has_many = "super::energy_records::Entity")]
    EnergyRecords,
    #[sea_orm(has_many = "super::livestock::Entity")]
    Livestock,
}

impl Related<super::water_history::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WaterHistory.def()
    }
}

impl Related<super::fertilizer_history::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FertilizerHistory.def()
    }
}

impl Related<super::harvest_history::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::HarvestHistory.def()
    }
}

impl Related<super::fuel_records::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FuelRecords.def()
    }
}

impl Related<super::soil_records::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SoilRecords.def()
    }
}

impl Related<super::emission_sources::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EmissionSources.def()
    }
}

impl Related<super::sequestration_activities::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SequestrationActivities.def()
    }
}

impl Related<super::energy_records::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EnergyRecords.def()
    }
}

impl Related<super::livestock::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Livestock.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One row per plan entry across all seven plan categories.
///
/// The snapshot exposes each category as its own collection; storage keeps a
/// single table distinguished by `plan_type`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "plan_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i64,
    /// Index within the owning category collection
    pub position: i32,
    pub plan_type: PlanCategory,
    #[sea_orm(column_type = "Text")]
    pub description: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Plan category discriminator
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(32))")]
pub enum PlanCategory {
    #[sea_orm(string_value = "Planting")]
    Planting,
    #[sea_orm(string_value = "Fertilizer")]
    Fertilizer,
    #[sea_orm(string_value = "PestManagement")]
    PestManagement,
    #[sea_orm(string_value = "Irrigation")]
    Irrigation,
    #[sea_orm(string_value = "WeatherTask")]
    WeatherTask,
    #[sea_orm(string_value = "Rotation")]
    Rotation,
    #[sea_orm(string_value = "Rainwater")]
    Rainwater,
}

impl PlanCategory {
    /// Every category, in snapshot field order
    pub const ALL: [PlanCategory; 7] = [
        PlanCategory::Planting,
        PlanCategory::Fertilizer,
        PlanCategory::PestManagement,
        PlanCategory::Irrigation,
        PlanCategory::WeatherTask,
        PlanCategory::Rotation,
        PlanCategory::Rainwater,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Planting => "Planting",
            Self::Fertilizer => "Fertilizer",
            Self::PestManagement => "PestManagement",
            Self::Irrigation => "Irrigation",
            Self::WeatherTask => "WeatherTask",
            Self::Rotation => "Rotation",
            Self::Rainwater => "Rainwater",
        }
    }

    /// Name of the snapshot collection holding this category
    pub fn collection_key(&self) -> &'static str {
        match self {
            Self::Planting => "plantingPlans",
            Self::Fertilizer => "fertilizerPlans",
            Self::PestManagement => "pestManagementPlans",
            Self::Irrigation => "irrigationPlans",
            Self::WeatherTask => "weatherTaskPlans",
            Self::Rotation => "rotationPlans",
            Self::Rainwater => "rainwaterPlans",
        }
    }
}

impl From<PlanCategory> for String {
    fn from(category: PlanCategory) -> Self {
        category.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn collection_keys_are_distinct() {
        let keys: HashSet<_> = PlanCategory::ALL.iter().map(|c| c.collection_key()).collect();
        assert_eq!(keys.len(), PlanCategory::ALL.len());
    }

    #[test]
    fn stored_value_matches_as_str() {
        for category in PlanCategory::ALL {
            assert_eq!(category.to_value(), category.as_str().to_string());
        }
    }
}

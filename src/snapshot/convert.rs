use sea_orm::{ActiveValue, Set};

use super::*;
use crate::database::entities::{
    crop_plan_events, emission_sources, energy_records, farms, fertilizer_history, fuel_records,
    harvest_history, issues, livestock, plan_items, sequestration_activities, soil_records, tasks,
    water_history,
};

impl FarmRecord {
    pub fn to_active_model(&self, position: i32) -> farms::ActiveModel {
        farms::ActiveModel {
            id: Set(self.id),
            position: Set(position),
            name: Set(self.name.clone()),
            size: Set(self.size.clone()),
            crop: Set(self.crop.clone()),
            soil_type: Set(self.soil_type.clone()),
            slope_ratio: Set(self.slope_ratio),
        }
    }

    /// Rebuild a farm with its nested histories, which must already be in
    /// storage order.
    pub fn from_model(
        farm: farms::Model,
        water: Vec<water_history::Model>,
        fertilizer: Vec<fertilizer_history::Model>,
        harvest: Vec<harvest_history::Model>,
    ) -> Self {
        Self {
            id: farm.id,
            name: farm.name,
            size: farm.size,
            crop: farm.crop,
            soil_type: farm.soil_type,
            slope_ratio: farm.slope_ratio,
            water_history: water.into_iter().map(WaterEntry::from).collect(),
            fertilizer_history: fertilizer.into_iter().map(FertilizerEntry::from).collect(),
            harvest_history: harvest.into_iter().map(HarvestEntry::from).collect(),
        }
    }
}

// History rows get a database-assigned id; insertion order is their order.

impl WaterEntry {
    pub fn to_active_model(&self, farm_id: i64) -> water_history::ActiveModel {
        water_history::ActiveModel {
            id: ActiveValue::NotSet,
            farm_id: Set(farm_id),
            amount: Set(self.amount),
            date: Set(self.date),
            efficiency: Set(self.efficiency),
        }
    }
}

impl From<water_history::Model> for WaterEntry {
    fn from(model: water_history::Model) -> Self {
        Self {
            amount: model.amount,
            date: model.date,
            efficiency: model.efficiency,
        }
    }
}

impl FertilizerEntry {
    pub fn to_active_model(&self, farm_id: i64) -> fertilizer_history::ActiveModel {
        fertilizer_history::ActiveModel {
            id: ActiveValue::NotSet,
            farm_id: Set(farm_id),
            fertilizer_type: Set(self.kind.clone()),
            amount: Set(self.amount),
            date: Set(self.date),
        }
    }
}

impl From<fertilizer_history::Model> for FertilizerEntry {
    fn from(model: fertilizer_history::Model) -> Self {
        Self {
            kind: model.fertilizer_type,
            amount: model.amount,
            date: model.date,
        }
    }
}

impl HarvestEntry {
    pub fn to_active_model(&self, farm_id: i64) -> harvest_history::ActiveModel {
        harvest_history::ActiveModel {
            id: ActiveValue::NotSet,
            farm_id: Set(farm_id),
            yield_amount: Set(self.yield_amount),
            date: Set(self.date),
        }
    }
}

impl From<harvest_history::Model> for HarvestEntry {
    fn from(model: harvest_history::Model) -> Self {
        Self {
            yield_amount: model.yield_amount,
            date: model.date,
        }
    }
}

impl TaskRecord {
    pub fn to_active_model(&self, position: i32) -> tasks::ActiveModel {
        tasks::ActiveModel {
            id: Set(self.id),
            position: Set(position),
            title: Set(self.title.clone()),
            due_date: Set(self.due_date),
            priority: Set(self.priority.clone()),
            completed: Set(self.completed),
        }
    }
}

impl From<tasks::Model> for TaskRecord {
    fn from(model: tasks::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            due_date: model.due_date,
            priority: model.priority,
            completed: model.completed,
        }
    }
}

impl IssueRecord {
    pub fn to_active_model(&self, position: i32) -> issues::ActiveModel {
        issues::ActiveModel {
            id: Set(self.id),
            position: Set(position),
            title: Set(self.title.clone()),
            status: Set(self.status.clone()),
        }
    }
}

impl From<issues::Model> for IssueRecord {
    fn from(model: issues::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            status: model.status,
        }
    }
}

impl CropPlanEventRecord {
    pub fn to_active_model(&self, position: i32) -> crop_plan_events::ActiveModel {
        crop_plan_events::ActiveModel {
            id: Set(self.id),
            position: Set(position),
            title: Set(self.title.clone()),
            date: Set(self.date),
        }
    }
}

impl From<crop_plan_events::Model> for CropPlanEventRecord {
    fn from(model: crop_plan_events::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            date: model.date,
        }
    }
}

impl PlanRecord {
    pub fn to_active_model(&self, category: PlanCategory, position: i32) -> plan_items::ActiveModel {
        plan_items::ActiveModel {
            id: Set(self.id),
            position: Set(position),
            plan_type: Set(category),
            description: Set(self.description.clone()),
        }
    }
}

impl From<plan_items::Model> for PlanRecord {
    fn from(model: plan_items::Model) -> Self {
        Self {
            id: model.id,
            description: model.description,
        }
    }
}

impl FuelRecord {
    pub fn to_active_model(&self, position: i32) -> fuel_records::ActiveModel {
        fuel_records::ActiveModel {
            id: Set(self.id),
            position: Set(position),
            farm_id: Set(self.farm_id),
            date: Set(self.date),
            equipment_name: Set(self.equipment_name.clone()),
            fuel_type: Set(self.fuel_type.clone()),
            gallons: Set(self.gallons),
            hours_operated: Set(self.hours_operated),
            cost: Set(self.cost),
            notes: Set(self.notes.clone()),
        }
    }
}

impl From<fuel_records::Model> for FuelRecord {
    fn from(model: fuel_records::Model) -> Self {
        Self {
            id: model.id,
            farm_id: model.farm_id,
            date: model.date,
            equipment_name: model.equipment_name,
            fuel_type: model.fuel_type,
            gallons: model.gallons,
            hours_operated: model.hours_operated,
            cost: model.cost,
            notes: model.notes,
        }
    }
}

impl SoilRecord {
    pub fn to_active_model(&self, position: i32) -> soil_records::ActiveModel {
        soil_records::ActiveModel {
            id: Set(self.id),
            position: Set(position),
            farm_id: Set(self.farm_id),
            date: Set(self.date),
            location: Set(self.location.clone()),
            ph: Set(self.ph),
            organic_matter: Set(self.organic_matter),
            nitrogen: Set(self.nitrogen),
            phosphorus: Set(self.phosphorus),
            potassium: Set(self.potassium),
            moisture: Set(self.moisture),
            notes: Set(self.notes.clone()),
        }
    }
}

impl From<soil_records::Model> for SoilRecord {
    fn from(model: soil_records::Model) -> Self {
        Self {
            id: model.id,
            farm_id: model.farm_id,
            date: model.date,
            location: model.location,
            ph: model.ph,
            organic_matter: model.organic_matter,
            nitrogen: model.nitrogen,
            phosphorus: model.phosphorus,
            potassium: model.potassium,
            moisture: model.moisture,
            notes: model.notes,
        }
    }
}

impl EmissionSourceRecord {
    pub fn to_active_model(&self, position: i32) -> emission_sources::ActiveModel {
        emission_sources::ActiveModel {
            id: Set(self.id),
            position: Set(position),
            farm_id: Set(self.farm_id),
            date: Set(self.date),
            source_type: Set(self.source_type.clone()),
            description: Set(self.description.clone()),
            co2_equivalent: Set(self.co2_equivalent),
            notes: Set(self.notes.clone()),
        }
    }
}

impl From<emission_sources::Model> for EmissionSourceRecord {
    fn from(model: emission_sources::Model) -> Self {
        Self {
            id: model.id,
            farm_id: model.farm_id,
            date: model.date,
            source_type: model.source_type,
            description: model.description,
            co2_equivalent: model.co2_equivalent,
            notes: model.notes,
        }
    }
}

impl SequestrationActivityRecord {
    pub fn to_active_model(&self, position: i32) -> sequestration_activities::ActiveModel {
        sequestration_activities::ActiveModel {
            id: Set(self.id),
            position: Set(position),
            farm_id: Set(self.farm_id),
            date: Set(self.date),
            activity_type: Set(self.activity_type.clone()),
            description: Set(self.description.clone()),
            co2_sequestered: Set(self.co2_sequestered),
            area: Set(self.area),
            notes: Set(self.notes.clone()),
        }
    }
}

impl From<sequestration_activities::Model> for SequestrationActivityRecord {
    fn from(model: sequestration_activities::Model) -> Self {
        Self {
            id: model.id,
            farm_id: model.farm_id,
            date: model.date,
            activity_type: model.activity_type,
            description: model.description,
            co2_sequestered: model.co2_sequestered,
            area: model.area,
            notes: model.notes,
        }
    }
}

impl EnergyRecord {
    pub fn to_active_model(&self, position: i32) -> energy_records::ActiveModel {
        energy_records::ActiveModel {
            id: Set(self.id),
            position: Set(position),
            farm_id: Set(self.farm_id),
            date: Set(self.date),
            energy_type: Set(self.energy_type.clone()),
            amount: Set(self.amount),
            unit: Set(self.unit.clone()),
            renewable: Set(self.renewable),
            cost: Set(self.cost),
            purpose: Set(self.purpose.clone()),
            notes: Set(self.notes.clone()),
        }
    }
}

impl From<energy_records::Model> for EnergyRecord {
    fn from(model: energy_records::Model) -> Self {
        Self {
            id: model.id,
            farm_id: model.farm_id,
            date: model.date,
            energy_type: model.energy_type,
            amount: model.amount,
            unit: model.unit,
            renewable: model.renewable,
            cost: model.cost,
            purpose: model.purpose,
            notes: model.notes,
        }
    }
}

impl LivestockRecord {
    pub fn to_active_model(&self, position: i32) -> livestock::ActiveModel {
        livestock::ActiveModel {
            id: Set(self.id),
            position: Set(position),
            farm_id: Set(self.farm_id),
            animal_type: Set(self.kind.clone()),
            count: Set(self.count),
        }
    }
}

impl From<livestock::Model> for LivestockRecord {
    fn from(model: livestock::Model) -> Self {
        Self {
            id: model.id,
            farm_id: model.farm_id,
            kind: model.animal_type,
            count: model.count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_record_carries_category() {
        let record = PlanRecord {
            id: 9,
            description: "Collect runoff".to_string(),
        };
        let active = record.to_active_model(PlanCategory::Rainwater, 2);
        assert_eq!(active.plan_type, Set(PlanCategory::Rainwater));
        assert_eq!(active.id, Set(9));
        assert_eq!(active.position, Set(2));
    }

    #[test]
    fn test_history_rows_take_parent_farm() {
        let entry = HarvestEntry {
            yield_amount: 800,
            date: NaiveDate::from_ymd_opt(2024, 9, 1).unwrap(),
        };
        let active = entry.to_active_model(42);
        assert_eq!(active.farm_id, Set(42));
        assert_eq!(active.id, ActiveValue::NotSet);
        assert_eq!(active.yield_amount, Set(800));
    }

    #[test]
    fn test_livestock_type_maps_to_animal_type() {
        let model = livestock::Model {
            id: 1_728_000_000_000,
            position: 0,
            farm_id: 1,
            animal_type: "Goat".to_string(),
            count: 6,
        };
        let record = LivestockRecord::from(model);
        assert_eq!(record.kind, "Goat");
        assert_eq!(record.id, 1_728_000_000_000);
        let active = record.to_active_model(4);
        assert_eq!(active.animal_type, Set("Goat".to_string()));
        assert_eq!(active.position, Set(4));
    }
}

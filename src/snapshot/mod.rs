//! Canonical external shape of the farm dataset.
//!
//! A [`Snapshot`] is what `/export` produces and what `/import` consumes. Farm
//! histories are nested inside their farm and carry no id; the six flat
//! farm-scoped collections reference their farm through `farmId` instead.
//! Every top-level id is chosen by the client and survives a round trip.

mod convert;

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::common::json_type_name;
use crate::database::entities::PlanCategory;
use crate::errors::{SnapshotError, SnapshotResult};

pub const SNAPSHOT_VERSION: &str = "1.0";

fn default_version() -> String {
    SNAPSHOT_VERSION.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub import_date: Option<String>,
    #[serde(default)]
    pub farms: Vec<FarmRecord>,
    #[serde(default)]
    pub tasks: Vec<TaskRecord>,
    #[serde(default)]
    pub issues: Vec<IssueRecord>,
    #[serde(default)]
    pub crop_plan_events: Vec<CropPlanEventRecord>,
    #[serde(default)]
    pub planting_plans: Vec<PlanRecord>,
    #[serde(default)]
    pub fertilizer_plans: Vec<PlanRecord>,
    #[serde(default)]
    pub pest_management_plans: Vec<PlanRecord>,
    #[serde(default)]
    pub irrigation_plans: Vec<PlanRecord>,
    #[serde(default)]
    pub weather_task_plans: Vec<PlanRecord>,
    #[serde(default)]
    pub rotation_plans: Vec<PlanRecord>,
    #[serde(default)]
    pub rainwater_plans: Vec<PlanRecord>,
    #[serde(default)]
    pub fuel_records: Vec<FuelRecord>,
    #[serde(default)]
    pub soil_records: Vec<SoilRecord>,
    #[serde(default)]
    pub emission_sources: Vec<EmissionSourceRecord>,
    #[serde(default)]
    pub sequestration_activities: Vec<SequestrationActivityRecord>,
    #[serde(default)]
    pub energy_records: Vec<EnergyRecord>,
    #[serde(default)]
    pub livestock: Vec<LivestockRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FarmRecord {
    pub id: i64,
    pub name: String,
    pub size: String,
    pub crop: String,
    #[serde(default)]
    pub soil_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slope_ratio: Option<f64>,
    #[serde(default)]
    pub water_history: Vec<WaterEntry>,
    #[serde(default)]
    pub fertilizer_history: Vec<FertilizerEntry>,
    #[serde(default)]
    pub harvest_history: Vec<HarvestEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaterEntry {
    pub amount: i32,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub efficiency: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FertilizerEntry {
    #[serde(rename = "type")]
    pub kind: String,
    pub amount: i32,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarvestEntry {
    #[serde(rename = "yield")]
    pub yield_amount: i32,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    pub id: i64,
    pub title: String,
    pub due_date: NaiveDate,
    pub priority: String,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueRecord {
    pub id: i64,
    pub title: String,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropPlanEventRecord {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    pub date: NaiveDate,
}

/// Entry of any of the seven plan collections; the category is implied by
/// the collection it sits in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanRecord {
    pub id: i64,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FuelRecord {
    pub id: i64,
    pub farm_id: i64,
    pub date: NaiveDate,
    pub equipment_name: String,
    pub fuel_type: String,
    pub gallons: f64,
    pub hours_operated: f64,
    pub cost: f64,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoilRecord {
    pub id: i64,
    pub farm_id: i64,
    pub date: NaiveDate,
    pub location: String,
    pub ph: f64,
    pub organic_matter: f64,
    pub nitrogen: f64,
    pub phosphorus: f64,
    pub potassium: f64,
    pub moisture: f64,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmissionSourceRecord {
    pub id: i64,
    pub farm_id: i64,
    pub date: NaiveDate,
    pub source_type: String,
    #[serde(default)]
    pub description: String,
    pub co2_equivalent: f64,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SequestrationActivityRecord {
    pub id: i64,
    pub farm_id: i64,
    pub date: NaiveDate,
    pub activity_type: String,
    #[serde(default)]
    pub description: String,
    pub co2_sequestered: f64,
    pub area: f64,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnergyRecord {
    pub id: i64,
    pub farm_id: i64,
    pub date: NaiveDate,
    pub energy_type: String,
    pub amount: f64,
    pub unit: String,
    #[serde(default)]
    pub renewable: bool,
    pub cost: f64,
    pub purpose: String,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LivestockRecord {
    pub id: i64,
    pub farm_id: i64,
    #[serde(rename = "type")]
    pub kind: String,
    pub count: i32,
}

impl Default for Snapshot {
    /// Empty dataset at the current format version
    fn default() -> Self {
        Self {
            version: default_version(),
            export_date: None,
            import_date: None,
            farms: Vec::new(),
            tasks: Vec::new(),
            issues: Vec::new(),
            crop_plan_events: Vec::new(),
            planting_plans: Vec::new(),
            fertilizer_plans: Vec::new(),
            pest_management_plans: Vec::new(),
            irrigation_plans: Vec::new(),
            weather_task_plans: Vec::new(),
            rotation_plans: Vec::new(),
            rainwater_plans: Vec::new(),
            fuel_records: Vec::new(),
            soil_records: Vec::new(),
            emission_sources: Vec::new(),
            sequestration_activities: Vec::new(),
            energy_records: Vec::new(),
            livestock: Vec::new(),
        }
    }
}

/// A top-level record owned by a farm through an explicit id reference.
pub trait FarmScoped {
    /// Snapshot collection name, used in error messages
    const KIND: &'static str;

    fn id(&self) -> i64;
    fn farm_id(&self) -> i64;
}

macro_rules! impl_farm_scoped {
    ($($record:ty => $kind:literal),+ $(,)?) => {
        $(
            impl FarmScoped for $record {
                const KIND: &'static str = $kind;

                fn id(&self) -> i64 {
                    self.id
                }

                fn farm_id(&self) -> i64 {
                    self.farm_id
                }
            }
        )+
    };
}

impl_farm_scoped!(
    FuelRecord => "fuelRecords",
    SoilRecord => "soilRecords",
    EmissionSourceRecord => "emissionSources",
    SequestrationActivityRecord => "sequestrationActivities",
    EnergyRecord => "energyRecords",
    LivestockRecord => "livestock",
);

impl Snapshot {
    /// Decode an uploaded document.
    ///
    /// Anything that is not a JSON object, or an object that does not fit the
    /// schema, is rejected as a structural error. Unknown fields are ignored.
    pub fn from_slice(bytes: &[u8]) -> SnapshotResult<Self> {
        let value: Value = serde_json::from_slice(bytes)
            .map_err(|e| SnapshotError::structural(format!("snapshot is not valid JSON: {}", e)))?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> SnapshotResult<Self> {
        if !value.is_object() {
            return Err(SnapshotError::structural(format!(
                "snapshot must be a JSON object, found {}",
                json_type_name(&value)
            )));
        }

        serde_json::from_value(value).map_err(|e| SnapshotError::structural(e.to_string()))
    }

    /// Reject documents whose ids collide within a collection.
    ///
    /// Plan ids share one key space because all categories live in one table.
    pub fn validate(&self) -> SnapshotResult<()> {
        check_unique("farms", self.farms.iter().map(|f| f.id))?;
        check_unique("tasks", self.tasks.iter().map(|t| t.id))?;
        check_unique("issues", self.issues.iter().map(|i| i.id))?;
        check_unique("cropPlanEvents", self.crop_plan_events.iter().map(|e| e.id))?;

        let mut plan_ids = HashSet::new();
        for category in PlanCategory::ALL {
            for plan in self.plans(category) {
                if !plan_ids.insert(plan.id) {
                    return Err(SnapshotError::DuplicateId {
                        kind: category.collection_key(),
                        id: plan.id,
                    });
                }
            }
        }

        check_scoped(&self.fuel_records)?;
        check_scoped(&self.soil_records)?;
        check_scoped(&self.emission_sources)?;
        check_scoped(&self.sequestration_activities)?;
        check_scoped(&self.energy_records)?;
        check_scoped(&self.livestock)?;

        Ok(())
    }

    pub fn plans(&self, category: PlanCategory) -> &[PlanRecord] {
        match category {
            PlanCategory::Planting => &self.planting_plans,
            PlanCategory::Fertilizer => &self.fertilizer_plans,
            PlanCategory::PestManagement => &self.pest_management_plans,
            PlanCategory::Irrigation => &self.irrigation_plans,
            PlanCategory::WeatherTask => &self.weather_task_plans,
            PlanCategory::Rotation => &self.rotation_plans,
            PlanCategory::Rainwater => &self.rainwater_plans,
        }
    }

    pub fn plans_mut(&mut self, category: PlanCategory) -> &mut Vec<PlanRecord> {
        match category {
            PlanCategory::Planting => &mut self.planting_plans,
            PlanCategory::Fertilizer => &mut self.fertilizer_plans,
            PlanCategory::PestManagement => &mut self.pest_management_plans,
            PlanCategory::Irrigation => &mut self.irrigation_plans,
            PlanCategory::WeatherTask => &mut self.weather_task_plans,
            PlanCategory::Rotation => &mut self.rotation_plans,
            PlanCategory::Rainwater => &mut self.rainwater_plans,
        }
    }
}

fn check_unique(kind: &'static str, ids: impl IntoIterator<Item = i64>) -> SnapshotResult<()> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(SnapshotError::DuplicateId { kind, id });
        }
    }
    Ok(())
}

fn check_scoped<R: FarmScoped>(records: &[R]) -> SnapshotResult<()> {
    check_unique(R::KIND, records.iter().map(FarmScoped::id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn parse(value: Value) -> SnapshotResult<Snapshot> {
        Snapshot::from_slice(value.to_string().as_bytes())
    }

    #[test]
    fn test_rejects_invalid_json() {
        let err = Snapshot::from_slice(b"{\"farms\": [").unwrap_err();
        assert!(matches!(err, SnapshotError::Structural(_)));
        assert!(err.to_string().contains("not valid JSON"));
    }

    #[test]
    fn test_rejects_non_object_root() {
        let err = parse(json!([{"id": 1}])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid snapshot: snapshot must be a JSON object, found array"
        );

        let err = parse(json!("farms")).unwrap_err();
        assert!(err.to_string().ends_with("found string"));
    }

    #[test]
    fn test_empty_object_is_an_empty_dataset() {
        let snapshot = parse(json!({})).unwrap();
        assert_eq!(snapshot.version, SNAPSHOT_VERSION);
        assert!(snapshot.farms.is_empty());
        for category in PlanCategory::ALL {
            assert!(snapshot.plans(category).is_empty());
        }
        snapshot.validate().unwrap();
    }

    #[test]
    fn test_external_field_names() {
        let snapshot = parse(json!({
            "farms": [{
                "id": 7,
                "name": "North field",
                "size": "40 acres",
                "crop": "Wheat",
                "soilType": "loam",
                "slopeRatio": 0.12,
                "waterHistory": [{"amount": 300, "date": "2024-05-01", "efficiency": 80}],
                "fertilizerHistory": [{"type": "Nitrogen", "amount": 50, "date": "2024-04-01"}],
                "harvestHistory": [{"yield": 1200, "date": "2024-09-15"}]
            }],
            "livestock": [{"id": 3, "farmId": 7, "type": "Cattle", "count": 12}],
            "exportDate": "2024-10-01T12:00:00Z",
            "somethingNew": true
        }))
        .unwrap();

        let farm = &snapshot.farms[0];
        assert_eq!(farm.soil_type, "loam");
        assert_eq!(farm.slope_ratio, Some(0.12));
        assert_eq!(farm.fertilizer_history[0].kind, "Nitrogen");
        assert_eq!(farm.harvest_history[0].yield_amount, 1200);
        assert_eq!(
            farm.water_history[0].date,
            NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
        );
        assert_eq!(snapshot.livestock[0].kind, "Cattle");
        assert_eq!(snapshot.livestock[0].farm_id, 7);
    }

    #[test]
    fn test_optional_fields_default() {
        let snapshot = parse(json!({
            "farms": [{"id": 1, "name": "A", "size": "1", "crop": "Corn"}],
            "tasks": [{"id": 1, "title": "Spray", "dueDate": "2024-06-01", "priority": "high"}],
            "energyRecords": [{
                "id": 1, "farmId": 1, "date": "2024-06-01", "energyType": "Electricity",
                "amount": 10.5, "unit": "kWh", "cost": 3.0, "purpose": "Pumping"
            }]
        }))
        .unwrap();

        assert_eq!(snapshot.farms[0].soil_type, "");
        assert_eq!(snapshot.farms[0].slope_ratio, None);
        assert!(!snapshot.tasks[0].completed);
        assert!(!snapshot.energy_records[0].renewable);
        assert_eq!(snapshot.energy_records[0].notes, "");
    }

    #[test]
    fn test_missing_required_field_is_structural() {
        let err = parse(json!({"farms": [{"id": 1, "name": "A", "crop": "Corn"}]})).unwrap_err();
        assert!(matches!(err, SnapshotError::Structural(_)));
        assert!(err.to_string().contains("size"));
    }

    #[test]
    fn test_bad_date_is_structural() {
        let err = parse(json!({
            "cropPlanEvents": [{"id": 1, "title": "Sow", "date": "next tuesday"}]
        }))
        .unwrap_err();
        assert!(matches!(err, SnapshotError::Structural(_)));
    }

    #[test]
    fn test_duplicate_farm_id() {
        let snapshot = parse(json!({
            "farms": [
                {"id": 1, "name": "A", "size": "1", "crop": "Corn"},
                {"id": 1, "name": "B", "size": "2", "crop": "Soy"}
            ]
        }))
        .unwrap();

        let err = snapshot.validate().unwrap_err();
        assert!(matches!(err, SnapshotError::DuplicateId { kind: "farms", id: 1 }));
    }

    #[test]
    fn test_plan_ids_share_one_key_space() {
        let snapshot = parse(json!({
            "plantingPlans": [{"id": 5, "description": "Sow"}],
            "rotationPlans": [{"id": 5, "description": "Rotate"}]
        }))
        .unwrap();

        let err = snapshot.validate().unwrap_err();
        assert!(matches!(
            err,
            SnapshotError::DuplicateId { kind: "rotationPlans", id: 5 }
        ));
    }

    #[test]
    fn test_same_id_in_different_flat_collections_is_fine() {
        let snapshot = parse(json!({
            "farms": [{"id": 1, "name": "A", "size": "1", "crop": "Corn"}],
            "livestock": [{"id": 1, "farmId": 1, "type": "Sheep", "count": 4}],
            "fuelRecords": [{
                "id": 1, "farmId": 1, "date": "2024-01-01", "equipmentName": "Tractor",
                "fuelType": "Diesel", "gallons": 10.0, "hoursOperated": 2.0, "cost": 40.0
            }]
        }))
        .unwrap();

        snapshot.validate().unwrap();
    }

    #[test]
    fn test_plans_mut_targets_named_collection() {
        let mut snapshot = Snapshot::default();
        snapshot
            .plans_mut(PlanCategory::Irrigation)
            .push(PlanRecord {
                id: 1,
                description: "Drip line".to_string(),
            });

        assert_eq!(snapshot.irrigation_plans.len(), 1);
        let value = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(value["irrigationPlans"][0]["description"], "Drip line");
        assert_eq!(value["plantingPlans"], json!([]));
    }

    #[test]
    fn test_default_carries_current_version() {
        let snapshot = Snapshot::default();
        assert_eq!(snapshot.version, SNAPSHOT_VERSION);
        assert_eq!(serde_json::to_value(&snapshot).unwrap()["version"], "1.0");
    }

    #[test]
    fn test_absent_optionals_stay_absent() {
        let snapshot = parse(json!({
            "farms": [{
                "id": 1, "name": "A", "size": "1", "crop": "Corn",
                "waterHistory": [{"amount": 5, "date": "2024-05-01"}]
            }]
        }))
        .unwrap();

        let value = serde_json::to_value(&snapshot).unwrap();
        let farm = value["farms"][0].as_object().unwrap();
        assert!(!farm.contains_key("slopeRatio"));
        let water = farm["waterHistory"][0].as_object().unwrap();
        assert!(!water.contains_key("efficiency"));
    }

    #[test]
    fn test_timestamp_sized_ids() {
        let snapshot = parse(json!({
            "farms": [{"id": 1728000000000_i64, "name": "A", "size": "1", "crop": "Corn"}],
            "tasks": [{"id": 1728000000001_i64, "title": "Spray", "dueDate": "2024-06-01", "priority": "high"}],
            "livestock": [{"id": 1728000000002_i64, "farmId": 1728000000000_i64, "type": "Cattle", "count": 2}]
        }))
        .unwrap();

        snapshot.validate().unwrap();
        assert_eq!(snapshot.tasks[0].id, 1_728_000_000_001);
        assert_eq!(snapshot.livestock[0].farm_id, snapshot.farms[0].id);
    }
}

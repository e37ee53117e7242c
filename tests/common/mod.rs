//! Shared fixtures for integration tests
#![allow(dead_code)]

use anyhow::Result;
use farmsync::database::setup_database;
use farmsync::snapshot::Snapshot;
use sea_orm::{Database, DatabaseConnection};
use serde_json::{json, Value};
use tempfile::NamedTempFile;

/// Migrated database in a temp file; keep the file alive for the test
pub async fn setup_test_db() -> Result<(DatabaseConnection, NamedTempFile)> {
    let temp_file = NamedTempFile::new()?;
    let db_url = format!("sqlite://{}?mode=rwc", temp_file.path().display());

    let db = Database::connect(&db_url).await?;
    setup_database(&db).await?;

    Ok((db, temp_file))
}

/// Snapshot touching every collection. Every key an export writes is present,
/// so the exported document should match it field for field
pub fn sample_snapshot_json() -> Value {
    json!({
        "version": "1.0",
        "farms": [
            {
                "id": 3,
                "name": "Hillside",
                "size": "12 acres",
                "crop": "Apples",
                "soilType": "clay",
                "slopeRatio": 0.25,
                "waterHistory": [
                    {"amount": 120, "date": "2024-06-01", "efficiency": 70},
                    {"amount": 90, "date": "2024-05-01"}
                ],
                "fertilizerHistory": [],
                "harvestHistory": [{"yield": 400, "date": "2024-09-20"}]
            },
            {
                "id": 7,
                "name": "River Bottom",
                "size": "80 acres",
                "crop": "Corn",
                "soilType": "",
                "waterHistory": [{"amount": 300, "date": "2024-07-04", "efficiency": 85}],
                "fertilizerHistory": [
                    {"type": "Nitrogen", "amount": 50, "date": "2024-04-10"},
                    {"type": "Potash", "amount": 20, "date": "2024-04-12"}
                ],
                "harvestHistory": []
            }
        ],
        "tasks": [
            {"id": 1, "title": "Fix fence", "dueDate": "2024-08-01", "priority": "high", "completed": false},
            {"id": 2, "title": "Order seed", "dueDate": "2024-02-01", "priority": "low", "completed": true}
        ],
        "issues": [{"id": 1, "title": "Aphids on row 4", "status": "open"}],
        "cropPlanEvents": [{"id": 10, "title": "Sow corn", "date": "2024-04-20"}],
        "plantingPlans": [{"id": 1, "description": "Corn on River Bottom"}],
        "fertilizerPlans": [{"id": 2, "description": "Split nitrogen"}],
        "pestManagementPlans": [{"id": 3, "description": "Scout weekly"}],
        "irrigationPlans": [{"id": 4, "description": "Drip on Hillside"}],
        "weatherTaskPlans": [{"id": 5, "description": "Frost cloth"}],
        "rotationPlans": [{"id": 6, "description": "Beans next year"}],
        "rainwaterPlans": [{"id": 7, "description": "Barn gutters"}],
        "fuelRecords": [{
            "id": 1, "farmId": 7, "date": "2024-05-02", "equipmentName": "Tractor",
            "fuelType": "Diesel", "gallons": 22.5, "hoursOperated": 4.0, "cost": 81.0,
            "notes": "Planting"
        }],
        "soilRecords": [{
            "id": 1, "farmId": 3, "date": "2024-03-15", "location": "North row",
            "ph": 6.5, "organicMatter": 3.2, "nitrogen": 20.0, "phosphorus": 15.0,
            "potassium": 120.0, "moisture": 22.5, "notes": ""
        }],
        "emissionSources": [{
            "id": 1, "farmId": 7, "date": "2024-05-02", "sourceType": "Fuel",
            "description": "Tractor diesel", "co2Equivalent": 228.6, "notes": ""
        }],
        "sequestrationActivities": [{
            "id": 1, "farmId": 3, "date": "2024-10-01", "activityType": "Cover crop",
            "description": "Rye", "co2Sequestered": 1.5, "area": 12.0, "notes": "Winter"
        }],
        "energyRecords": [{
            "id": 1, "farmId": 3, "date": "2024-06-30", "energyType": "Solar",
            "amount": 340.0, "unit": "kWh", "renewable": true, "cost": 0.0,
            "purpose": "Pumps", "notes": ""
        }],
        "livestock": [
            {"id": 1, "farmId": 7, "type": "Cattle", "count": 14},
            {"id": 2, "farmId": 3, "type": "Chickens", "count": 40}
        ]
    })
}

pub fn sample_snapshot() -> Snapshot {
    Snapshot::from_value(sample_snapshot_json()).expect("sample snapshot is valid")
}

/// Export with the volatile timestamp cleared, for equality checks
pub fn without_export_date(mut snapshot: Snapshot) -> Snapshot {
    snapshot.export_date = None;
    snapshot
}

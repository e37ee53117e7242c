//! Snapshot import/export integration tests
//!
//! Round trip, idempotence, atomicity and reference resolution against a
//! real SQLite file.

mod common;

use anyhow::Result;
use farmsync::database::entities::{farms, plan_items, water_history, PlanCategory};
use farmsync::errors::SnapshotError;
use farmsync::services::{ExportService, ImportService};
use farmsync::snapshot::{PlanRecord, Snapshot, SNAPSHOT_VERSION};
use pretty_assertions::assert_eq;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use serde_json::{json, Value};

use common::{sample_snapshot, sample_snapshot_json, setup_test_db, without_export_date};

#[tokio::test]
async fn test_export_of_import_equals_input() -> Result<()> {
    let (db, _temp_file) = setup_test_db().await?;
    let snapshot = sample_snapshot();

    let summary = ImportService::new(db.clone()).import(&snapshot).await?;
    assert_eq!(summary.farms, 2);
    assert_eq!(summary.water_history, 3);
    assert_eq!(summary.plan_items, 7);
    assert_eq!(summary.livestock, 2);

    let exported = ExportService::new(db.clone()).export().await?;
    assert_eq!(exported.version, SNAPSHOT_VERSION);
    assert!(exported.export_date.is_some());
    assert_eq!(without_export_date(exported), snapshot);

    Ok(())
}

#[tokio::test]
async fn test_exported_json_keeps_external_field_names() -> Result<()> {
    let (db, _temp_file) = setup_test_db().await?;
    ImportService::new(db.clone())
        .import_bytes(sample_snapshot_json().to_string().as_bytes())
        .await?;

    let json: serde_json::Value =
        serde_json::from_str(&ExportService::new(db.clone()).export_json().await?)?;

    assert_eq!(json["farms"][0]["harvestHistory"][0]["yield"], 400);
    assert_eq!(json["farms"][1]["fertilizerHistory"][1]["type"], "Potash");
    assert_eq!(json["livestock"][0]["type"], "Cattle");
    assert_eq!(json["fuelRecords"][0]["farmId"], 7);
    assert_eq!(json["sequestrationActivities"][0]["co2Sequestered"], 1.5);
    assert!(json["exportDate"].is_string());

    Ok(())
}

#[tokio::test]
async fn test_exported_document_matches_imported_document() -> Result<()> {
    let (db, _temp_file) = setup_test_db().await?;
    let input = sample_snapshot_json();
    ImportService::new(db.clone())
        .import_bytes(input.to_string().as_bytes())
        .await?;

    let mut exported: Value =
        serde_json::from_str(&ExportService::new(db.clone()).export_json().await?)?;
    let export_date = exported
        .as_object_mut()
        .and_then(|document| document.remove("exportDate"));
    assert!(export_date.is_some());

    // Absent optionals stay absent rather than coming back as null
    assert_eq!(exported, input);
    assert!(exported["farms"][1].get("slopeRatio").is_none());
    assert!(exported["farms"][0]["waterHistory"][1]
        .get("efficiency")
        .is_none());

    Ok(())
}

#[tokio::test]
async fn test_timestamp_sized_ids_round_trip() -> Result<()> {
    let (db, _temp_file) = setup_test_db().await?;
    let snapshot = Snapshot::from_value(json!({
        "farms": [
            {"id": 1728000000000_i64, "name": "Upper", "size": "4", "crop": "Hay"},
            {"id": 1728000000001_i64, "name": "Lower", "size": "9", "crop": "Oats"}
        ],
        "tasks": [{"id": 1728000000456_i64, "title": "Bale", "dueDate": "2024-10-04", "priority": "high"}],
        "plantingPlans": [{"id": 1728000000789_i64, "description": "Oats"}],
        "rotationPlans": [{"id": 1728000000790_i64, "description": "Clover"}],
        "livestock": [
            {"id": 1728000000123_i64, "farmId": 1728000000001_i64, "type": "Sheep", "count": 12}
        ]
    }))?;

    ImportService::new(db.clone()).import(&snapshot).await?;
    let exported = without_export_date(ExportService::new(db.clone()).export().await?);
    assert_eq!(exported, snapshot);

    let json: Value = serde_json::from_str(&ExportService::new(db.clone()).export_json().await?)?;
    assert_eq!(json["farms"][0]["id"], 1728000000000_i64);
    assert_eq!(json["livestock"][0]["farmId"], 1728000000001_i64);

    Ok(())
}

#[tokio::test]
async fn test_export_keeps_document_order() -> Result<()> {
    let (db, _temp_file) = setup_test_db().await?;
    let snapshot = Snapshot::from_value(json!({
        "farms": [
            {"id": 9, "name": "Nine", "size": "1", "crop": "Hay"},
            {"id": 2, "name": "Two", "size": "1", "crop": "Rye"}
        ],
        "tasks": [
            {"id": 5, "title": "Later id first", "dueDate": "2024-03-01", "priority": "low"},
            {"id": 1, "title": "Earlier id second", "dueDate": "2024-03-02", "priority": "low"}
        ],
        "plantingPlans": [
            {"id": 3, "description": "c"},
            {"id": 1, "description": "a"}
        ],
        "irrigationPlans": [
            {"id": 8, "description": "h"},
            {"id": 2, "description": "b"}
        ],
        "livestock": [
            {"id": 5, "farmId": 2, "type": "Goats", "count": 3},
            {"id": 1, "farmId": 9, "type": "Cattle", "count": 7}
        ]
    }))?;

    ImportService::new(db.clone()).import(&snapshot).await?;
    let exported = ExportService::new(db.clone()).export().await?;

    let farm_ids: Vec<i64> = exported.farms.iter().map(|f| f.id).collect();
    assert_eq!(farm_ids, vec![9, 2]);
    let task_ids: Vec<i64> = exported.tasks.iter().map(|t| t.id).collect();
    assert_eq!(task_ids, vec![5, 1]);
    let planting_ids: Vec<i64> = exported.planting_plans.iter().map(|p| p.id).collect();
    assert_eq!(planting_ids, vec![3, 1]);
    let irrigation_ids: Vec<i64> = exported.irrigation_plans.iter().map(|p| p.id).collect();
    assert_eq!(irrigation_ids, vec![8, 2]);
    let livestock_ids: Vec<i64> = exported.livestock.iter().map(|l| l.id).collect();
    assert_eq!(livestock_ids, vec![5, 1]);

    assert_eq!(without_export_date(exported), snapshot);

    Ok(())
}

#[tokio::test]
async fn test_nested_history_keeps_stored_order() -> Result<()> {
    let (db, _temp_file) = setup_test_db().await?;
    ImportService::new(db.clone()).import(&sample_snapshot()).await?;

    let exported = ExportService::new(db.clone()).export().await?;
    let hillside = &exported.farms[0];
    let dates: Vec<String> = hillside
        .water_history
        .iter()
        .map(|w| w.date.to_string())
        .collect();
    assert_eq!(dates, vec!["2024-06-01", "2024-05-01"]);
    assert_eq!(hillside.water_history[1].efficiency, None);

    Ok(())
}

#[tokio::test]
async fn test_import_twice_equals_import_once() -> Result<()> {
    let (db, _temp_file) = setup_test_db().await?;
    let importer = ImportService::new(db.clone());
    let snapshot = sample_snapshot();

    importer.import(&snapshot).await?;
    let once = without_export_date(ExportService::new(db.clone()).export().await?);

    importer.import(&snapshot).await?;
    let twice = without_export_date(ExportService::new(db.clone()).export().await?);

    assert_eq!(once, twice);
    assert_eq!(farms::Entity::find().count(&db).await?, 2);
    assert_eq!(water_history::Entity::find().count(&db).await?, 3);

    Ok(())
}

#[tokio::test]
async fn test_import_replaces_previous_dataset() -> Result<()> {
    let (db, _temp_file) = setup_test_db().await?;
    let importer = ImportService::new(db.clone());
    importer.import(&sample_snapshot()).await?;

    let replacement = Snapshot::from_value(json!({
        "farms": [{"id": 42, "name": "New", "size": "5", "crop": "Oats"}]
    }))?;
    importer.import(&replacement).await?;

    let exported = ExportService::new(db.clone()).export().await?;
    assert_eq!(exported.farms.len(), 1);
    assert_eq!(exported.farms[0].id, 42);
    assert!(exported.tasks.is_empty());
    assert!(exported.livestock.is_empty());
    for category in PlanCategory::ALL {
        assert!(exported.plans(category).is_empty());
    }

    Ok(())
}

#[tokio::test]
async fn test_dangling_farm_reference_leaves_dataset_untouched() -> Result<()> {
    let (db, _temp_file) = setup_test_db().await?;
    let importer = ImportService::new(db.clone());
    importer.import(&sample_snapshot()).await?;
    let before = without_export_date(ExportService::new(db.clone()).export().await?);

    let broken = Snapshot::from_value(json!({
        "farms": [{"id": 1, "name": "Only", "size": "1", "crop": "Hay"}],
        "tasks": [{"id": 9, "title": "Would be inserted", "dueDate": "2024-01-01", "priority": "low"}],
        "livestock": [{"id": 1, "farmId": 99, "type": "Goats", "count": 3}]
    }))?;

    let err = importer.import(&broken).await.unwrap_err();
    match err {
        SnapshotError::DanglingFarmReference {
            kind,
            record_id,
            farm_id,
        } => {
            assert_eq!(kind, "livestock");
            assert_eq!(record_id, 1);
            assert_eq!(farm_id, 99);
        }
        other => panic!("expected a dangling reference, got {:?}", other),
    }

    let after = without_export_date(ExportService::new(db.clone()).export().await?);
    assert_eq!(after, before);

    Ok(())
}

#[tokio::test]
async fn test_flat_record_resolves_only_against_same_document() -> Result<()> {
    let (db, _temp_file) = setup_test_db().await?;
    let importer = ImportService::new(db.clone());

    let fuel = json!({
        "id": 1, "farmId": 7, "date": "2024-05-02", "equipmentName": "Tractor",
        "fuelType": "Diesel", "gallons": 10.0, "hoursOperated": 1.0, "cost": 30.0
    });

    // Farm 7 exists in storage from an earlier import, but not in this document
    importer.import(&sample_snapshot()).await?;
    let without_farm = Snapshot::from_value(json!({
        "farms": [{"id": 8, "name": "Other", "size": "1", "crop": "Hay"}],
        "fuelRecords": [fuel.clone()]
    }))?;
    let err = importer.import(&without_farm).await.unwrap_err();
    assert_eq!(err.error_code(), "REFERENTIAL_ERROR");

    let with_farm = Snapshot::from_value(json!({
        "farms": [{"id": 7, "name": "River Bottom", "size": "80", "crop": "Corn"}],
        "fuelRecords": [fuel]
    }))?;
    let summary = importer.import(&with_farm).await?;
    assert_eq!(summary.fuel_records, 1);

    Ok(())
}

#[tokio::test]
async fn test_single_plan_category_fans_out() -> Result<()> {
    let (db, _temp_file) = setup_test_db().await?;
    ImportService::new(db.clone())
        .import_bytes(br#"{"plantingPlans":[{"id":1,"description":"x"}]}"#)
        .await?;

    let stored = plan_items::Entity::find()
        .filter(plan_items::Column::PlanType.eq(PlanCategory::Planting))
        .all(&db)
        .await?;
    assert_eq!(stored.len(), 1);

    let exported = ExportService::new(db.clone()).export().await?;
    assert_eq!(
        exported.planting_plans,
        vec![PlanRecord {
            id: 1,
            description: "x".to_string()
        }]
    );
    for category in PlanCategory::ALL {
        if category != PlanCategory::Planting {
            assert!(exported.plans(category).is_empty(), "{:?}", category);
        }
    }

    Ok(())
}

#[tokio::test]
async fn test_structural_errors_do_not_touch_store() -> Result<()> {
    let (db, _temp_file) = setup_test_db().await?;
    let importer = ImportService::new(db.clone());
    importer.import(&sample_snapshot()).await?;

    for body in [
        &b"not json"[..],
        &b"[1, 2, 3]"[..],
        &br#"{"farms": [{"id": 1}]}"#[..],
        &br#"{"farms": [{"id": 1, "name": "a", "size": "1", "crop": "c"}, {"id": 1, "name": "b", "size": "1", "crop": "c"}]}"#[..],
    ] {
        let err = importer.import_bytes(body).await.unwrap_err();
        assert_eq!(err.error_code(), "STRUCTURAL_ERROR");
    }

    assert_eq!(farms::Entity::find().count(&db).await?, 2);

    Ok(())
}

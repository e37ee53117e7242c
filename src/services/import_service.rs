use std::collections::HashSet;

use sea_orm::{
    ActiveModelTrait, DatabaseConnection, DatabaseTransaction, EntityTrait, IntoActiveModel,
    TransactionTrait,
};
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::database::entities::{
    crop_plan_events, emission_sources, energy_records, farms, fertilizer_history, fuel_records,
    harvest_history, issues, livestock, plan_items, sequestration_activities, soil_records, tasks,
    water_history, PlanCategory,
};
use crate::errors::{SnapshotError, SnapshotResult};
use crate::snapshot::{
    CropPlanEventRecord, EmissionSourceRecord, EnergyRecord, FarmRecord, FarmScoped, FuelRecord,
    IssueRecord, LivestockRecord, SequestrationActivityRecord, Snapshot, SoilRecord, TaskRecord,
    SNAPSHOT_VERSION,
};

/// Rows per INSERT statement, kept well under SQLite's bound-parameter limit
const BATCH_SIZE: usize = 64;

/// Rows written by a successful import
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub farms: usize,
    pub water_history: usize,
    pub fertilizer_history: usize,
    pub harvest_history: usize,
    pub tasks: usize,
    pub issues: usize,
    pub crop_plan_events: usize,
    pub plan_items: usize,
    pub fuel_records: usize,
    pub soil_records: usize,
    pub emission_sources: usize,
    pub sequestration_activities: usize,
    pub energy_records: usize,
    pub livestock: usize,
}

impl ImportSummary {
    pub fn total(&self) -> usize {
        self.farms
            + self.water_history
            + self.fertilizer_history
            + self.harvest_history
            + self.tasks
            + self.issues
            + self.crop_plan_events
            + self.plan_items
            + self.fuel_records
            + self.soil_records
            + self.emission_sources
            + self.sequestration_activities
            + self.energy_records
            + self.livestock
    }
}

/// Replaces the whole farm dataset with the content of a snapshot.
///
/// The wipe and every insert share one transaction: either the store ends up
/// equal to the snapshot or it is left exactly as it was.
#[derive(Clone)]
pub struct ImportService {
    db: DatabaseConnection,
}

impl ImportService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Decode an uploaded document and import it
    pub async fn import_bytes(&self, bytes: &[u8]) -> SnapshotResult<ImportSummary> {
        let snapshot = Snapshot::from_slice(bytes).map_err(|e| {
            warn!("Rejected snapshot upload ({} bytes): {}", bytes.len(), e);
            e
        })?;
        self.import(&snapshot).await
    }

    pub async fn import(&self, snapshot: &Snapshot) -> SnapshotResult<ImportSummary> {
        if snapshot.version != SNAPSHOT_VERSION {
            warn!(
                "Importing snapshot version {} (current version is {})",
                snapshot.version, SNAPSHOT_VERSION
            );
        }

        if let Err(e) = snapshot.validate() {
            warn!("Rejected snapshot: {}", e);
            return Err(e);
        }

        info!(
            "Starting snapshot import: {} farms, {} flat records",
            snapshot.farms.len(),
            flat_record_count(snapshot)
        );

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SnapshotError::persistence("beginning import transaction", e))?;

        // Dropping `txn` on any early return rolls the import back
        let summary = match Self::replace_dataset(&txn, snapshot).await {
            Ok(summary) => summary,
            Err(e) => {
                if e.is_server_error() {
                    error!("Snapshot import failed, rolling back: {}", e);
                } else {
                    warn!("Snapshot import rejected, rolling back: {}", e);
                }
                return Err(e);
            }
        };

        txn.commit().await.map_err(|e| {
            error!("Failed to commit snapshot import: {}", e);
            SnapshotError::persistence("committing import", e)
        })?;

        info!(
            "Snapshot import committed: {} rows ({} farms, {} plan items)",
            summary.total(),
            summary.farms,
            summary.plan_items
        );

        Ok(summary)
    }

    async fn replace_dataset(
        txn: &DatabaseTransaction,
        snapshot: &Snapshot,
    ) -> SnapshotResult<ImportSummary> {
        clear_dataset(txn).await?;

        let mut summary = ImportSummary::default();

        // Farms first; flat records are resolved against exactly this set
        let farm_rows: Vec<farms::ActiveModel> =
            positioned(&snapshot.farms, FarmRecord::to_active_model);
        summary.farms = insert_rows(txn, farm_rows, "inserting farms").await?;
        let farm_ids: HashSet<i64> = snapshot.farms.iter().map(|f| f.id).collect();

        let mut water = Vec::new();
        let mut fertilizer = Vec::new();
        let mut harvest = Vec::new();
        for farm in &snapshot.farms {
            water.extend(farm.water_history.iter().map(|w| w.to_active_model(farm.id)));
            fertilizer.extend(
                farm.fertilizer_history
                    .iter()
                    .map(|f| f.to_active_model(farm.id)),
            );
            harvest.extend(farm.harvest_history.iter().map(|h| h.to_active_model(farm.id)));
        }
        summary.water_history = insert_rows(txn, water, "inserting water history").await?;
        summary.fertilizer_history =
            insert_rows(txn, fertilizer, "inserting fertilizer history").await?;
        summary.harvest_history = insert_rows(txn, harvest, "inserting harvest history").await?;

        summary.tasks = insert_rows(
            txn,
            positioned(&snapshot.tasks, TaskRecord::to_active_model),
            "inserting tasks",
        )
        .await?;
        summary.issues = insert_rows(
            txn,
            positioned(&snapshot.issues, IssueRecord::to_active_model),
            "inserting issues",
        )
        .await?;
        summary.crop_plan_events = insert_rows(
            txn,
            positioned(&snapshot.crop_plan_events, CropPlanEventRecord::to_active_model),
            "inserting crop plan events",
        )
        .await?;

        let plans: Vec<plan_items::ActiveModel> = PlanCategory::ALL
            .into_iter()
            .flat_map(|category| {
                positioned(snapshot.plans(category), move |plan, position| {
                    plan.to_active_model(category, position)
                })
            })
            .collect();
        summary.plan_items = insert_rows(txn, plans, "inserting plan items").await?;

        resolve_farms(&snapshot.fuel_records, &farm_ids)?;
        summary.fuel_records = insert_rows(
            txn,
            positioned(&snapshot.fuel_records, FuelRecord::to_active_model),
            "inserting fuel records",
        )
        .await?;

        resolve_farms(&snapshot.soil_records, &farm_ids)?;
        summary.soil_records = insert_rows(
            txn,
            positioned(&snapshot.soil_records, SoilRecord::to_active_model),
            "inserting soil records",
        )
        .await?;

        resolve_farms(&snapshot.emission_sources, &farm_ids)?;
        summary.emission_sources = insert_rows(
            txn,
            positioned(&snapshot.emission_sources, EmissionSourceRecord::to_active_model),
            "inserting emission sources",
        )
        .await?;

        resolve_farms(&snapshot.sequestration_activities, &farm_ids)?;
        summary.sequestration_activities = insert_rows(
            txn,
            positioned(
                &snapshot.sequestration_activities,
                SequestrationActivityRecord::to_active_model,
            ),
            "inserting sequestration activities",
        )
        .await?;

        resolve_farms(&snapshot.energy_records, &farm_ids)?;
        summary.energy_records = insert_rows(
            txn,
            positioned(&snapshot.energy_records, EnergyRecord::to_active_model),
            "inserting energy records",
        )
        .await?;

        resolve_farms(&snapshot.livestock, &farm_ids)?;
        summary.livestock = insert_rows(
            txn,
            positioned(&snapshot.livestock, LivestockRecord::to_active_model),
            "inserting livestock",
        )
        .await?;

        Ok(summary)
    }
}

/// Delete every imported collection, children before the farms they reference.
async fn clear_dataset(txn: &DatabaseTransaction) -> SnapshotResult<()> {
    delete_all::<water_history::Entity>(txn, "clearing water history").await?;
    delete_all::<fertilizer_history::Entity>(txn, "clearing fertilizer history").await?;
    delete_all::<harvest_history::Entity>(txn, "clearing harvest history").await?;
    delete_all::<fuel_records::Entity>(txn, "clearing fuel records").await?;
    delete_all::<soil_records::Entity>(txn, "clearing soil records").await?;
    delete_all::<emission_sources::Entity>(txn, "clearing emission sources").await?;
    delete_all::<sequestration_activities::Entity>(txn, "clearing sequestration activities")
        .await?;
    delete_all::<energy_records::Entity>(txn, "clearing energy records").await?;
    delete_all::<livestock::Entity>(txn, "clearing livestock").await?;
    delete_all::<farms::Entity>(txn, "clearing farms").await?;
    delete_all::<tasks::Entity>(txn, "clearing tasks").await?;
    delete_all::<issues::Entity>(txn, "clearing issues").await?;
    delete_all::<crop_plan_events::Entity>(txn, "clearing crop plan events").await?;
    delete_all::<plan_items::Entity>(txn, "clearing plan items").await?;
    Ok(())
}

async fn delete_all<E>(txn: &DatabaseTransaction, step: &str) -> SnapshotResult<u64>
where
    E: EntityTrait,
{
    let result = E::delete_many()
        .exec(txn)
        .await
        .map_err(|e| SnapshotError::persistence(step, e))?;
    debug!("{}: {} rows", step, result.rows_affected);
    Ok(result.rows_affected)
}

async fn insert_rows<A>(txn: &DatabaseTransaction, rows: Vec<A>, step: &str) -> SnapshotResult<usize>
where
    A: ActiveModelTrait + Send,
    <A::Entity as EntityTrait>::Model: IntoActiveModel<A>,
{
    let count = rows.len();
    let mut rows = rows.into_iter();

    loop {
        let batch: Vec<A> = rows.by_ref().take(BATCH_SIZE).collect();
        if batch.is_empty() {
            break;
        }
        <A::Entity as EntityTrait>::insert_many(batch)
            .exec_without_returning(txn)
            .await
            .map_err(|e| SnapshotError::persistence(step, e))?;
    }

    debug!("{}: {} rows", step, count);
    Ok(count)
}

fn resolve_farms<R: FarmScoped>(records: &[R], farm_ids: &HashSet<i64>) -> SnapshotResult<()> {
    match records.iter().find(|r| !farm_ids.contains(&r.farm_id())) {
        Some(record) => Err(SnapshotError::DanglingFarmReference {
            kind: R::KIND,
            record_id: record.id(),
            farm_id: record.farm_id(),
        }),
        None => Ok(()),
    }
}

/// Active models for one snapshot array, each tagged with its index so export
/// can restore the array order.
fn positioned<R, A>(records: &[R], to_model: impl Fn(&R, i32) -> A) -> Vec<A> {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| to_model(record, index as i32))
        .collect()
}

fn flat_record_count(snapshot: &Snapshot) -> usize {
    snapshot.fuel_records.len()
        + snapshot.soil_records.len()
        + snapshot.emission_sources.len()
        + snapshot.sequestration_activities.len()
        + snapshot.energy_records.len()
        + snapshot.livestock.len()
}

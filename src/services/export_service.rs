use std::collections::HashMap;

use chrono::{SecondsFormat, Utc};
use sea_orm::{
    ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait, QueryOrder,
    TransactionTrait,
};
use tracing::{error, info};

use crate::database::entities::{
    crop_plan_events, emission_sources, energy_records, farms, fertilizer_history, fuel_records,
    harvest_history, issues, livestock, plan_items, sequestration_activities, soil_records, tasks,
    water_history,
};
use crate::errors::{SnapshotError, SnapshotResult};
use crate::snapshot::{FarmRecord, Snapshot, SNAPSHOT_VERSION};

/// Reads the whole farm dataset back into the snapshot shape.
#[derive(Clone)]
pub struct ExportService {
    db: DatabaseConnection,
}

impl ExportService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn export(&self) -> SnapshotResult<Snapshot> {
        // One transaction so an import committing mid-export cannot tear the result
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SnapshotError::persistence("beginning export transaction", e))?;

        let snapshot = match Self::read_dataset(&txn).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                error!("Snapshot export failed: {}", e);
                return Err(e);
            }
        };

        txn.commit()
            .await
            .map_err(|e| SnapshotError::persistence("closing export transaction", e))?;

        info!(
            "Exported snapshot: {} farms, {} tasks, {} issues",
            snapshot.farms.len(),
            snapshot.tasks.len(),
            snapshot.issues.len()
        );

        Ok(snapshot)
    }

    /// Export serialized as pretty-printed JSON
    pub async fn export_json(&self) -> SnapshotResult<String> {
        let snapshot = self.export().await?;
        serde_json::to_string_pretty(&snapshot)
            .map_err(|e| SnapshotError::structural(format!("failed to serialize snapshot: {}", e)))
    }

    async fn read_dataset(txn: &DatabaseTransaction) -> SnapshotResult<Snapshot> {
        let farm_rows = load_ordered::<farms::Entity, _>(
            txn,
            [farms::Column::Position, farms::Column::Id],
            "reading farms",
        )
        .await?;

        let mut water = group_by_farm(
            load_ordered::<water_history::Entity, _>(
                txn,
                [water_history::Column::Id],
                "reading water history",
            )
            .await?,
            |row| row.farm_id,
        );
        let mut fertilizer = group_by_farm(
            load_ordered::<fertilizer_history::Entity, _>(
                txn,
                [fertilizer_history::Column::Id],
                "reading fertilizer history",
            )
            .await?,
            |row| row.farm_id,
        );
        let mut harvest = group_by_farm(
            load_ordered::<harvest_history::Entity, _>(
                txn,
                [harvest_history::Column::Id],
                "reading harvest history",
            )
            .await?,
            |row| row.farm_id,
        );

        let farms = farm_rows
            .into_iter()
            .map(|farm| {
                let id = farm.id;
                FarmRecord::from_model(
                    farm,
                    water.remove(&id).unwrap_or_default(),
                    fertilizer.remove(&id).unwrap_or_default(),
                    harvest.remove(&id).unwrap_or_default(),
                )
            })
            .collect();

        let mut snapshot = Snapshot {
            version: SNAPSHOT_VERSION.to_string(),
            export_date: Some(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
            farms,
            ..Default::default()
        };

        snapshot.tasks = load_ordered::<tasks::Entity, _>(txn, [tasks::Column::Position, tasks::Column::Id], "reading tasks")
            .await?
            .into_iter()
            .map(Into::into)
            .collect();
        snapshot.issues =
            load_ordered::<issues::Entity, _>(txn, [issues::Column::Position, issues::Column::Id], "reading issues")
                .await?
                .into_iter()
                .map(Into::into)
                .collect();
        snapshot.crop_plan_events = load_ordered::<crop_plan_events::Entity, _>(
            txn,
            [crop_plan_events::Column::Position, crop_plan_events::Column::Id],
            "reading crop plan events",
        )
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

        // One table, split back into the seven named collections
        let plans = load_ordered::<plan_items::Entity, _>(
            txn,
            [plan_items::Column::Position, plan_items::Column::Id],
            "reading plan items",
        )
        .await?;
        for plan in plans {
            let category = plan.plan_type;
            snapshot.plans_mut(category).push(plan.into());
        }

        snapshot.fuel_records = load_ordered::<fuel_records::Entity, _>(
            txn,
            [fuel_records::Column::Position, fuel_records::Column::Id],
            "reading fuel records",
        )
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
        snapshot.soil_records = load_ordered::<soil_records::Entity, _>(
            txn,
            [soil_records::Column::Position, soil_records::Column::Id],
            "reading soil records",
        )
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
        snapshot.emission_sources = load_ordered::<emission_sources::Entity, _>(
            txn,
            [emission_sources::Column::Position, emission_sources::Column::Id],
            "reading emission sources",
        )
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
        snapshot.sequestration_activities = load_ordered::<sequestration_activities::Entity, _>(
            txn,
            [sequestration_activities::Column::Position, sequestration_activities::Column::Id],
            "reading sequestration activities",
        )
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
        snapshot.energy_records = load_ordered::<energy_records::Entity, _>(
            txn,
            [energy_records::Column::Position, energy_records::Column::Id],
            "reading energy records",
        )
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
        snapshot.livestock = load_ordered::<livestock::Entity, _>(
            txn,
            [livestock::Column::Position, livestock::Column::Id],
            "reading livestock",
        )
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

        Ok(snapshot)
    }
}

/// All rows of `E`, sorted ascending by each column of `order` in turn
async fn load_ordered<E, C>(
    txn: &DatabaseTransaction,
    order: impl IntoIterator<Item = C>,
    step: &str,
) -> SnapshotResult<Vec<E::Model>>
where
    E: EntityTrait,
    C: ColumnTrait,
{
    let mut query = E::find();
    for column in order {
        query = query.order_by_asc(column);
    }
    query
        .all(txn)
        .await
        .map_err(|e| SnapshotError::persistence(step, e))
}

/// Bucket rows by owning farm, keeping their relative order
fn group_by_farm<M>(rows: Vec<M>, farm_of: impl Fn(&M) -> i64) -> HashMap<i64, Vec<M>> {
    let mut grouped: HashMap<i64, Vec<M>> = HashMap::new();
    for row in rows {
        grouped.entry(farm_of(&row)).or_default().push(row);
    }
    grouped
}

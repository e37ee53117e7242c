use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    TransactionTrait,
};
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::auth::Principal;
use crate::common::json_type_name;
use crate::database::entities::user_blobs;
use crate::errors::{BlobError, BlobResult};

/// Per-user JSON document store mirroring a client-side cache.
///
/// Saves replace the whole document; there is no merge.
#[derive(Clone)]
pub struct BlobService {
    db: DatabaseConnection,
}

impl BlobService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Parse a raw request body and store it
    pub async fn save_bytes(&self, principal: &Principal, body: &[u8]) -> BlobResult<bool> {
        let document: Value = serde_json::from_slice(body).map_err(|e| {
            warn!("Rejected blob for user {}: {}", principal.user_id, e);
            BlobError::Malformed(e.to_string())
        })?;
        self.save(principal, document).await
    }

    /// Store `document` for the principal. Returns `true` when the row was created.
    pub async fn save(&self, principal: &Principal, document: Value) -> BlobResult<bool> {
        if !document.is_object() {
            let found = json_type_name(&document);
            warn!("Rejected blob for user {}: found {}", principal.user_id, found);
            return Err(BlobError::NotAnObject(found));
        }

        let txn = self.db.begin().await?;
        let now = Utc::now();

        let existing = user_blobs::Entity::find()
            .filter(user_blobs::Column::UserId.eq(principal.user_id))
            .one(&txn)
            .await?;

        let created = match existing {
            Some(row) => {
                let mut active: user_blobs::ActiveModel = row.into();
                active.data = Set(document);
                active.last_updated = Set(now);
                active.update(&txn).await?;
                false
            }
            None => {
                user_blobs::ActiveModel {
                    id: ActiveValue::NotSet,
                    user_id: Set(principal.user_id),
                    data: Set(document),
                    last_updated: Set(now),
                }
                .insert(&txn)
                .await?;
                true
            }
        };

        txn.commit().await?;

        info!(
            "{} blob for user {}",
            if created { "Created" } else { "Replaced" },
            principal.username
        );
        Ok(created)
    }

    /// Stored document, or an empty object if the principal never saved one
    pub async fn load(&self, principal: &Principal) -> BlobResult<Value> {
        let row = user_blobs::Entity::find()
            .filter(user_blobs::Column::UserId.eq(principal.user_id))
            .one(&self.db)
            .await?;

        match row {
            Some(row) => Ok(row.data),
            None => {
                debug!("No blob stored for user {}", principal.user_id);
                Ok(json!({}))
            }
        }
    }
}

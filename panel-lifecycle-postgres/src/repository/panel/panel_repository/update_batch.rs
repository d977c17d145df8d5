use async_trait::async_trait;
use panel_lifecycle_api::error::LifecycleError;
use panel_lifecycle_db::models::panel::PanelModel;
use panel_lifecycle_db::repository::UpdateBatch;
use sqlx::Postgres;
use std::error::Error;
use uuid::Uuid;

use crate::utils::TryFromRow;

use super::repo_impl::PanelRepositoryImpl;

impl PanelRepositoryImpl {
    /// Compare-and-write on `version`.
    ///
    /// A panel whose stored version differs from the one it was read with
    /// fails the whole batch with `LifecycleError::Conflict`. An assigned
    /// barcode is never overwritten.
    pub(super) async fn update_batch_impl(
        &self,
        items: Vec<PanelModel>,
        audit_log_id: Option<Uuid>,
    ) -> Result<Vec<PanelModel>, Box<dyn Error + Send + Sync>> {
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let mut tx = self.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;

        let mut updated_items = Vec::with_capacity(items.len());
        for item in items {
            let row = sqlx::query(
                r#"
                UPDATE box_panel SET
                    name = $3,
                    barcode = COALESCE(barcode, $4),
                    status = $5,
                    first_approval_status = $6,
                    first_approval_by = $7,
                    first_approval_at = $8,
                    first_approval_notes = $9,
                    second_approval_status = $10,
                    second_approval_by = $11,
                    second_approval_at = $12,
                    second_approval_notes = $13,
                    location_status = $14,
                    dispatched_at = $15,
                    arrived_at = $16,
                    installed_at = $17,
                    last_modified_by = $18,
                    last_modified_at = $19,
                    audit_log_id = COALESCE($20, audit_log_id),
                    version = version + 1
                WHERE id = $1 AND version = $2
                RETURNING *
                "#,
            )
            .bind(item.id)
            .bind(item.version)
            .bind(item.name.as_str())
            .bind(item.barcode.as_deref())
            .bind(item.status)
            .bind(item.first_approval_status)
            .bind(item.first_approval_by)
            .bind(item.first_approval_at)
            .bind(item.first_approval_notes.as_deref())
            .bind(item.second_approval_status)
            .bind(item.second_approval_by)
            .bind(item.second_approval_at)
            .bind(item.second_approval_notes.as_deref())
            .bind(item.location_status)
            .bind(item.dispatched_at)
            .bind(item.arrived_at)
            .bind(item.installed_at)
            .bind(item.last_modified_by)
            .bind(item.last_modified_at)
            .bind(audit_log_id)
            .fetch_optional(&mut **transaction)
            .await?;

            match row {
                Some(row) => updated_items.push(PanelModel::try_from_row(&row)?),
                None => {
                    return Err(Box::new(LifecycleError::Conflict(format!(
                        "Panel {} was modified concurrently or no longer exists",
                        item.id
                    ))))
                }
            }
        }

        Ok(updated_items)
    }
}

#[async_trait]
impl UpdateBatch<Postgres, PanelModel> for PanelRepositoryImpl {
    async fn update_batch(
        &self,
        items: Vec<PanelModel>,
        audit_log_id: Option<Uuid>,
    ) -> Result<Vec<PanelModel>, Box<dyn Error + Send + Sync>> {
        self.update_batch_impl(items, audit_log_id).await
    }
}

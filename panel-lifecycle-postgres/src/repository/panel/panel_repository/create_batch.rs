use async_trait::async_trait;
use panel_lifecycle_db::models::panel::PanelModel;
use panel_lifecycle_db::repository::CreateBatch;
use sqlx::Postgres;
use std::error::Error;
use uuid::Uuid;

use super::repo_impl::PanelRepositoryImpl;

impl PanelRepositoryImpl {
    /// Inserts new panels at version 1, linked to `audit_log_id`.
    pub(super) async fn create_batch_impl(
        &self,
        items: Vec<PanelModel>,
        audit_log_id: Option<Uuid>,
    ) -> Result<Vec<PanelModel>, Box<dyn Error + Send + Sync>> {
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let mut tx = self.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;

        let mut saved_items = Vec::with_capacity(items.len());
        for mut item in items {
            item.version = 1;
            item.audit_log_id = audit_log_id;

            sqlx::query(
                r#"
                INSERT INTO box_panel (
                    id, box_id, panel_type_id, name, barcode, status,
                    first_approval_status, first_approval_by, first_approval_at, first_approval_notes,
                    second_approval_status, second_approval_by, second_approval_at, second_approval_notes,
                    location_status, dispatched_at, arrived_at, installed_at,
                    created_by, created_at, last_modified_by, last_modified_at,
                    version, audit_log_id
                )
                VALUES (
                    $1, $2, $3, $4, $5, $6,
                    $7, $8, $9, $10,
                    $11, $12, $13, $14,
                    $15, $16, $17, $18,
                    $19, $20, $21, $22,
                    $23, $24
                )
                "#,
            )
            .bind(item.id)
            .bind(item.box_id)
            .bind(item.panel_type_id)
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
            .bind(item.created_by)
            .bind(item.created_at)
            .bind(item.last_modified_by)
            .bind(item.last_modified_at)
            .bind(item.version)
            .bind(item.audit_log_id)
            .execute(&mut **transaction)
            .await?;

            saved_items.push(item);
        }

        Ok(saved_items)
    }
}

#[async_trait]
impl CreateBatch<Postgres, PanelModel> for PanelRepositoryImpl {
    async fn create_batch(
        &self,
        items: Vec<PanelModel>,
        audit_log_id: Option<Uuid>,
    ) -> Result<Vec<PanelModel>, Box<dyn Error + Send + Sync>> {
        self.create_batch_impl(items, audit_log_id).await
    }
}

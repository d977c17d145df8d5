use async_trait::async_trait;
use panel_lifecycle_db::models::audit::AuditRecordModel;
use panel_lifecycle_db::repository::CreateBatch;
use sqlx::Postgres;
use std::error::Error;
use uuid::Uuid;

use super::repo_impl::AuditRecordRepositoryImpl;

impl AuditRecordRepositoryImpl {
    pub(super) async fn create_batch_impl(
        &self,
        items: Vec<AuditRecordModel>,
    ) -> Result<Vec<AuditRecordModel>, Box<dyn Error + Send + Sync>> {
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let mut tx = self.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;

        for item in &items {
            sqlx::query(
                r#"
                INSERT INTO audit_log (
                    id, table_name, record_id, action, old_values, new_values,
                    changed_by, changed_at, description, hash
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                "#,
            )
            .bind(item.id)
            .bind(item.table_name.as_str())
            .bind(item.record_id)
            .bind(item.action)
            .bind(item.old_values.as_ref())
            .bind(item.new_values.as_ref())
            .bind(item.changed_by)
            .bind(item.changed_at)
            .bind(item.description.as_deref())
            .bind(item.hash)
            .execute(&mut **transaction)
            .await?;
        }

        Ok(items)
    }
}

/// Audit records are roots of the audit chain and take no audit link.
#[async_trait]
impl CreateBatch<Postgres, AuditRecordModel> for AuditRecordRepositoryImpl {
    async fn create_batch(
        &self,
        items: Vec<AuditRecordModel>,
        _audit_log_id: Option<Uuid>,
    ) -> Result<Vec<AuditRecordModel>, Box<dyn Error + Send + Sync>> {
        self.create_batch_impl(items).await
    }
}

use async_trait::async_trait;
use panel_lifecycle_db::models::panel::ScanLogModel;
use panel_lifecycle_db::repository::CreateBatch;
use sqlx::Postgres;
use std::error::Error;
use uuid::Uuid;

use super::repo_impl::ScanLogRepositoryImpl;

impl ScanLogRepositoryImpl {
    pub(super) async fn create_batch_impl(
        &self,
        items: Vec<ScanLogModel>,
    ) -> Result<Vec<ScanLogModel>, Box<dyn Error + Send + Sync>> {
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let mut tx = self.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;

        for item in &items {
            sqlx::query(
                r#"
                INSERT INTO panel_scan_log (
                    id, panel_id, barcode, scan_type, scan_location,
                    latitude, longitude, scanned_by, scanned_at, notes
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                "#,
            )
            .bind(item.id)
            .bind(item.panel_id)
            .bind(item.barcode.as_str())
            .bind(item.scan_type)
            .bind(item.scan_location.as_deref())
            .bind(item.latitude)
            .bind(item.longitude)
            .bind(item.scanned_by)
            .bind(item.scanned_at)
            .bind(item.notes.as_deref())
            .execute(&mut **transaction)
            .await?;
        }

        Ok(items)
    }
}

/// Scan log rows carry no audit link; the audit trail covers the panel.
#[async_trait]
impl CreateBatch<Postgres, ScanLogModel> for ScanLogRepositoryImpl {
    async fn create_batch(
        &self,
        items: Vec<ScanLogModel>,
        _audit_log_id: Option<Uuid>,
    ) -> Result<Vec<ScanLogModel>, Box<dyn Error + Send + Sync>> {
        self.create_batch_impl(items).await
    }
}

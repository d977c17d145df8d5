use async_trait::async_trait;
use panel_lifecycle_db::models::panel::ScanLogModel;
use panel_lifecycle_db::repository::{LoadScanLogs, Page, PageRequest};
use sqlx::Postgres;
use std::error::Error;
use uuid::Uuid;

use crate::utils::rows_into;

use super::repo_impl::ScanLogRepositoryImpl;

impl ScanLogRepositoryImpl {
    /// Oldest first.
    pub(super) async fn load_scan_logs_impl(
        &self,
        panel_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<ScanLogModel>, Box<dyn Error + Send + Sync>> {
        let mut tx = self.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;

        let total: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM panel_scan_log WHERE panel_id = $1"#)
            .bind(panel_id)
            .fetch_one(&mut **transaction)
            .await?;

        let rows = sqlx::query(
            r#"
            SELECT * FROM panel_scan_log
            WHERE panel_id = $1
            ORDER BY scanned_at ASC, id ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(panel_id)
        .bind(page.limit as i64)
        .bind(page.offset as i64)
        .fetch_all(&mut **transaction)
        .await?;

        Ok(Page::new(
            rows_into(&rows)?,
            total as usize,
            page.limit,
            page.offset,
        ))
    }
}

#[async_trait]
impl LoadScanLogs<Postgres> for ScanLogRepositoryImpl {
    async fn load_scan_logs(
        &self,
        panel_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<ScanLogModel>, Box<dyn Error + Send + Sync>> {
        self.load_scan_logs_impl(panel_id, page).await
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use panel_lifecycle_db::repository::{CreateBatch, LoadScanLogs, PageRequest};
    use serial_test::serial;

    use crate::repository::test_utils::{
        create_test_box, create_test_panel, create_test_project, create_test_scan_log,
    };
    use crate::test_helper::setup_test_context;

    #[tokio::test]
    #[ignore = "requires DATABASE_URL"]
    #[serial]
    async fn test_scan_logs_are_paged_oldest_first() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        let project_id = create_test_project(ctx.executor()).await?;
        let box_id = create_test_box(ctx.executor(), project_id).await?;
        let panel = create_test_panel(box_id, "Panel 1").with_barcode("PNL-PRJ001-CCCCCCCCCC")?;
        ctx.repos().panels.create_batch(vec![panel.clone()], None).await?;

        let start = Utc::now() - Duration::minutes(10);
        let logs: Vec<_> = (0..3)
            .map(|n| create_test_scan_log(&panel, start + Duration::minutes(n)))
            .collect();
        // inserted newest first
        ctx.repos()
            .scan_logs
            .create_batch(logs.iter().rev().cloned().collect(), None)
            .await?;

        let first_page = ctx
            .repos()
            .scan_logs
            .load_scan_logs(panel.id, PageRequest::for_page(2, 1))
            .await?;
        assert_eq!(first_page.total, 3);
        assert_eq!(
            first_page.items.iter().map(|l| l.id).collect::<Vec<_>>(),
            vec![logs[0].id, logs[1].id]
        );
        assert!(first_page.has_more());

        let second_page = ctx
            .repos()
            .scan_logs
            .load_scan_logs(panel.id, PageRequest::for_page(2, 2))
            .await?;
        assert_eq!(second_page.items.len(), 1);
        assert_eq!(second_page.items[0].id, logs[2].id);
        Ok(())
    }
}

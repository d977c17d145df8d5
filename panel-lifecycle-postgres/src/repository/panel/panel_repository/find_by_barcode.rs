use async_trait::async_trait;
use panel_lifecycle_db::models::panel::PanelModel;
use panel_lifecycle_db::repository::FindByBarcode;
use sqlx::Postgres;
use std::error::Error;

use crate::utils::TryFromRow;

use super::repo_impl::PanelRepositoryImpl;

impl PanelRepositoryImpl {
    /// Exact match. The returned row is locked for the rest of the session.
    pub(super) async fn find_by_barcode_impl(
        &self,
        barcode: &str,
    ) -> Result<Option<PanelModel>, Box<dyn Error + Send + Sync>> {
        let query = r#"SELECT * FROM box_panel WHERE barcode = $1 FOR UPDATE"#;
        let row = {
            let mut tx = self.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;
            sqlx::query(query)
                .bind(barcode)
                .fetch_optional(&mut **transaction)
                .await?
        };

        row.as_ref().map(PanelModel::try_from_row).transpose()
    }
}

#[async_trait]
impl FindByBarcode<Postgres, PanelModel> for PanelRepositoryImpl {
    async fn find_by_barcode(
        &self,
        barcode: &str,
    ) -> Result<Option<PanelModel>, Box<dyn Error + Send + Sync>> {
        self.find_by_barcode_impl(barcode).await
    }
}

#[cfg(test)]
mod tests {
    use panel_lifecycle_db::repository::{CreateBatch, FindByBarcode};
    use serial_test::serial;

    use crate::repository::test_utils::{create_test_box, create_test_panel, create_test_project};
    use crate::test_helper::setup_test_context;

    #[tokio::test]
    #[ignore = "requires DATABASE_URL"]
    #[serial]
    async fn test_find_by_barcode_is_exact() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        let project_id = create_test_project(ctx.executor()).await?;
        let box_id = create_test_box(ctx.executor(), project_id).await?;
        let panel = create_test_panel(box_id, "Panel 1")
            .with_barcode("PNL-PRJ001-0A1B2C3D4E")?;
        ctx.repos().panels.create_batch(vec![panel.clone()], None).await?;

        let found = ctx.repos().panels.find_by_barcode("PNL-PRJ001-0A1B2C3D4E").await?;
        assert_eq!(found.map(|p| p.id), Some(panel.id));

        let lower = ctx.repos().panels.find_by_barcode("pnl-prj001-0a1b2c3d4e").await?;
        assert!(lower.is_none());
        Ok(())
    }
}

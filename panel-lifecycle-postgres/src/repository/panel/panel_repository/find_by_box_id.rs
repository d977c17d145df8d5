use async_trait::async_trait;
use panel_lifecycle_db::models::panel::PanelModel;
use panel_lifecycle_db::repository::FindByParentId;
use sqlx::Postgres;
use std::error::Error;
use uuid::Uuid;

use crate::utils::rows_into;

use super::repo_impl::PanelRepositoryImpl;

impl PanelRepositoryImpl {
    pub(super) async fn find_by_box_id_impl(
        &self,
        box_id: Uuid,
    ) -> Result<Vec<PanelModel>, Box<dyn Error + Send + Sync>> {
        let query = r#"SELECT * FROM box_panel WHERE box_id = $1 ORDER BY created_at, name"#;
        let rows = {
            let mut tx = self.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;
            sqlx::query(query).bind(box_id).fetch_all(&mut **transaction).await?
        };

        rows_into(&rows)
    }
}

#[async_trait]
impl FindByParentId<Postgres, PanelModel> for PanelRepositoryImpl {
    async fn find_by_parent_id(
        &self,
        parent_id: Uuid,
    ) -> Result<Vec<PanelModel>, Box<dyn Error + Send + Sync>> {
        self.find_by_box_id_impl(parent_id).await
    }
}

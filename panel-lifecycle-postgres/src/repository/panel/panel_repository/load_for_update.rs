use async_trait::async_trait;
use panel_lifecycle_db::models::panel::PanelModel;
use panel_lifecycle_db::repository::LoadForUpdate;
use sqlx::Postgres;
use std::error::Error;
use uuid::Uuid;

use crate::utils::TryFromRow;

use super::repo_impl::PanelRepositoryImpl;

impl PanelRepositoryImpl {
    /// Row stays locked until the session ends.
    pub(super) async fn load_for_update_impl(
        &self,
        id: Uuid,
    ) -> Result<Option<PanelModel>, Box<dyn Error + Send + Sync>> {
        let query = r#"SELECT * FROM box_panel WHERE id = $1 FOR UPDATE"#;
        let row = {
            let mut tx = self.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;
            sqlx::query(query).bind(id).fetch_optional(&mut **transaction).await?
        };

        row.as_ref().map(PanelModel::try_from_row).transpose()
    }
}

#[async_trait]
impl LoadForUpdate<Postgres, PanelModel> for PanelRepositoryImpl {
    async fn load_for_update(
        &self,
        id: Uuid,
    ) -> Result<Option<PanelModel>, Box<dyn Error + Send + Sync>> {
        self.load_for_update_impl(id).await
    }
}

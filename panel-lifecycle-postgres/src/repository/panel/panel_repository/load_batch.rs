use async_trait::async_trait;
use panel_lifecycle_db::models::panel::PanelModel;
use panel_lifecycle_db::repository::LoadBatch;
use sqlx::Postgres;
use std::collections::HashMap;
use std::error::Error;
use uuid::Uuid;

use crate::utils::TryFromRow;

use super::repo_impl::PanelRepositoryImpl;

impl PanelRepositoryImpl {
    pub(super) async fn load_batch_impl(
        &self,
        ids: &[Uuid],
    ) -> Result<Vec<Option<PanelModel>>, Box<dyn Error + Send + Sync>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let query = r#"SELECT * FROM box_panel WHERE id = ANY($1)"#;
        let rows = {
            let mut tx = self.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;
            sqlx::query(query).bind(ids).fetch_all(&mut **transaction).await?
        };

        let mut item_map = HashMap::with_capacity(rows.len());
        for row in rows {
            let item = PanelModel::try_from_row(&row)?;
            item_map.insert(item.id, item);
        }

        Ok(ids.iter().map(|id| item_map.remove(id)).collect())
    }
}

#[async_trait]
impl LoadBatch<Postgres, PanelModel> for PanelRepositoryImpl {
    async fn load_batch(
        &self,
        ids: &[Uuid],
    ) -> Result<Vec<Option<PanelModel>>, Box<dyn Error + Send + Sync>> {
        self.load_batch_impl(ids).await
    }
}

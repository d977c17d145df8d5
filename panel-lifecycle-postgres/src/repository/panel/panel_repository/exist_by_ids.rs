use async_trait::async_trait;
use panel_lifecycle_db::repository::ExistByIds;
use sqlx::{Postgres, Row};
use std::collections::HashSet;
use std::error::Error;
use uuid::Uuid;

use super::repo_impl::PanelRepositoryImpl;

impl PanelRepositoryImpl {
    pub(super) async fn exist_by_ids_impl(
        &self,
        ids: &[Uuid],
    ) -> Result<Vec<(Uuid, bool)>, Box<dyn Error + Send + Sync>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let query = r#"SELECT id FROM box_panel WHERE id = ANY($1)"#;
        let rows = {
            let mut tx = self.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;
            sqlx::query(query).bind(ids).fetch_all(&mut **transaction).await?
        };

        let found = rows
            .iter()
            .map(|row| row.try_get::<Uuid, _>("id"))
            .collect::<Result<HashSet<_>, _>>()?;
        Ok(ids.iter().map(|id| (*id, found.contains(id))).collect())
    }
}

#[async_trait]
impl ExistByIds<Postgres> for PanelRepositoryImpl {
    async fn exist_by_ids(&self, ids: &[Uuid]) -> Result<Vec<(Uuid, bool)>, Box<dyn Error + Send + Sync>> {
        self.exist_by_ids_impl(ids).await
    }
}

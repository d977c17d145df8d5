use async_trait::async_trait;
use panel_lifecycle_db::models::panel::BoxModel;
use panel_lifecycle_db::repository::LoadForShare;
use sqlx::Postgres;
use std::error::Error;
use uuid::Uuid;

use crate::utils::TryFromRow;

use super::repo_impl::BoxRepositoryImpl;

impl BoxRepositoryImpl {
    /// Holds a share lock so the box cannot be dispatched while a panel of
    /// it is being changed in this session.
    pub(super) async fn load_for_share_impl(
        &self,
        id: Uuid,
    ) -> Result<Option<BoxModel>, Box<dyn Error + Send + Sync>> {
        let query = r#"SELECT id, project_id, name, tag, status FROM box WHERE id = $1 FOR SHARE"#;
        let row = {
            let mut tx = self.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;
            sqlx::query(query).bind(id).fetch_optional(&mut **transaction).await?
        };

        row.as_ref().map(BoxModel::try_from_row).transpose()
    }
}

#[async_trait]
impl LoadForShare<Postgres, BoxModel> for BoxRepositoryImpl {
    async fn load_for_share(&self, id: Uuid) -> Result<Option<BoxModel>, Box<dyn Error + Send + Sync>> {
        self.load_for_share_impl(id).await
    }
}

#[cfg(test)]
mod tests {
    use panel_lifecycle_api::domain::BoxStatus;
    use panel_lifecycle_db::repository::LoadForShare;
    use serial_test::serial;
    use uuid::Uuid;

    use crate::repository::test_utils::{create_test_box, create_test_project, set_box_status};
    use crate::test_helper::setup_test_context;

    #[tokio::test]
    #[ignore = "requires DATABASE_URL"]
    #[serial]
    async fn test_load_for_share() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        let project_id = create_test_project(ctx.executor()).await?;
        let box_id = create_test_box(ctx.executor(), project_id).await?;
        set_box_status(ctx.executor(), box_id, BoxStatus::Dispatched).await?;

        let loaded = ctx.repos().boxes.load_for_share(box_id).await?.ok_or("box missing")?;
        assert_eq!(loaded.project_id, project_id);
        assert!(loaded.is_dispatched());

        assert!(ctx.repos().boxes.load_for_share(Uuid::new_v4()).await?.is_none());
        Ok(())
    }
}

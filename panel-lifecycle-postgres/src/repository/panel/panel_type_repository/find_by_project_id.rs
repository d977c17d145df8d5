use async_trait::async_trait;
use panel_lifecycle_db::models::panel::PanelTypeModel;
use panel_lifecycle_db::repository::FindByParentId;
use sqlx::Postgres;
use std::error::Error;
use uuid::Uuid;

use crate::utils::rows_into;

use super::repo_impl::PanelTypeRepositoryImpl;

impl PanelTypeRepositoryImpl {
    pub(super) async fn find_by_project_id_impl(
        &self,
        project_id: Uuid,
    ) -> Result<Vec<PanelTypeModel>, Box<dyn Error + Send + Sync>> {
        let query = r#"SELECT * FROM panel_type WHERE project_id = $1 ORDER BY name, id"#;
        let rows = {
            let mut tx = self.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;
            sqlx::query(query).bind(project_id).fetch_all(&mut **transaction).await?
        };

        rows_into(&rows)
    }
}

#[async_trait]
impl FindByParentId<Postgres, PanelTypeModel> for PanelTypeRepositoryImpl {
    async fn find_by_parent_id(
        &self,
        parent_id: Uuid,
    ) -> Result<Vec<PanelTypeModel>, Box<dyn Error + Send + Sync>> {
        self.find_by_project_id_impl(parent_id).await
    }
}

#[cfg(test)]
mod tests {
    use panel_lifecycle_db::repository::FindByParentId;
    use rust_decimal::Decimal;
    use serial_test::serial;

    use crate::repository::test_utils::{create_test_panel_type, create_test_project};
    use crate::test_helper::setup_test_context;

    #[tokio::test]
    #[ignore = "requires DATABASE_URL"]
    #[serial]
    async fn test_find_by_project_id() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        let project_id = create_test_project(ctx.executor()).await?;
        let other_project_id = create_test_project(ctx.executor()).await?;
        create_test_panel_type(ctx.executor(), project_id, "Wall", 2).await?;
        create_test_panel_type(ctx.executor(), project_id, "Floor", 1).await?;
        create_test_panel_type(ctx.executor(), other_project_id, "Roof", 3).await?;

        let types = ctx.repos().panel_types.find_by_parent_id(project_id).await?;
        let names: Vec<_> = types.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Floor", "Wall"]);
        assert_eq!(types[1].quantity, 2);
        assert_eq!(types[1].width_mm, Some(Decimal::new(120000, 2)));
        Ok(())
    }
}

use async_trait::async_trait;
use panel_lifecycle_db::models::audit::{AuditEntityKind, DisplayReference};
use panel_lifecycle_db::repository::DisplayNameLookup;
use sqlx::{Postgres, Row};
use std::error::Error;
use uuid::Uuid;

use super::repo_impl::DisplayNameRepositoryImpl;

impl DisplayNameRepositoryImpl {
    pub(super) async fn lookup_display_reference_impl(
        &self,
        kind: AuditEntityKind,
        id: Uuid,
    ) -> Result<Option<DisplayReference>, Box<dyn Error + Send + Sync>> {
        let query = match kind {
            AuditEntityKind::Project => r#"SELECT name, code FROM project WHERE id = $1"#,
            AuditEntityKind::Box => r#"SELECT name, tag FROM box WHERE id = $1"#,
            AuditEntityKind::Panel => r#"SELECT name, barcode FROM box_panel WHERE id = $1"#,
            AuditEntityKind::User => r#"SELECT full_name, email FROM app_user WHERE id = $1"#,
            AuditEntityKind::Unknown => return Ok(None),
        };

        let row = {
            let mut tx = self.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;
            sqlx::query(query).bind(id).fetch_optional(&mut **transaction).await?
        };
        let Some(row) = row else {
            return Ok(None);
        };

        let reference = match kind {
            AuditEntityKind::Project => DisplayReference::Project {
                name: row.try_get("name")?,
                code: row.try_get("code")?,
            },
            AuditEntityKind::Box => DisplayReference::Box {
                name: row.try_get("name")?,
                tag: row.try_get("tag")?,
            },
            AuditEntityKind::Panel => DisplayReference::Panel {
                name: row.try_get("name")?,
                barcode: row.try_get("barcode")?,
            },
            AuditEntityKind::User => DisplayReference::User {
                id,
                full_name: row.try_get("full_name")?,
                email: row.try_get("email")?,
            },
            AuditEntityKind::Unknown => return Ok(None),
        };
        Ok(Some(reference))
    }
}

#[async_trait]
impl DisplayNameLookup<Postgres> for DisplayNameRepositoryImpl {
    async fn lookup_display_reference(
        &self,
        kind: AuditEntityKind,
        id: Uuid,
    ) -> Result<Option<DisplayReference>, Box<dyn Error + Send + Sync>> {
        self.lookup_display_reference_impl(kind, id).await
    }
}

use async_trait::async_trait;
use sqlx::Database;
use uuid::Uuid;

use crate::models::{AuditEntityKind, DisplayReference};
use crate::repository::RepositoryError;

/// Loads the naming columns of an entity. `Unknown` kinds always yield None.
#[async_trait]
pub trait DisplayNameLookup<DB: Database>: Send + Sync {
    async fn lookup_display_reference(
        &self,
        kind: AuditEntityKind,
        id: Uuid,
    ) -> Result<Option<DisplayReference>, RepositoryError>;
}

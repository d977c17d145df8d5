use async_trait::async_trait;
use sqlx::Database;
use uuid::Uuid;

use crate::models::identifiable::Identifiable;
use crate::repository::RepositoryError;

/// Loads every child entity of a parent (panels of a box, panel templates of
/// a project), ordered by name.
#[async_trait]
pub trait FindByParentId<DB: Database, T: Identifiable>: Send + Sync {
    async fn find_by_parent_id(&self, parent_id: Uuid) -> Result<Vec<T>, RepositoryError>;
}

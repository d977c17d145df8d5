use async_trait::async_trait;
use sqlx::Database;
use uuid::Uuid;

use crate::repository::RepositoryError;

/// Generic repository trait for checking existence of multiple entities by their IDs
///
/// Returns one `(id, exists)` tuple per requested ID, in request order.
#[async_trait]
pub trait ExistByIds<DB: Database>: Send + Sync {
    async fn exist_by_ids(&self, ids: &[Uuid]) -> Result<Vec<(Uuid, bool)>, RepositoryError>;
}

use async_trait::async_trait;
use sqlx::Database;
use uuid::Uuid;

use crate::models::identifiable::Identifiable;
use crate::repository::RepositoryError;

/// Generic repository trait for updating multiple entities in a batch
///
/// Versioned entities are compare-and-written: each item carries the version
/// it was loaded at, and the update fails with a boxed
/// `LifecycleError::Conflict` when the stored row has moved on.
///
/// # Returns
/// * `Ok(Vec<T>)` - The updated entities with their new version
/// * `Err` - A conflict, or an error if the statement could not be executed
#[async_trait]
pub trait UpdateBatch<DB: Database, T: Identifiable>: Send + Sync {
    async fn update_batch(
        &self,
        items: Vec<T>,
        audit_log_id: Option<Uuid>,
    ) -> Result<Vec<T>, RepositoryError>;
}

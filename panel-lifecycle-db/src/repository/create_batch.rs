use async_trait::async_trait;
use sqlx::Database;
use uuid::Uuid;

use crate::models::identifiable::Identifiable;
use crate::repository::RepositoryError;

/// Generic repository trait for creating multiple entities in a batch
///
/// All creates are performed within the caller's transaction.
/// Returns saved items with any generated fields populated.
///
/// # Example
/// ```ignore
/// impl CreateBatch<Postgres, PanelModel> for PanelRepositoryImpl {
///     async fn create_batch(&self, items: Vec<PanelModel>, audit_log_id: Option<Uuid>) -> Result<Vec<PanelModel>, RepositoryError> {
///         // Implementation
///     }
/// }
/// ```
#[async_trait]
pub trait CreateBatch<DB: Database, T: Identifiable>: Send + Sync {
    /// # Arguments
    /// * `items` - A vector of entities to create
    /// * `audit_log_id` - The audit record describing this operation, if the entity is audited
    async fn create_batch(
        &self,
        items: Vec<T>,
        audit_log_id: Option<Uuid>,
    ) -> Result<Vec<T>, RepositoryError>;
}

use async_trait::async_trait;
use sqlx::Database;
use uuid::Uuid;

use crate::models::identifiable::Identifiable;
use crate::repository::RepositoryError;

/// Loads one entity and holds an exclusive row lock on it until the
/// enclosing transaction ends.
///
/// Two commands racing on the same panel serialize here; the second one
/// observes the state the first one committed.
#[async_trait]
pub trait LoadForUpdate<DB: Database, T: Identifiable>: Send + Sync {
    async fn load_for_update(&self, id: Uuid) -> Result<Option<T>, RepositoryError>;
}

/// Loads one entity under a shared row lock.
///
/// Used on the owning box so that it cannot be dispatched while a panel
/// command that checked the dispatch guard is still in flight.
#[async_trait]
pub trait LoadForShare<DB: Database, T: Identifiable>: Send + Sync {
    async fn load_for_share(&self, id: Uuid) -> Result<Option<T>, RepositoryError>;
}

use async_trait::async_trait;
use sqlx::Database;

use crate::models::identifiable::Identifiable;
use crate::repository::RepositoryError;

/// Exact-match lookup of an entity by its barcode.
///
/// The returned row is locked for update, as a scan always goes on to
/// modify the panel it resolved.
#[async_trait]
pub trait FindByBarcode<DB: Database, T: Identifiable>: Send + Sync {
    async fn find_by_barcode(&self, barcode: &str) -> Result<Option<T>, RepositoryError>;
}

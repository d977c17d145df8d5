use async_trait::async_trait;
use sqlx::Database;
use uuid::Uuid;

use crate::models::ScanLogModel;
use crate::repository::pagination::{Page, PageRequest};
use crate::repository::RepositoryError;

/// Scan log of a panel, oldest first.
#[async_trait]
pub trait LoadScanLogs<DB: Database>: Send + Sync {
    async fn load_scan_logs(
        &self,
        panel_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<ScanLogModel>, RepositoryError>;
}

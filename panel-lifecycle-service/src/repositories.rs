use std::sync::Arc;

use panel_lifecycle_db::models::{
    AuditRecordModel, BoxModel, PanelModel, PanelTypeModel, ScanLogModel,
};
use panel_lifecycle_db::repository::{
    CreateBatch, DisplayNameLookup, ExistByIds, FindByBarcode, FindByParentId, LoadBatch,
    LoadForShare, LoadForUpdate, LoadScanLogs, QueryAuditRecords, UpdateBatch,
};
use sqlx::Database;

/// Everything the lifecycle services need from panel storage.
pub trait PanelRepository<DB: Database>:
    LoadBatch<DB, PanelModel>
    + LoadForUpdate<DB, PanelModel>
    + FindByBarcode<DB, PanelModel>
    + FindByParentId<DB, PanelModel>
    + CreateBatch<DB, PanelModel>
    + UpdateBatch<DB, PanelModel>
    + ExistByIds<DB>
{
}

impl<DB: Database, T> PanelRepository<DB> for T where
    T: LoadBatch<DB, PanelModel>
        + LoadForUpdate<DB, PanelModel>
        + FindByBarcode<DB, PanelModel>
        + FindByParentId<DB, PanelModel>
        + CreateBatch<DB, PanelModel>
        + UpdateBatch<DB, PanelModel>
        + ExistByIds<DB>
{
}

pub trait BoxRepository<DB: Database>: LoadForShare<DB, BoxModel> {}

impl<DB: Database, T> BoxRepository<DB> for T where T: LoadForShare<DB, BoxModel> {}

pub trait PanelTypeRepository<DB: Database>: FindByParentId<DB, PanelTypeModel> {}

impl<DB: Database, T> PanelTypeRepository<DB> for T where T: FindByParentId<DB, PanelTypeModel> {}

/// Append and read only; scan log rows are never updated or deleted.
pub trait ScanLogRepository<DB: Database>: CreateBatch<DB, ScanLogModel> + LoadScanLogs<DB> {}

impl<DB: Database, T> ScanLogRepository<DB> for T where
    T: CreateBatch<DB, ScanLogModel> + LoadScanLogs<DB>
{
}

pub trait AuditRecordRepository<DB: Database>:
    CreateBatch<DB, AuditRecordModel> + QueryAuditRecords<DB>
{
}

impl<DB: Database, T> AuditRecordRepository<DB> for T where
    T: CreateBatch<DB, AuditRecordModel> + QueryAuditRecords<DB>
{
}

/// Repositories of one unit of work. All of them share the same transaction
/// when built by a session factory.
pub struct LifecycleRepositories<DB: Database> {
    pub panels: Arc<dyn PanelRepository<DB>>,
    pub boxes: Arc<dyn BoxRepository<DB>>,
    pub panel_types: Arc<dyn PanelTypeRepository<DB>>,
    pub scan_logs: Arc<dyn ScanLogRepository<DB>>,
    pub audit_records: Arc<dyn AuditRecordRepository<DB>>,
    pub display_names: Arc<dyn DisplayNameLookup<DB>>,
}

impl<DB: Database> Clone for LifecycleRepositories<DB> {
    fn clone(&self) -> Self {
        Self {
            panels: self.panels.clone(),
            boxes: self.boxes.clone(),
            panel_types: self.panel_types.clone(),
            scan_logs: self.scan_logs.clone(),
            audit_records: self.audit_records.clone(),
            display_names: self.display_names.clone(),
        }
    }
}
